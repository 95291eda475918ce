//! Log sink: console mirror plus two append-only files.
//!
//! `system.log` receives everything at INFO and above, `error.log` only
//! errors. The console honours `RUST_LOG` and defaults to `info`.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::Subscriber;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

pub const SYSTEM_LOG: &str = "system.log";
pub const ERROR_LOG: &str = "error.log";

pub fn init(log_dir: &Path) -> Result<()> {
    subscriber(log_dir)?
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}

/// Build the layered subscriber writing into `log_dir` without installing it.
pub fn subscriber(log_dir: &Path) -> Result<impl Subscriber + Send + Sync + 'static> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let system_log = open_append(&log_dir.join(SYSTEM_LOG))?;
    let error_log = open_append(&log_dir.join(ERROR_LOG))?;

    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_timer(ChronoLocal::rfc_3339())
                .with_target(false)
                .with_filter(console_filter),
        )
        .with(
            fmt::layer()
                .with_writer(Mutex::new(system_log))
                .with_timer(ChronoLocal::rfc_3339())
                .with_ansi(false)
                .with_target(false)
                .with_filter(LevelFilter::INFO),
        )
        .with(
            fmt::layer()
                .with_writer(Mutex::new(error_log))
                .with_timer(ChronoLocal::rfc_3339())
                .with_ansi(false)
                .with_filter(LevelFilter::ERROR),
        );

    Ok(subscriber)
}

fn open_append(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_levels_split_between_files() {
        let dir = tempdir().unwrap();
        let subscriber = subscriber(dir.path()).unwrap();

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("too quiet for the files");
            tracing::info!("User created: Alice");
            tracing::error!("Could not save user: name must contain only letters and spaces");
        });

        let system = std::fs::read_to_string(dir.path().join(SYSTEM_LOG)).unwrap();
        let errors = std::fs::read_to_string(dir.path().join(ERROR_LOG)).unwrap();

        assert_eq!(system.lines().count(), 2);
        assert!(system.contains("INFO") && system.contains("User created: Alice"));
        assert!(system.contains("ERROR") && system.contains("Could not save user"));
        assert!(!system.contains("too quiet"));

        assert_eq!(errors.lines().count(), 1);
        assert!(errors.contains("Could not save user"));
        assert!(!errors.contains("User created"));

        assert!(!system.contains('\x1b') && !errors.contains('\x1b'));
    }

    #[test]
    fn test_files_are_appended() {
        let dir = tempdir().unwrap();
        for run in ["first", "second"] {
            let subscriber = subscriber(dir.path()).unwrap();
            tracing::subscriber::with_default(subscriber, || tracing::info!("{run} run"));
        }

        let system = std::fs::read_to_string(dir.path().join(SYSTEM_LOG)).unwrap();
        assert!(system.contains("first run") && system.contains("second run"));
    }
}
