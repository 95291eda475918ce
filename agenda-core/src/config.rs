//! Agenda configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, Map};
use serde::{Deserialize, Serialize};

use crate::error::{AgendaError, AgendaResult};

static DEFAULT_DATA_DIR: &str = "~/.agenda";
static DEFAULT_DATABASE: &str = "agendaDB";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

/// Configuration at ~/.config/agenda/config.toml, overridable with
/// `AGENDA_*` environment variables.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AgendaConfig {
    /// Directory holding the databases.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Database (subdirectory of `data_dir`) to open.
    #[serde(default = "default_database")]
    pub database: String,

    /// Where system.log and error.log are written. Defaults to the working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

/// Values given on the command line; `None` keeps the loaded value.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub database: Option<String>,
    pub log_dir: Option<PathBuf>,
}

impl Default for AgendaConfig {
    fn default() -> Self {
        AgendaConfig {
            data_dir: default_data_dir(),
            database: default_database(),
            log_dir: None,
        }
    }
}

impl AgendaConfig {
    pub fn config_path() -> AgendaResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AgendaError::Config("Could not determine config directory".into()))?
            .join("agenda");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the user's config, writing a commented-out default on first run.
    pub fn load() -> AgendaResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> AgendaResult<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`load_from`](Self::load_from), but reads `AGENDA_*` variables
    /// from `env` instead of the process environment when given.
    pub fn load_with_env(path: &Path, env: Option<Map<String, String>>) -> AgendaResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("AGENDA").source(env))
            .build()
            .map_err(|e| AgendaError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| AgendaError::Config(e.to_string()))
    }

    /// Apply command-line overrides on top of the file and environment values.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(data_dir) = overrides.data_dir {
            self.data_dir = data_dir;
        }
        if let Some(database) = overrides.database {
            self.database = database;
        }
        if let Some(log_dir) = overrides.log_dir {
            self.log_dir = Some(log_dir);
        }
        self
    }

    /// `data_dir` with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        expand(&self.data_dir)
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_path().join(&self.database)
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_dir
            .as_deref()
            .map(expand)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn to_toml(&self) -> AgendaResult<String> {
        toml::to_string_pretty(self).map_err(|e| AgendaError::Config(e.to_string()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> AgendaResult<()> {
        let contents = format!(
            "\
# agenda configuration

# Where databases are stored:
# data_dir = \"{DEFAULT_DATA_DIR}\"

# Database to open inside data_dir:
# database = \"{DEFAULT_DATABASE}\"

# Where system.log and error.log go (defaults to the working directory):
# log_dir = \"~/.agenda/logs\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AgendaError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| AgendaError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}
