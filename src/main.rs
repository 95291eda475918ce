mod commands;
mod logging;
mod menu;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use agenda_core::config::{AgendaConfig, ConfigOverrides};
use agenda_core::store::{CollectionStore, FileStore, MemoryStore, SharedStore};
use agenda_core::{calendar::CalendarPatch, event::EventPatch, user::UserPatch};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;

#[derive(Parser)]
#[command(name = "agenda")]
#[command(about = "Manage users, calendars and events from the terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    overrides: Overrides,

    /// Keep everything in memory; nothing is written to disk
    #[arg(long, global = true)]
    memory: bool,
}

#[derive(Args, Clone)]
struct Overrides {
    /// Directory holding the databases
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Database to open inside the data directory
    #[arg(long, global = true)]
    database: Option<String>,

    /// Where system.log and error.log are written
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive menu (default)
    Menu,
    /// Manage users
    #[command(subcommand)]
    User(UserCommand),
    /// Manage calendars
    #[command(subcommand)]
    Calendar(CalendarCommand),
    /// Manage events
    #[command(subcommand)]
    Event(EventCommand),
    /// Show configuration paths and effective settings
    Config,
}

#[derive(Subcommand)]
enum UserCommand {
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// Identifier to use instead of a generated one
        #[arg(long)]
        id: Option<String>,
    },
    List,
    Show {
        name: String,
    },
    Update {
        name: String,

        #[arg(long)]
        new_name: Option<String>,

        #[arg(long)]
        new_email: Option<String>,
    },
    Delete {
        name: String,
    },
}

#[derive(Subcommand)]
enum CalendarCommand {
    Create {
        #[arg(long)]
        name: String,

        /// Identifier of the owning user
        #[arg(long)]
        owner: String,
    },
    List,
    Show {
        name: String,
    },
    Update {
        name: String,

        #[arg(long)]
        new_name: Option<String>,

        /// New owner id (not checked against existing users)
        #[arg(long)]
        new_owner: Option<String>,
    },
    Delete {
        name: String,
    },
}

#[derive(Subcommand)]
enum EventCommand {
    Create {
        #[arg(long)]
        title: String,

        /// Date as DD/MM/YYYY
        #[arg(short, long)]
        date: String,

        /// Time as HH:MM
        #[arg(short, long)]
        time: String,

        #[arg(short, long)]
        location: String,

        /// Name of the calendar the event belongs to
        #[arg(short, long)]
        calendar: String,
    },
    List,
    Show {
        title: String,
    },
    Update {
        title: String,

        #[arg(long)]
        new_title: Option<String>,

        #[arg(long)]
        new_date: Option<String>,

        #[arg(long)]
        new_time: Option<String>,

        #[arg(long)]
        new_location: Option<String>,
    },
    Delete {
        title: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.overrides.clone()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red());
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = logging::init(&config.log_path()) {
        eprintln!("{} {err:#}", "error:".red());
        return ExitCode::FAILURE;
    }

    match run(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Open the store once, run the command, and always close the store before returning.
async fn run(cli: Cli, config: &AgendaConfig) -> Result<()> {
    let command = match cli.command.unwrap_or(Commands::Menu) {
        Commands::Config => return commands::config::run(config),
        Commands::Menu => StoreCommand::Menu,
        Commands::User(cmd) => StoreCommand::User(cmd),
        Commands::Calendar(cmd) => StoreCommand::Calendar(cmd),
        Commands::Event(cmd) => StoreCommand::Event(cmd),
    };

    let store = open_store(config, cli.memory)?;
    let result = dispatch(command, store.as_ref()).await;

    if let Err(err) = store.close().await {
        tracing::error!("Could not close the store: {err}");
    }

    result
}

/// Commands that need an open store.
enum StoreCommand {
    Menu,
    User(UserCommand),
    Calendar(CalendarCommand),
    Event(EventCommand),
}

async fn dispatch(command: StoreCommand, store: &dyn CollectionStore) -> Result<()> {
    match command {
        StoreCommand::Menu => {
            tokio::select! {
                result = menu::run(store) => result,
                _ = tokio::signal::ctrl_c() => {
                    println!();
                    tracing::info!("Interrupted, exiting");
                    if let Err(err) = store.close().await {
                        tracing::error!("Could not close the store: {err}");
                    }
                    // A prompt may still be blocking on stdin; don't wait for it.
                    std::process::exit(130);
                }
            }
        }
        StoreCommand::User(cmd) => match cmd {
            UserCommand::Create { name, email, id } => {
                commands::user::create(store, &name, &email, id).await
            }
            UserCommand::List => commands::user::list(store).await,
            UserCommand::Show { name } => commands::user::show(store, &name).await,
            UserCommand::Update {
                name,
                new_name,
                new_email,
            } => {
                let patch = UserPatch {
                    name: new_name,
                    email: new_email,
                };
                commands::user::update(store, &name, patch).await
            }
            UserCommand::Delete { name } => commands::user::delete(store, &name).await,
        },
        StoreCommand::Calendar(cmd) => match cmd {
            CalendarCommand::Create { name, owner } => {
                commands::calendar::create(store, &name, &owner).await
            }
            CalendarCommand::List => commands::calendar::list(store).await,
            CalendarCommand::Show { name } => commands::calendar::show(store, &name).await,
            CalendarCommand::Update {
                name,
                new_name,
                new_owner,
            } => {
                let patch = CalendarPatch {
                    name: new_name,
                    owner_id: new_owner,
                };
                commands::calendar::update(store, &name, patch).await
            }
            CalendarCommand::Delete { name } => commands::calendar::delete(store, &name).await,
        },
        StoreCommand::Event(cmd) => match cmd {
            EventCommand::Create {
                title,
                date,
                time,
                location,
                calendar,
            } => commands::event::create(store, &title, &date, &time, &location, &calendar).await,
            EventCommand::List => commands::event::list(store).await,
            EventCommand::Show { title } => commands::event::show(store, &title).await,
            EventCommand::Update {
                title,
                new_title,
                new_date,
                new_time,
                new_location,
            } => {
                let patch = EventPatch {
                    title: new_title,
                    date: new_date,
                    time: new_time,
                    location: new_location,
                };
                commands::event::update(store, &title, patch).await
            }
            EventCommand::Delete { title } => commands::event::delete(store, &title).await,
        },
    }
}

fn load_config(overrides: Overrides) -> Result<AgendaConfig> {
    let config = AgendaConfig::load()?.with_overrides(ConfigOverrides {
        data_dir: overrides.data_dir,
        database: overrides.database,
        log_dir: overrides.log_dir,
    });

    Ok(config)
}

fn open_store(config: &AgendaConfig, memory: bool) -> Result<SharedStore> {
    if memory {
        tracing::info!("Using an in-memory database; nothing will be saved");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let store = FileStore::open(&config.data_path(), &config.database).with_context(|| {
        format!("Could not open database at {}", config.database_path().display())
    })?;
    tracing::info!("Connected to database {}", store.path().display());

    Ok(Arc::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config_under_file() -> (tempfile::TempDir, AgendaConfig) {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();

        let config = AgendaConfig::default().with_overrides(ConfigOverrides {
            data_dir: Some(blocker),
            ..ConfigOverrides::default()
        });
        (dir, config)
    }

    #[tokio::test]
    async fn test_config_command_does_not_open_store() {
        let (_dir, config) = config_under_file();

        let cli = Cli::try_parse_from(["agenda", "config"]).unwrap();
        assert!(run(cli, &config).await.is_ok());

        let cli = Cli::try_parse_from(["agenda", "user", "list"]).unwrap();
        let err = run(cli, &config).await.unwrap_err();
        assert!(format!("{err:#}").contains("Could not open database"));
    }

    #[tokio::test]
    async fn test_store_commands_run_against_memory_store() {
        let (_dir, config) = config_under_file();

        let cli = Cli::try_parse_from([
            "agenda", "user", "create", "--name", "Alice", "--email", "alice@example.com",
            "--memory",
        ])
        .unwrap();
        assert!(run(cli, &config).await.is_ok());
    }

    #[test]
    fn test_global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["agenda", "config", "--database", "work"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Config)));
        assert_eq!(cli.overrides.database.as_deref(), Some("work"));
    }
}
