use agenda_core::config::AgendaConfig;
use anyhow::Result;
use owo_colors::OwoColorize;

use crate::logging::{ERROR_LOG, SYSTEM_LOG};

pub fn run(config: &AgendaConfig) -> Result<()> {
    let config_path = AgendaConfig::config_path()?;
    let log_dir = config.log_path();

    println!("{}", "Paths".bold());
    println!("  Config:     {}", config_path.display());
    println!("  Database:   {}", config.database_path().display());
    println!("  System log: {}", log_dir.join(SYSTEM_LOG).display());
    println!("  Error log:  {}", log_dir.join(ERROR_LOG).display());
    println!();
    println!("{}", "Settings".bold());
    for line in config.to_toml()?.lines() {
        println!("  {line}");
    }

    Ok(())
}
