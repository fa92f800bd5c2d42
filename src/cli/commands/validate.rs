//! Validate configuration command.

use anyhow::Result;
use std::path::Path;

use algotrade_config::to_toml;

use crate::cli::app_config;

pub fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);
    if !config_path.exists() {
        println!("File not found; showing defaults with environment overrides.");
    }

    match app_config(config_path) {
        Ok(config) => {
            println!("Configuration is valid!");
            println!();
            println!("{}", to_toml(&config)?);
        }
        Err(e) => {
            println!("Configuration error: {:#}", e);
            return Err(e);
        }
    }

    Ok(())
}
