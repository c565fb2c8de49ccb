//! Configuration management commands for CLI.

use std::path::PathBuf;

use clap::Subcommand;
use habitflow_core::{Config, ConfigError};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a configuration value
    Get {
        /// Key, e.g. output.pretty or storage.data_dir
        key: String,
    },
    /// Set a configuration value
    Set {
        /// Key, e.g. output.pretty or storage.data_dir
        key: String,
        /// New value (empty string clears storage.data_dir)
        value: String,
    },
    /// Show the full configuration
    List,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match key.as_str() {
                "output.pretty" => println!("{}", config.output.pretty),
                "storage.data_dir" => println!(
                    "{}",
                    config
                        .storage
                        .data_dir
                        .as_deref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default()
                ),
                _ => return Err(ConfigError::UnknownKey(key).into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            match key.as_str() {
                "output.pretty" => {
                    config.output.pretty = value
                        .parse()
                        .map_err(|_| ConfigError::ParseFailed(format!("expected true/false, got '{value}'")))?;
                }
                "storage.data_dir" => {
                    config.storage.data_dir = if value.is_empty() {
                        None
                    } else {
                        Some(PathBuf::from(value))
                    };
                }
                _ => return Err(ConfigError::UnknownKey(key).into()),
            }
            config.save()?;
            println!("Updated {key}");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
