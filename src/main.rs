use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

use ext_store::config::{Config, ConfigError};
use ext_store::{AreaError, FjallArea, KeySelector, LocalStore, Record, StoreError};

mod subscriber;

use subscriber::LoggingError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    #[error("Storage area error: {0}")]
    Area(#[from] AreaError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser)]
#[command(name = "ext-store")]
#[command(about = "Read and write a local JSON key-value storage area")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true, env = "EXT_STORE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new storage area
    Init {
        /// Storage area path (overrides the config file)
        #[arg(long, env = "EXT_STORE_PATH")]
        path: Option<PathBuf>,
    },

    /// Print the stored record for the given keys as JSON
    ///
    /// Prints `null` when none of the keys are stored. Without keys, the
    /// configured default keys are read.
    Get {
        /// Keys to read
        keys: Vec<String>,

        /// Read every stored key
        #[arg(long, conflicts_with = "keys")]
        all: bool,

        /// Storage area path (overrides the config file)
        #[arg(long, env = "EXT_STORE_PATH")]
        path: Option<PathBuf>,
    },

    /// Store one or more KEY=JSON pairs
    Set {
        /// Pairs to store, e.g. data='{"a":1}'
        #[arg(required = true, value_parser = parse_pair)]
        pairs: Vec<(String, Value)>,

        /// Storage area path (overrides the config file)
        #[arg(long, env = "EXT_STORE_PATH")]
        path: Option<PathBuf>,
    },
}

/// Parse a `KEY=JSON` argument.
fn parse_pair(arg: &str) -> Result<(String, Value), String> {
    let (key, json) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=JSON, got '{}'", arg))?;
    if key.is_empty() {
        return Err(format!("empty key in '{}'", arg));
    }
    let value = serde_json::from_str(json).map_err(|e| format!("invalid JSON for '{}': {}", key, e))?;
    Ok((key.to_string(), value))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    subscriber::init(&config.logging)?;

    match cli.command {
        Commands::Init { path } => {
            let path = path.unwrap_or_else(|| config.store.path.clone());
            FjallArea::init(&path)?;
            println!("Initialized storage area at {}", path.display());
        }

        Commands::Get { keys, all, path } => {
            let path = path.unwrap_or_else(|| config.store.path.clone());
            let store = LocalStore::new(FjallArea::open(&path)?);

            let selector = if all {
                KeySelector::All
            } else if keys.is_empty() {
                config.store.default_selector()
            } else {
                KeySelector::from(keys)
            };

            match store.get(selector).await? {
                Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
                None => println!("null"),
            }
        }

        Commands::Set { pairs, path } => {
            let path = path.unwrap_or_else(|| config.store.path.clone());
            let store = LocalStore::new(FjallArea::open(&path)?);

            let record: Record = pairs.into_iter().collect();
            store.set(record).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pair_splits_on_first_equals() {
        let (key, value) = parse_pair(r#"data={"a":"x=y"}"#).unwrap();
        assert_eq!(key, "data");
        assert_eq!(value, serde_json::json!({"a": "x=y"}));
    }

    #[test]
    fn parse_pair_rejects_bad_input() {
        assert!(parse_pair("no-equals").is_err());
        assert!(parse_pair("=1").is_err());
        assert!(parse_pair("data={oops").is_err());
    }

    #[test]
    fn cli_parses_get_and_set() {
        let cli = Cli::try_parse_from(["ext-store", "get", "--all", "--path", "/tmp/x"]).unwrap();
        assert!(matches!(cli.command, Commands::Get { all: true, .. }));

        let cli = Cli::try_parse_from(["ext-store", "set", "meta=2"]).unwrap();
        match cli.command {
            Commands::Set { pairs, .. } => assert_eq!(pairs, vec![("meta".to_string(), Value::from(2))]),
            _ => panic!("expected set"),
        }
    }
}
