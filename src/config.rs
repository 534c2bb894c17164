//! Application configuration

use crate::error::CacheResult;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable holding the config file path
pub const CONFIG_ENV: &str = "TRICACHE_CONFIG";

/// Configuration for the `tricache` binary
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Log filter used when `RUST_LOG` is not set
    pub log_filter: String,

    /// Operation script to run instead of the built-in demo
    pub script: Option<PathBuf>,

    /// Print cache statistics after the run
    pub print_stats: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            log_filter: "info".to_string(),
            script: None,
            print_stats: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> CacheResult<Self> {
        let file = File::open(path.as_ref())?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// Load from the file named by `TRICACHE_CONFIG`, or use defaults
    pub fn from_env() -> CacheResult<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                info!("Loading config from {:?}", path);
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }
}
