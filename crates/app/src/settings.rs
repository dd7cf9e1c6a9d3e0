//! Settings for the command line client.
//!
//! Sources, later ones winning: built-in defaults, the TOML file
//! (`config/pocketbook.toml` unless `--config` is given), `POCKETBOOK_*`
//! environment variables, command line flags.

use std::time::Duration;

use serde::Deserialize;

use crate::{cli::GlobalArgs, error::Result};

const DEFAULT_CONFIG_PATH: &str = "config/pocketbook.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root of the backend API, e.g. `http://localhost:5000/api`.
    pub base_url: String,
    pub log_level: String,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            log_level: "warn".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Settings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn apply(&mut self, args: &GlobalArgs) {
        if let Some(base_url) = &args.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(level) = &args.log_level {
            self.log_level = level.clone();
        }
    }
}

pub fn load(args: &GlobalArgs) -> Result<Settings> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("POCKETBOOK"));
    let mut settings: Settings = builder.build()?.try_deserialize()?;

    settings.apply(args);
    Ok(settings)
}
