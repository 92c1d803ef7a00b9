// Runtime configuration
//
// Layering (later wins): built-in defaults -> optional TOML file -> BLUEPRINT_WIZARD_* env vars.

use crate::error::SetupError;
use crate::wizard::Timings;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "blueprint-wizard.toml";
pub const ENV_PREFIX: &str = "BLUEPRINT_WIZARD";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    pub rotation_interval_ms: u64,
    pub loading_handoff_ms: u64,
    pub tick_rate_ms: u64,
    pub log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            rotation_interval_ms: 800,
            loading_handoff_ms: 5000,
            tick_rate_ms: 100,
            log_level: "debug".to_string(),
            log_dir: None,
        }
    }
}

impl WizardConfig {
    /// Loads config from `path` (or `blueprint-wizard.toml` in the CWD, if present) and the
    /// environment.
    pub fn load(path: Option<&Path>) -> Result<Self, SetupError> {
        let file = match path {
            Some(p) => ::config::File::from(p).required(true),
            None => ::config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let cfg: WizardConfig = ::config::Config::builder()
            .add_source(file)
            .add_source(::config::Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), SetupError> {
        if self.rotation_interval_ms == 0 {
            return Err(SetupError::InvalidConfig(
                "rotation_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.loading_handoff_ms == 0 {
            return Err(SetupError::InvalidConfig(
                "loading_handoff_ms must be greater than 0".to_string(),
            ));
        }
        if self.tick_rate_ms == 0 {
            return Err(SetupError::InvalidConfig(
                "tick_rate_ms must be greater than 0".to_string(),
            ));
        }
        self.level_filter()?;
        Ok(())
    }

    pub fn level_filter(&self) -> Result<LevelFilter, SetupError> {
        LevelFilter::from_str(self.log_level.trim()).map_err(|_| {
            SetupError::InvalidConfig(format!("Unknown log_level '{}'", self.log_level))
        })
    }

    pub fn timings(&self) -> Timings {
        Timings {
            rotation_interval: Duration::from_millis(self.rotation_interval_ms),
            loading_handoff: Duration::from_millis(self.loading_handoff_ms),
        }
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    /// Effective config rendered as TOML (logged at startup).
    pub fn to_toml(&self) -> String {
        toml::to_string(self).unwrap_or_default()
    }
}
