// Setup errors (configuration, logging, terminal)
//
// The wizard itself has no failure modes; these only cover getting the program running.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to resolve log folder: {0}")]
    LogFolder(String),

    #[error("Failed to install logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
