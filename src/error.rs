//! Error types for the distance simulator

use thiserror::Error;

/// Errors that end a simulator run
#[derive(Debug, Error)]
pub enum SimError {
    /// The serial port could not be opened
    #[error("Failed to open serial port {port}: {source}")]
    Connection {
        port: String,
        #[source]
        source: serialport::Error,
    },

    /// Writing a frame to an already open port failed
    #[error("Serial write failed: {0}")]
    Transport(#[source] std::io::Error),

    /// The CSV record file could not be created or written
    #[error("Record file {path}: {source}")]
    Record {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to install Ctrl+C handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
