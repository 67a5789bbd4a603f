//! Error types for the colony engine binary.

use colony_core::{ColonyError, ConfigError};
use colony_types::RecordError;

/// Top-level error for the colony engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// A colony operation failed outside request handling.
    #[error("colony error: {source}")]
    Colony {
        /// The underlying colony error.
        #[from]
        source: ColonyError,
    },

    /// The save file could not be parsed.
    #[error("save file error: {source}")]
    Save {
        /// The underlying record error.
        #[from]
        source: RecordError,
    },

    /// Reading or writing the save file failed.
    #[error("io error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// A message could not be encoded for the wire.
    #[error("wire encoding error: {message}")]
    Wire {
        /// Description of the encoding failure.
        message: String,
    },
}
