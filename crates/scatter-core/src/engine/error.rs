use super::config::ConfigError;
use crate::core::models::error::ModelError;
use std::fmt;
use thiserror::Error;

/// The dimension of the accelerated decomposition a size constraint applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchDimension {
    Atoms,
    Molecules,
}

impl fmt::Display for BatchDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atoms => write!(f, "atom count"),
            Self::Molecules => write!(f, "molecule count"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Malformed input: {source}")]
    MalformedInput {
        #[from]
        source: ModelError,
    },

    #[error("Unsupported batch size: {dimension} {count} is not a multiple of {batch_size}")]
    UnsupportedBatchSize {
        dimension: BatchDimension,
        count: usize,
        batch_size: usize,
    },

    #[error("Backend '{backend}' is unavailable: {reason}")]
    BackendUnavailable {
        backend: &'static str,
        reason: String,
    },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },
}
