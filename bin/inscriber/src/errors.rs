//! Error types for initialization and configuration.

use std::io;

use thiserror::Error;
use toml::de::Error as TomlError;

#[derive(Debug, Error)]
pub(crate) enum InitError {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("runtime: {0}")]
    RuntimeBuild(io::Error),

    #[error("unparsable config file: {0}")]
    TomlParse(#[from] TomlError),

    #[error("config: {0:?}")]
    MalformedConfig(#[from] ConfigError),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// Tried to traverse into a primitive.
    #[error("can't traverse into non-table key: {0}")]
    TraverseNonTableAt(String),

    /// Invalid override string.
    #[error("Invalid override: '{0}'")]
    InvalidOverride(String),
}
