use std::path::PathBuf;

use thiserror::Error;

/// Failure to produce a usable [`crate::SpaceTimeConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("no config file found; inspected: {0}")]
    NotFound(String),
}

impl From<orrery_error::SpaceTimeError> for ConfigError {
    fn from(err: orrery_error::SpaceTimeError) -> Self {
        Self::Invalid(err.to_string())
    }
}
