use std::{fmt, path::PathBuf};

/// Problems loading or using the configuration store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration file exists but could not be parsed.
    Corrupt { path: PathBuf, details: String },
    /// The configuration parsed but violates an invariant.
    Invalid { details: String },
    /// No profile by that name.
    NotFound { name: String, available: Vec<String> },
    /// Reading or writing the configuration file failed.
    Io { path: PathBuf, details: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Corrupt { path, details } => {
                write!(f, "corrupt configuration {}: {}", path.display(), details)
            }
            ConfigError::Invalid { details } => write!(f, "invalid configuration: {}", details),
            ConfigError::NotFound { name, available } => write!(
                f,
                "profile '{}' not found; available profiles are: {}",
                name,
                available.join(", ")
            ),
            ConfigError::Io { path, details } => write!(f, "{}: {}", path.display(), details),
        }
    }
}

impl std::error::Error for ConfigError {}
