use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
            ConfigError::Parse(e) => write!(f, "invalid config json: {e}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Failure of an asynchronous resource load (icon image or KML document).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    NotFound { url: String },
    Failed { url: String, reason: String },
}

impl LoadError {
    pub fn url(&self) -> &str {
        match self {
            LoadError::NotFound { url } | LoadError::Failed { url, .. } => url,
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotFound { url } => write!(f, "resource not found: {url}"),
            LoadError::Failed { url, reason } => write!(f, "failed to load {url}: {reason}"),
        }
    }
}

impl std::error::Error for LoadError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapError {
    TimedOut { attempts: u32 },
}

impl fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootstrapError::TimedOut { attempts } => write!(
                f,
                "no globe surface was found after {attempts} attempts"
            ),
        }
    }
}

impl std::error::Error for BootstrapError {}
