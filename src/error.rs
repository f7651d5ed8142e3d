/// Error types for loading and validating configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration file could not be read
    Io(String),
    /// The configuration text is not valid JSON or has the wrong shape
    Parse(String),
    /// A setting holds a value the toolkit cannot work with
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "Configuration I/O error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Configuration parse error: {}", msg),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
