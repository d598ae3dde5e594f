//! Error types for Flurry
//!
//! Only configuration loading can fail. The frame path degrades silently.

use thiserror::Error;

/// The main error type for Flurry operations
#[derive(Debug, Error)]
pub enum FlurryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(String),

    #[error("Config serialization error: {0}")]
    ConfigSerialize(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },
}

/// Result type alias for Flurry operations
pub type Result<T> = std::result::Result<T, FlurryError>;

impl From<toml::de::Error> for FlurryError {
    fn from(err: toml::de::Error) -> Self {
        FlurryError::ConfigParse(err.to_string())
    }
}

impl From<toml::ser::Error> for FlurryError {
    fn from(err: toml::ser::Error) -> Self {
        FlurryError::ConfigSerialize(err.to_string())
    }
}
