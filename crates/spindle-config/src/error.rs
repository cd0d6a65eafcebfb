//! Error types for loading raw options.
//!
//! Validation problems are never returned as errors; they are reported into
//! the call's diagnostics. `ConfigError` only covers turning host data (JSON
//! values, option strings) into the typed option structs.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value could not be deserialized or does not name a known variant
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("options could not be serialized: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Parse an option string into one of the closed enumerations.
///
/// # Example
///
/// ```
/// use spindle_config::{Platform, parse_option};
///
/// let platform: Platform = parse_option("platform", "node").unwrap();
/// assert_eq!(platform, Platform::Node);
/// assert!(parse_option::<Platform>("platform", "deno").is_err());
/// ```
pub fn parse_option<T>(field: &str, text: &str) -> Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    text.parse().map_err(|message| ConfigError::invalid(field, message))
}
