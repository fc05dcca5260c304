use core::result::Result as CoreResult;

use thiserror::Error;
use toml::de::Error as TomlError;

/// Result type for query construction.
pub type Result<T> = CoreResult<T, Error>;

/// Errors that can occur while building a query vector.
///
/// Only structural problems with the inputs or the configuration are errors.
/// Threshold outcomes such as "no gene passed" are reported as
/// [`Diagnostic`](crate::Diagnostic)s instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Expression data does not have two aligned columns, or the identifier
    /// list is not aligned with it.
    #[error("Invalid input shape: {0}")]
    InvalidInputShape(String),

    /// No entrez identifiers were supplied.
    #[error("Entrez identifiers are required")]
    MissingIdentifiers,

    /// Desired effect was neither `pos` nor `neg`.
    #[error("Invalid desired effect: {0} (expected \"pos\" or \"neg\")")]
    InvalidEffect(String),

    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML deserialization failed.
    #[error("TOML deserialization error: {0}")]
    Toml(#[from] TomlError),
}

impl Error {
    /// Determines whether this error was caused by the shape of the caller's data.
    ///
    /// Returns `true` for misaligned or missing inputs, `false` for configuration problems.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidInputShape(_) | Self::MissingIdentifiers)
    }
}
