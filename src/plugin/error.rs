//! Plugin Error Types
//!
//! Errors raised while validating the plugin flags and resolving the
//! plugin settings payload. Messages are surfaced verbatim to the operator.

use thiserror::Error;

/// Result type for plugin operations
pub type PluginResult<T> = Result<T, PluginError>;

/// Errors produced by plugin flag validation and settings resolution
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PluginError {
    /// Both verification modes requested at once
    #[error("only --plugins.skipverify or --plugins.localverify must be set")]
    ConflictingFlags,

    /// Public key supplied without local verification
    #[error("--plugins.localverify is required for setting --plugins.publickey")]
    MissingDependency,

    /// Settings URL carries a scheme outside the allow-list
    #[error("plugins: unable to create reader due to unsupported scheme {scheme}")]
    UnsupportedScheme { scheme: String },

    /// Settings URL could not be parsed
    #[error("plugins: Invalid URL for --plugins due to {reason}")]
    InvalidUrl { reason: String },

    /// Settings source could not be opened or read
    #[error("plugins: unable to create reader due to {reason}")]
    IoFailure { reason: String },

    /// Settings payload is not valid JSON for the settings model
    #[error("plugins: unable to parse settings due to {reason}")]
    ParseFailure { reason: String },

    /// Provider definition is incomplete
    #[error("plugins: invalid definition for provider {provider}: {reason}")]
    InvalidDefinition { provider: String, reason: String },
}

impl PluginError {
    /// Create an unsupported scheme error
    pub fn unsupported_scheme<S: Into<String>>(scheme: S) -> Self {
        Self::UnsupportedScheme { scheme: scheme.into() }
    }

    /// Create an invalid URL error
    pub fn invalid_url<S: Into<String>>(reason: S) -> Self {
        Self::InvalidUrl { reason: reason.into() }
    }

    /// Create an I/O failure error
    pub fn io_failure<S: Into<String>>(reason: S) -> Self {
        Self::IoFailure { reason: reason.into() }
    }

    /// Create a parse failure error
    pub fn parse_failure<S: Into<String>>(reason: S) -> Self {
        Self::ParseFailure { reason: reason.into() }
    }

    /// Create an invalid provider definition error
    pub fn invalid_definition<P: Into<String>, S: Into<String>>(provider: P, reason: S) -> Self {
        Self::InvalidDefinition { provider: provider.into(), reason: reason.into() }
    }

    /// Check if error comes from an inconsistent flag combination
    pub fn is_flag_error(&self) -> bool {
        matches!(self,
            PluginError::ConflictingFlags |
            PluginError::MissingDependency
        )
    }

    /// Check if error concerns the settings source rather than its content
    pub fn is_source_error(&self) -> bool {
        matches!(self,
            PluginError::UnsupportedScheme { .. } |
            PluginError::InvalidUrl { .. } |
            PluginError::IoFailure { .. }
        )
    }
}

impl From<std::io::Error> for PluginError {
    fn from(err: std::io::Error) -> Self {
        PluginError::io_failure(err.to_string())
    }
}

impl From<serde_json::Error> for PluginError {
    fn from(err: serde_json::Error) -> Self {
        PluginError::parse_failure(err.to_string())
    }
}
