//! Error types for homeddns
//!
//! Two kinds of errors exist: fatal ones abort a pass before any provider is
//! contacted, the rest are contained to one record or one provider block.

use thiserror::Error;

/// Result type alias for homeddns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for homeddns
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration could not be read, parsed or validated
    #[error("Configuration error: {0}")]
    Config(String),

    /// The public IP address could not be determined
    #[error("Public IP resolution failed: {0}")]
    PublicIp(String),

    /// A provider rejected a request or answered with a non-success status
    #[error("{provider} API error (code {code}): {message}")]
    Api {
        /// Provider name
        provider: String,
        /// Backend error code, normalized to a string
        code: String,
        /// Backend error message
        message: String,
    },

    /// The configuration names a provider that has no registered factory
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// Transport failure (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(String),

    /// A response body did not have the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a public IP resolution error
    pub fn public_ip(msg: impl Into<String>) -> Self {
        Self::PublicIp(msg.into())
    }

    /// Create a provider API error
    pub fn api(
        provider: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Api {
            provider: provider.into(),
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create an unknown provider error
    pub fn unknown_provider(name: impl Into<String>) -> Self {
        Self::UnknownProvider(name.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Whether this error must abort the whole pass
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::PublicIp(_))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_errors_are_config_and_public_ip() {
        assert!(Error::config("bad").is_fatal());
        assert!(Error::public_ip("down").is_fatal());
        assert!(!Error::api("godaddy", "422", "invalid").is_fatal());
        assert!(!Error::unknown_provider("nope").is_fatal());
        assert!(!Error::http("timeout").is_fatal());
        assert!(!Error::decode("eof").is_fatal());
    }

    #[test]
    fn api_error_display_includes_code_and_message() {
        let err = Error::api("porkbun", "ERROR", "Invalid API key");
        assert_eq!(err.to_string(), "porkbun API error (code ERROR): Invalid API key");
    }
}
