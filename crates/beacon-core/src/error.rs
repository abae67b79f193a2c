//! Core error types for Beacon

use thiserror::Error;

/// Result type alias for Beacon operations
pub type BeaconResult<T> = Result<T, BeaconError>;

/// Main error type for Beacon
///
/// Each variant includes contextual information where relevant. Recoverable
/// conditions (ending a session that was never started, a failed delivery of
/// an already-emitted envelope) are logged rather than represented here.
#[derive(Error, Debug, Clone)]
pub enum BeaconError {
    /// `track` called without an event name
    #[error("Event name must be non-empty")]
    MissingName,

    /// `identify` called with a user record lacking the required `id` field
    #[error("User record is missing required `id` field")]
    MissingUserId,

    /// The identifier generator collaborator is unavailable
    #[error("Identifier generation failed: {message}")]
    IdGeneration { message: String },

    /// Persisted-store errors
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        key: Option<String>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json { message: String },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// HTTP transport construction errors
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        url: Option<String>,
    },
}

impl BeaconError {
    /// Create a new identifier-generation error
    pub fn id_generation(message: impl Into<String>) -> Self {
        Self::IdGeneration {
            message: message.into(),
        }
    }

    /// Create a new storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            key: None,
        }
    }

    /// Create a storage error scoped to a store key
    pub fn storage_key(message: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Create a new JSON error
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json {
            message: message.into(),
        }
    }

    /// Create a new IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: None,
        }
    }

    /// Create an IO error scoped to a path
    pub fn io_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new HTTP error
    pub fn http(message: impl Into<String>) -> Self {
        Self::Http {
            message: message.into(),
            url: None,
        }
    }

    /// Create an HTTP error scoped to a URL
    pub fn http_url(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Http {
            message: message.into(),
            url: Some(url.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BeaconError::MissingName;
        assert_eq!(err.to_string(), "Event name must be non-empty");

        let err = BeaconError::storage_key("write failed", "session");
        assert!(err.to_string().contains("write failed"));
    }

    #[test]
    fn test_constructors_carry_context() {
        match BeaconError::io_path("read failed", "/tmp/x.json") {
            BeaconError::Io { path, .. } => assert_eq!(path.as_deref(), Some("/tmp/x.json")),
            _ => panic!("unexpected variant"),
        }

        match BeaconError::http_url("bad endpoint", "http://collector") {
            BeaconError::Http { url, .. } => assert_eq!(url.as_deref(), Some("http://collector")),
            _ => panic!("unexpected variant"),
        }
    }
}
