//! Error types for the netstorage client.

use thiserror::Error;

/// Main error type for NetStorage operations.
///
/// Errors are cloneable so that the outcome of a shared operation (such as a
/// directory resolution awaited by several callers) can be handed to every
/// waiter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The server answered 404.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The server answered 403.
    #[error("Access forbidden: {0}")]
    Forbidden(String),

    /// The server answered 400.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Any other failure reported by the server, with its status code when known.
    #[error("NetStorage error ({}): {message}", .code.map_or_else(|| "-".to_string(), |c| c.to_string()))]
    Unspecific { code: Option<u16>, message: String },

    /// Response body could not be decoded.
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Transport level failure (DNS, TLS, timeouts, truncated bodies).
    #[error("Connection error: {0}")]
    Connection(String),

    /// A waiting caller was interrupted before the operation finished.
    #[error("Interrupted: {0}")]
    Interrupted(String),

    /// Rejected on the client side before any request was sent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Local source file for an upload does not exist.
    #[error("Local file not found: {0}")]
    LocalFileNotFound(String),

    /// Local filesystem error while reading or writing transfer data.
    #[error("Local I/O error: {0}")]
    LocalIo(String),
}

impl StorageError {
    /// Generic error without a status code.
    pub fn unspecific(message: impl Into<String>) -> Self {
        StorageError::Unspecific {
            code: None,
            message: message.into(),
        }
    }

    /// Whether this error is a 404 from the server.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        StorageError::Connection(err.to_string())
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => StorageError::LocalFileNotFound(err.to_string()),
            _ => StorageError::LocalIo(err.to_string()),
        }
    }
}

impl From<quick_xml::DeError> for StorageError {
    fn from(err: quick_xml::DeError) -> Self {
        StorageError::Deserialization(err.to_string())
    }
}

/// Result type alias for netstorage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        assert!(StorageError::NotFound("/a".into()).is_not_found());
        assert!(!StorageError::Forbidden("/a".into()).is_not_found());
        assert!(!StorageError::unspecific("boom").is_not_found());
    }

    #[test]
    fn test_unspecific_display() {
        let with_code = StorageError::Unspecific {
            code: Some(500),
            message: "Internal Server Error".into(),
        };
        assert_eq!(
            with_code.to_string(),
            "NetStorage error (500): Internal Server Error"
        );
        assert_eq!(
            StorageError::unspecific("no answer").to_string(),
            "NetStorage error (-): no answer"
        );
    }

    #[test]
    fn test_io_error_mapping() {
        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(
            StorageError::from(missing),
            StorageError::LocalFileNotFound(_)
        ));

        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        assert!(matches!(StorageError::from(denied), StorageError::LocalIo(_)));
    }
}
