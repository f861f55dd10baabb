//! NetStorage HTTP status classification.

use crate::error::StorageError;

/// Classes of non-2xx responses the NetStorage API produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    /// 400, malformed request or action header
    BadRequest,
    /// 403, signature rejected or path outside the upload account
    Forbidden,
    /// 404, object does not exist
    NotFound,
    /// Any other status
    Other(u16),
}

impl From<u16> for ResponseStatus {
    fn from(code: u16) -> Self {
        match code {
            400 => ResponseStatus::BadRequest,
            403 => ResponseStatus::Forbidden,
            404 => ResponseStatus::NotFound,
            other => ResponseStatus::Other(other),
        }
    }
}

impl ResponseStatus {
    /// Get human-readable description of the status class.
    pub fn description(&self) -> &'static str {
        match self {
            ResponseStatus::BadRequest => "Bad request",
            ResponseStatus::Forbidden => "Access forbidden",
            ResponseStatus::NotFound => "Not found",
            ResponseStatus::Other(_) => "Unexpected status",
        }
    }

    /// Build the typed error for this status.
    ///
    /// `message` is usually the request path or the server's reason phrase.
    pub fn into_error(self, message: impl Into<String>) -> StorageError {
        let message = message.into();
        match self {
            ResponseStatus::BadRequest => StorageError::BadRequest(message),
            ResponseStatus::Forbidden => StorageError::Forbidden(message),
            ResponseStatus::NotFound => StorageError::NotFound(message),
            ResponseStatus::Other(code) => StorageError::Unspecific {
                code: Some(code),
                message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_conversion() {
        assert_eq!(ResponseStatus::from(400), ResponseStatus::BadRequest);
        assert_eq!(ResponseStatus::from(403), ResponseStatus::Forbidden);
        assert_eq!(ResponseStatus::from(404), ResponseStatus::NotFound);
        assert_eq!(ResponseStatus::from(409), ResponseStatus::Other(409));
        assert_eq!(ResponseStatus::from(500), ResponseStatus::Other(500));
    }

    #[test]
    fn test_status_descriptions() {
        assert_eq!(ResponseStatus::BadRequest.description(), "Bad request");
        assert_eq!(ResponseStatus::Forbidden.description(), "Access forbidden");
        assert_eq!(ResponseStatus::NotFound.description(), "Not found");
        assert_eq!(ResponseStatus::Other(502).description(), "Unexpected status");
    }

    #[test]
    fn test_into_error() {
        assert_eq!(
            ResponseStatus::from(404).into_error("/12345/a"),
            StorageError::NotFound("/12345/a".into())
        );
        assert_eq!(
            ResponseStatus::from(403).into_error("/12345/a"),
            StorageError::Forbidden("/12345/a".into())
        );
        assert_eq!(
            ResponseStatus::from(400).into_error("/12345/a"),
            StorageError::BadRequest("/12345/a".into())
        );
        assert_eq!(
            ResponseStatus::from(503).into_error("/12345/a"),
            StorageError::Unspecific {
                code: Some(503),
                message: "/12345/a".into()
            }
        );
    }
}
