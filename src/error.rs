//! Error types for document construction and serialization.
//!
//! Every validation failure is reported at the call that introduced it.
//! Layout overflow is not an error; see [`crate::diagnostics`].

use std::path::PathBuf;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or writing a document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Page geometry, font, or placement parameters that cannot be resolved
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed hex string, unknown color name, or out-of-range component
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Image path does not resolve to a readable file
    #[error("Image not found: {}", .0.display())]
    ResourceNotFound(PathBuf),

    /// Image placement names an image that was never embedded in this document
    #[error("Dangling image reference: {0}")]
    DanglingReference(String),

    /// Image codec failed to decode or re-encode pixel data
    #[error("Image decode error: {0}")]
    Decode(String),

    /// An object number was reserved but no body was ever written for it
    #[error("Object {0} was reserved but never written")]
    UnfilledObject(u32),

    /// IO error from the output sink
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error() {
        let err = Error::Configuration("unknown page size 'B7'".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("Configuration error"));
        assert!(msg.contains("B7"));
    }

    #[test]
    fn test_resource_not_found_shows_path() {
        let err = Error::ResourceNotFound(PathBuf::from("/tmp/missing.png"));
        assert_eq!(err.to_string(), "Image not found: /tmp/missing.png");
    }

    #[test]
    fn test_unfilled_object() {
        let err = Error::UnfilledObject(7);
        assert!(err.to_string().contains("Object 7"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "sink closed");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("sink closed"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
