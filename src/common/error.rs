//! Error types for courtdb.

use thiserror::Error;

use crate::common::PageId;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
/// This is a common Rust pattern (see `std::io::Result`).
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in courtdb.
///
/// By having a single error type, error handling stays consistent across the
/// storage and index layers. Every variant is fatal for the operation that
/// raised it; nothing here is retried internally.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error from disk operations.
    ///
    /// This wraps `std::io::Error` from file read/write operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Requested page does not exist on disk.
    #[error("page {0} not found")]
    PageNotFound(u32),

    /// A date string that none of the accepted formats could parse.
    #[error("unrecognized date: {0:?}")]
    InvalidDate(String),

    /// A page whose type byte does not match the node kind it was opened as.
    #[error("page {page_id} has node type {found}, expected {expected}")]
    InvalidNodeType {
        page_id: PageId,
        expected: u8,
        found: u8,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::PageNotFound(42);
        assert_eq!(format!("{}", err), "page 42 not found");

        let err = Error::InvalidDate("13/13/13".to_string());
        assert_eq!(format!("{}", err), "unrecognized date: \"13/13/13\"");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();

        match err {
            Error::Io(_) => {} // Success
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_invalid_node_type_display() {
        let err = Error::InvalidNodeType {
            page_id: PageId::new(7),
            expected: 1,
            found: 2,
        };
        assert_eq!(format!("{}", err), "page Page(7) has node type 2, expected 1");
    }

    #[test]
    fn test_result_type_alias() {
        // This function returns our Result type
        fn might_fail() -> Result<u32> {
            Ok(42)
        }

        assert_eq!(might_fail().unwrap(), 42);
    }
}
