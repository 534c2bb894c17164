//! Error types
//!
//! Only precondition violations and I/O failures are errors. A missing key,
//! a uniqueness rejection or an update collision is an ordinary outcome and
//! is reported through `Option`/`bool` return values instead.

use std::fmt;
use std::io;

/// Result alias used across the crate
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache errors
#[derive(Debug, Clone, PartialEq)]
pub enum CacheError {
    /// A record (or one of its fields) was required but absent
    InvalidArgument(String),

    /// Operation script could not be decoded
    Script(String),

    /// IO error while reading a script or config file
    Io(String),
}

impl CacheError {
    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        CacheError::InvalidArgument(msg.into())
    }
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CacheError::Script(msg) => write!(f, "Invalid script: {}", msg),
            CacheError::Io(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for CacheError {}

impl From<io::Error> for CacheError {
    fn from(e: io::Error) -> Self {
        CacheError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            CacheError::Io(e.to_string())
        } else {
            CacheError::Script(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = CacheError::invalid_argument("record is absent");
        assert_eq!(err.to_string(), "Invalid argument: record is absent");
    }

    #[test]
    fn test_from_json_error() {
        let err: CacheError = serde_json::from_str::<Vec<u8>>("[1,").unwrap_err().into();
        assert!(matches!(err, CacheError::Script(_)));
    }
}
