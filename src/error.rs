use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
/// Binder error
pub enum BinderError {
    /// A required argument was rejected before any I/O took place.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O failure: {0}")]
    Io(#[from] io::Error),

    /// The CSV engine failed to parse, deserialize or serialize a record.
    #[error("CSV engine: {0}")]
    Csv(String),

    /// Field content contains the reserved sentinel separator.
    #[error("Line {line} contains the reserved sentinel separator U+0001")]
    SentinelCollision { line: u64 },

    /// A field to be written holds a line break, which line-based separator
    /// rewriting cannot carry.
    #[error("Line {line} has a field containing a line break")]
    LineBreakInField { line: u64 },
}

impl From<csv::Error> for BinderError {
    fn from(error: csv::Error) -> Self {
        if error.is_io_error() {
            match error.into_kind() {
                csv::ErrorKind::Io(io_error) => BinderError::Io(io_error),
                other => BinderError::Csv(format!("{:?}", other)),
            }
        } else {
            BinderError::Csv(error.to_string())
        }
    }
}

/// Result type returned by every binder operation.
pub type BinderResult<T> = Result<T, BinderError>;
