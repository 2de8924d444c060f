//! Error types for the tabkit transformations.
//!
//! Errors are grouped by the stage that raises them:
//!
//! - [`InputError`] - reading and parsing input files
//! - [`ConfigError`] - unrecognized option values
//! - [`OutputError`] - rendering and writing output files
//! - [`Error`] - top-level error returned by the pipelines
//!
//! Conversion into [`Error`] is automatic via `From` implementations,
//! so `?` works across stage boundaries.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Input Errors
// =============================================================================

/// Errors while reading input tables.
#[derive(Debug, Error)]
pub enum InputError {
    /// No input file was given.
    #[error("No input files given")]
    NoInputs,

    /// File missing or unreadable.
    #[error("Cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Content could not be decoded to text.
    #[error("Cannot decode '{}': {message}", .path.display())]
    Encoding { path: PathBuf, message: String },

    /// Malformed delimited text.
    #[error("Invalid CSV in '{}': {source}", .path.display())]
    Csv { path: PathBuf, source: csv::Error },

    /// File has no header or no rows where some are required.
    #[error("'{}' is empty", .path.display())]
    Empty { path: PathBuf },

    /// A record does not have the expected number of fields.
    #[error("'{}' line {line}: expected {expected} fields, found {found}", .path.display())]
    Shape {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors for option values that are not recognized.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown axis '{0}' (expected 'rows' or 'columns')")]
    UnknownAxis(String),

    #[error("Unknown join '{0}' (expected 'inner' or 'outer')")]
    UnknownJoin(String),

    /// An identifier was given but the index column has no name.
    #[error("Index column name must not be empty when an identifier is given")]
    EmptyIndexName,

    /// Delimiters are a single ASCII byte.
    #[error("Invalid delimiter '{0}' (expected a single ASCII character)")]
    InvalidDelimiter(String),
}

// =============================================================================
// Output Errors
// =============================================================================

/// Errors while rendering or writing outputs.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Cannot write '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV rendering failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON rendering failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Record-style JSON needs one key per column.
    #[error("Column names must be unique for JSON records, '{0}' appears more than once")]
    DuplicateColumn(String),

    /// The temporary file could not be moved into place.
    #[error("Cannot move output into '{}': {source}", .path.display())]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },
}

// =============================================================================
// Top-level Error
// =============================================================================

/// Top-level error returned by [`crate::pipeline`] and the binaries.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}

impl Error {
    /// Process exit code for this error.
    ///
    /// Configuration errors share clap's usage-error code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) => 2,
            Error::Input(_) | Error::Output(_) => 1,
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for input operations.
pub type InputResult<T> = std::result::Result<T, InputError>;

/// Result type for output operations.
pub type OutputResult<T> = std::result::Result<T, OutputError>;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let input_err = InputError::Empty {
            path: PathBuf::from("a.csv"),
        };
        let err: Error = input_err.into();
        assert!(err.to_string().contains("a.csv"));
        assert!(err.to_string().starts_with("Input error"));
        assert_eq!(err.exit_code(), 1);

        let config_err = ConfigError::UnknownAxis("diagonal".into());
        let err: Error = config_err.into();
        assert!(err.to_string().contains("diagonal"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_shape_error_format() {
        let err = InputError::Shape {
            path: PathBuf::from("meta.csv"),
            line: 4,
            expected: 3,
            found: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("meta.csv"));
        assert!(msg.contains("line 4"));
        assert!(msg.contains("expected 3 fields, found 2"));
    }
}
