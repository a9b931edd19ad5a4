//! Error types for the weighslip-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the weighslip library.
#[derive(Error, Debug)]
pub enum WeighslipError {
    /// Input loading error.
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// Ticket field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to reading raw ticket input.
#[derive(Error, Debug)]
pub enum InputError {
    /// The input file does not exist.
    #[error("input file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The input file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to ticket field extraction.
///
/// The extraction pipeline never returns these to callers; they are carried
/// inside issue markers so a masked failure stays visible.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// Failed to parse a matched token.
    #[error("failed to parse {field}: {value}")]
    Parse { field: String, value: String },

    /// A pipeline stage panicked and was abandoned.
    #[error("stage {stage} aborted: {message}")]
    StageAborted { stage: String, message: String },
}

/// Result type for the weighslip library.
pub type Result<T> = std::result::Result<T, WeighslipError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WeighslipError::from(InputError::NotFound(PathBuf::from("missing.txt")));
        assert_eq!(err.to_string(), "input error: input file not found: missing.txt");

        let err = ExtractionError::Parse {
            field: "gross".to_string(),
            value: "99999999999".to_string(),
        };
        assert_eq!(err.to_string(), "failed to parse gross: 99999999999");
    }
}
