use thiserror::Error;

/// Result type for claim extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the extraction core.
///
/// Stages never fail on degenerate text; these surface configuration
/// problems and the per-item detector/filter failures that the pipeline
/// catches, counts and skips.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A span does not fit inside the document it refers to.
    #[error("Invalid span {start}..{end} for document of length {len}")]
    InvalidSpan { start: usize, end: usize, len: usize },

    /// Input could not be interpreted.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A detector failed on a single sentence.
    #[error("Detector '{detector}' failed: {message}")]
    Detector { detector: String, message: String },

    /// A filter failed on a single claim.
    #[error("Filter '{filter}' failed: {message}")]
    Filter { filter: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Error::InvalidConfig(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    pub fn detector(detector: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Detector {
            detector: detector.into(),
            message: message.into(),
        }
    }

    pub fn filter(filter: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Filter {
            filter: filter.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::InvalidSpan {
            start: 4,
            end: 2,
            len: 10,
        };
        assert_eq!(
            err.to_string(),
            "Invalid span 4..2 for document of length 10"
        );

        let err = Error::detector("statistical", "bad pattern");
        assert!(err.to_string().contains("statistical"));
    }
}
