//! Error types for spectral classification

use std::fmt;

/// Errors that can occur while configuring or driving the classifier
///
/// Real-time calls (`push`, `classify`, `segment`) never produce these;
/// they are reported at construction time or by the offline helpers.
#[derive(Debug, Clone, PartialEq)]
pub enum GuideError {
    /// Malformed input data (empty spectrogram, short frames)
    InvalidInput(String),

    /// Rejected configuration parameter
    InvalidParameter(String),
}

impl fmt::Display for GuideError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuideError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            GuideError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
        }
    }
}

impl std::error::Error for GuideError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = GuideError::InvalidParameter("bin count must be > 0".to_string());
        assert_eq!(err.to_string(), "Invalid parameter: bin count must be > 0");

        let err = GuideError::InvalidInput("empty".to_string());
        assert_eq!(err.to_string(), "Invalid input: empty");
    }
}
