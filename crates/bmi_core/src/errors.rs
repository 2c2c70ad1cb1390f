//! Error types for the BMI core

use thiserror::Error;

/// Errors that can occur while validating input, loading the model or
/// running a prediction
#[derive(Error, Debug)]
pub enum BmiError {
    /// A numeric form field could not be parsed
    #[error("Invalid input for {field}: {value:?} is not a number")]
    InputParse {
        /// Name of the offending field
        field: &'static str,
        /// Raw text the user entered
        value: String,
    },

    /// No model was loaded at startup
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// The inference runtime failed during invocation
    #[error("Prediction failed: {0}")]
    Prediction(String),

    /// Model artifact failed its integrity check
    #[error("Model integrity check failed: {0}")]
    Integrity(String),

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BmiError {
    /// Short label used when reporting the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            BmiError::InputParse { .. } => "input_parse",
            BmiError::ModelUnavailable(_) => "model_unavailable",
            BmiError::Prediction(_) => "prediction",
            BmiError::Integrity(_) => "integrity",
            BmiError::Config(_) => "config",
            BmiError::Io(_) => "io",
        }
    }
}

/// Result type for BMI core operations
pub type Result<T> = std::result::Result<T, BmiError>;
