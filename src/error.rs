/// Exit code for missing/malformed startup inputs (dataset, artifact, flags).
pub const EXIT_STARTUP: u8 = 2;
/// Exit code for a one-shot `lp predict` whose record could not be scored.
pub const EXIT_INFERENCE: u8 = 3;
/// Exit code for terminal and other I/O failures.
pub const EXIT_IO: u8 = 4;

/// Fatal error: ends the process with `exit_code`.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Startup-time hard dependency failure.
    pub fn startup(message: impl Into<String>) -> Self {
        Self::new(EXIT_STARTUP, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(EXIT_IO, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// A single prediction could not be produced.
///
/// Never fatal in the interactive form: the message is shown and the user may
/// correct the input and resubmit.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceError {
    /// A column the pipeline needs is absent from the record.
    MissingColumn(String),
    /// A column carries the wrong kind of value (text where a number is expected, or vice versa).
    WrongType { column: String, expected: &'static str },
    /// A categorical value the pipeline's encoder has never seen.
    UnknownCategory { column: String, value: String },
    /// A numeric input is NaN or infinite.
    NonFinite(String),
    /// The pipeline produced something that is not a usable probability vector.
    InvalidOutput(String),
}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InferenceError::MissingColumn(column) => {
                write!(f, "Prediction failed: record has no `{column}` column.")
            }
            InferenceError::WrongType { column, expected } => {
                write!(f, "Prediction failed: `{column}` must be {expected}.")
            }
            InferenceError::UnknownCategory { column, value } => {
                write!(f, "Prediction failed: `{column}` value '{value}' is unknown to the model.")
            }
            InferenceError::NonFinite(column) => {
                write!(f, "Prediction failed: `{column}` is not a finite number.")
            }
            InferenceError::InvalidOutput(detail) => {
                write!(f, "Prediction failed: model returned an invalid result ({detail}).")
            }
        }
    }
}

impl std::error::Error for InferenceError {}

impl From<InferenceError> for AppError {
    fn from(value: InferenceError) -> Self {
        AppError::new(EXIT_INFERENCE, value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inference_error_maps_to_inference_exit_code() {
        let err: AppError = InferenceError::UnknownCategory {
            column: "neighbourhood".to_string(),
            value: "Atlantis".to_string(),
        }
        .into();
        assert_eq!(err.exit_code(), EXIT_INFERENCE);
        assert!(err.message().contains("Atlantis"));
    }
}
