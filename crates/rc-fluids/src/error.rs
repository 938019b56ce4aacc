//! Property backend errors.

use rc_core::CoreError;
use thiserror::Error;

/// Result type for property queries.
pub type PropertyResult<T> = Result<T, PropertyError>;

/// Errors a property backend may report.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropertyError {
    /// Requested state lies outside the backend's validity envelope.
    #[error("State out of domain: {what}")]
    OutOfDomain { what: String },

    /// No registered backend knows this refrigerant.
    #[error("Unsupported refrigerant '{name}'")]
    UnsupportedRefrigerant { name: String },

    /// The two inputs do not fix a single state.
    #[error("Underdetermined state from {first} and {second}")]
    UnderdeterminedState {
        first: &'static str,
        second: &'static str,
    },

    /// Independent pair this backend does not implement.
    #[error("Unsupported input pair {first}/{second}")]
    UnsupportedInputPair {
        first: &'static str,
        second: &'static str,
    },

    /// Failure inside an external property library.
    #[error("Backend error: {message}")]
    Backend { message: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl PropertyError {
    pub(crate) fn out_of_domain(what: impl Into<String>) -> Self {
        PropertyError::OutOfDomain { what: what.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PropertyError::UnsupportedRefrigerant {
            name: "R-999".into(),
        };
        assert!(err.to_string().contains("R-999"));

        let err = PropertyError::UnderdeterminedState {
            first: "pressure",
            second: "temperature",
        };
        assert!(err.to_string().contains("pressure"));
    }

    #[test]
    fn core_errors_pass_through() {
        let core = CoreError::UnknownParameter { name: "x".into() };
        let err: PropertyError = core.clone().into();
        assert_eq!(err, PropertyError::Core(core));
    }
}
