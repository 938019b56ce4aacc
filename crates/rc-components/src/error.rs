//! Error types for component evaluation.

use rc_core::CoreError;
use thiserror::Error;

/// Errors that can occur while evaluating a component.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    /// The component cannot produce a physical outlet state from this inlet.
    #[error("Infeasible state in '{component}': {reason}")]
    InfeasibleState { component: String, reason: String },

    /// Neither a parameter nor the downstream demand fixes a required target.
    #[error("'{component}' has no {what} target")]
    MissingTarget {
        component: String,
        what: &'static str,
    },

    /// A port slice does not match the component's port count.
    #[error("'{component}' takes {expected} {side} state(s), got {found}")]
    PortCount {
        component: String,
        side: &'static str,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl ComponentError {
    pub fn infeasible(component: &str, reason: impl std::fmt::Display) -> Self {
        ComponentError::InfeasibleState {
            component: component.to_owned(),
            reason: reason.to_string(),
        }
    }

    pub fn is_infeasible(&self) -> bool {
        matches!(self, ComponentError::InfeasibleState { .. })
    }
}
