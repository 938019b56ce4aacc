//! Error types for solver operations.

use rc_components::ComponentError;
use rc_core::CoreError;
use rc_fluids::PropertyError;
use rc_graph::GraphError;
use thiserror::Error;

/// Errors that prevent a solve from starting or continuing.
///
/// Non-convergence is not an error: it is reported through
/// [`SolveStatus`](crate::SolveStatus).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Graph is not ready: {what}")]
    GraphNotReady { what: String },

    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Property error: {0}")]
    Property(#[from] PropertyError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl SolverError {
    pub(crate) fn setup(what: impl Into<String>) -> Self {
        SolverError::ProblemSetup { what: what.into() }
    }
}

/// Component failures other than an infeasible state. Infeasible states are
/// turned into a diverged outcome by the solve loop before reaching here.
impl From<ComponentError> for SolverError {
    fn from(e: ComponentError) -> Self {
        match e {
            ComponentError::Core(core) => SolverError::Core(core),
            other => SolverError::ProblemSetup {
                what: other.to_string(),
            },
        }
    }
}
