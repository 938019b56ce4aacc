use rc_core::CoreError;
use rc_fluids::PropertyError;
use rc_project::ProjectError;
use rc_solver::SolverError;

pub type CliResult<T> = Result<T, CliError>;

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Property(#[from] PropertyError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Display preferences: {0}")]
    Preferences(#[from] serde_yaml::Error),

    #[error("{0}")]
    Usage(String),

    #[error("Solve ended without convergence: {0}")]
    NotConverged(String),
}
