//! Steady-state solver for vapor-compression cycles.
//!
//! The unknowns are the port iterates `(P, h, mdot)`. The solver sweeps every
//! circuit in flow order, lets each component map its inlets to its outlets
//! under the pressure demanded downstream, and stops once the largest
//! relative change of a pass stays below the tolerance.

pub mod batch;
pub mod config;
pub mod control;
pub mod error;
pub mod initial;
pub mod problem;
pub mod results;
pub mod solve;

pub use batch::solve_batch;
pub use config::SolverConfig;
pub use control::{CancelToken, SolveProgressEvent};
pub use error::{SolverError, SolverResult};
pub use initial::{InitialValues, PortSeed};
pub use problem::CycleProblem;
pub use results::CycleResults;
pub use solve::{CycleSolution, SolveOutcome, SolveStatus, solve, solve_with_progress};
