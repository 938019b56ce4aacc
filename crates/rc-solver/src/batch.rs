//! Parallel solves of independent problems.

use rayon::prelude::*;

use crate::config::SolverConfig;
use crate::error::SolverResult;
use crate::problem::CycleProblem;
use crate::solve::{SolveOutcome, solve};

/// Solve every problem on the rayon pool. Results keep the input order.
pub fn solve_batch(
    problems: &[CycleProblem<'_>],
    config: &SolverConfig,
) -> Vec<SolverResult<SolveOutcome>> {
    problems.par_iter().map(|p| solve(p, config)).collect()
}
