//! Solver knobs.

/// Fixed-point solver configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverConfig {
    /// Residual below which a pass counts as converged.
    pub tolerance: f64,
    /// Converged passes needed in a row.
    pub consecutive_passes: usize,
    /// Pass budget.
    pub max_iterations: usize,
    /// Passes of monotonically growing residual that count as divergence.
    pub divergence_window: usize,
    /// Mass flow seed [kg/s] where nothing else fixes it.
    pub default_mass_flow: f64,
    /// Pressure seed [Pa].
    pub default_pressure: f64,
    /// Enthalpy seed [J/kg].
    pub default_enthalpy: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            consecutive_passes: 2,
            max_iterations: 200,
            divergence_window: 8,
            default_mass_flow: 0.05,
            default_pressure: 300e3,
            default_enthalpy: 400e3,
        }
    }
}

impl SolverConfig {
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Floors for the relative change of each iterate component, so values near
/// zero do not inflate the residual.
pub(crate) const PRESSURE_FLOOR: f64 = 1e3;
pub(crate) const ENTHALPY_FLOOR: f64 = 1e4;
pub(crate) const MASS_FLOW_FLOOR: f64 = 1e-6;
