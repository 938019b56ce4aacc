//! Property backend trait.

use crate::error::{PropertyError, PropertyResult};
use crate::refrigerant::RefrigerantId;
use crate::state::{FluidState, StateVar};

// relative band around T_sat(p) in which a (p, T) pair is treated as saturated
pub(crate) const SATURATION_BAND: f64 = 1e-9;

/// Critical point of a refrigerant, canonical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalPoint {
    /// [K]
    pub temperature: f64,
    /// [Pa]
    pub pressure: f64,
}

/// Equation-of-state provider.
///
/// Implementations must be thread-safe (Send + Sync) so that independent
/// cycles can be solved in parallel against one shared backend.
pub trait PropertyBackend: Send + Sync {
    /// Backend name (for logging).
    fn name(&self) -> &str;

    /// Canonical names of every refrigerant this backend can evaluate.
    fn refrigerants(&self) -> Vec<String>;

    /// Canonical name for a user spelling (`"R-134a"`, `"hfc134a"`, ...),
    /// `None` when the backend does not know it.
    fn canonical_name(&self, query: &str) -> Option<String>;

    fn supports(&self, refrigerant: &RefrigerantId) -> bool {
        self.canonical_name(refrigerant.name()).is_some()
    }

    /// Resolve a full state from two independent inputs.
    fn state_from_two(
        &self,
        refrigerant: &RefrigerantId,
        a: StateVar,
        b: StateVar,
    ) -> PropertyResult<FluidState>;

    fn critical_point(&self, refrigerant: &RefrigerantId) -> PropertyResult<CriticalPoint>;

    /// Saturation temperature [K] at pressure `p` [Pa].
    fn saturation_temperature(&self, refrigerant: &RefrigerantId, p: f64) -> PropertyResult<f64> {
        self.state_from_two(refrigerant, StateVar::Pressure(p), StateVar::Quality(0.0))
            .map(|s| s.temperature().value)
    }

    /// Saturation pressure [Pa] at temperature `t` [K].
    fn saturation_pressure(&self, refrigerant: &RefrigerantId, t: f64) -> PropertyResult<f64> {
        self.state_from_two(refrigerant, StateVar::Temperature(t), StateVar::Quality(0.0))
            .map(|s| s.pressure().value)
    }
}

/// Reject pairs that cannot fix a state whatever the backend.
pub(crate) fn check_pair(a: &StateVar, b: &StateVar) -> PropertyResult<()> {
    let (pa, pb) = (a.property(), b.property());
    if pa == pb {
        return Err(PropertyError::UnderdeterminedState {
            first: pa.as_str(),
            second: pb.as_str(),
        });
    }
    for v in [a, b] {
        if !v.value().is_finite() {
            return Err(PropertyError::out_of_domain(format!(
                "{} is not finite",
                v.property()
            )));
        }
    }
    Ok(())
}

/// Temperature range and critical point an equation of state is valid for.
#[cfg_attr(not(feature = "coolprop"), allow(dead_code))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Envelope {
    /// [K]
    pub t_min: f64,
    /// [K]
    pub t_max: f64,
    pub critical: CriticalPoint,
}

#[cfg_attr(not(feature = "coolprop"), allow(dead_code))]
impl Envelope {
    /// Classify an input pair before it reaches an external library:
    /// temperatures outside `[t_min, t_max]`, non-positive pressures and
    /// saturation inputs above the critical point are out of domain, and a
    /// (p, T) pair on the saturation line is underdetermined. `t_sat` is only
    /// called for subcritical (p, T) pairs.
    pub(crate) fn check(
        &self,
        a: &StateVar,
        b: &StateVar,
        t_sat: impl FnOnce(f64) -> PropertyResult<f64>,
    ) -> PropertyResult<()> {
        for v in [a, b] {
            match *v {
                StateVar::Temperature(t) if !(self.t_min..=self.t_max).contains(&t) => {
                    return Err(PropertyError::out_of_domain(format!(
                        "temperature {t} K outside [{}, {}] K",
                        self.t_min, self.t_max
                    )));
                }
                StateVar::Pressure(p) if p <= 0.0 => {
                    return Err(PropertyError::out_of_domain(format!(
                        "pressure {p} Pa is not positive"
                    )));
                }
                StateVar::Quality(x) if !(0.0..=1.0).contains(&x) => {
                    return Err(PropertyError::out_of_domain(format!(
                        "quality {x} outside [0, 1]"
                    )));
                }
                _ => {}
            }
        }

        let crit = self.critical;
        match (*a, *b) {
            (StateVar::Pressure(p), StateVar::Quality(_))
            | (StateVar::Quality(_), StateVar::Pressure(p))
                if p >= crit.pressure =>
            {
                Err(PropertyError::out_of_domain(format!(
                    "pressure {p} Pa at or above critical pressure {} Pa",
                    crit.pressure
                )))
            }
            (StateVar::Temperature(t), StateVar::Quality(_))
            | (StateVar::Quality(_), StateVar::Temperature(t))
                if t >= crit.temperature =>
            {
                Err(PropertyError::out_of_domain(format!(
                    "temperature {t} K at or above critical temperature {} K",
                    crit.temperature
                )))
            }
            (StateVar::Pressure(p), StateVar::Temperature(t))
            | (StateVar::Temperature(t), StateVar::Pressure(p))
                if p < crit.pressure =>
            {
                let t_sat = t_sat(p)?;
                if (t - t_sat).abs() <= SATURATION_BAND * t_sat {
                    Err(PropertyError::UnderdeterminedState {
                        first: a.property().as_str(),
                        second: b.property().as_str(),
                    })
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }
}
