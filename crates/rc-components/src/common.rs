//! Shared pieces of the two heat exchanger models.

use rc_core::ParameterStore;

use crate::error::ComponentResult;
use crate::traits::{EvalContext, PortState, check_positive};

/// Saturation pressure set on a heat exchanger: the pressure parameter wins,
/// otherwise the saturation temperature is converted through the backend.
pub(crate) fn operating_pressure(
    name: &str,
    params: &ParameterStore,
    ctx: &EvalContext<'_>,
) -> ComponentResult<Option<f64>> {
    if let Some(p) = params.get("saturation_pressure") {
        return Ok(Some(p));
    }
    params
        .get("saturation_temperature")
        .map(|t| ctx.saturation_pressure(name, t))
        .transpose()
}

/// Outlet pressure after the pressure drop, from the set operating pressure
/// or the inlet pressure.
pub(crate) fn outlet_pressure(
    name: &str,
    params: &ParameterStore,
    ctx: &EvalContext<'_>,
    inlet: &PortState,
) -> ComponentResult<f64> {
    let p_op = operating_pressure(name, params, ctx)?.unwrap_or(inlet.pressure.value);
    let drop = params.get("pressure_drop").unwrap_or(0.0);
    check_positive(name, "outlet pressure", p_op - drop)
}

/// Mass flow fixed by a capacity `q` [W] over an enthalpy change `dh`, or
/// carried over from the inlet.
pub(crate) fn capacity_mass_flow(
    name: &str,
    capacity: Option<f64>,
    dh: f64,
    inlet: &PortState,
) -> ComponentResult<f64> {
    match capacity {
        Some(q) => {
            let dh = check_positive(name, "enthalpy change", dh)?;
            check_positive(name, "mass flow", q / dh)
        }
        None => check_positive(name, "mass flow", inlet.mass_flow.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rc_core::units::{kgps, pa};

    #[test]
    fn capacity_sets_mass_flow() {
        let inlet = PortState::new(pa(1e6), 4.2e5, kgps(0.05));
        assert_eq!(capacity_mass_flow("c", Some(1.5e4), 1.5e5, &inlet).unwrap(), 0.1);
        assert_eq!(capacity_mass_flow("c", None, 1.5e5, &inlet).unwrap(), 0.05);
        assert!(capacity_mass_flow("c", Some(1.5e4), -1.0, &inlet).is_err());
    }
}
