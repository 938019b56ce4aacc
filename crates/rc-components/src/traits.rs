//! Core traits for cycle component models.

use rc_core::units::{MassRate, Pressure};
use rc_core::{CoreResult, ParamSpec, ParameterStore, Parameterized, Real};
use rc_fluids::{FluidState, PropertyBackend, RefrigerantId, SpecEnthalpy, StateVar};
use rc_graph::ComponentKind;

use crate::error::{ComponentError, ComponentResult};

/// Iterate carried by one port: the minimal set that fixes a flowing state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortState {
    pub pressure: Pressure,
    /// [J/kg]
    pub enthalpy: SpecEnthalpy,
    pub mass_flow: MassRate,
}

impl PortState {
    pub fn new(pressure: Pressure, enthalpy: SpecEnthalpy, mass_flow: MassRate) -> Self {
        Self {
            pressure,
            enthalpy,
            mass_flow,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.pressure.value.is_finite()
            && self.enthalpy.is_finite()
            && self.mass_flow.value.is_finite()
    }
}

/// What a component sees while it is evaluated.
#[derive(Clone, Copy)]
pub struct EvalContext<'a> {
    pub backend: &'a dyn PropertyBackend,
    pub refrigerant: &'a RefrigerantId,
    /// Inlet pressure requested by the downstream component, if any.
    pub downstream_pressure: Option<Pressure>,
}

impl<'a> EvalContext<'a> {
    pub fn new(backend: &'a dyn PropertyBackend, refrigerant: &'a RefrigerantId) -> Self {
        Self {
            backend,
            refrigerant,
            downstream_pressure: None,
        }
    }

    pub fn with_downstream(mut self, pressure: Option<Pressure>) -> Self {
        self.downstream_pressure = pressure;
        self
    }

    /// Property query on behalf of `component`; backend failures become
    /// [`ComponentError::InfeasibleState`].
    pub fn state(&self, component: &str, a: StateVar, b: StateVar) -> ComponentResult<FluidState> {
        self.backend
            .state_from_two(self.refrigerant, a, b)
            .map_err(|e| ComponentError::infeasible(component, e))
    }

    /// Full state at a port.
    pub fn port_state(&self, component: &str, port: &PortState) -> ComponentResult<FluidState> {
        self.state(
            component,
            StateVar::Pressure(port.pressure.value),
            StateVar::Enthalpy(port.enthalpy),
        )
    }

    pub fn saturation_temperature(&self, component: &str, p: Real) -> ComponentResult<Real> {
        self.backend
            .saturation_temperature(self.refrigerant, p)
            .map_err(|e| ComponentError::infeasible(component, e))
    }

    pub fn saturation_pressure(&self, component: &str, t: Real) -> ComponentResult<Real> {
        self.backend
            .saturation_pressure(self.refrigerant, t)
            .map_err(|e| ComponentError::infeasible(component, e))
    }
}

/// Post-solve figures of one component, canonical units.
///
/// Figures are read through [`UnitNormalizer::get_parameter`] like any other
/// parameter store.
///
/// [`UnitNormalizer::get_parameter`]: rc_core::UnitNormalizer::get_parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentSummary {
    pub name: String,
    pub kind: ComponentKind,
    figures: ParameterStore,
}

impl ComponentSummary {
    pub fn new<'n>(
        name: &str,
        kind: ComponentKind,
        specs: &'static [ParamSpec],
        figures: impl IntoIterator<Item = (&'n str, Real)>,
    ) -> CoreResult<Self> {
        Ok(Self {
            name: name.to_owned(),
            kind,
            figures: ParameterStore::from_canonical(specs, figures)?,
        })
    }

    /// Canonical value of a figure.
    pub fn get(&self, figure: &str) -> Option<Real> {
        self.figures.get(figure)
    }
}

impl Parameterized for ComponentSummary {
    fn parameters(&self) -> &ParameterStore {
        &self.figures
    }

    fn parameters_mut(&mut self) -> &mut ParameterStore {
        &mut self.figures
    }
}

/// A cycle component: a local map from inlet states to outlet states.
///
/// Components are deterministic functions of their parameters and the inlet
/// iterates, so independent cycles can be evaluated in parallel. Port slices
/// follow the graph's port order and have the lengths given by
/// [`ComponentKind::port_counts`].
pub trait CycleComponent: Parameterized + Send + Sync {
    fn name(&self) -> &str;

    fn kind(&self) -> ComponentKind;

    /// Pressure this component wants at its inlets. Upstream components use
    /// it as their outlet target.
    fn inlet_pressure_demand(&self, _ctx: &EvalContext<'_>) -> ComponentResult<Option<Pressure>> {
        Ok(None)
    }

    /// One outlet iterate per outlet port.
    fn evaluate(&self, ctx: &EvalContext<'_>, inlets: &[PortState]) -> ComponentResult<Vec<PortState>>;

    /// Post-solve figures from converged port iterates.
    fn summarize(
        &self,
        ctx: &EvalContext<'_>,
        inlets: &[PortState],
        outlets: &[PortState],
    ) -> ComponentResult<ComponentSummary>;
}

/// `ports` as an array of the expected length.
pub(crate) fn expect_ports<'s, const N: usize>(
    component: &str,
    side: &'static str,
    ports: &'s [PortState],
) -> ComponentResult<&'s [PortState; N]> {
    ports.try_into().map_err(|_| ComponentError::PortCount {
        component: component.to_owned(),
        side,
        expected: N,
        found: ports.len(),
    })
}

/// Evaluate a one-inlet, one-outlet component.
pub(crate) fn through(
    component: &str,
    inlets: &[PortState],
    outlet: impl FnOnce(&PortState) -> ComponentResult<PortState>,
) -> ComponentResult<Vec<PortState>> {
    let [inlet] = expect_ports::<1>(component, "inlet", inlets)?;
    Ok(vec![outlet(inlet)?])
}

/// The single inlet and outlet of a one-to-one component.
pub(crate) fn pair<'s>(
    component: &str,
    inlets: &'s [PortState],
    outlets: &'s [PortState],
) -> ComponentResult<(&'s PortState, &'s PortState)> {
    let [inlet] = expect_ports::<1>(component, "inlet", inlets)?;
    let [outlet] = expect_ports::<1>(component, "outlet", outlets)?;
    Ok((inlet, outlet))
}

/// Reject non-finite or non-positive derived values.
pub(crate) fn check_positive(component: &str, what: &str, value: Real) -> ComponentResult<Real> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ComponentError::infeasible(
            component,
            format!("{what} must be positive and finite, got {value}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rc_core::QuantityKind;
    use rc_core::units::{kgps, pa};

    static FIGURES: [ParamSpec; 1] = [ParamSpec::new("power", QuantityKind::Power)];

    #[test]
    fn summary_exposes_figures() {
        let s = ComponentSummary::new("c", ComponentKind::Compressor, &FIGURES, [("power", 10.0)])
            .unwrap();
        assert_eq!(s.get("power"), Some(10.0));
        assert_eq!(s.get("missing"), None);
        assert!(
            ComponentSummary::new("c", ComponentKind::Compressor, &FIGURES, [("power", f64::NAN)])
                .is_err()
        );
    }

    #[test]
    fn positivity_check() {
        assert!(check_positive("c", "mass flow", 0.1).is_ok());
        assert!(check_positive("c", "mass flow", 0.0).unwrap_err().is_infeasible());
        assert!(check_positive("c", "mass flow", f64::INFINITY).is_err());
    }

    #[test]
    fn port_slices_are_length_checked() {
        let p = PortState::new(pa(1e5), 4e5, kgps(0.05));
        let ports = [p];
        let [one] = expect_ports::<1>("c", "inlet", &ports).unwrap();
        assert_eq!(*one, p);
        let err = expect_ports::<2>("mix", "inlet", &[p]).unwrap_err();
        assert_eq!(
            err,
            ComponentError::PortCount {
                component: "mix".into(),
                side: "inlet",
                expected: 2,
                found: 1,
            }
        );
        assert!(!err.is_infeasible());
    }

    #[test]
    fn port_state_finiteness() {
        assert!(PortState::new(pa(1e5), 4e5, kgps(0.05)).is_finite());
        assert!(!PortState::new(pa(1e5), f64::NAN, kgps(0.05)).is_finite());
    }
}
