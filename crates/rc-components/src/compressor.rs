//! Compressor component model.

use rc_core::units::{Pressure, kgps, pa};
use rc_core::{Bounds, ParamSpec, ParameterStore, Parameterized, QuantityKind};
use rc_fluids::StateVar;
use rc_graph::ComponentKind;

use crate::error::{ComponentError, ComponentResult};
use crate::traits::{
    ComponentSummary, CycleComponent, EvalContext, PortState, check_positive, pair, through,
};

static PARAMS: [ParamSpec; 5] = [
    ParamSpec::new("isentropic_efficiency", QuantityKind::Efficiency)
        .bounded(Bounds::FRACTION)
        .with_default(0.7),
    ParamSpec::new("discharge_pressure", QuantityKind::Pressure).bounded(Bounds::POSITIVE),
    ParamSpec::new("displacement", QuantityKind::VolumetricFlow).bounded(Bounds::POSITIVE),
    ParamSpec::new("volumetric_efficiency", QuantityKind::Efficiency)
        .bounded(Bounds::FRACTION)
        .with_default(1.0),
    ParamSpec::new("power_consumption", QuantityKind::Power).bounded(Bounds::POSITIVE),
];

static FIGURES: [ParamSpec; 6] = [
    ParamSpec::new("shaft_power", QuantityKind::Power),
    ParamSpec::new("pressure_ratio", QuantityKind::Dimensionless),
    ParamSpec::new("discharge_temperature", QuantityKind::Temperature),
    ParamSpec::new("isentropic_enthalpy", QuantityKind::SpecificEnthalpy),
    ParamSpec::new("mass_flow", QuantityKind::MassFlow),
    ParamSpec::new("isentropic_efficiency", QuantityKind::Efficiency),
];

/// Vapor compressor with a fixed isentropic efficiency or a fixed power.
///
/// ## Model
///
/// ```text
/// h_is  = h(P_out, s_in)
/// h_out = h_in + (h_is - h_in) / eta_is
/// h_out = h_in + W / mdot              (when power_consumption is set)
/// mdot  = rho_in * V_disp * eta_v      (when a displacement is set)
/// ```
///
/// The outlet pressure is `discharge_pressure` when set, otherwise the
/// pressure demanded by the downstream component. A power below the
/// isentropic work is infeasible.
#[derive(Debug, Clone)]
pub struct Compressor {
    name: String,
    params: ParameterStore,
}

impl Compressor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: ParameterStore::new(&PARAMS),
        }
    }

    pub fn param_specs() -> &'static [ParamSpec] {
        &PARAMS
    }

    fn efficiency(&self) -> f64 {
        self.params.get("isentropic_efficiency").unwrap_or(0.7)
    }

    fn outlet_pressure(&self, ctx: &EvalContext<'_>) -> ComponentResult<Pressure> {
        self.params
            .get("discharge_pressure")
            .map(pa)
            .or(ctx.downstream_pressure)
            .ok_or_else(|| ComponentError::MissingTarget {
                component: self.name.clone(),
                what: "discharge pressure",
            })
    }

    /// Isentropic and actual outlet enthalpy.
    fn compress(&self, ctx: &EvalContext<'_>, inlet: &PortState, p_out: f64) -> ComponentResult<(f64, f64)> {
        let suction = ctx.port_state(&self.name, inlet)?;
        let ideal = ctx.state(
            &self.name,
            StateVar::Pressure(p_out),
            StateVar::Entropy(suction.entropy()),
        )?;
        let h_is = ideal.enthalpy();
        let h_out = inlet.enthalpy + (h_is - inlet.enthalpy) / self.efficiency();
        Ok((h_is, h_out))
    }
}

impl Parameterized for Compressor {
    fn parameters(&self) -> &ParameterStore {
        &self.params
    }

    fn parameters_mut(&mut self) -> &mut ParameterStore {
        &mut self.params
    }
}

impl CycleComponent for Compressor {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Compressor
    }

    fn evaluate(&self, ctx: &EvalContext<'_>, inlets: &[PortState]) -> ComponentResult<Vec<PortState>> {
        through(&self.name, inlets, |inlet| self.outlet_state(ctx, inlet))
    }

    fn summarize(
        &self,
        ctx: &EvalContext<'_>,
        inlets: &[PortState],
        outlets: &[PortState],
    ) -> ComponentResult<ComponentSummary> {
        let (inlet, outlet) = pair(&self.name, inlets, outlets)?;
        self.summary(ctx, inlet, outlet)
    }
}

impl Compressor {
    fn outlet_state(&self, ctx: &EvalContext<'_>, inlet: &PortState) -> ComponentResult<PortState> {
        let p_in = inlet.pressure.value;
        let p_out = self.outlet_pressure(ctx)?.value;
        if p_out <= p_in {
            return Err(ComponentError::infeasible(
                &self.name,
                format!("discharge pressure {p_out} Pa not above suction pressure {p_in} Pa"),
            ));
        }

        let mass_flow = match self.params.get("displacement") {
            Some(displacement) => {
                let rho = ctx.port_state(&self.name, inlet)?.density().value;
                let eta_v = self.params.get("volumetric_efficiency").unwrap_or(1.0);
                rho * displacement * eta_v
            }
            None => inlet.mass_flow.value,
        };
        let mass_flow = check_positive(&self.name, "mass flow", mass_flow)?;

        let (h_is, h_rated) = self.compress(ctx, inlet, p_out)?;
        let h_out = match self.params.get("power_consumption") {
            Some(power) => {
                let h_out = inlet.enthalpy + power / mass_flow;
                if h_out < h_is {
                    return Err(ComponentError::infeasible(
                        &self.name,
                        format!(
                            "power consumption {power} W below isentropic work {} W",
                            mass_flow * (h_is - inlet.enthalpy)
                        ),
                    ));
                }
                h_out
            }
            None => h_rated,
        };

        Ok(PortState::new(
            pa(p_out),
            check_finite_enthalpy(&self.name, h_out)?,
            kgps(mass_flow),
        ))
    }

    fn summary(
        &self,
        ctx: &EvalContext<'_>,
        inlet: &PortState,
        outlet: &PortState,
    ) -> ComponentResult<ComponentSummary> {
        let (h_is, _) = self.compress(ctx, inlet, outlet.pressure.value)?;
        let discharge = ctx.port_state(&self.name, outlet)?;
        let mdot = outlet.mass_flow.value;
        let lift = outlet.enthalpy - inlet.enthalpy;
        let mut figures = vec![
            ("shaft_power", mdot * lift),
            ("pressure_ratio", outlet.pressure.value / inlet.pressure.value),
            ("discharge_temperature", discharge.temperature().value),
            ("isentropic_enthalpy", h_is),
            ("mass_flow", mdot),
        ];
        if lift > 0.0 {
            figures.push(("isentropic_efficiency", (h_is - inlet.enthalpy) / lift));
        }
        Ok(ComponentSummary::new(
            &self.name,
            ComponentKind::Compressor,
            &FIGURES,
            figures,
        )?)
    }
}

fn check_finite_enthalpy(component: &str, h: f64) -> ComponentResult<f64> {
    if h.is_finite() {
        Ok(h)
    } else {
        Err(ComponentError::infeasible(component, "non-finite outlet enthalpy"))
    }
}
