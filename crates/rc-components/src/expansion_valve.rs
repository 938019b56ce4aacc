//! Expansion valve component model.

use rc_core::units::{Pressure, pa};
use rc_core::{Bounds, ParamSpec, ParameterStore, Parameterized, QuantityKind};
use rc_fluids::StateVar;
use rc_graph::ComponentKind;

use crate::error::{ComponentError, ComponentResult};
use crate::traits::{ComponentSummary, CycleComponent, EvalContext, PortState, pair, through};

static PARAMS: [ParamSpec; 1] =
    [ParamSpec::new("outlet_pressure", QuantityKind::Pressure).bounded(Bounds::POSITIVE)];

static FIGURES: [ParamSpec; 3] = [
    ParamSpec::new("pressure_drop", QuantityKind::Pressure),
    ParamSpec::new("outlet_quality", QuantityKind::Quality),
    ParamSpec::new("outlet_temperature", QuantityKind::Temperature),
];

/// Isenthalpic throttle: `h_out = h_in`, `mdot_out = mdot_in`.
#[derive(Debug, Clone)]
pub struct ExpansionValve {
    name: String,
    params: ParameterStore,
}

impl ExpansionValve {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: ParameterStore::new(&PARAMS),
        }
    }

    pub fn param_specs() -> &'static [ParamSpec] {
        &PARAMS
    }

    fn outlet_pressure(&self, ctx: &EvalContext<'_>) -> ComponentResult<Pressure> {
        self.params
            .get("outlet_pressure")
            .map(pa)
            .or(ctx.downstream_pressure)
            .ok_or_else(|| ComponentError::MissingTarget {
                component: self.name.clone(),
                what: "outlet pressure",
            })
    }
}

impl Parameterized for ExpansionValve {
    fn parameters(&self) -> &ParameterStore {
        &self.params
    }

    fn parameters_mut(&mut self) -> &mut ParameterStore {
        &mut self.params
    }
}

impl CycleComponent for ExpansionValve {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::ExpansionValve
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

impl ExpansionValve {
    fn outlet_state(&self, ctx: &EvalContext<'_>, inlet: &PortState) -> ComponentResult<PortState> {
        let p_out = self.outlet_pressure(ctx)?;
        if p_out > inlet.pressure {
            return Err(ComponentError::infeasible(
                &self.name,
                format!(
                    "outlet pressure {} Pa above inlet pressure {} Pa",
                    p_out.value, inlet.pressure.value
                ),
            ));
        }
        // outlet must exist in the envelope
        ctx.state(
            &self.name,
            StateVar::Pressure(p_out.value),
            StateVar::Enthalpy(inlet.enthalpy),
        )?;
        Ok(PortState::new(p_out, inlet.enthalpy, inlet.mass_flow))
    }

    fn summary(
        &self,
        ctx: &EvalContext<'_>,
        inlet: &PortState,
        outlet: &PortState,
    ) -> ComponentResult<ComponentSummary> {
        let state = ctx.port_state(&self.name, outlet)?;
        let mut figures = vec![
            ("pressure_drop", inlet.pressure.value - outlet.pressure.value),
            ("outlet_temperature", state.temperature().value),
        ];
        if let Some(x) = state.quality() {
            figures.push(("outlet_quality", x));
        }
        Ok(ComponentSummary::new(
            &self.name,
            ComponentKind::ExpansionValve,
            &FIGURES,
            figures,
        )?)
    }
}
