//! Condenser component model.

use rc_core::units::{Pressure, kgps, pa};
use rc_core::{Bounds, ParamSpec, ParameterStore, Parameterized, QuantityKind};
use rc_fluids::StateVar;
use rc_graph::ComponentKind;

use crate::common::{capacity_mass_flow, operating_pressure, outlet_pressure};
use crate::error::ComponentResult;
use crate::traits::{ComponentSummary, CycleComponent, EvalContext, PortState, pair, through};

static PARAMS: [ParamSpec; 5] = [
    ParamSpec::new("saturation_pressure", QuantityKind::Pressure).bounded(Bounds::POSITIVE),
    ParamSpec::new("saturation_temperature", QuantityKind::Temperature).bounded(Bounds::POSITIVE),
    ParamSpec::new("subcooling", QuantityKind::TemperatureDifference)
        .bounded(Bounds::NON_NEGATIVE)
        .with_default(0.0),
    ParamSpec::new("pressure_drop", QuantityKind::Pressure)
        .bounded(Bounds::NON_NEGATIVE)
        .with_default(0.0),
    ParamSpec::new("heating_capacity", QuantityKind::Power).bounded(Bounds::POSITIVE),
];

static FIGURES: [ParamSpec; 4] = [
    ParamSpec::new("heat_rejected", QuantityKind::Power),
    ParamSpec::new("saturation_temperature", QuantityKind::Temperature),
    ParamSpec::new("subcooling", QuantityKind::TemperatureDifference),
    ParamSpec::new("mass_flow", QuantityKind::MassFlow),
];

/// Condenser rejecting heat down to a subcooled (or saturated) liquid.
///
/// The operating pressure comes from `saturation_pressure`, else from
/// `saturation_temperature`, else from the inlet. The outlet sits at the
/// operating pressure less `pressure_drop`, `subcooling` below saturation.
/// With `heating_capacity` set the mass flow is `Q / (h_in - h_out)`.
#[derive(Debug, Clone)]
pub struct Condenser {
    name: String,
    params: ParameterStore,
}

impl Condenser {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: ParameterStore::new(&PARAMS),
        }
    }

    pub fn param_specs() -> &'static [ParamSpec] {
        &PARAMS
    }
}

impl Parameterized for Condenser {
    fn parameters(&self) -> &ParameterStore {
        &self.params
    }

    fn parameters_mut(&mut self) -> &mut ParameterStore {
        &mut self.params
    }
}

impl CycleComponent for Condenser {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Condenser
    }

    fn inlet_pressure_demand(&self, ctx: &EvalContext<'_>) -> ComponentResult<Option<Pressure>> {
        Ok(operating_pressure(&self.name, &self.params, ctx)?.map(pa))
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

impl Condenser {
    fn outlet_state(&self, ctx: &EvalContext<'_>, inlet: &PortState) -> ComponentResult<PortState> {
        let p_out = outlet_pressure(&self.name, &self.params, ctx, inlet)?;
        let subcooling = self.params.get("subcooling").unwrap_or(0.0);
        let second = if subcooling > 0.0 {
            let t_sat = ctx.saturation_temperature(&self.name, p_out)?;
            StateVar::Temperature(t_sat - subcooling)
        } else {
            StateVar::Quality(0.0)
        };
        let h_out = ctx
            .state(&self.name, StateVar::Pressure(p_out), second)?
            .enthalpy();

        let mdot = capacity_mass_flow(
            &self.name,
            self.params.get("heating_capacity"),
            inlet.enthalpy - h_out,
            inlet,
        )?;
        Ok(PortState::new(pa(p_out), h_out, kgps(mdot)))
    }

    fn summary(
        &self,
        ctx: &EvalContext<'_>,
        inlet: &PortState,
        outlet: &PortState,
    ) -> ComponentResult<ComponentSummary> {
        let t_sat = ctx.saturation_temperature(&self.name, outlet.pressure.value)?;
        let t_out = ctx.port_state(&self.name, outlet)?.temperature().value;
        let mdot = outlet.mass_flow.value;
        Ok(ComponentSummary::new(
            &self.name,
            ComponentKind::Condenser,
            &FIGURES,
            [
                ("heat_rejected", mdot * (inlet.enthalpy - outlet.enthalpy)),
                ("saturation_temperature", t_sat),
                ("subcooling", t_sat - t_out),
                ("mass_flow", mdot),
            ],
        )?)
    }
}
