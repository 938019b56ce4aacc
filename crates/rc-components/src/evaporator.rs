//! Evaporator component model.

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
    ParamSpec::new("superheat", QuantityKind::TemperatureDifference)
        .bounded(Bounds::NON_NEGATIVE)
        .with_default(0.0),
    ParamSpec::new("pressure_drop", QuantityKind::Pressure)
        .bounded(Bounds::NON_NEGATIVE)
        .with_default(0.0),
    ParamSpec::new("cooling_capacity", QuantityKind::Power).bounded(Bounds::POSITIVE),
];

static FIGURES: [ParamSpec; 5] = [
    ParamSpec::new("cooling_capacity", QuantityKind::Power),
    ParamSpec::new("saturation_temperature", QuantityKind::Temperature),
    ParamSpec::new("superheat", QuantityKind::TemperatureDifference),
    ParamSpec::new("inlet_quality", QuantityKind::Quality),
    ParamSpec::new("mass_flow", QuantityKind::MassFlow),
];

/// Evaporator boiling the refrigerant up to a superheated (or saturated) vapor.
///
/// Mirror of [`Condenser`](crate::Condenser): the outlet is `superheat` above
/// saturation and `cooling_capacity` fixes `mdot = Q / (h_out - h_in)`.
#[derive(Debug, Clone)]
pub struct Evaporator {
    name: String,
    params: ParameterStore,
}

impl Evaporator {
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

impl Parameterized for Evaporator {
    fn parameters(&self) -> &ParameterStore {
        &self.params
    }

    fn parameters_mut(&mut self) -> &mut ParameterStore {
        &mut self.params
    }
}

impl CycleComponent for Evaporator {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Evaporator
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

impl Evaporator {
    fn outlet_state(&self, ctx: &EvalContext<'_>, inlet: &PortState) -> ComponentResult<PortState> {
        let p_out = outlet_pressure(&self.name, &self.params, ctx, inlet)?;
        let superheat = self.params.get("superheat").unwrap_or(0.0);
        let second = if superheat > 0.0 {
            let t_sat = ctx.saturation_temperature(&self.name, p_out)?;
            StateVar::Temperature(t_sat + superheat)
        } else {
            StateVar::Quality(1.0)
        };
        let h_out = ctx
            .state(&self.name, StateVar::Pressure(p_out), second)?
            .enthalpy();

        let mdot = capacity_mass_flow(
            &self.name,
            self.params.get("cooling_capacity"),
            h_out - inlet.enthalpy,
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
        let inlet_quality = ctx.port_state(&self.name, inlet)?.quality();
        let mdot = outlet.mass_flow.value;

        let mut figures = vec![
            ("cooling_capacity", mdot * (outlet.enthalpy - inlet.enthalpy)),
            ("saturation_temperature", t_sat),
            ("superheat", t_out - t_sat),
            ("mass_flow", mdot),
        ];
        if let Some(x) = inlet_quality {
            figures.push(("inlet_quality", x));
        }
        Ok(ComponentSummary::new(
            &self.name,
            ComponentKind::Evaporator,
            &FIGURES,
            figures,
        )?)
    }
}
