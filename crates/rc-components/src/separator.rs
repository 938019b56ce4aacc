//! Separator component model.

use rc_core::units::{kgps, pa};
use rc_core::{Bounds, ParamSpec, ParameterStore, Parameterized, QuantityKind};
use rc_graph::ComponentKind;

use crate::error::ComponentResult;
use crate::traits::{
    ComponentSummary, CycleComponent, EvalContext, PortState, check_positive, expect_ports,
};

static PARAMS: [ParamSpec; 3] = [
    ParamSpec::new("split_fraction", QuantityKind::Dimensionless)
        .bounded(Bounds::FRACTION)
        .with_default(0.5),
    ParamSpec::new("pressure_drop_1", QuantityKind::Pressure)
        .bounded(Bounds::NON_NEGATIVE)
        .with_default(0.0),
    ParamSpec::new("pressure_drop_2", QuantityKind::Pressure)
        .bounded(Bounds::NON_NEGATIVE)
        .with_default(0.0),
];

static FIGURES: [ParamSpec; 3] = [
    ParamSpec::new("mass_flow_1", QuantityKind::MassFlow),
    ParamSpec::new("mass_flow_2", QuantityKind::MassFlow),
    ParamSpec::new("inlet_temperature", QuantityKind::Temperature),
];

/// Splits one stream into two at the inlet enthalpy.
///
/// `split_fraction` is the share of the inlet flow leaving through outlet 1.
/// Each outlet sits at the inlet pressure less its own drop.
#[derive(Debug, Clone)]
pub struct Separator {
    name: String,
    params: ParameterStore,
}

impl Separator {
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

impl Parameterized for Separator {
    fn parameters(&self) -> &ParameterStore {
        &self.params
    }

    fn parameters_mut(&mut self) -> &mut ParameterStore {
        &mut self.params
    }
}

impl CycleComponent for Separator {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Separator
    }

    fn evaluate(&self, _ctx: &EvalContext<'_>, inlets: &[PortState]) -> ComponentResult<Vec<PortState>> {
        let [inlet] = expect_ports::<1>(&self.name, "inlet", inlets)?;
        let x = self.params.get("split_fraction").unwrap_or(0.5);
        let mdot = inlet.mass_flow.value;

        [("1", x), ("2", 1.0 - x)]
            .into_iter()
            .map(|(branch, share)| -> ComponentResult<PortState> {
                let drop = self.params.get(&format!("pressure_drop_{branch}")).unwrap_or(0.0);
                let p = check_positive(
                    &self.name,
                    &format!("outlet {branch} pressure"),
                    inlet.pressure.value - drop,
                )?;
                let m = check_positive(&self.name, &format!("outlet {branch} mass flow"), share * mdot)?;
                Ok(PortState::new(pa(p), inlet.enthalpy, kgps(m)))
            })
            .collect()
    }

    fn summarize(
        &self,
        ctx: &EvalContext<'_>,
        inlets: &[PortState],
        outlets: &[PortState],
    ) -> ComponentResult<ComponentSummary> {
        let [inlet] = expect_ports::<1>(&self.name, "inlet", inlets)?;
        let [one, two] = expect_ports::<2>(&self.name, "outlet", outlets)?;
        let state = ctx.port_state(&self.name, inlet)?;
        Ok(ComponentSummary::new(
            &self.name,
            ComponentKind::Separator,
            &FIGURES,
            [
                ("mass_flow_1", one.mass_flow.value),
                ("mass_flow_2", two.mass_flow.value),
                ("inlet_temperature", state.temperature().value),
            ],
        )?)
    }
}
