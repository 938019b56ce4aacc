//! Mixer component model.

use rc_core::units::{kgps, pa};
use rc_core::{Bounds, ParamSpec, ParameterStore, Parameterized, QuantityKind};
use rc_graph::ComponentKind;

use crate::error::ComponentResult;
use crate::traits::{
    ComponentSummary, CycleComponent, EvalContext, PortState, check_positive, expect_ports,
};

static PARAMS: [ParamSpec; 2] = [
    ParamSpec::new("pressure_drop_1", QuantityKind::Pressure)
        .bounded(Bounds::NON_NEGATIVE)
        .with_default(0.0),
    ParamSpec::new("pressure_drop_2", QuantityKind::Pressure)
        .bounded(Bounds::NON_NEGATIVE)
        .with_default(0.0),
];

static FIGURES: [ParamSpec; 4] = [
    ParamSpec::new("mass_flow", QuantityKind::MassFlow),
    ParamSpec::new("inlet_1_fraction", QuantityKind::Dimensionless),
    ParamSpec::new("outlet_temperature", QuantityKind::Temperature),
    ParamSpec::new("pressure_mismatch", QuantityKind::Pressure),
];

/// Adiabatic junction of two streams.
///
/// ## Model
///
/// ```text
/// mdot  = mdot_1 + mdot_2
/// h_out = (mdot_1 h_1 + mdot_2 h_2) / mdot
/// P_out = min(P_1 - dP_1, P_2 - dP_2)
/// ```
#[derive(Debug, Clone)]
pub struct Mixer {
    name: String,
    params: ParameterStore,
}

impl Mixer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: ParameterStore::new(&PARAMS),
        }
    }

    pub fn param_specs() -> &'static [ParamSpec] {
        &PARAMS
    }

    /// Pressure each branch arrives with after its own drop.
    fn branch_pressures(&self, inlets: &[PortState; 2]) -> [f64; 2] {
        let drop = |name| self.params.get(name).unwrap_or(0.0);
        [
            inlets[0].pressure.value - drop("pressure_drop_1"),
            inlets[1].pressure.value - drop("pressure_drop_2"),
        ]
    }
}

impl Parameterized for Mixer {
    fn parameters(&self) -> &ParameterStore {
        &self.params
    }

    fn parameters_mut(&mut self) -> &mut ParameterStore {
        &mut self.params
    }
}

impl CycleComponent for Mixer {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ComponentKind {
        ComponentKind::Mixer
    }

    fn evaluate(&self, _ctx: &EvalContext<'_>, inlets: &[PortState]) -> ComponentResult<Vec<PortState>> {
        let branches = expect_ports::<2>(&self.name, "inlet", inlets)?;
        let [a, b] = branches;
        let m1 = check_positive(&self.name, "inlet 1 mass flow", a.mass_flow.value)?;
        let m2 = check_positive(&self.name, "inlet 2 mass flow", b.mass_flow.value)?;
        let mdot = m1 + m2;

        let [p1, p2] = self.branch_pressures(branches);
        let p_out = check_positive(&self.name, "outlet pressure", p1.min(p2))?;
        let h_out = (m1 * a.enthalpy + m2 * b.enthalpy) / mdot;

        Ok(vec![PortState::new(pa(p_out), h_out, kgps(mdot))])
    }

    fn summarize(
        &self,
        ctx: &EvalContext<'_>,
        inlets: &[PortState],
        outlets: &[PortState],
    ) -> ComponentResult<ComponentSummary> {
        let branches = expect_ports::<2>(&self.name, "inlet", inlets)?;
        let [outlet] = expect_ports::<1>(&self.name, "outlet", outlets)?;
        let [p1, p2] = self.branch_pressures(branches);
        let state = ctx.port_state(&self.name, outlet)?;
        let mdot = outlet.mass_flow.value;
        Ok(ComponentSummary::new(
            &self.name,
            ComponentKind::Mixer,
            &FIGURES,
            [
                ("mass_flow", mdot),
                ("inlet_1_fraction", branches[0].mass_flow.value / mdot),
                ("outlet_temperature", state.temperature().value),
                ("pressure_mismatch", (p1 - p2).abs()),
            ],
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ComponentError;
    use approx::assert_relative_eq;
    use rc_core::UnitNormalizer;
    use rc_fluids::BackendRegistry;

    #[test]
    fn mass_and_energy_balance() {
        let reg = BackendRegistry::with_reference();
        let id = reg.resolve("R134a").unwrap();
        let backend = reg.backend(&id).unwrap();
        let ctx = EvalContext::new(backend.as_ref(), &id);

        let mix = Mixer::new("mix");
        let inlets = [
            PortState::new(pa(2.0e5), 4.0e5, kgps(0.03)),
            PortState::new(pa(2.1e5), 3.9e5, kgps(0.01)),
        ];
        let out = mix.evaluate(&ctx, &inlets).unwrap();
        assert_eq!(out.len(), 1);
        assert_relative_eq!(out[0].mass_flow.value, 0.04, max_relative = 1e-12);
        assert_relative_eq!(out[0].enthalpy, 3.975e5, max_relative = 1e-12);
        assert_eq!(out[0].pressure.value, 2.0e5);

        let summary = mix.summarize(&ctx, &inlets, &out).unwrap();
        assert_relative_eq!(summary.get("inlet_1_fraction").unwrap(), 0.75, max_relative = 1e-12);
        assert_relative_eq!(summary.get("pressure_mismatch").unwrap(), 1.0e4, max_relative = 1e-12);
    }

    #[test]
    fn branch_drops_lower_the_outlet() {
        let reg = BackendRegistry::with_reference();
        let id = reg.resolve("R134a").unwrap();
        let backend = reg.backend(&id).unwrap();
        let ctx = EvalContext::new(backend.as_ref(), &id);

        let norm = UnitNormalizer::global();
        let mut mix = Mixer::new("mix");
        let drop = norm.quantity(30.0, QuantityKind::Pressure, "kPa").unwrap();
        norm.set_parameter(&mut mix, "pressure_drop_2", &drop).unwrap();

        let inlets = [
            PortState::new(pa(2.0e5), 4.0e5, kgps(0.02)),
            PortState::new(pa(2.1e5), 4.0e5, kgps(0.02)),
        ];
        let out = mix.evaluate(&ctx, &inlets).unwrap();
        assert_relative_eq!(out[0].pressure.value, 1.8e5, max_relative = 1e-12);
    }

    #[test]
    fn needs_two_flowing_inlets() {
        let reg = BackendRegistry::with_reference();
        let id = reg.resolve("R134a").unwrap();
        let backend = reg.backend(&id).unwrap();
        let ctx = EvalContext::new(backend.as_ref(), &id);

        let mix = Mixer::new("mix");
        let inlet = PortState::new(pa(2.0e5), 4.0e5, kgps(0.02));
        assert!(matches!(
            mix.evaluate(&ctx, &[inlet]),
            Err(ComponentError::PortCount { expected: 2, found: 1, .. })
        ));

        let stalled = PortState::new(pa(2.0e5), 4.0e5, kgps(0.0));
        assert!(mix.evaluate(&ctx, &[inlet, stalled]).unwrap_err().is_infeasible());
    }
}
