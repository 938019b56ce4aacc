//! One manual pass around a basic R-134a cycle.

use approx::assert_relative_eq;
use rc_components::{CycleComponent, EvalContext, PortState, build_component, param_specs};
use rc_core::units::{kgps, pa};
use rc_core::{Parameterized, QuantityKind, UnitNormalizer};
use rc_fluids::{BackendRegistry, Phase};
use rc_graph::ComponentKind;

fn set(comp: &mut dyn CycleComponent, name: &str, value: f64, kind: QuantityKind, unit: &str) {
    let norm = UnitNormalizer::global();
    let q = norm.quantity(value, kind, unit).unwrap();
    norm.set_parameter(comp, name, &q).unwrap();
}

fn through(comp: &dyn CycleComponent, ctx: &EvalContext<'_>, inlet: PortState) -> PortState {
    let out = comp.evaluate(ctx, &[inlet]).unwrap();
    assert_eq!(out.len(), 1);
    out[0]
}

#[test]
fn factory_matches_kind() {
    for kind in ComponentKind::ALL {
        let comp = build_component(kind, kind.as_str());
        assert_eq!(comp.kind(), kind);
        assert_eq!(comp.name(), kind.as_str());
        assert_eq!(comp.parameters().specs(), param_specs(kind));
    }
}

#[test]
fn split_and_merge_conserve_mass_and_energy() {
    let registry = BackendRegistry::with_reference();
    let r134a = registry.resolve("R134a").unwrap();
    let backend = registry.backend(&r134a).unwrap();
    let ctx = EvalContext::new(backend.as_ref(), &r134a);

    let mut sep = build_component(ComponentKind::Separator, "sep");
    set(sep.as_mut(), "split_fraction", 40.0, QuantityKind::Dimensionless, "%");
    let mut evap_a = build_component(ComponentKind::Evaporator, "evap_a");
    let mut evap_b = build_component(ComponentKind::Evaporator, "evap_b");
    set(evap_a.as_mut(), "superheat", 5.0, QuantityKind::TemperatureDifference, "K");
    set(evap_b.as_mut(), "superheat", 10.0, QuantityKind::TemperatureDifference, "K");
    let mix = build_component(ComponentKind::Mixer, "mix");

    let feed = PortState::new(pa(2.0e5), 2.5e5, kgps(0.1));
    let branches = sep.evaluate(&ctx, &[feed]).unwrap();
    let a = through(evap_a.as_ref(), &ctx, branches[0]);
    let b = through(evap_b.as_ref(), &ctx, branches[1]);
    let merged = mix.evaluate(&ctx, &[a, b]).unwrap();

    assert_relative_eq!(merged[0].mass_flow.value, feed.mass_flow.value, max_relative = 1e-12);
    let absorbed = a.mass_flow.value * (a.enthalpy - feed.enthalpy)
        + b.mass_flow.value * (b.enthalpy - feed.enthalpy);
    assert_relative_eq!(
        merged[0].mass_flow.value * (merged[0].enthalpy - feed.enthalpy),
        absorbed,
        max_relative = 1e-9
    );
    assert!(b.enthalpy > a.enthalpy);
    assert!(merged[0].enthalpy > a.enthalpy && merged[0].enthalpy < b.enthalpy);
}

#[test]
fn single_pass_closes_energy_balance() {
    let registry = BackendRegistry::with_reference();
    let r134a = registry.resolve("R134a").unwrap();
    let backend = registry.backend(&r134a).unwrap();
    let base = EvalContext::new(backend.as_ref(), &r134a);

    let mut comp = build_component(ComponentKind::Compressor, "comp");
    let mut cond = build_component(ComponentKind::Condenser, "cond");
    let valve = build_component(ComponentKind::ExpansionValve, "txv");
    let mut evap = build_component(ComponentKind::Evaporator, "evap");

    set(comp.as_mut(), "isentropic_efficiency", 70.0, QuantityKind::Efficiency, "%");
    set(cond.as_mut(), "saturation_temperature", 40.0, QuantityKind::Temperature, "°C");
    set(cond.as_mut(), "subcooling", 5.0, QuantityKind::TemperatureDifference, "K");
    set(evap.as_mut(), "saturation_temperature", 14.0, QuantityKind::Temperature, "°F");
    set(evap.as_mut(), "superheat", 9.0, QuantityKind::TemperatureDifference, "°F");

    let p_hi = cond.inlet_pressure_demand(&base).unwrap();
    let p_lo = evap.inlet_pressure_demand(&base).unwrap();

    let suction = {
        let ctx = base;
        let seed = PortState::new(p_lo.unwrap(), 4.0e5, kgps(0.05));
        through(evap.as_ref(), &ctx, seed)
    };
    let discharge = through(comp.as_ref(), &base.with_downstream(p_hi), suction);
    let liquid = through(cond.as_ref(), &base, discharge);
    let mixed = through(valve.as_ref(), &base.with_downstream(p_lo), liquid);
    let back = through(evap.as_ref(), &base, mixed);

    assert_eq!(back, suction);
    assert_eq!(discharge.pressure, p_hi.unwrap());
    assert_eq!(mixed.enthalpy, liquid.enthalpy);

    let work = discharge.enthalpy - suction.enthalpy;
    let cooling = back.enthalpy - mixed.enthalpy;
    let rejected = discharge.enthalpy - liquid.enthalpy;
    assert_relative_eq!(rejected, work + cooling, max_relative = 1e-12);

    let cop = cooling / work;
    assert!(cop > 2.0 && cop < 6.0, "cop = {cop}");

    let state = base.port_state("evap", &back).unwrap();
    assert_eq!(state.phase(), Phase::SuperheatedVapor);
    assert_relative_eq!(state.temperature().value, 268.15, epsilon = 1e-6);
}
