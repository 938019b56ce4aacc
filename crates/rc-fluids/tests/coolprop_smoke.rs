//! CoolProp integration tests.
//!
//! Broad tolerances avoid backend version issues while still enforcing
//! physical plausibility.

#![cfg(feature = "coolprop")]

use std::sync::Arc;

use rc_fluids::{BackendRegistry, CoolPropBackend, PropertyError, StateVar};

fn registry() -> BackendRegistry {
    let mut reg = BackendRegistry::new();
    reg.register(Arc::new(CoolPropBackend::new()));
    reg
}

#[test]
fn r134a_saturation_near_tables() {
    let reg = registry();
    let id = reg.resolve("R-134a").unwrap();
    let backend = reg.backend(&id).unwrap();
    let p = backend.saturation_pressure(&id, 263.15).unwrap();
    assert!(p > 190e3 && p < 210e3, "p_sat = {p} Pa");
}

#[test]
fn quality_above_critical_pressure_is_out_of_domain() {
    let reg = registry();
    let id = reg.resolve("HFC-134a").unwrap();
    let backend = reg.backend(&id).unwrap();
    let err = backend
        .state_from_two(&id, StateVar::Pressure(6e6), StateVar::Quality(0.5))
        .unwrap_err();
    assert!(matches!(err, PropertyError::OutOfDomain { .. }));
}

#[test]
fn temperatures_outside_the_envelope_are_out_of_domain() {
    let reg = registry();
    let id = reg.resolve("R-134a").unwrap();
    let backend = reg.backend(&id).unwrap();
    for (a, b) in [
        (StateVar::Temperature(100.0), StateVar::Pressure(1e5)),
        (StateVar::Pressure(1e5), StateVar::Temperature(2000.0)),
        (StateVar::Temperature(380.0), StateVar::Quality(0.5)),
    ] {
        let err = backend.state_from_two(&id, a, b).unwrap_err();
        assert!(matches!(err, PropertyError::OutOfDomain { .. }), "{a:?} {b:?}: {err}");
    }
}

#[test]
fn saturated_pressure_temperature_is_underdetermined() {
    let reg = registry();
    let id = reg.resolve("R-134a").unwrap();
    let backend = reg.backend(&id).unwrap();
    let p = 3e5;
    let t_sat = backend.saturation_temperature(&id, p).unwrap();
    let err = backend
        .state_from_two(&id, StateVar::Pressure(p), StateVar::Temperature(t_sat))
        .unwrap_err();
    assert!(matches!(err, PropertyError::UnderdeterminedState { .. }));

    let vapor = backend
        .state_from_two(&id, StateVar::Pressure(p), StateVar::Temperature(t_sat + 5.0))
        .unwrap();
    assert!(vapor.enthalpy() > 3.9e5);
}
