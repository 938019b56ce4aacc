//! Starting iterates: user seeds, warm starts and defaults.

use std::collections::BTreeMap;

use rc_components::PortState;
use rc_core::PortId;
use rc_core::units::{kgps, pa};
use rc_fluids::{PropertyBackend, RefrigerantId, StateVar};

use crate::config::SolverConfig;
use crate::error::{SolverError, SolverResult};
use crate::solve::CycleSolution;

/// User seed for one port, canonical units. Any two of pressure,
/// temperature, enthalpy and quality fix the state; a saturation temperature
/// stands in for the pressure.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PortSeed {
    /// [Pa]
    pub pressure: Option<f64>,
    /// [K]
    pub temperature: Option<f64>,
    /// [J/kg]
    pub enthalpy: Option<f64>,
    pub quality: Option<f64>,
    /// [K]
    pub saturation_temperature: Option<f64>,
    /// [kg/s]
    pub mass_flow: Option<f64>,
}

impl PortSeed {
    pub fn pressure_enthalpy(p: f64, h: f64) -> Self {
        Self {
            pressure: Some(p),
            enthalpy: Some(h),
            ..Self::default()
        }
    }

    pub fn with_mass_flow(mut self, mass_flow: f64) -> Self {
        self.mass_flow = Some(mass_flow);
        self
    }

    /// Resolve to a `(P, h, mdot)` iterate. Missing pieces fall back to the
    /// configured defaults.
    pub fn resolve(
        &self,
        backend: &dyn PropertyBackend,
        refrigerant: &RefrigerantId,
        config: &SolverConfig,
    ) -> SolverResult<PortState> {
        let pressure = match (self.pressure, self.saturation_temperature) {
            (Some(p), _) => Some(p),
            (None, Some(t)) => Some(backend.saturation_pressure(refrigerant, t)?),
            (None, None) => None,
        };
        let mass_flow = self.mass_flow.unwrap_or(config.default_mass_flow);
        if !(mass_flow.is_finite() && mass_flow > 0.0) {
            return Err(SolverError::setup(format!(
                "seed mass flow must be positive, got {mass_flow}"
            )));
        }

        let vars: Vec<StateVar> = [
            pressure.map(StateVar::Pressure),
            self.temperature.map(StateVar::Temperature),
            self.enthalpy.map(StateVar::Enthalpy),
            self.quality.map(StateVar::Quality),
        ]
        .into_iter()
        .flatten()
        .collect();

        let (p, h) = match vars.as_slice() {
            [] => (config.default_pressure, config.default_enthalpy),
            [StateVar::Pressure(p)] => (*p, config.default_enthalpy),
            [StateVar::Enthalpy(h)] => (config.default_pressure, *h),
            [StateVar::Pressure(p), StateVar::Enthalpy(h), ..] => (*p, *h),
            [single] => {
                let state = backend.state_from_two(
                    refrigerant,
                    StateVar::Pressure(config.default_pressure),
                    *single,
                )?;
                (state.pressure().value, state.enthalpy())
            }
            [a, b, ..] => {
                let state = backend.state_from_two(refrigerant, *a, *b)?;
                (state.pressure().value, state.enthalpy())
            }
        };
        Ok(PortState::new(pa(p), h, kgps(mass_flow)))
    }
}

/// Seeds for a solve. Ports without a seed start from the warm start when
/// one is given, else from the configured defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InitialValues {
    seeds: BTreeMap<PortId, PortSeed>,
    warm_start: Option<Vec<PortState>>,
}

impl InitialValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a port. A seed on an outlet applies to the inlet it feeds.
    pub fn seed(&mut self, port: PortId, seed: PortSeed) -> &mut Self {
        self.seeds.insert(port, seed);
        self
    }

    pub fn seeds(&self) -> impl Iterator<Item = (PortId, &PortSeed)> {
        self.seeds.iter().map(|(p, s)| (*p, s))
    }

    /// Start from a previous solution of the same graph.
    pub fn warm_start(solution: &CycleSolution) -> Self {
        Self {
            seeds: BTreeMap::new(),
            warm_start: Some(solution.ports().to_vec()),
        }
    }

    pub(crate) fn warm(&self, port: PortId) -> Option<PortState> {
        self.warm_start.as_ref()?.get(port.slot()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rc_fluids::BackendRegistry;

    fn r134a() -> (BackendRegistry, RefrigerantId) {
        let reg = BackendRegistry::with_reference();
        let id = reg.resolve("R134a").unwrap();
        (reg, id)
    }

    #[test]
    fn empty_seed_uses_defaults() {
        let (reg, id) = r134a();
        let backend = reg.backend(&id).unwrap();
        let cfg = SolverConfig::default();
        let s = PortSeed::default().resolve(backend.as_ref(), &id, &cfg).unwrap();
        assert_eq!(s.pressure.value, 300e3);
        assert_eq!(s.enthalpy, 400e3);
        assert_eq!(s.mass_flow.value, 0.05);
    }

    #[test]
    fn saturation_temperature_and_quality_resolve() {
        let (reg, id) = r134a();
        let backend = reg.backend(&id).unwrap();
        let seed = PortSeed {
            saturation_temperature: Some(263.15),
            quality: Some(1.0),
            mass_flow: Some(0.1),
            ..PortSeed::default()
        };
        let s = seed
            .resolve(backend.as_ref(), &id, &SolverConfig::default())
            .unwrap();
        let sat = backend
            .state_from_two(&id, StateVar::Temperature(263.15), StateVar::Quality(1.0))
            .unwrap();
        assert_relative_eq!(s.pressure.value, sat.pressure().value, max_relative = 1e-9);
        assert_relative_eq!(s.enthalpy, sat.enthalpy(), max_relative = 1e-9);
        assert_eq!(s.mass_flow.value, 0.1);
    }

    #[test]
    fn pressure_temperature_seed() {
        let (reg, id) = r134a();
        let backend = reg.backend(&id).unwrap();
        let seed = PortSeed {
            pressure: Some(1.0e6),
            temperature: Some(303.15),
            ..PortSeed::default()
        };
        let s = seed
            .resolve(backend.as_ref(), &id, &SolverConfig::default())
            .unwrap();
        assert_eq!(s.pressure.value, 1.0e6);
        assert!(s.enthalpy < 300e3);
    }

    #[test]
    fn out_of_envelope_seed_is_property_error() {
        let (reg, id) = r134a();
        let backend = reg.backend(&id).unwrap();
        let seed = PortSeed {
            pressure: Some(6.0e6),
            quality: Some(0.5),
            ..PortSeed::default()
        };
        let err = seed
            .resolve(backend.as_ref(), &id, &SolverConfig::default())
            .unwrap_err();
        assert!(matches!(err, SolverError::Property(_)));
    }
}
