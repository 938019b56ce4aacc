//! CoolProp-based property backend (feature `coolprop`).

use rfluids::prelude::*;

use crate::backend::{CriticalPoint, Envelope, PropertyBackend, check_pair};
use crate::error::{PropertyError, PropertyResult};
use crate::refrigerant::{RefrigerantId, refrigerant_key};
use crate::state::{FluidState, Phase, StateVar};

const FLUIDS: &[(&str, Pure)] = &[
    ("R-134a", Pure::R134a),
    ("R-32", Pure::R32),
    ("R-125", Pure::R125),
    ("R-152a", Pure::R152a),
    ("R-1234yf", Pure::R1234yf),
];

fn backend_err(context: &str, e: impl std::fmt::Display) -> PropertyError {
    PropertyError::Backend {
        message: format!("rfluids error {context}: {e}"),
    }
}

/// CoolProp backend for refrigerant properties.
///
/// Thread-safe: rfluids Fluid instances are created per query.
#[derive(Debug, Default)]
pub struct CoolPropBackend;

impl CoolPropBackend {
    pub fn new() -> Self {
        Self
    }

    fn pure(&self, refrigerant: &RefrigerantId) -> PropertyResult<Pure> {
        let key = refrigerant_key(refrigerant.name());
        FLUIDS
            .iter()
            .find(|(name, _)| refrigerant_key(name) == key)
            .map(|(_, pure)| *pure)
            .ok_or_else(|| PropertyError::UnsupportedRefrigerant {
                name: refrigerant.name().to_owned(),
            })
    }

    /// Validity range of `pure` as reported by CoolProp.
    fn envelope(&self, pure: Pure) -> PropertyResult<Envelope> {
        let mut fluid = Fluid::from(pure)
            .in_state(FluidInput::temperature(273.15), FluidInput::quality(0.0))
            .map_err(|e| backend_err("creating reference state", e))?;
        Ok(Envelope {
            t_min: fluid
                .triple_temperature()
                .map_err(|e| backend_err("getting triple temperature", e))?,
            t_max: fluid
                .max_temperature()
                .map_err(|e| backend_err("getting maximum temperature", e))?,
            critical: CriticalPoint {
                temperature: fluid
                    .critical_temperature()
                    .map_err(|e| backend_err("getting critical temperature", e))?,
                pressure: fluid
                    .critical_pressure()
                    .map_err(|e| backend_err("getting critical pressure", e))?,
            },
        })
    }

    fn input(var: StateVar) -> PropertyResult<FluidInput> {
        Ok(match var {
            StateVar::Pressure(v) => FluidInput::pressure(v),
            StateVar::Temperature(v) => FluidInput::temperature(v),
            StateVar::Enthalpy(v) => FluidInput::enthalpy(v),
            StateVar::Entropy(v) => FluidInput::entropy(v),
            StateVar::Quality(v) => FluidInput::quality(v),
            StateVar::Density(v) => FluidInput::density(v),
        })
    }
}

impl PropertyBackend for CoolPropBackend {
    fn name(&self) -> &str {
        "CoolProp"
    }

    fn refrigerants(&self) -> Vec<String> {
        FLUIDS.iter().map(|(n, _)| (*n).to_owned()).collect()
    }

    fn canonical_name(&self, query: &str) -> Option<String> {
        let key = refrigerant_key(query);
        FLUIDS
            .iter()
            .find(|(name, _)| refrigerant_key(name) == key)
            .map(|(name, _)| (*name).to_owned())
    }

    fn state_from_two(
        &self,
        refrigerant: &RefrigerantId,
        a: StateVar,
        b: StateVar,
    ) -> PropertyResult<FluidState> {
        check_pair(&a, &b)?;
        let pure = self.pure(refrigerant)?;

        // Keep the domain contract independent of CoolProp's own messages.
        let envelope = self.envelope(pure)?;
        envelope.check(&a, &b, |p| self.saturation_temperature(refrigerant, p))?;

        let mut fluid = Fluid::from(pure)
            .in_state(Self::input(a)?, Self::input(b)?)
            .map_err(|e| backend_err(&format!("at {a:?}, {b:?}"), e))?;

        let p = fluid.pressure().map_err(|e| backend_err("getting pressure", e))?;
        let t = fluid.temperature().map_err(|e| backend_err("getting temperature", e))?;
        let h = fluid.enthalpy().map_err(|e| backend_err("getting enthalpy", e))?;
        let s = fluid.entropy().map_err(|e| backend_err("getting entropy", e))?;
        let rho = fluid.density().map_err(|e| backend_err("getting density", e))?;
        let quality = fluid.quality().ok().filter(|x| (0.0..=1.0).contains(x));

        let phase = match quality {
            Some(_) => Phase::TwoPhase,
            None if p >= envelope.critical.pressure => Phase::Supercritical,
            None => {
                let t_sat = self.saturation_temperature(refrigerant, p)?;
                if t < t_sat {
                    Phase::SubcooledLiquid
                } else {
                    Phase::SuperheatedVapor
                }
            }
        };
        FluidState::new(p, t, h, s, rho, quality, phase)
    }

    fn critical_point(&self, refrigerant: &RefrigerantId) -> PropertyResult<CriticalPoint> {
        Ok(self.envelope(self.pure(refrigerant)?)?.critical)
    }
}
