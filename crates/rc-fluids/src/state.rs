//! Thermodynamic state definitions.

use core::fmt;

use rc_core::units::{Density, Pressure, Temperature, k, kg_per_m3, pa};
use rc_core::{CoreResult, Quantity, QuantityKind, UnitRegistry};

use crate::error::{PropertyError, PropertyResult};

/// Specific enthalpy [J/kg].
///
/// Not part of uom's standard set, so we use f64 with clear documentation.
pub type SpecEnthalpy = f64;

/// Specific entropy [J/(kg·K)].
pub type SpecEntropy = f64;

/// Thermodynamic property that can fix (half of) a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Property {
    Pressure,
    Temperature,
    Enthalpy,
    Entropy,
    Quality,
    Density,
}

impl Property {
    pub fn kind(self) -> QuantityKind {
        match self {
            Property::Pressure => QuantityKind::Pressure,
            Property::Temperature => QuantityKind::Temperature,
            Property::Enthalpy => QuantityKind::SpecificEnthalpy,
            Property::Entropy => QuantityKind::SpecificEntropy,
            Property::Quality => QuantityKind::Quality,
            Property::Density => QuantityKind::Density,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Property::Pressure => "pressure",
            Property::Temperature => "temperature",
            Property::Enthalpy => "enthalpy",
            Property::Entropy => "entropy",
            Property::Quality => "quality",
            Property::Density => "density",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One independent state input, canonical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StateVar {
    Pressure(f64),
    Temperature(f64),
    Enthalpy(SpecEnthalpy),
    Entropy(SpecEntropy),
    Quality(f64),
    Density(f64),
}

impl StateVar {
    pub fn property(&self) -> Property {
        match self {
            StateVar::Pressure(_) => Property::Pressure,
            StateVar::Temperature(_) => Property::Temperature,
            StateVar::Enthalpy(_) => Property::Enthalpy,
            StateVar::Entropy(_) => Property::Entropy,
            StateVar::Quality(_) => Property::Quality,
            StateVar::Density(_) => Property::Density,
        }
    }

    pub fn value(&self) -> f64 {
        match *self {
            StateVar::Pressure(v)
            | StateVar::Temperature(v)
            | StateVar::Enthalpy(v)
            | StateVar::Entropy(v)
            | StateVar::Quality(v)
            | StateVar::Density(v) => v,
        }
    }

    pub fn new(property: Property, canonical: f64) -> Self {
        match property {
            Property::Pressure => StateVar::Pressure(canonical),
            Property::Temperature => StateVar::Temperature(canonical),
            Property::Enthalpy => StateVar::Enthalpy(canonical),
            Property::Entropy => StateVar::Entropy(canonical),
            Property::Quality => StateVar::Quality(canonical),
            Property::Density => StateVar::Density(canonical),
        }
    }

    /// Build from a user quantity; its kind must match `property`.
    pub fn from_quantity(
        property: Property,
        q: &Quantity,
        registry: &UnitRegistry,
    ) -> CoreResult<Self> {
        q.expect_kind(property.kind())?;
        Ok(Self::new(property, q.canonical_value(registry)?))
    }
}

/// Phase region of a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    SubcooledLiquid,
    TwoPhase,
    SuperheatedVapor,
    Supercritical,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::SubcooledLiquid => "subcooled liquid",
            Phase::TwoPhase => "two-phase",
            Phase::SuperheatedVapor => "superheated vapor",
            Phase::Supercritical => "supercritical",
        };
        f.write_str(s)
    }
}

/// Fully resolved thermodynamic state, canonical units.
#[derive(Debug, Clone, PartialEq)]
pub struct FluidState {
    p: f64,
    t: f64,
    h: SpecEnthalpy,
    s: SpecEntropy,
    rho: f64,
    quality: Option<f64>,
    phase: Phase,
}

impl FluidState {
    /// Validates that every value is finite and that p, T and rho are positive.
    pub fn new(
        pressure: f64,
        temperature: f64,
        enthalpy: SpecEnthalpy,
        entropy: SpecEntropy,
        density: f64,
        quality: Option<f64>,
        phase: Phase,
    ) -> PropertyResult<Self> {
        for (what, v) in [
            ("pressure", pressure),
            ("temperature", temperature),
            ("density", density),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(PropertyError::out_of_domain(format!(
                    "{what} must be positive and finite, got {v}"
                )));
            }
        }
        if !enthalpy.is_finite() || !entropy.is_finite() {
            return Err(PropertyError::out_of_domain("non-finite enthalpy or entropy"));
        }
        Ok(Self {
            p: pressure,
            t: temperature,
            h: enthalpy,
            s: entropy,
            rho: density,
            quality,
            phase,
        })
    }

    pub fn pressure(&self) -> Pressure {
        pa(self.p)
    }

    pub fn temperature(&self) -> Temperature {
        k(self.t)
    }

    pub fn enthalpy(&self) -> SpecEnthalpy {
        self.h
    }

    pub fn entropy(&self) -> SpecEntropy {
        self.s
    }

    pub fn density(&self) -> Density {
        kg_per_m3(self.rho)
    }

    /// Vapor mass fraction; `None` outside the two-phase dome.
    pub fn quality(&self) -> Option<f64> {
        self.quality
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Canonical value of `property`, `None` for quality outside the dome.
    pub fn get(&self, property: Property) -> Option<f64> {
        match property {
            Property::Pressure => Some(self.p),
            Property::Temperature => Some(self.t),
            Property::Enthalpy => Some(self.h),
            Property::Entropy => Some(self.s),
            Property::Quality => self.quality,
            Property::Density => Some(self.rho),
        }
    }

    pub fn quantity(&self, property: Property, registry: &UnitRegistry) -> CoreResult<Option<Quantity>> {
        self.get(property)
            .map(|v| Quantity::canonical(property.kind(), v, registry))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_valid_state() {
        let state =
            FluidState::new(2e5, 263.15, 392e3, 1732.0, 10.0, Some(1.0), Phase::TwoPhase).unwrap();
        assert_eq!(state.pressure().value, 2e5);
        assert_eq!(state.temperature().value, 263.15);
        assert_eq!(state.get(Property::Quality), Some(1.0));
    }

    #[test]
    fn reject_non_physical() {
        assert!(FluidState::new(-1.0, 300.0, 0.0, 0.0, 1.0, None, Phase::SuperheatedVapor).is_err());
        assert!(FluidState::new(1e5, 0.0, 0.0, 0.0, 1.0, None, Phase::SuperheatedVapor).is_err());
        assert!(
            FluidState::new(1e5, 300.0, f64::NAN, 0.0, 1.0, None, Phase::SuperheatedVapor).is_err()
        );
    }

    #[test]
    fn state_var_from_quantity_checks_kind() {
        let reg = UnitRegistry::with_builtin_units();
        let p = Quantity::new(2.0, QuantityKind::Pressure, "bar", &reg).unwrap();
        let var = StateVar::from_quantity(Property::Pressure, &p, &reg).unwrap();
        assert_eq!(var, StateVar::Pressure(2e5));

        let err = StateVar::from_quantity(Property::Temperature, &p, &reg).unwrap_err();
        assert!(matches!(err, rc_core::CoreError::IncompatibleKind { .. }));
    }

    #[test]
    fn quantity_accessor_is_canonical() {
        let reg = UnitRegistry::with_builtin_units();
        let state =
            FluidState::new(2e5, 300.0, 420e3, 1800.0, 8.0, None, Phase::SuperheatedVapor).unwrap();
        let t = state.quantity(Property::Temperature, &reg).unwrap().unwrap();
        assert_eq!(t.unit().as_str(), "K");
        assert!(state.quantity(Property::Quality, &reg).unwrap().is_none());
    }
}
