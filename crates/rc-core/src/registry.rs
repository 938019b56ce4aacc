//! Unit registry: per-kind canonical units and conversion functions.
//!
//! A registry maps `(QuantityKind, unit)` to a [`Conversion`] into the kind's
//! canonical unit. Lookups never guess: an unregistered spelling is
//! `UnknownUnit`, an undeclared kind is `UnknownKind`.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::OnceLock;

use crate::error::{CoreError, CoreResult};
use crate::kind::QuantityKind;
use crate::numeric::{Real, ensure_finite};

/// Registered spelling of a unit, e.g. `"kPa"` or `"°C"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct UnitId(String);

impl UnitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UnitId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for UnitId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for UnitId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for UnitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Mapping from a unit into its kind's canonical unit.
#[derive(Clone, Copy, Debug)]
pub enum Conversion {
    /// `canonical = value * scale + offset`.
    Affine { scale: Real, offset: Real },
    /// Arbitrary pure pair; `from_canonical` must invert `to_canonical`.
    Custom {
        to_canonical: fn(Real) -> Real,
        from_canonical: fn(Real) -> Real,
    },
}

impl Conversion {
    pub const IDENTITY: Conversion = Conversion::Affine {
        scale: 1.0,
        offset: 0.0,
    };

    pub fn linear(scale: Real) -> Self {
        Conversion::Affine { scale, offset: 0.0 }
    }

    pub fn affine(scale: Real, offset: Real) -> Self {
        Conversion::Affine { scale, offset }
    }

    pub fn to_canonical(&self, value: Real) -> Real {
        match *self {
            Conversion::Affine { scale, offset } => value * scale + offset,
            Conversion::Custom { to_canonical, .. } => to_canonical(value),
        }
    }

    pub fn from_canonical(&self, value: Real) -> Real {
        match *self {
            Conversion::Affine { scale, offset } => (value - offset) / scale,
            Conversion::Custom { from_canonical, .. } => from_canonical(value),
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    fn check(&self) -> CoreResult<()> {
        if let Conversion::Affine { scale, offset } = *self {
            ensure_finite(scale, "conversion scale")?;
            ensure_finite(offset, "conversion offset")?;
            if scale == 0.0 {
                return Err(CoreError::InvalidArg {
                    what: "conversion scale must be non-zero",
                });
            }
        }
        Ok(())
    }
}

impl PartialEq for Conversion {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Conversion::Affine { scale: a, offset: b },
                Conversion::Affine { scale: c, offset: d },
            ) => a.to_bits() == c.to_bits() && b.to_bits() == d.to_bits(),
            (
                Conversion::Custom {
                    to_canonical: a,
                    from_canonical: b,
                },
                Conversion::Custom {
                    to_canonical: c,
                    from_canonical: d,
                },
            ) => std::ptr::fn_addr_eq(*a, *c) && std::ptr::fn_addr_eq(*b, *d),
            _ => false,
        }
    }
}

#[derive(Clone, Debug)]
struct KindTable {
    canonical: UnitId,
    order: Vec<UnitId>,
    units: HashMap<UnitId, Conversion>,
    aliases: HashMap<String, UnitId>,
}

impl KindTable {
    fn new(canonical: UnitId) -> Self {
        let mut units = HashMap::new();
        units.insert(canonical.clone(), Conversion::IDENTITY);
        Self {
            order: vec![canonical.clone()],
            canonical,
            units,
            aliases: HashMap::new(),
        }
    }

    fn lookup(&self, unit: &str) -> Option<(&UnitId, Conversion)> {
        let key = match self.aliases.get(unit) {
            Some(primary) => primary,
            None => self.units.get_key_value(unit).map(|(k, _)| k)?,
        };
        self.units.get(key).map(|conv| (key, *conv))
    }
}

/// Table of quantity kinds, their canonical units and every registered unit.
///
/// Mutation is only expected during startup; afterwards the registry is shared
/// read-only (see [`install_global`]).
#[derive(Clone, Debug, Default)]
pub struct UnitRegistry {
    kinds: BTreeMap<QuantityKind, KindTable>,
    version: u64,
}

impl UnitRegistry {
    /// Empty registry without any kinds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the standard refrigeration unit table.
    pub fn with_builtin_units() -> Self {
        let mut reg = Self::new();
        builtin::populate(&mut reg);
        reg
    }

    /// Monotonic stamp bumped on every successful mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn register_kind(&mut self, kind: QuantityKind, canonical: impl Into<UnitId>) -> CoreResult<()> {
        let canonical = canonical.into();
        match self.kinds.get(&kind) {
            Some(table) if table.canonical == canonical => Ok(()),
            Some(_) => Err(CoreError::ConflictingDefinition {
                kind,
                unit: canonical.0,
            }),
            None => {
                self.kinds.insert(kind, KindTable::new(canonical));
                self.version += 1;
                Ok(())
            }
        }
    }

    pub fn register_unit(
        &mut self,
        kind: QuantityKind,
        unit: impl Into<UnitId>,
        conversion: Conversion,
    ) -> CoreResult<()> {
        let unit = unit.into();
        conversion.check()?;
        let table = self
            .kinds
            .get_mut(&kind)
            .ok_or(CoreError::UnknownKind { kind })?;

        if table.aliases.contains_key(unit.as_str()) {
            return Err(CoreError::ConflictingDefinition { kind, unit: unit.0 });
        }
        match table.units.get(&unit) {
            Some(existing) if *existing == conversion => Ok(()),
            Some(_) => Err(CoreError::ConflictingDefinition { kind, unit: unit.0 }),
            None => {
                table.order.push(unit.clone());
                table.units.insert(unit, conversion);
                self.version += 1;
                Ok(())
            }
        }
    }

    /// Extra spelling for an already registered unit.
    pub fn register_alias(
        &mut self,
        kind: QuantityKind,
        alias: &str,
        unit: &str,
    ) -> CoreResult<()> {
        let table = self
            .kinds
            .get_mut(&kind)
            .ok_or(CoreError::UnknownKind { kind })?;
        let (target, _) = table.lookup(unit).ok_or_else(|| CoreError::UnknownUnit {
            kind,
            unit: unit.to_owned(),
        })?;
        let target = target.clone();

        if table.units.contains_key(alias) {
            return if alias == target.as_str() {
                Ok(())
            } else {
                Err(CoreError::ConflictingDefinition {
                    kind,
                    unit: alias.to_owned(),
                })
            };
        }
        match table.aliases.get(alias) {
            Some(existing) if *existing == target => Ok(()),
            Some(_) => Err(CoreError::ConflictingDefinition {
                kind,
                unit: alias.to_owned(),
            }),
            None => {
                table.aliases.insert(alias.to_owned(), target);
                self.version += 1;
                Ok(())
            }
        }
    }

    pub fn has_kind(&self, kind: QuantityKind) -> bool {
        self.kinds.contains_key(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = QuantityKind> + '_ {
        self.kinds.keys().copied()
    }

    pub fn canonical_unit(&self, kind: QuantityKind) -> CoreResult<&UnitId> {
        self.table(kind).map(|t| &t.canonical)
    }

    /// Registered primary units of `kind`, canonical first, in registration order.
    pub fn units(&self, kind: QuantityKind) -> CoreResult<&[UnitId]> {
        self.table(kind).map(|t| t.order.as_slice())
    }

    /// Primary spelling for `unit` (resolves aliases).
    pub fn resolve(&self, kind: QuantityKind, unit: &str) -> CoreResult<&UnitId> {
        self.entry(kind, unit).map(|(id, _)| id)
    }

    pub fn conversion(&self, kind: QuantityKind, unit: &str) -> CoreResult<Conversion> {
        self.entry(kind, unit).map(|(_, conv)| conv)
    }

    pub fn to_canonical(&self, value: Real, kind: QuantityKind, unit: &str) -> CoreResult<Real> {
        let conv = self.conversion(kind, unit)?;
        ensure_finite(value, "unit conversion input")?;
        ensure_finite(conv.to_canonical(value), "unit conversion result")
    }

    pub fn from_canonical(&self, value: Real, kind: QuantityKind, unit: &str) -> CoreResult<Real> {
        let conv = self.conversion(kind, unit)?;
        ensure_finite(value, "unit conversion input")?;
        ensure_finite(conv.from_canonical(value), "unit conversion result")
    }

    /// Convert between any two units of the same kind, via the canonical unit.
    pub fn convert(&self, value: Real, kind: QuantityKind, from: &str, to: &str) -> CoreResult<Real> {
        let (from_id, from_conv) = self.entry(kind, from)?;
        let (to_id, to_conv) = self.entry(kind, to)?;
        ensure_finite(value, "unit conversion input")?;
        if from_id == to_id {
            return Ok(value);
        }
        let canonical = from_conv.to_canonical(value);
        ensure_finite(to_conv.from_canonical(canonical), "unit conversion result")
    }

    fn table(&self, kind: QuantityKind) -> CoreResult<&KindTable> {
        self.kinds.get(&kind).ok_or(CoreError::UnknownKind { kind })
    }

    fn entry(&self, kind: QuantityKind, unit: &str) -> CoreResult<(&UnitId, Conversion)> {
        self.table(kind)?
            .lookup(unit)
            .ok_or_else(|| CoreError::UnknownUnit {
                kind,
                unit: unit.to_owned(),
            })
    }

    // Infallible inserts for the builtin table, which is consistent by construction.
    fn define_kind(&mut self, kind: QuantityKind, canonical: &str) {
        self.kinds
            .entry(kind)
            .or_insert_with(|| KindTable::new(UnitId::from(canonical)));
        self.version += 1;
    }

    fn define_unit(&mut self, kind: QuantityKind, unit: &str, conversion: Conversion) {
        if let Some(table) = self.kinds.get_mut(&kind) {
            let id = UnitId::from(unit);
            if table.units.insert(id.clone(), conversion).is_none() {
                table.order.push(id);
            }
            self.version += 1;
        }
    }

    fn define_alias(&mut self, kind: QuantityKind, alias: &str, unit: &str) {
        if let Some(table) = self.kinds.get_mut(&kind) {
            table.aliases.insert(alias.to_owned(), UnitId::from(unit));
            self.version += 1;
        }
    }
}

static GLOBAL: OnceLock<UnitRegistry> = OnceLock::new();

/// Install the process-wide registry. Fails if one is already in place,
/// including the builtin one installed lazily by [`global`].
pub fn install_global(registry: UnitRegistry) -> CoreResult<&'static UnitRegistry> {
    GLOBAL
        .set(registry)
        .map_err(|_| CoreError::RegistryAlreadyInstalled)?;
    Ok(global())
}

/// Process-wide registry; installs the builtin table on first access.
pub fn global() -> &'static UnitRegistry {
    GLOBAL.get_or_init(UnitRegistry::with_builtin_units)
}

mod builtin {
    use uom::si::f64::{Power, Pressure, ThermodynamicTemperature};
    use uom::si::{power, pressure, thermodynamic_temperature as tt};

    use super::{Conversion, UnitRegistry};
    use crate::kind::QuantityKind as K;
    use crate::units::constants::P_ATM_PA as ATM_PA;

    const PSI_PA: f64 = 6_894.757_293_168;
    const LB_KG: f64 = 0.453_592_37;
    const BTU_J: f64 = 1_055.055_852_62;
    const FT3_M3: f64 = 0.028_316_846_592;
    const HP_W: f64 = 745.699_871_582_270_2;

    fn psig_to_pa(v: f64) -> f64 {
        v * PSI_PA + ATM_PA
    }

    fn pa_to_psig(v: f64) -> f64 {
        (v - ATM_PA) / PSI_PA
    }

    fn temperature_affine(zero: ThermodynamicTemperature, one: ThermodynamicTemperature) -> Conversion {
        Conversion::affine(one.value - zero.value, zero.value)
    }

    pub(super) fn populate(reg: &mut UnitRegistry) {
        reg.define_kind(K::Pressure, "Pa");
        reg.define_unit(K::Pressure, "kPa", Conversion::linear(Pressure::new::<pressure::kilopascal>(1.0).value));
        reg.define_unit(K::Pressure, "MPa", Conversion::linear(Pressure::new::<pressure::megapascal>(1.0).value));
        reg.define_unit(K::Pressure, "bar", Conversion::linear(Pressure::new::<pressure::bar>(1.0).value));
        reg.define_unit(K::Pressure, "mbar", Conversion::linear(100.0));
        reg.define_unit(K::Pressure, "atm", Conversion::linear(ATM_PA));
        reg.define_unit(K::Pressure, "psia", Conversion::linear(PSI_PA));
        reg.define_unit(
            K::Pressure,
            "psig",
            Conversion::Custom {
                to_canonical: psig_to_pa,
                from_canonical: pa_to_psig,
            },
        );
        reg.define_alias(K::Pressure, "psi", "psia");

        reg.define_kind(K::Temperature, "K");
        reg.define_unit(K::Temperature, "°C", temperature_affine(
                ThermodynamicTemperature::new::<tt::degree_celsius>(0.0),
                ThermodynamicTemperature::new::<tt::degree_celsius>(1.0),
            ));
        reg.define_unit(K::Temperature, "°F", temperature_affine(
                ThermodynamicTemperature::new::<tt::degree_fahrenheit>(0.0),
                ThermodynamicTemperature::new::<tt::degree_fahrenheit>(1.0),
            ));
        reg.define_unit(K::Temperature, "°R", temperature_affine(
                ThermodynamicTemperature::new::<tt::degree_rankine>(0.0),
                ThermodynamicTemperature::new::<tt::degree_rankine>(1.0),
            ));
        reg.define_alias(K::Temperature, "degC", "°C");
        reg.define_alias(K::Temperature, "C", "°C");
        reg.define_alias(K::Temperature, "degF", "°F");
        reg.define_alias(K::Temperature, "F", "°F");
        reg.define_alias(K::Temperature, "degR", "°R");

        reg.define_kind(K::TemperatureDifference, "K");
        reg.define_unit(K::TemperatureDifference, "°C", Conversion::IDENTITY);
        reg.define_unit(K::TemperatureDifference, "°F", Conversion::linear(5.0 / 9.0));
        reg.define_unit(K::TemperatureDifference, "°R", Conversion::linear(5.0 / 9.0));
        reg.define_alias(K::TemperatureDifference, "degC", "°C");
        reg.define_alias(K::TemperatureDifference, "degF", "°F");
        reg.define_alias(K::TemperatureDifference, "degR", "°R");

        reg.define_kind(K::SpecificEnthalpy, "J/kg");
        reg.define_unit(K::SpecificEnthalpy, "kJ/kg", Conversion::linear(1e3));
        reg.define_unit(K::SpecificEnthalpy, "BTU/lb", Conversion::linear(BTU_J / LB_KG));

        reg.define_kind(K::SpecificEntropy, "J/(kg·K)");
        reg.define_unit(K::SpecificEntropy, "kJ/(kg·K)", Conversion::linear(1e3));
        reg.define_unit(
            K::SpecificEntropy,
            "BTU/(lb·°R)",
            Conversion::linear(BTU_J / LB_KG * 9.0 / 5.0),
        );
        reg.define_alias(K::SpecificEntropy, "J/kg/K", "J/(kg·K)");
        reg.define_alias(K::SpecificEntropy, "kJ/kg/K", "kJ/(kg·K)");

        reg.define_kind(K::MassFlow, "kg/s");
        reg.define_unit(K::MassFlow, "kg/h", Conversion::linear(1.0 / 3600.0));
        reg.define_unit(K::MassFlow, "g/s", Conversion::linear(1e-3));
        reg.define_unit(K::MassFlow, "lb/h", Conversion::linear(LB_KG / 3600.0));
        reg.define_unit(K::MassFlow, "lb/min", Conversion::linear(LB_KG / 60.0));

        reg.define_kind(K::Power, "W");
        reg.define_unit(K::Power, "kW", Conversion::linear(Power::new::<power::kilowatt>(1.0).value));
        reg.define_unit(K::Power, "MW", Conversion::linear(Power::new::<power::megawatt>(1.0).value));
        reg.define_unit(K::Power, "BTU/h", Conversion::linear(BTU_J / 3600.0));
        reg.define_unit(K::Power, "TR", Conversion::linear(12_000.0 * BTU_J / 3600.0));
        reg.define_unit(K::Power, "hp", Conversion::linear(HP_W));

        reg.define_kind(K::Density, "kg/m³");
        reg.define_unit(K::Density, "g/L", Conversion::IDENTITY);
        reg.define_unit(K::Density, "lb/ft³", Conversion::linear(LB_KG / FT3_M3));
        reg.define_alias(K::Density, "kg/m3", "kg/m³");

        reg.define_kind(K::VolumetricFlow, "m³/s");
        reg.define_unit(K::VolumetricFlow, "m³/h", Conversion::linear(1.0 / 3600.0));
        reg.define_unit(K::VolumetricFlow, "L/s", Conversion::linear(1e-3));
        reg.define_unit(K::VolumetricFlow, "CFM", Conversion::linear(FT3_M3 / 60.0));
        reg.define_alias(K::VolumetricFlow, "m3/s", "m³/s");
        reg.define_alias(K::VolumetricFlow, "m3/h", "m³/h");

        for kind in [K::Efficiency, K::Quality, K::Dimensionless] {
            reg.define_kind(kind, "1");
            reg.define_unit(kind, "%", Conversion::linear(0.01));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{Tolerances, nearly_equal};

    fn close(a: f64, b: f64) -> bool {
        nearly_equal(a, b, Tolerances::conversion())
    }

    #[test]
    fn builtin_table_covers_every_kind() {
        let reg = UnitRegistry::with_builtin_units();
        for kind in QuantityKind::ALL {
            assert!(reg.has_kind(kind), "missing {kind}");
            let canonical = reg.canonical_unit(kind).unwrap();
            assert_eq!(reg.units(kind).unwrap()[0], *canonical);
        }
    }

    #[test]
    fn pressure_and_temperature_factors() {
        let reg = UnitRegistry::with_builtin_units();
        assert!(close(reg.to_canonical(1.0, QuantityKind::Pressure, "bar").unwrap(), 1e5));
        assert!(close(reg.to_canonical(250.0, QuantityKind::Pressure, "kPa").unwrap(), 250e3));
        assert!(close(reg.to_canonical(0.0, QuantityKind::Temperature, "°C").unwrap(), 273.15));
        assert!(close(reg.to_canonical(32.0, QuantityKind::Temperature, "°F").unwrap(), 273.15));
        assert!(close(
            reg.convert(212.0, QuantityKind::Temperature, "degF", "degC").unwrap(),
            100.0
        ));
        let atm = crate::units::constants::P_ATM_PA;
        assert!(close(reg.to_canonical(0.0, QuantityKind::Pressure, "psig").unwrap(), atm));
        assert!(close(reg.to_canonical(1.0, QuantityKind::Pressure, "atm").unwrap(), atm));
        assert!(close(reg.to_canonical(1.0, QuantityKind::Power, "TR").unwrap(), 3516.852842));
    }

    #[test]
    fn temperature_difference_has_no_offset() {
        let reg = UnitRegistry::with_builtin_units();
        let v = reg
            .to_canonical(9.0, QuantityKind::TemperatureDifference, "°F")
            .unwrap();
        assert!(close(v, 5.0));
        assert_eq!(
            reg.to_canonical(5.0, QuantityKind::TemperatureDifference, "°C").unwrap(),
            5.0
        );
    }

    #[test]
    fn unknown_unit_and_kind_are_reported() {
        let reg = UnitRegistry::with_builtin_units();
        let err = reg
            .to_canonical(1.0, QuantityKind::Pressure, "furlong")
            .unwrap_err();
        assert!(matches!(err, CoreError::UnknownUnit { kind: QuantityKind::Pressure, .. }));

        // units are registered per kind
        let err = reg.to_canonical(1.0, QuantityKind::Pressure, "°C").unwrap_err();
        assert!(matches!(err, CoreError::UnknownUnit { .. }));

        let empty = UnitRegistry::new();
        let err = empty.canonical_unit(QuantityKind::Power).unwrap_err();
        assert_eq!(err, CoreError::UnknownKind { kind: QuantityKind::Power });
    }

    #[test]
    fn conflicting_definitions_are_rejected() {
        let mut reg = UnitRegistry::with_builtin_units();
        let before = reg.version();

        // identical re-registration is idempotent
        reg.register_unit(QuantityKind::Pressure, "kPa", Conversion::linear(1e3))
            .unwrap();
        reg.register_kind(QuantityKind::Pressure, "Pa").unwrap();
        assert_eq!(reg.version(), before);

        let err = reg
            .register_unit(QuantityKind::Pressure, "kPa", Conversion::linear(1e4))
            .unwrap_err();
        assert!(matches!(err, CoreError::ConflictingDefinition { .. }));

        let err = reg.register_kind(QuantityKind::Pressure, "kPa").unwrap_err();
        assert!(matches!(err, CoreError::ConflictingDefinition { .. }));

        let err = reg
            .register_alias(QuantityKind::Temperature, "degC", "°F")
            .unwrap_err();
        assert!(matches!(err, CoreError::ConflictingDefinition { .. }));
    }

    #[test]
    fn register_unit_requires_kind_and_valid_scale() {
        let mut reg = UnitRegistry::new();
        let err = reg
            .register_unit(QuantityKind::Power, "kW", Conversion::linear(1e3))
            .unwrap_err();
        assert_eq!(err, CoreError::UnknownKind { kind: QuantityKind::Power });

        reg.register_kind(QuantityKind::Power, "W").unwrap();
        let err = reg
            .register_unit(QuantityKind::Power, "zero", Conversion::linear(0.0))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidArg { .. }));

        reg.register_unit(QuantityKind::Power, "kW", Conversion::linear(1e3))
            .unwrap();
        reg.register_alias(QuantityKind::Power, "kilowatt", "kW").unwrap();
        assert_eq!(
            reg.resolve(QuantityKind::Power, "kilowatt").unwrap().as_str(),
            "kW"
        );
        assert_eq!(reg.units(QuantityKind::Power).unwrap().len(), 2);
    }

    #[test]
    fn custom_conversions_compare_by_function() {
        fn double(v: f64) -> f64 {
            v * 2.0
        }
        fn half(v: f64) -> f64 {
            v / 2.0
        }
        let a = Conversion::Custom {
            to_canonical: double,
            from_canonical: half,
        };
        let b = Conversion::Custom {
            to_canonical: half,
            from_canonical: double,
        };
        assert_eq!(a, a);
        assert_ne!(a, b);
        assert_ne!(a, Conversion::linear(2.0));
    }

    #[test]
    fn convert_same_unit_is_exact() {
        let reg = UnitRegistry::with_builtin_units();
        let x = 0.1 + 0.2;
        assert_eq!(reg.convert(x, QuantityKind::Temperature, "°F", "degF").unwrap(), x);
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let reg = UnitRegistry::with_builtin_units();
        let err = reg
            .to_canonical(f64::NAN, QuantityKind::Pressure, "kPa")
            .unwrap_err();
        assert!(matches!(err, CoreError::NonFinite { .. }));
    }

    #[test]
    fn global_cannot_be_replaced_once_read() {
        let reg = global();
        assert!(reg.has_kind(QuantityKind::Pressure));
        let err = install_global(UnitRegistry::new()).unwrap_err();
        assert_eq!(err, CoreError::RegistryAlreadyInstalled);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::numeric::{Tolerances, nearly_equal};
    use proptest::prelude::*;

    const TOL: Tolerances = Tolerances {
        abs: 1e-6,
        rel: 1e-9,
    };

    fn unit_pairs() -> Vec<(QuantityKind, UnitId, UnitId, UnitId)> {
        let reg = UnitRegistry::with_builtin_units();
        let mut out = Vec::new();
        for kind in QuantityKind::ALL {
            let units = reg.units(kind).unwrap();
            for a in units {
                for b in units {
                    for c in units {
                        out.push((kind, a.clone(), b.clone(), c.clone()));
                    }
                }
            }
        }
        out
    }

    proptest! {
        #[test]
        fn from_canonical_inverts_to_canonical(x in -1.0e6_f64..1.0e6_f64) {
            let reg = UnitRegistry::with_builtin_units();
            for kind in QuantityKind::ALL {
                for unit in reg.units(kind).unwrap() {
                    let c = reg.to_canonical(x, kind, unit.as_str()).unwrap();
                    let back = reg.from_canonical(c, kind, unit.as_str()).unwrap();
                    prop_assert!(nearly_equal(back, x, TOL), "{kind} {unit}: {x} -> {back}");
                }
            }
        }

        #[test]
        fn conversions_compose(x in -1.0e5_f64..1.0e5_f64, pick in 0usize..10_000) {
            let pairs = unit_pairs();
            let (kind, a, b, c) = &pairs[pick % pairs.len()];
            let reg = UnitRegistry::with_builtin_units();
            let via_b = reg.convert(x, *kind, a.as_str(), b.as_str()).unwrap();
            let two_step = reg.convert(via_b, *kind, b.as_str(), c.as_str()).unwrap();
            let direct = reg.convert(x, *kind, a.as_str(), c.as_str()).unwrap();
            prop_assert!(nearly_equal(two_step, direct, TOL), "{kind} {a}->{b}->{c}");
        }
    }
}
