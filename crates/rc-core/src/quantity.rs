use core::cmp::Ordering;
use core::fmt;

use crate::error::{CoreError, CoreResult};
use crate::kind::QuantityKind;
use crate::numeric::{Real, Tolerances, ensure_finite, nearly_equal};
use crate::registry::{self, UnitId, UnitRegistry};

/// A value tagged with its physical kind and the unit it is expressed in.
///
/// The unit is always the primary spelling registered for the kind (aliases
/// are resolved at construction). Arithmetic and comparison go through the
/// canonical unit and require equal kinds.
///
/// `==` compares canonical values of the process-wide registry within
/// [`Tolerances::conversion`], so `1 bar == 100 kPa`. Use [`Quantity::approx_eq`]
/// to compare against another registry or tolerance. Deserialized values are
/// resolved against the process-wide registry as well.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawQuantity"))]
pub struct Quantity {
    value: Real,
    kind: QuantityKind,
    unit: UnitId,
}

impl Quantity {
    pub fn new(
        value: Real,
        kind: QuantityKind,
        unit: &str,
        registry: &UnitRegistry,
    ) -> CoreResult<Self> {
        let unit = registry.resolve(kind, unit)?.clone();
        let value = ensure_finite(value, "quantity value")?;
        Ok(Self { value, kind, unit })
    }

    /// Quantity already expressed in the kind's canonical unit.
    pub fn canonical(kind: QuantityKind, value: Real, registry: &UnitRegistry) -> CoreResult<Self> {
        let unit = registry.canonical_unit(kind)?.clone();
        let value = ensure_finite(value, "quantity value")?;
        Ok(Self { value, kind, unit })
    }

    /// Parse text such as `"250 kPa"` or `"-10°C"`. A bare number is taken in
    /// the canonical unit.
    pub fn parse(text: &str, kind: QuantityKind, registry: &UnitRegistry) -> CoreResult<Self> {
        let (value, unit) = split_value_and_unit(text)?;
        if unit.is_empty() {
            Self::canonical(kind, value, registry)
        } else {
            Self::new(value, kind, unit, registry)
        }
    }

    pub fn value(&self) -> Real {
        self.value
    }

    pub fn kind(&self) -> QuantityKind {
        self.kind
    }

    pub fn unit(&self) -> &UnitId {
        &self.unit
    }

    pub fn convert_to(&self, registry: &UnitRegistry, target: &str) -> CoreResult<Self> {
        let unit = registry.resolve(self.kind, target)?.clone();
        let value = registry.convert(self.value, self.kind, self.unit.as_str(), unit.as_str())?;
        Ok(Self {
            value,
            kind: self.kind,
            unit,
        })
    }

    pub fn to_canonical(&self, registry: &UnitRegistry) -> CoreResult<Self> {
        let unit = registry.canonical_unit(self.kind)?.clone();
        let value = registry.to_canonical(self.value, self.kind, self.unit.as_str())?;
        Ok(Self {
            value,
            kind: self.kind,
            unit,
        })
    }

    pub fn canonical_value(&self, registry: &UnitRegistry) -> CoreResult<Real> {
        registry.to_canonical(self.value, self.kind, self.unit.as_str())
    }

    /// Fails with `IncompatibleKind` unless `kind` matches.
    pub fn expect_kind(&self, kind: QuantityKind) -> CoreResult<()> {
        if self.kind == kind {
            Ok(())
        } else {
            Err(CoreError::IncompatibleKind {
                expected: kind,
                found: self.kind,
            })
        }
    }

    /// Sum computed in canonical space, expressed in `self`'s unit.
    pub fn add(&self, other: &Quantity, registry: &UnitRegistry) -> CoreResult<Self> {
        self.combine(other, registry, |a, b| a + b)
    }

    /// Difference computed in canonical space, expressed in `self`'s unit.
    pub fn sub(&self, other: &Quantity, registry: &UnitRegistry) -> CoreResult<Self> {
        self.combine(other, registry, |a, b| a - b)
    }

    /// Multiply the canonical value by `factor`; the unit is kept.
    pub fn scale(&self, factor: Real, registry: &UnitRegistry) -> CoreResult<Self> {
        ensure_finite(factor, "scale factor")?;
        let canonical = self.canonical_value(registry)? * factor;
        let value = registry.from_canonical(canonical, self.kind, self.unit.as_str())?;
        Ok(Self {
            value,
            kind: self.kind,
            unit: self.unit.clone(),
        })
    }

    pub fn approx_eq(
        &self,
        other: &Quantity,
        registry: &UnitRegistry,
        tol: Tolerances,
    ) -> CoreResult<bool> {
        let (a, b) = self.canonical_pair(other, registry)?;
        Ok(nearly_equal(a, b, tol))
    }

    pub fn compare(&self, other: &Quantity, registry: &UnitRegistry) -> CoreResult<Ordering> {
        let (a, b) = self.canonical_pair(other, registry)?;
        Ok(a.total_cmp(&b))
    }

    fn canonical_pair(&self, other: &Quantity, registry: &UnitRegistry) -> CoreResult<(Real, Real)> {
        other.expect_kind(self.kind)?;
        Ok((
            self.canonical_value(registry)?,
            other.canonical_value(registry)?,
        ))
    }

    fn combine(
        &self,
        other: &Quantity,
        registry: &UnitRegistry,
        op: impl Fn(Real, Real) -> Real,
    ) -> CoreResult<Self> {
        let (a, b) = self.canonical_pair(other, registry)?;
        let canonical = ensure_finite(op(a, b), "quantity arithmetic")?;
        let value = registry.from_canonical(canonical, self.kind, self.unit.as_str())?;
        Ok(Self {
            value,
            kind: self.kind,
            unit: self.unit.clone(),
        })
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        if self.kind != other.kind {
            return false;
        }
        if self.unit == other.unit {
            return nearly_equal(self.value, other.value, Tolerances::conversion());
        }
        self.approx_eq(other, registry::global(), Tolerances::conversion())
            .unwrap_or(false)
    }
}

/// Wire form of a [`Quantity`] before its unit is resolved.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawQuantity {
    value: Real,
    kind: QuantityKind,
    unit: String,
}

#[cfg(feature = "serde")]
impl TryFrom<RawQuantity> for Quantity {
    type Error = CoreError;

    fn try_from(raw: RawQuantity) -> CoreResult<Self> {
        Quantity::new(raw.value, raw.kind, &raw.unit, registry::global())
    }
}

fn split_value_and_unit(input: &str) -> CoreResult<(Real, &str)> {
    let trimmed = input.trim();
    let split_idx = trimmed
        .find(|c: char| !c.is_ascii_digit() && !matches!(c, '.' | '-' | '+' | 'e' | 'E'))
        .unwrap_or(trimmed.len());
    let (num, unit) = trimmed.split_at(split_idx);
    let value = num.trim().parse::<Real>().map_err(|_| CoreError::Parse {
        input: input.to_owned(),
    })?;
    Ok((value, unit.trim()))
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(p) => write!(f, "{:.*} {}", p, self.value, self.unit),
            None => write!(f, "{} {}", self.value, self.unit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reg() -> UnitRegistry {
        UnitRegistry::with_builtin_units()
    }

    #[test]
    fn new_resolves_aliases_and_rejects_nan() {
        let reg = reg();
        let t = Quantity::new(25.0, QuantityKind::Temperature, "degC", &reg).unwrap();
        assert_eq!(t.unit().as_str(), "°C");
        assert_eq!(t.to_string(), "25 °C");

        let err = Quantity::new(f64::INFINITY, QuantityKind::Pressure, "Pa", &reg).unwrap_err();
        assert!(matches!(err, CoreError::NonFinite { .. }));
    }

    #[test]
    fn convert_to_produces_new_value() {
        let reg = reg();
        let p = Quantity::new(2.5, QuantityKind::Pressure, "bar", &reg).unwrap();
        let kpa = p.convert_to(&reg, "kPa").unwrap();
        assert_relative_eq!(kpa.value(), 250.0, max_relative = 1e-12);
        assert_eq!(p.value(), 2.5);
        assert_relative_eq!(p.canonical_value(&reg).unwrap(), 250_000.0, max_relative = 1e-12);
    }

    #[test]
    fn arithmetic_happens_in_canonical_space() {
        let reg = reg();
        let a = Quantity::new(1.0, QuantityKind::Power, "kW", &reg).unwrap();
        let b = Quantity::new(500.0, QuantityKind::Power, "W", &reg).unwrap();
        let sum = a.add(&b, &reg).unwrap();
        assert_eq!(sum.unit().as_str(), "kW");
        assert_relative_eq!(sum.value(), 1.5, max_relative = 1e-12);
        let diff = b.sub(&a, &reg).unwrap();
        assert_relative_eq!(diff.value(), -500.0, max_relative = 1e-12);

        let t = Quantity::new(0.0, QuantityKind::Temperature, "°C", &reg).unwrap();
        let doubled = t.scale(2.0, &reg).unwrap();
        assert_relative_eq!(doubled.value(), 273.15, max_relative = 1e-12);
    }

    #[test]
    fn cross_kind_operations_fail() {
        let reg = reg();
        let p = Quantity::new(1.0, QuantityKind::Pressure, "bar", &reg).unwrap();
        let t = Quantity::new(300.0, QuantityKind::Temperature, "K", &reg).unwrap();
        let expected = CoreError::IncompatibleKind {
            expected: QuantityKind::Pressure,
            found: QuantityKind::Temperature,
        };
        assert_eq!(p.add(&t, &reg).unwrap_err(), expected);
        assert_eq!(p.sub(&t, &reg).unwrap_err(), expected);
        assert_eq!(p.compare(&t, &reg).unwrap_err(), expected);
        assert_eq!(
            p.approx_eq(&t, &reg, Tolerances::default()).unwrap_err(),
            expected
        );
    }

    #[test]
    fn temperature_and_difference_do_not_mix() {
        let reg = reg();
        let t = Quantity::new(10.0, QuantityKind::Temperature, "°C", &reg).unwrap();
        let dt = Quantity::new(5.0, QuantityKind::TemperatureDifference, "K", &reg).unwrap();
        assert!(matches!(
            t.add(&dt, &reg),
            Err(CoreError::IncompatibleKind { .. })
        ));
    }

    #[test]
    fn comparison_across_units() {
        let reg = reg();
        let f = Quantity::new(212.0, QuantityKind::Temperature, "°F", &reg).unwrap();
        let c = Quantity::new(100.0, QuantityKind::Temperature, "°C", &reg).unwrap();
        assert!(f.approx_eq(&c, &reg, Tolerances::conversion()).unwrap());
        let warmer = Quantity::new(101.0, QuantityKind::Temperature, "°C", &reg).unwrap();
        assert_eq!(f.compare(&warmer, &reg).unwrap(), Ordering::Less);
    }

    #[test]
    fn equality_is_canonical_not_textual() {
        let reg = reg();
        let bar = Quantity::new(1.0, QuantityKind::Pressure, "bar", &reg).unwrap();
        let kpa = Quantity::new(100.0, QuantityKind::Pressure, "kPa", &reg).unwrap();
        assert_eq!(bar, kpa);

        let f = Quantity::new(212.0, QuantityKind::Temperature, "°F", &reg).unwrap();
        let c = Quantity::new(100.0, QuantityKind::Temperature, "°C", &reg).unwrap();
        assert_eq!(f, c);

        let more = Quantity::new(100.1, QuantityKind::Pressure, "kPa", &reg).unwrap();
        assert_ne!(bar, more);

        // Same number, different kind.
        let k = Quantity::new(1.0, QuantityKind::TemperatureDifference, "K", &reg).unwrap();
        let t = Quantity::new(1.0, QuantityKind::Temperature, "K", &reg).unwrap();
        assert_ne!(k, t);
    }

    #[test]
    fn parse_splits_value_and_unit() {
        let reg = reg();
        let p = Quantity::parse("250 kPa", QuantityKind::Pressure, &reg).unwrap();
        assert_eq!(p.value(), 250.0);
        assert_eq!(p.unit().as_str(), "kPa");

        let t = Quantity::parse("-10°C", QuantityKind::Temperature, &reg).unwrap();
        assert_eq!(t.value(), -10.0);
        assert_eq!(t.unit().as_str(), "°C");

        let bare = Quantity::parse("0.05", QuantityKind::MassFlow, &reg).unwrap();
        assert_eq!(bare.unit().as_str(), "kg/s");

        assert!(matches!(
            Quantity::parse("abc", QuantityKind::Pressure, &reg),
            Err(CoreError::Parse { .. })
        ));
        assert!(matches!(
            Quantity::parse("3 parsec", QuantityKind::Pressure, &reg),
            Err(CoreError::UnknownUnit { .. })
        ));
    }

    #[test]
    fn display_honours_precision() {
        let reg = reg();
        let h = Quantity::new(412.345, QuantityKind::SpecificEnthalpy, "kJ/kg", &reg).unwrap();
        assert_eq!(format!("{h:.1}"), "412.3 kJ/kg");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_resolves_units() {
        let q: Quantity =
            serde_json::from_str(r#"{"value": 25.0, "kind": "temperature", "unit": "degC"}"#).unwrap();
        assert_eq!(q.unit().as_str(), "°C");
        assert_relative_eq!(q.canonical_value(registry::global()).unwrap(), 298.15, max_relative = 1e-12);

        let unknown = serde_json::from_str::<Quantity>(
            r#"{"value": 1.0, "kind": "pressure", "unit": "parsec"}"#,
        );
        assert!(unknown.is_err());
    }
}
