//! Named canonical parameters with declared kind and bounds.

use crate::error::{CoreError, CoreResult};
use crate::kind::QuantityKind;
use crate::numeric::{Real, ensure_finite};

/// Admissible canonical range of a parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Real,
    pub max: Real,
    /// When set, `min` itself is rejected.
    pub min_exclusive: bool,
}

impl Bounds {
    pub const ANY: Bounds = Bounds {
        min: Real::NEG_INFINITY,
        max: Real::INFINITY,
        min_exclusive: false,
    };

    pub const NON_NEGATIVE: Bounds = Bounds {
        min: 0.0,
        max: Real::INFINITY,
        min_exclusive: false,
    };

    pub const POSITIVE: Bounds = Bounds {
        min: 0.0,
        max: Real::INFINITY,
        min_exclusive: true,
    };

    /// `(0, 1]`
    pub const FRACTION: Bounds = Bounds {
        min: 0.0,
        max: 1.0,
        min_exclusive: true,
    };

    pub fn contains(&self, v: Real) -> bool {
        let above = if self.min_exclusive {
            v > self.min
        } else {
            v >= self.min
        };
        above && v <= self.max
    }
}

/// Declaration of one parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: QuantityKind,
    pub bounds: Bounds,
    pub default: Option<Real>,
}

impl ParamSpec {
    pub const fn new(name: &'static str, kind: QuantityKind) -> Self {
        Self {
            name,
            kind,
            bounds: Bounds::ANY,
            default: None,
        }
    }

    pub const fn bounded(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub const fn with_default(mut self, default: Real) -> Self {
        self.default = Some(default);
        self
    }
}

/// Canonical parameter values for one object, keyed by its spec table.
///
/// Reads are public; writes are reserved to this crate so that every value
/// enters through [`UnitNormalizer`](crate::UnitNormalizer).
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterStore {
    specs: &'static [ParamSpec],
    values: Vec<Option<Real>>,
}

impl ParameterStore {
    /// Store populated with each spec's default.
    pub fn new(specs: &'static [ParamSpec]) -> Self {
        Self {
            specs,
            values: specs.iter().map(|s| s.default).collect(),
        }
    }

    /// Read-only store filled from already canonical values, e.g. post-solve
    /// figures. Names, finiteness and bounds are still checked.
    pub fn from_canonical<'a>(
        specs: &'static [ParamSpec],
        values: impl IntoIterator<Item = (&'a str, Real)>,
    ) -> CoreResult<Self> {
        let mut store = Self::new(specs);
        for (name, value) in values {
            store.set(name, value)?;
        }
        Ok(store)
    }

    pub fn specs(&self) -> &'static [ParamSpec] {
        self.specs
    }

    pub fn spec(&self, name: &str) -> CoreResult<&'static ParamSpec> {
        let specs: &'static [ParamSpec] = self.specs;
        specs
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| CoreError::UnknownParameter {
                name: name.to_owned(),
            })
    }

    /// Canonical value, `None` when unset and without default.
    pub fn get(&self, name: &str) -> Option<Real> {
        self.position(name).and_then(|i| self.values[i])
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// `(spec, value)` for every parameter that currently holds a value.
    pub fn iter(&self) -> impl Iterator<Item = (&'static ParamSpec, Real)> + '_ {
        let specs: &'static [ParamSpec] = self.specs;
        specs
            .iter()
            .zip(self.values.iter())
            .filter_map(|(s, v)| v.map(|v| (s, v)))
    }

    pub(crate) fn set(&mut self, name: &str, value: Real) -> CoreResult<()> {
        let idx = self.index_of(name)?;
        let spec = &self.specs[idx];
        let value = ensure_finite(value, "parameter value")?;
        if !spec.bounds.contains(value) {
            return Err(CoreError::ParameterOutOfBounds {
                name: name.to_owned(),
                value,
                min: spec.bounds.min,
                max: spec.bounds.max,
            });
        }
        self.values[idx] = Some(value);
        Ok(())
    }

    /// Reset to the declared default.
    pub(crate) fn clear(&mut self, name: &str) -> CoreResult<()> {
        let idx = self.index_of(name)?;
        self.values[idx] = self.specs[idx].default;
        Ok(())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.specs.iter().position(|s| s.name == name)
    }

    fn index_of(&self, name: &str) -> CoreResult<usize> {
        self.position(name).ok_or_else(|| CoreError::UnknownParameter {
            name: name.to_owned(),
        })
    }
}

/// Anything carrying a [`ParameterStore`].
pub trait Parameterized {
    fn parameters(&self) -> &ParameterStore;
    fn parameters_mut(&mut self) -> &mut ParameterStore;
}

#[cfg(test)]
mod tests {
    use super::*;

    static SPECS: &[ParamSpec] = &[
        ParamSpec::new("efficiency", QuantityKind::Efficiency)
            .bounded(Bounds::FRACTION)
            .with_default(0.7),
        ParamSpec::new("pressure", QuantityKind::Pressure).bounded(Bounds::POSITIVE),
    ];

    #[test]
    fn defaults_are_applied() {
        let store = ParameterStore::new(SPECS);
        assert_eq!(store.get("efficiency"), Some(0.7));
        assert_eq!(store.get("pressure"), None);
        assert_eq!(store.get("nonexistent"), None);
        assert_eq!(store.iter().count(), 1);
    }

    #[test]
    fn set_checks_bounds_and_names() {
        let mut store = ParameterStore::new(SPECS);
        store.set("pressure", 1e5).unwrap();
        assert!(store.is_set("pressure"));

        let err = store.set("efficiency", 0.0).unwrap_err();
        assert!(matches!(err, CoreError::ParameterOutOfBounds { .. }));
        store.set("efficiency", 1.0).unwrap();

        let err = store.set("rpm", 1.0).unwrap_err();
        assert_eq!(
            err,
            CoreError::UnknownParameter {
                name: "rpm".into()
            }
        );

        store.clear("efficiency").unwrap();
        assert_eq!(store.get("efficiency"), Some(0.7));
    }

    #[test]
    fn from_canonical_validates() {
        let store = ParameterStore::from_canonical(SPECS, [("pressure", 2e5)]).unwrap();
        assert_eq!(store.get("pressure"), Some(2e5));
        assert!(ParameterStore::from_canonical(SPECS, [("pressure", -1.0)]).is_err());
    }
}
