//! Unit boundary between user-facing quantities and canonical parameter stores.
//!
//! Every value written into a [`ParameterStore`] passes through
//! [`UnitNormalizer::set_parameter`], and every value shown to a user leaves
//! through [`UnitNormalizer::get_parameter`] or [`UnitNormalizer::display`].
//! Registry and quantity errors are returned as-is.

use crate::error::CoreResult;
use crate::kind::QuantityKind;
use crate::numeric::Real;
use crate::params::Parameterized;
use crate::quantity::Quantity;
use crate::registry::{self, UnitRegistry};

#[derive(Clone, Copy, Debug)]
pub struct UnitNormalizer<'r> {
    registry: &'r UnitRegistry,
}

impl UnitNormalizer<'static> {
    /// Normalizer over the process-wide registry.
    pub fn global() -> Self {
        Self {
            registry: registry::global(),
        }
    }
}

impl<'r> UnitNormalizer<'r> {
    pub fn new(registry: &'r UnitRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r UnitRegistry {
        self.registry
    }

    /// Build a quantity in a user unit.
    pub fn quantity(&self, value: Real, kind: QuantityKind, unit: &str) -> CoreResult<Quantity> {
        Quantity::new(value, kind, unit, self.registry)
    }

    pub fn canonical(&self, q: &Quantity) -> CoreResult<Quantity> {
        q.to_canonical(self.registry)
    }

    pub fn display(&self, q: &Quantity, unit: &str) -> CoreResult<Quantity> {
        q.convert_to(self.registry, unit)
    }

    /// Canonical `f64` for a `(value, unit)` pair.
    pub fn canonical_value(&self, value: Real, kind: QuantityKind, unit: &str) -> CoreResult<Real> {
        self.registry.to_canonical(value, kind, unit)
    }

    pub fn set_parameter<P>(&self, target: &mut P, name: &str, value: &Quantity) -> CoreResult<()>
    where
        P: Parameterized + ?Sized,
    {
        let spec = target.parameters().spec(name)?;
        value.expect_kind(spec.kind)?;
        let canonical = value.canonical_value(self.registry)?;
        target.parameters_mut().set(name, canonical)
    }

    /// Current value in `display_unit`; `None` when the parameter is unset.
    pub fn get_parameter<P>(
        &self,
        target: &P,
        name: &str,
        display_unit: &str,
    ) -> CoreResult<Option<Quantity>>
    where
        P: Parameterized + ?Sized,
    {
        let store = target.parameters();
        let spec = store.spec(name)?;
        match store.get(name) {
            Some(v) => Quantity::canonical(spec.kind, v, self.registry)?
                .convert_to(self.registry, display_unit)
                .map(Some),
            None => Ok(None),
        }
    }

    /// Current value in the canonical unit.
    pub fn get_canonical<P>(&self, target: &P, name: &str) -> CoreResult<Option<Quantity>>
    where
        P: Parameterized + ?Sized,
    {
        let store = target.parameters();
        let spec = store.spec(name)?;
        store
            .get(name)
            .map(|v| Quantity::canonical(spec.kind, v, self.registry))
            .transpose()
    }

    /// Reset a parameter to its declared default.
    pub fn clear_parameter<P>(&self, target: &mut P, name: &str) -> CoreResult<()>
    where
        P: Parameterized + ?Sized,
    {
        target.parameters_mut().clear(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::params::{Bounds, ParamSpec, ParameterStore};
    use approx::assert_relative_eq;

    static SPECS: &[ParamSpec] = &[
        ParamSpec::new("subcooling", QuantityKind::TemperatureDifference)
            .bounded(Bounds::NON_NEGATIVE)
            .with_default(0.0),
        ParamSpec::new("saturation_temperature", QuantityKind::Temperature)
            .bounded(Bounds::POSITIVE),
    ];

    struct Dummy {
        params: ParameterStore,
    }

    impl Parameterized for Dummy {
        fn parameters(&self) -> &ParameterStore {
            &self.params
        }
        fn parameters_mut(&mut self) -> &mut ParameterStore {
            &mut self.params
        }
    }

    fn dummy() -> Dummy {
        Dummy {
            params: ParameterStore::new(SPECS),
        }
    }

    #[test]
    fn stores_canonical_and_reads_back_in_display_unit() {
        let reg = UnitRegistry::with_builtin_units();
        let n = UnitNormalizer::new(&reg);
        let mut d = dummy();

        let t = n.quantity(40.0, QuantityKind::Temperature, "°C").unwrap();
        n.set_parameter(&mut d, "saturation_temperature", &t).unwrap();
        assert_relative_eq!(
            d.parameters().get("saturation_temperature").unwrap(),
            313.15,
            max_relative = 1e-12
        );

        let back = n
            .get_parameter(&d, "saturation_temperature", "°F")
            .unwrap()
            .unwrap();
        assert_eq!(back.unit().as_str(), "°F");
        assert_relative_eq!(back.value(), 104.0, max_relative = 1e-9);
    }

    #[test]
    fn kind_bounds_and_names_are_enforced() {
        let reg = UnitRegistry::with_builtin_units();
        let n = UnitNormalizer::new(&reg);
        let mut d = dummy();

        // an absolute temperature is not a temperature difference
        let t = n.quantity(5.0, QuantityKind::Temperature, "K").unwrap();
        let err = n.set_parameter(&mut d, "subcooling", &t).unwrap_err();
        assert_eq!(
            err,
            CoreError::IncompatibleKind {
                expected: QuantityKind::TemperatureDifference,
                found: QuantityKind::Temperature,
            }
        );

        let dt = n
            .quantity(-2.0, QuantityKind::TemperatureDifference, "K")
            .unwrap();
        let err = n.set_parameter(&mut d, "subcooling", &dt).unwrap_err();
        assert!(matches!(err, CoreError::ParameterOutOfBounds { .. }));

        let err = n.get_parameter(&d, "superheat", "K").unwrap_err();
        assert!(matches!(err, CoreError::UnknownParameter { .. }));

        let err = n
            .get_parameter(&d, "subcooling", "kPa")
            .unwrap_err();
        assert!(matches!(err, CoreError::UnknownUnit { .. }));
    }

    #[test]
    fn clear_restores_default_and_unset_reads_none() {
        let reg = UnitRegistry::with_builtin_units();
        let n = UnitNormalizer::new(&reg);
        let mut d = dummy();
        let dt = n
            .quantity(9.0, QuantityKind::TemperatureDifference, "°F")
            .unwrap();
        n.set_parameter(&mut d, "subcooling", &dt).unwrap();
        assert_relative_eq!(d.parameters().get("subcooling").unwrap(), 5.0, max_relative = 1e-12);

        n.clear_parameter(&mut d, "subcooling").unwrap();
        assert_eq!(d.parameters().get("subcooling"), Some(0.0));
        assert!(n
            .get_parameter(&d, "saturation_temperature", "K")
            .unwrap()
            .is_none());
    }
}
