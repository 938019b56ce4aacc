//! Display unit preferences, one unit per quantity kind.

use std::collections::BTreeMap;
use std::path::Path;

use rc_core::{QuantityKind, UnitRegistry};
use serde::{Deserialize, Serialize};

use crate::error::CliResult;

/// YAML map from quantity kind to unit, e.g. `pressure: kPa`. Kinds left out
/// are shown in their canonical unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayPreferences {
    units: BTreeMap<QuantityKind, String>,
}

impl DisplayPreferences {
    /// Load and check every unit against `registry`.
    pub fn load(path: &Path, registry: &UnitRegistry) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let prefs: Self = serde_yaml::from_str(&content)?;
        for (kind, unit) in &prefs.units {
            registry.resolve(*kind, unit)?;
        }
        tracing::debug!(path = %path.display(), kinds = prefs.units.len(), "loaded display preferences");
        Ok(prefs)
    }

    pub fn unit_for<'a>(&'a self, kind: QuantityKind, registry: &'a UnitRegistry) -> &'a str {
        match self.units.get(&kind) {
            Some(unit) => unit.as_str(),
            None => registry
                .canonical_unit(kind)
                .map(|u| u.as_str())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_kind_keys_and_falls_back_to_canonical() {
        let registry = UnitRegistry::with_builtin_units();
        let prefs: DisplayPreferences =
            serde_yaml::from_str("pressure: kPa\ntemperature: °C\n").unwrap();
        assert_eq!(prefs.unit_for(QuantityKind::Pressure, &registry), "kPa");
        assert_eq!(prefs.unit_for(QuantityKind::Power, &registry), "W");
    }

    #[test]
    fn unknown_unit_rejected_on_load() {
        let registry = UnitRegistry::with_builtin_units();
        let path = std::env::temp_dir().join("rc_cli_prefs_bad.yaml");
        std::fs::write(&path, "pressure: furlong\n").unwrap();
        assert!(DisplayPreferences::load(&path, &registry).is_err());
    }

    #[test]
    fn demo_preferences_load() {
        let registry = UnitRegistry::with_builtin_units();
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/display_units.yaml");
        let prefs = DisplayPreferences::load(&path, &registry).unwrap();
        assert_eq!(prefs.unit_for(QuantityKind::SpecificEnthalpy, &registry), "kJ/kg");
    }
}
