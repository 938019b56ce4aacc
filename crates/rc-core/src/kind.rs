use core::fmt;

/// Physical dimension of a [`Quantity`](crate::Quantity).
///
/// Two quantities may only be combined when their kinds are equal; there is
/// no implicit coercion between, say, `Temperature` and
/// `TemperatureDifference`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum QuantityKind {
    Pressure,
    Temperature,
    TemperatureDifference,
    SpecificEnthalpy,
    SpecificEntropy,
    MassFlow,
    Power,
    Density,
    VolumetricFlow,
    Efficiency,
    Quality,
    Dimensionless,
}

impl QuantityKind {
    pub const ALL: [QuantityKind; 12] = [
        QuantityKind::Pressure,
        QuantityKind::Temperature,
        QuantityKind::TemperatureDifference,
        QuantityKind::SpecificEnthalpy,
        QuantityKind::SpecificEntropy,
        QuantityKind::MassFlow,
        QuantityKind::Power,
        QuantityKind::Density,
        QuantityKind::VolumetricFlow,
        QuantityKind::Efficiency,
        QuantityKind::Quality,
        QuantityKind::Dimensionless,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QuantityKind::Pressure => "pressure",
            QuantityKind::Temperature => "temperature",
            QuantityKind::TemperatureDifference => "temperature_difference",
            QuantityKind::SpecificEnthalpy => "specific_enthalpy",
            QuantityKind::SpecificEntropy => "specific_entropy",
            QuantityKind::MassFlow => "mass_flow",
            QuantityKind::Power => "power",
            QuantityKind::Density => "density",
            QuantityKind::VolumetricFlow => "volumetric_flow",
            QuantityKind::Efficiency => "efficiency",
            QuantityKind::Quality => "quality",
            QuantityKind::Dimensionless => "dimensionless",
        }
    }

    /// Parse the snake_case name produced by [`QuantityKind::as_str`].
    pub fn parse(name: &str) -> Option<QuantityKind> {
        let lowered = name.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL.into_iter().find(|k| k.as_str() == lowered)
    }
}

impl fmt::Display for QuantityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
