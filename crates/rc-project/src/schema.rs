//! Cycle document schema. Every numeric value is canonical SI.

use std::collections::BTreeMap;

use rc_graph::ComponentKind;
use rc_solver::{PortSeed, SolverConfig};
use serde::{Deserialize, Serialize};

/// The only document version written or accepted.
pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CycleDocument {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub circuits: Vec<CircuitDef>,
    #[serde(default)]
    pub initial_values: Vec<SeedDef>,
    /// Overrides of the solver defaults; absent fields keep their default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solver: Option<SolverConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CircuitDef {
    pub id: String,
    pub name: String,
    /// Refrigerant name or alias, resolved against the backend registry at build time.
    pub refrigerant: String,
    #[serde(default)]
    pub components: Vec<ComponentDef>,
    #[serde(default)]
    pub connections: Vec<ConnectionDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentDef {
    pub id: String,
    pub name: String,
    pub kind: ComponentKindDef,
    /// Parameter name to canonical value.
    #[serde(default)]
    pub parameters: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKindDef {
    Compressor,
    Condenser,
    Evaporator,
    ExpansionValve,
    Mixer,
    Separator,
}

impl From<ComponentKindDef> for ComponentKind {
    fn from(kind: ComponentKindDef) -> Self {
        match kind {
            ComponentKindDef::Compressor => ComponentKind::Compressor,
            ComponentKindDef::Condenser => ComponentKind::Condenser,
            ComponentKindDef::Evaporator => ComponentKind::Evaporator,
            ComponentKindDef::ExpansionValve => ComponentKind::ExpansionValve,
            ComponentKindDef::Mixer => ComponentKind::Mixer,
            ComponentKindDef::Separator => ComponentKind::Separator,
        }
    }
}

impl From<ComponentKind> for ComponentKindDef {
    fn from(kind: ComponentKind) -> Self {
        match kind {
            ComponentKind::Compressor => ComponentKindDef::Compressor,
            ComponentKind::Condenser => ComponentKindDef::Condenser,
            ComponentKind::Evaporator => ComponentKindDef::Evaporator,
            ComponentKind::ExpansionValve => ComponentKindDef::ExpansionValve,
            ComponentKind::Mixer => ComponentKindDef::Mixer,
            ComponentKind::Separator => ComponentKindDef::Separator,
        }
    }
}

/// Outlet of component `from` feeds an inlet of component `to`.
///
/// Port numbers are 1-based. An absent number takes the next port of that
/// side not yet named by an earlier connection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConnectionDef {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_outlet: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_inlet: Option<usize>,
}

impl ConnectionDef {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            from_outlet: None,
            to_inlet: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PortSide {
    Inlet,
    Outlet,
}

/// Starting guess for one port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeedDef {
    pub component: String,
    pub port: PortSide,
    /// 1-based port number on that side; the first port when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(flatten)]
    pub seed: PortSeed,
}
