//! Document validation. Structural checks only; refrigerant names and the
//! graph topology are checked when the document is built.

use std::collections::{HashMap, HashSet};

use rc_components::param_specs;
use rc_graph::ComponentKind;

use crate::schema::{CircuitDef, ComponentDef, CycleDocument, LATEST_VERSION, PortSide};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown parameter '{name}' for {kind} '{component}'")]
    UnknownParameter {
        component: String,
        kind: ComponentKind,
        name: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_document(doc: &CycleDocument) -> Result<(), ValidationError> {
    if doc.version != LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: doc.version,
        });
    }

    let mut circuit_ids = HashSet::new();
    // Component ids are document-wide so seeds can name them unqualified.
    let mut component_ids: HashMap<&str, &ComponentDef> = HashMap::new();
    for circuit in &doc.circuits {
        if !circuit_ids.insert(circuit.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: circuit.id.clone(),
                context: "circuits".to_string(),
            });
        }
        if circuit.refrigerant.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: format!("circuit '{}' refrigerant", circuit.id),
                value: String::new(),
                reason: "must not be empty".to_string(),
            });
        }
        for component in &circuit.components {
            if component_ids
                .insert(component.id.as_str(), component)
                .is_some()
            {
                return Err(ValidationError::DuplicateId {
                    id: component.id.clone(),
                    context: "components".to_string(),
                });
            }
            validate_component(component)?;
        }
        resolve_connections(circuit)?;
    }

    for seed in &doc.initial_values {
        let Some(component) = component_ids.get(seed.component.as_str()) else {
            return Err(ValidationError::MissingReference {
                id: seed.component.clone(),
                context: "initial_values component".to_string(),
            });
        };
        let (inlets, outlets) = ComponentKind::from(component.kind).port_counts();
        let count = match seed.port {
            PortSide::Inlet => inlets,
            PortSide::Outlet => outlets,
        };
        if let Some(index) = seed.index
            && !(1..=count).contains(&index)
        {
            return Err(ValidationError::InvalidValue {
                field: format!("initial_values[{}].index", seed.component),
                value: index.to_string(),
                reason: format!("must be between 1 and {count}"),
            });
        }
        let values = [
            ("pressure", seed.seed.pressure),
            ("temperature", seed.seed.temperature),
            ("enthalpy", seed.seed.enthalpy),
            ("quality", seed.seed.quality),
            ("saturation_temperature", seed.seed.saturation_temperature),
            ("mass_flow", seed.seed.mass_flow),
        ];
        for (field, value) in values {
            if let Some(v) = value
                && !v.is_finite()
            {
                return Err(ValidationError::InvalidValue {
                    field: format!("initial_values[{}].{field}", seed.component),
                    value: v.to_string(),
                    reason: "must be finite".to_string(),
                });
            }
        }
    }

    if let Some(solver) = &doc.solver {
        if !(solver.tolerance.is_finite() && solver.tolerance > 0.0) {
            return Err(ValidationError::InvalidValue {
                field: "solver.tolerance".to_string(),
                value: solver.tolerance.to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if solver.consecutive_passes == 0 {
            return Err(ValidationError::InvalidValue {
                field: "solver.consecutive_passes".to_string(),
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
    }

    Ok(())
}

fn validate_component(component: &ComponentDef) -> Result<(), ValidationError> {
    let kind = ComponentKind::from(component.kind);
    let specs = param_specs(kind);
    for (name, &value) in &component.parameters {
        let Some(spec) = specs.iter().find(|s| s.name == name) else {
            return Err(ValidationError::UnknownParameter {
                component: component.id.clone(),
                kind,
                name: name.clone(),
            });
        };
        if !value.is_finite() || !spec.bounds.contains(value) {
            return Err(ValidationError::InvalidValue {
                field: format!("{}.{name}", component.id),
                value: value.to_string(),
                reason: format!(
                    "{} outside [{}, {}] (canonical)",
                    spec.kind, spec.bounds.min, spec.bounds.max
                ),
            });
        }
    }
    Ok(())
}

/// A document connection with both ports resolved, 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResolvedConnection<'d> {
    pub from: &'d str,
    pub outlet: usize,
    pub to: &'d str,
    pub inlet: usize,
}

/// Port numbers of every connection in `circuit`, checked against the
/// component kinds. Each port takes at most one connection.
pub(crate) fn resolve_connections(
    circuit: &CircuitDef,
) -> Result<Vec<ResolvedConnection<'_>>, ValidationError> {
    let mut free: HashMap<&str, [Vec<bool>; 2]> = circuit
        .components
        .iter()
        .map(|c| {
            let (inlets, outlets) = ComponentKind::from(c.kind).port_counts();
            (c.id.as_str(), [vec![true; outlets], vec![true; inlets]])
        })
        .collect();

    let mut resolved = Vec::with_capacity(circuit.connections.len());
    for conn in &circuit.connections {
        let mut take = |id: &str,
                        side: usize,
                        wanted: Option<usize>,
                        what: &str|
         -> Result<usize, ValidationError> {
            let Some(ports) = free.get_mut(id).map(|sides| &mut sides[side]) else {
                return Err(ValidationError::MissingReference {
                    id: id.to_string(),
                    context: format!("circuit '{}' connection {what}", circuit.id),
                });
            };
            let index = match wanted {
                Some(n) if n == 0 || n > ports.len() => {
                    return Err(ValidationError::InvalidValue {
                        field: format!("circuit '{}' connection {id} {what}", circuit.id),
                        value: n.to_string(),
                        reason: format!("must be between 1 and {}", ports.len()),
                    });
                }
                Some(n) => Some(n - 1),
                None => ports.iter().position(|&f| f),
            };
            match index {
                Some(i) if ports[i] => {
                    ports[i] = false;
                    Ok(i)
                }
                _ => Err(ValidationError::DuplicateId {
                    id: id.to_string(),
                    context: format!("circuit '{}' connection {what}s", circuit.id),
                }),
            }
        };
        let outlet = take(&conn.from, 0, conn.from_outlet, "source")?;
        let inlet = take(&conn.to, 1, conn.to_inlet, "target")?;
        resolved.push(ResolvedConnection {
            from: &conn.from,
            outlet,
            to: &conn.to,
            inlet,
        });
    }
    Ok(resolved)
}
