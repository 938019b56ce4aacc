//! Turning a document into a solvable graph.

use std::collections::BTreeMap;

use rc_components::build_component;
use rc_core::{CompId, Quantity, UnitNormalizer};
use rc_fluids::BackendRegistry;
use rc_graph::{ComponentKind, CycleGraph, PortKind};
use rc_solver::{CycleProblem, InitialValues, SolverConfig};
use tracing::debug;

use crate::ProjectResult;
use crate::schema::{CycleDocument, PortSide};
use crate::validate::{resolve_connections, validate_document};

/// Validated graph plus everything needed to set up a [`CycleProblem`].
#[derive(Debug, Clone)]
pub struct BuiltCycle {
    pub graph: CycleGraph,
    pub initial: InitialValues,
    pub solver: SolverConfig,
    ids: BTreeMap<String, CompId>,
    /// Canonical parameters indexed by `CompId::slot`.
    parameters: Vec<Vec<(String, f64)>>,
}

impl BuiltCycle {
    /// Graph id of the component with document id `id`.
    pub fn component_id(&self, id: &str) -> Option<CompId> {
        self.ids.get(id).copied()
    }

    /// Fresh problem with one model per component and every document
    /// parameter applied through the unit normalizer.
    pub fn problem<'a>(&'a self, backends: &'a BackendRegistry) -> ProjectResult<CycleProblem<'a>> {
        let norm = UnitNormalizer::global();
        let mut problem =
            CycleProblem::new(&self.graph, backends).with_initial(self.initial.clone());
        for comp in self.graph.components() {
            let mut model = build_component(comp.kind, comp.name.clone());
            for (name, value) in &self.parameters[comp.id.slot()] {
                let kind = model.parameters().spec(name)?.kind;
                let q = Quantity::canonical(kind, *value, norm.registry())?;
                norm.set_parameter(model.as_mut(), name, &q)?;
            }
            problem.add_component(comp.id, model)?;
        }
        Ok(problem)
    }
}

pub fn build(doc: &CycleDocument, backends: &BackendRegistry) -> ProjectResult<BuiltCycle> {
    validate_document(doc)?;

    let mut graph = CycleGraph::new();
    let mut ids = BTreeMap::new();
    let mut parameters = Vec::new();
    for circuit_def in &doc.circuits {
        let refrigerant = backends.resolve(&circuit_def.refrigerant)?;
        debug!(circuit = %circuit_def.id, %refrigerant, "building circuit");
        let circuit = graph.add_circuit(circuit_def.name.clone(), refrigerant);
        for def in &circuit_def.components {
            let id = graph.add_component(circuit, def.name.clone(), ComponentKind::from(def.kind))?;
            ids.insert(def.id.clone(), id);
            parameters.push(
                def.parameters
                    .iter()
                    .map(|(k, v)| (k.clone(), *v))
                    .collect(),
            );
        }
        for conn in resolve_connections(circuit_def)? {
            // Both ends exist after validation.
            if let (Some(&from), Some(&to)) = (ids.get(conn.from), ids.get(conn.to)) {
                graph.connect_ports(from, conn.outlet, to, conn.inlet)?;
            }
        }
    }
    graph.validate()?;

    let mut initial = InitialValues::new();
    for def in &doc.initial_values {
        let Some(comp) = ids.get(&def.component).and_then(|id| graph.component(*id)) else {
            continue;
        };
        let kind = match def.port {
            PortSide::Inlet => PortKind::Inlet,
            PortSide::Outlet => PortKind::Outlet,
        };
        let port = comp.port_at(kind, def.index.map_or(0, |n| n.saturating_sub(1)))?;
        initial.seed(port, def.seed);
    }

    debug!(
        components = graph.components().len(),
        seeds = doc.initial_values.len(),
        "cycle document built"
    );
    Ok(BuiltCycle {
        graph,
        initial,
        solver: doc.solver.unwrap_or_default(),
        ids,
        parameters,
    })
}
