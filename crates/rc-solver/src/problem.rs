//! Problem definition for a cycle solve.

use rc_components::{CycleComponent, build_component};
use rc_core::{CompId, PortId};
use rc_fluids::BackendRegistry;
use rc_graph::{CycleGraph, Topology};

use crate::error::{SolverError, SolverResult};
use crate::initial::InitialValues;

/// A validated cycle graph with one component model per graph component.
pub struct CycleProblem<'a> {
    pub graph: &'a CycleGraph,
    pub backends: &'a BackendRegistry,
    /// Component models indexed by `CompId::slot`.
    components: Vec<Option<Box<dyn CycleComponent>>>,
    pub initial: InitialValues,
}

impl<'a> CycleProblem<'a> {
    /// Problem without component models; add them with [`Self::add_component`].
    pub fn new(graph: &'a CycleGraph, backends: &'a BackendRegistry) -> Self {
        Self {
            graph,
            backends,
            components: (0..graph.components().len()).map(|_| None).collect(),
            initial: InitialValues::default(),
        }
    }

    /// Problem with a default-parameter model for every graph component.
    pub fn with_default_components(graph: &'a CycleGraph, backends: &'a BackendRegistry) -> Self {
        let mut problem = Self::new(graph, backends);
        for comp in graph.components() {
            problem.components[comp.id.slot()] = Some(build_component(comp.kind, comp.name.clone()));
        }
        problem
    }

    pub fn add_component(
        &mut self,
        comp_id: CompId,
        component: Box<dyn CycleComponent>,
    ) -> SolverResult<()> {
        let slot = self
            .components
            .get_mut(comp_id.slot())
            .ok_or_else(|| SolverError::setup(format!("Component {comp_id:?} not in graph")))?;
        if slot.is_some() {
            return Err(SolverError::setup(format!(
                "Component {comp_id:?} already exists"
            )));
        }
        *slot = Some(component);
        Ok(())
    }

    pub fn component(&self, comp_id: CompId) -> Option<&dyn CycleComponent> {
        self.components.get(comp_id.slot())?.as_deref()
    }

    /// Mutable model, e.g. to set parameters through the normalizer.
    pub fn component_mut(&mut self, comp_id: CompId) -> Option<&mut (dyn CycleComponent + 'static)> {
        self.components.get_mut(comp_id.slot())?.as_deref_mut()
    }

    /// Model by graph component name.
    pub fn component_named_mut(
        &mut self,
        name: &str,
    ) -> Option<&mut (dyn CycleComponent + 'static)> {
        let id = self.graph.component_by_name(name)?;
        self.component_mut(id)
    }

    pub fn with_initial(mut self, initial: InitialValues) -> Self {
        self.initial = initial;
        self
    }

    /// Checks that the graph is validated and every component has a model of
    /// the matching kind.
    pub fn validate(&self) -> SolverResult<&'a Topology> {
        let topology = self.graph.topology().ok_or_else(|| SolverError::GraphNotReady {
            what: "graph has not been validated".to_owned(),
        })?;
        for comp in self.graph.components() {
            let model = self.component(comp.id).ok_or_else(|| {
                SolverError::setup(format!("Component '{}' has no model", comp.name))
            })?;
            if model.kind() != comp.kind {
                return Err(SolverError::setup(format!(
                    "Component '{}' is a {} but its model is a {}",
                    comp.name,
                    comp.kind,
                    model.kind()
                )));
            }
        }
        for (port, _) in self.initial.seeds() {
            if self.graph.port(port).is_none() {
                return Err(SolverError::setup(format!("Seed for unknown port {port:?}")));
            }
        }
        Ok(topology)
    }

    /// Inlet port that carries the state of `port`: the port itself for an
    /// inlet, the connected inlet for an outlet.
    pub(crate) fn carrier(&self, port: PortId) -> PortId {
        match self.graph.port(port) {
            Some(p) if p.kind == rc_graph::PortKind::Outlet => self.graph.peer(port).unwrap_or(port),
            _ => port,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rc_graph::ComponentKind;

    fn ring() -> (CycleGraph, BackendRegistry) {
        let backends = BackendRegistry::with_reference();
        let r = backends.resolve("R134a").unwrap();
        let mut g = CycleGraph::new();
        let c = g.add_circuit("main", r);
        let ids: Vec<CompId> = [
            ComponentKind::Compressor,
            ComponentKind::Condenser,
            ComponentKind::ExpansionValve,
            ComponentKind::Evaporator,
        ]
        .iter()
            .map(|k| g.add_component(c, k.as_str(), *k).unwrap())
            .collect();
        for i in 0..ids.len() {
            g.connect_components(ids[i], ids[(i + 1) % ids.len()]).unwrap();
        }
        (g, backends)
    }

    #[test]
    fn unvalidated_graph_is_not_ready() {
        let (g, backends) = ring();
        let problem = CycleProblem::with_default_components(&g, &backends);
        assert!(matches!(
            problem.validate(),
            Err(SolverError::GraphNotReady { .. })
        ));
    }

    #[test]
    fn missing_model_is_setup_error() {
        let (mut g, backends) = ring();
        g.validate().unwrap();
        let mut problem = CycleProblem::new(&g, &backends);
        let first = g.components()[0].id;
        problem
            .add_component(first, build_component(ComponentKind::Compressor, "c"))
            .unwrap();
        assert!(matches!(
            problem.validate(),
            Err(SolverError::ProblemSetup { .. })
        ));
        assert!(
            problem
                .add_component(first, build_component(ComponentKind::Compressor, "c"))
                .is_err()
        );
    }

    #[test]
    fn kind_mismatch_is_setup_error() {
        let (mut g, backends) = ring();
        g.validate().unwrap();
        let mut problem = CycleProblem::new(&g, &backends);
        for comp in g.components() {
            problem
                .add_component(comp.id, build_component(ComponentKind::Condenser, "x"))
                .unwrap();
        }
        let err = problem.validate().unwrap_err();
        assert!(err.to_string().contains("compressor"));
    }

    #[test]
    fn outlet_seeds_land_on_connected_inlet() {
        let (mut g, backends) = ring();
        g.validate().unwrap();
        let problem = CycleProblem::with_default_components(&g, &backends);
        let comps = g.components();
        assert_eq!(problem.carrier(comps[0].outlet()), comps[1].inlet());
        assert_eq!(problem.carrier(comps[1].inlet()), comps[1].inlet());
    }
}
