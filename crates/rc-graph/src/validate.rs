//! Graph validation and traversal order.

use rc_core::{CircuitId, CompId, PortId};

use crate::error::{GraphError, GraphResult};
use crate::graph::{CycleGraph, Port};

/// Traversal order of one circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitOrder {
    pub circuit: CircuitId,
    /// Components in flow order, starting at the circuit's first component.
    /// A component follows all of its upstream neighbours except across the
    /// connection that closes a loop.
    pub order: Vec<CompId>,
}

/// Cached result of a successful validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    circuits: Vec<CircuitOrder>,
    /// Component fed by each outlet, indexed by `CompId::slot`.
    next: Vec<Vec<CompId>>,
    /// Component feeding each inlet.
    prev: Vec<Vec<CompId>>,
}

impl Topology {
    pub fn circuits(&self) -> &[CircuitOrder] {
        &self.circuits
    }

    /// Flattened traversal over all circuits.
    pub fn order(&self) -> impl Iterator<Item = CompId> + '_ {
        self.circuits.iter().flat_map(|c| c.order.iter().copied())
    }

    /// Components fed by `comp`, in outlet order.
    pub fn downstream(&self, comp: CompId) -> &[CompId] {
        self.next.get(comp.slot()).map_or(&[], Vec::as_slice)
    }

    /// Components feeding `comp`, in inlet order.
    pub fn upstream(&self, comp: CompId) -> &[CompId] {
        self.prev.get(comp.slot()).map_or(&[], Vec::as_slice)
    }
}

pub(crate) fn build_topology(graph: &CycleGraph) -> GraphResult<Topology> {
    let n = graph.components().len();
    let mut next = Vec::with_capacity(n);
    let mut prev = Vec::with_capacity(n);

    for circuit in graph.circuits() {
        if circuit.components.is_empty() {
            return Err(GraphError::MissingConnection {
                circuit: circuit.id,
                comp: None,
            });
        }
    }

    // every port must be connected
    for comp in graph.components() {
        let open: Vec<&Port> = comp
            .ports()
            .iter()
            .filter_map(|&p| graph.port(p))
            .filter(|p| p.connection.is_none())
            .collect();
        if open.len() == comp.ports().len() {
            return Err(GraphError::MissingConnection {
                circuit: comp.circuit,
                comp: Some(comp.id),
            });
        }
        if let Some(port) = open.first() {
            return Err(GraphError::DanglingPort {
                comp: comp.id,
                port: port.id,
                kind: port.kind,
            });
        }
        let peers = |ports: &[PortId]| -> Vec<CompId> {
            ports.iter().filter_map(|&p| graph.peer_component(p)).collect()
        };
        prev.push(peers(comp.inlets()));
        next.push(peers(comp.outlets()));
    }

    // A circuit is valid when its flow is strongly connected: every
    // component reaches every other one.
    let mut circuits = Vec::with_capacity(graph.circuits().len());
    for circuit in graph.circuits() {
        let loops = count_loops(&circuit.components, &next, &prev);
        if loops != 1 {
            return Err(GraphError::DisjointCircuit {
                circuit: circuit.id,
                loops,
            });
        }
        let mut seen = vec![false; n];
        let mut order = postorder(&circuit.components[..1], &next, &mut seen);
        order.reverse();
        circuits.push(CircuitOrder {
            circuit: circuit.id,
            order,
        });
    }

    Ok(Topology {
        circuits,
        next,
        prev,
    })
}

/// Depth-first postorder along `edges` from every unvisited start.
fn postorder(starts: &[CompId], edges: &[Vec<CompId>], seen: &mut [bool]) -> Vec<CompId> {
    let mut out = Vec::new();
    for &start in starts {
        if seen[start.slot()] {
            continue;
        }
        seen[start.slot()] = true;
        let mut stack = vec![(start, 0usize)];
        while let Some(top) = stack.last_mut() {
            let (node, edge) = *top;
            match edges[node.slot()].get(edge) {
                Some(&child) => {
                    top.1 += 1;
                    if !seen[child.slot()] {
                        seen[child.slot()] = true;
                        stack.push((child, 0));
                    }
                }
                None => {
                    out.push(node);
                    stack.pop();
                }
            }
        }
    }
    out
}

/// Strongly connected groups among `members` (Kosaraju).
fn count_loops(members: &[CompId], next: &[Vec<CompId>], prev: &[Vec<CompId>]) -> usize {
    let mut seen = vec![false; next.len()];
    let finished = postorder(members, next, &mut seen);
    let mut seen = vec![false; next.len()];
    let mut loops = 0;
    for &comp in finished.iter().rev() {
        if !seen[comp.slot()] {
            loops += 1;
            postorder(&[comp], prev, &mut seen);
        }
    }
    loops
}
