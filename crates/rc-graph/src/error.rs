//! Graph-specific error types.

use rc_core::{CircuitId, CompId, PortId};
use thiserror::Error;

use crate::graph::PortKind;

pub type GraphResult<T> = Result<T, GraphError>;

/// Graph assembly and validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Empty circuit, or a component with neither port connected.
    #[error("Missing connection in circuit {circuit}: {}", missing_detail(.comp))]
    MissingConnection {
        circuit: CircuitId,
        comp: Option<CompId>,
    },

    /// Exactly one port of a component is left open.
    #[error("Dangling {kind} port {port} on component {comp}")]
    DanglingPort {
        comp: CompId,
        port: PortId,
        kind: PortKind,
    },

    /// The circuit's flow does not reach every component from every other.
    #[error("Circuit {circuit} splits into {loops} separate loops")]
    DisjointCircuit { circuit: CircuitId, loops: usize },

    /// Connections run from an outlet to an inlet.
    #[error("Port {port} is an {found} port, expected {expected}")]
    PortKindMismatch {
        port: PortId,
        expected: PortKind,
        found: PortKind,
    },

    #[error("Component {comp} has no {kind} port {index}")]
    NoSuchPort {
        comp: CompId,
        kind: PortKind,
        index: usize,
    },

    #[error("Port {port} is already connected")]
    PortAlreadyConnected { port: PortId },

    #[error("Connection crosses circuits {from} -> {to}")]
    CrossCircuitConnection { from: CircuitId, to: CircuitId },

    #[error("{what} {id} not found")]
    IdNotFound { what: &'static str, id: rc_core::Id },
}

fn missing_detail(comp: &Option<CompId>) -> String {
    match comp {
        Some(c) => format!("component {c} is not connected"),
        None => "circuit has no components".to_owned(),
    }
}
