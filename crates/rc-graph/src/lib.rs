//! rc-graph: cycle topology for refcycle.
//!
//! Provides:
//! - Circuits, components, ports and connections (`CycleGraph`)
//! - Branch components with two inlets (`Mixer`) or two outlets (`Separator`)
//! - Validation into a cached traversal order (`Topology`)
//!
//! # Example
//!
//! ```
//! use rc_fluids::BackendRegistry;
//! use rc_graph::{ComponentKind, CycleGraph};
//!
//! let r134a = BackendRegistry::with_reference().resolve("R-134a").unwrap();
//! let mut graph = CycleGraph::new();
//! let loop_ = graph.add_circuit("main", r134a);
//! let comp = graph.add_component(loop_, "compressor", ComponentKind::Compressor).unwrap();
//! let cond = graph.add_component(loop_, "condenser", ComponentKind::Condenser).unwrap();
//! graph.connect_components(comp, cond).unwrap();
//! graph.connect_components(cond, comp).unwrap();
//!
//! let topology = graph.validate().unwrap();
//! assert_eq!(topology.circuits()[0].order, vec![comp, cond]);
//! ```

pub mod error;
pub mod graph;
pub mod validate;

pub use error::{GraphError, GraphResult};
pub use graph::{Circuit, Component, ComponentKind, Connection, CycleGraph, Port, PortKind};
pub use validate::{CircuitOrder, Topology};
