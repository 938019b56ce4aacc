//! Core graph data structures.

use core::fmt;
use core::str::FromStr;

use rc_core::{CircuitId, CompId, ConnId, Id, PortId};
use rc_fluids::RefrigerantId;

use crate::error::{GraphError, GraphResult};
use crate::validate::{self, Topology};

/// Direction/kind of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortKind {
    /// Refrigerant enters here.
    Inlet,
    /// Refrigerant leaves here.
    Outlet,
}

impl fmt::Display for PortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PortKind::Inlet => "inlet",
            PortKind::Outlet => "outlet",
        })
    }
}

/// Tag selecting the component variant placed at a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Compressor,
    Condenser,
    Evaporator,
    ExpansionValve,
    /// Two streams joined into one.
    Mixer,
    /// One stream split in two.
    Separator,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 6] = [
        ComponentKind::Compressor,
        ComponentKind::Condenser,
        ComponentKind::Evaporator,
        ComponentKind::ExpansionValve,
        ComponentKind::Mixer,
        ComponentKind::Separator,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentKind::Compressor => "compressor",
            ComponentKind::Condenser => "condenser",
            ComponentKind::Evaporator => "evaporator",
            ComponentKind::ExpansionValve => "expansion_valve",
            ComponentKind::Mixer => "mixer",
            ComponentKind::Separator => "separator",
        }
    }

    /// Number of inlet and outlet ports.
    pub fn port_counts(self) -> (usize, usize) {
        match self {
            ComponentKind::Mixer => (2, 1),
            ComponentKind::Separator => (1, 2),
            _ => (1, 1),
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match key.as_str() {
            "valve" | "txv" | "expansion_device" => Ok(ComponentKind::ExpansionValve),
            "mixer_flow" | "junction" => Ok(ComponentKind::Mixer),
            "separator_flow" | "splitter" => Ok(ComponentKind::Separator),
            other => ComponentKind::ALL
                .into_iter()
                .find(|k| k.as_str() == other)
                .ok_or_else(|| format!("unknown component kind '{s}'")),
        }
    }
}

/// Attachment point of a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    pub id: PortId,
    pub comp: CompId,
    pub kind: PortKind,
    pub connection: Option<ConnId>,
}

/// A node of the cycle. Port counts follow [`ComponentKind::port_counts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub id: CompId,
    pub name: String,
    pub kind: ComponentKind,
    pub circuit: CircuitId,
    /// Inlet ports followed by outlet ports.
    ports: Vec<PortId>,
    inlet_count: usize,
}

impl Component {
    pub fn ports(&self) -> &[PortId] {
        &self.ports
    }

    pub fn inlets(&self) -> &[PortId] {
        &self.ports[..self.inlet_count]
    }

    pub fn outlets(&self) -> &[PortId] {
        &self.ports[self.inlet_count..]
    }

    /// First inlet.
    pub fn inlet(&self) -> PortId {
        self.ports[0]
    }

    /// First outlet.
    pub fn outlet(&self) -> PortId {
        self.ports[self.inlet_count]
    }

    /// Port `index` (0-based) on the given side.
    pub fn port_at(&self, kind: PortKind, index: usize) -> GraphResult<PortId> {
        let side = match kind {
            PortKind::Inlet => self.inlets(),
            PortKind::Outlet => self.outlets(),
        };
        side.get(index).copied().ok_or(GraphError::NoSuchPort {
            comp: self.id,
            kind,
            index,
        })
    }
}

/// Directed edge from an outlet port to an inlet port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub id: ConnId,
    pub from: PortId,
    pub to: PortId,
}

/// One closed refrigerant loop, possibly with split and merged branches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Circuit {
    pub id: CircuitId,
    pub name: String,
    pub refrigerant: RefrigerantId,
    /// Components in insertion order; the first one starts traversal.
    pub components: Vec<CompId>,
}

/// Mutable cycle topology.
///
/// Entities are stored in vectors indexed by their IDs. Removed connections
/// leave a hole so that IDs stay stable. Any mutation drops the cached
/// [`Topology`]; [`CycleGraph::validate`] rebuilds it.
#[derive(Debug, Clone, Default)]
pub struct CycleGraph {
    circuits: Vec<Circuit>,
    components: Vec<Component>,
    ports: Vec<Port>,
    connections: Vec<Option<Connection>>,
    topology: Option<Topology>,
}

fn next_id(len: usize) -> Id {
    Id::from_index(len as u32)
}

impl CycleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_circuit(&mut self, name: impl Into<String>, refrigerant: RefrigerantId) -> CircuitId {
        let id = next_id(self.circuits.len());
        self.circuits.push(Circuit {
            id,
            name: name.into(),
            refrigerant,
            components: Vec::new(),
        });
        self.topology = None;
        id
    }

    /// Add a component to `circuit`, creating the inlet and outlet ports its
    /// kind calls for.
    pub fn add_component(
        &mut self,
        circuit: CircuitId,
        name: impl Into<String>,
        kind: ComponentKind,
    ) -> GraphResult<CompId> {
        if self.circuit(circuit).is_none() {
            return Err(GraphError::IdNotFound {
                what: "circuit",
                id: circuit,
            });
        }
        let comp = next_id(self.components.len());
        let (inlets, outlets) = kind.port_counts();
        let sides = std::iter::repeat_n(PortKind::Inlet, inlets)
            .chain(std::iter::repeat_n(PortKind::Outlet, outlets));
        let mut ports = Vec::with_capacity(inlets + outlets);
        for side in sides {
            let id = next_id(self.ports.len());
            self.ports.push(Port {
                id,
                comp,
                kind: side,
                connection: None,
            });
            ports.push(id);
        }
        self.components.push(Component {
            id: comp,
            name: name.into(),
            kind,
            circuit,
            ports,
            inlet_count: inlets,
        });
        self.circuits[circuit.slot()].components.push(comp);
        self.topology = None;
        Ok(comp)
    }

    /// Connect an outlet port to an inlet port of the same circuit.
    pub fn connect(&mut self, from: PortId, to: PortId) -> GraphResult<ConnId> {
        let out = self.port_checked(from)?;
        let inp = self.port_checked(to)?;
        for (port, expected) in [(out, PortKind::Outlet), (inp, PortKind::Inlet)] {
            if port.kind != expected {
                return Err(GraphError::PortKindMismatch {
                    port: port.id,
                    expected,
                    found: port.kind,
                });
            }
            if port.connection.is_some() {
                return Err(GraphError::PortAlreadyConnected { port: port.id });
            }
        }
        let from_circuit = self.components[out.comp.slot()].circuit;
        let to_circuit = self.components[inp.comp.slot()].circuit;
        if from_circuit != to_circuit {
            return Err(GraphError::CrossCircuitConnection {
                from: from_circuit,
                to: to_circuit,
            });
        }

        let id = next_id(self.connections.len());
        self.connections.push(Some(Connection { id, from, to }));
        self.ports[from.slot()].connection = Some(id);
        self.ports[to.slot()].connection = Some(id);
        self.topology = None;
        Ok(id)
    }

    /// Connect the first free outlet of `upstream` to the first free inlet of
    /// `downstream`.
    pub fn connect_components(&mut self, upstream: CompId, downstream: CompId) -> GraphResult<ConnId> {
        let from = self.first_free(upstream, PortKind::Outlet)?;
        let to = self.first_free(downstream, PortKind::Inlet)?;
        self.connect(from, to)
    }

    /// Connect outlet `outlet` of `upstream` to inlet `inlet` of
    /// `downstream`, both 0-based.
    pub fn connect_ports(
        &mut self,
        upstream: CompId,
        outlet: usize,
        downstream: CompId,
        inlet: usize,
    ) -> GraphResult<ConnId> {
        let from = self
            .component_checked(upstream)?
            .port_at(PortKind::Outlet, outlet)?;
        let to = self
            .component_checked(downstream)?
            .port_at(PortKind::Inlet, inlet)?;
        self.connect(from, to)
    }

    fn first_free(&self, comp: CompId, kind: PortKind) -> GraphResult<PortId> {
        let comp = self.component_checked(comp)?;
        let side = match kind {
            PortKind::Inlet => comp.inlets(),
            PortKind::Outlet => comp.outlets(),
        };
        side.iter()
            .copied()
            .find(|&p| self.ports[p.slot()].connection.is_none())
            .ok_or(GraphError::PortAlreadyConnected {
                port: side[side.len() - 1],
            })
    }

    /// Remove the connection attached to `port`, returning it (if any).
    pub fn disconnect(&mut self, port: PortId) -> GraphResult<Option<Connection>> {
        let Some(conn_id) = self.port_checked(port)?.connection else {
            return Ok(None);
        };
        let conn = self.connections[conn_id.slot()].take();
        if let Some(c) = conn {
            self.ports[c.from.slot()].connection = None;
            self.ports[c.to.slot()].connection = None;
        }
        self.topology = None;
        Ok(conn)
    }

    pub fn rename_component(&mut self, comp: CompId, name: impl Into<String>) -> GraphResult<()> {
        self.component_checked(comp)?;
        self.components[comp.slot()].name = name.into();
        Ok(())
    }

    /// Check that every port is connected and every circuit is one strongly
    /// connected flow, then cache the traversal order.
    pub fn validate(&mut self) -> GraphResult<&Topology> {
        let topology = validate::build_topology(self)?;
        Ok(self.topology.insert(topology))
    }

    pub fn topology(&self) -> Option<&Topology> {
        self.topology.as_ref()
    }

    pub fn is_validated(&self) -> bool {
        self.topology.is_some()
    }

    pub fn circuits(&self) -> &[Circuit] {
        &self.circuits
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    /// Live connections in creation order.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter().flatten()
    }

    pub fn circuit(&self, id: CircuitId) -> Option<&Circuit> {
        self.circuits.get(id.slot())
    }

    pub fn component(&self, id: CompId) -> Option<&Component> {
        self.components.get(id.slot())
    }

    pub fn port(&self, id: PortId) -> Option<&Port> {
        self.ports.get(id.slot())
    }

    pub fn connection(&self, id: ConnId) -> Option<&Connection> {
        self.connections.get(id.slot()).and_then(Option::as_ref)
    }

    pub fn component_by_name(&self, name: &str) -> Option<CompId> {
        self.components.iter().find(|c| c.name == name).map(|c| c.id)
    }

    /// Port on the other end of `port`'s connection.
    pub fn peer(&self, port: PortId) -> Option<PortId> {
        let conn = self.connection(self.port(port)?.connection?)?;
        Some(if conn.from == port { conn.to } else { conn.from })
    }

    /// Component on the other end of `port`'s connection.
    pub fn peer_component(&self, port: PortId) -> Option<CompId> {
        self.peer(port).and_then(|p| self.port(p)).map(|p| p.comp)
    }

    /// Component fed by `comp`'s first outlet.
    pub fn downstream(&self, comp: CompId) -> Option<CompId> {
        self.peer_component(self.component(comp)?.outlet())
    }

    pub(crate) fn component_checked(&self, id: CompId) -> GraphResult<&Component> {
        self.component(id).ok_or(GraphError::IdNotFound {
            what: "component",
            id,
        })
    }

    fn port_checked(&self, id: PortId) -> GraphResult<&Port> {
        self.port(id).ok_or(GraphError::IdNotFound { what: "port", id })
    }
}
