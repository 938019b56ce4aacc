//! Fixed-point cycle solver.
//!
//! Each pass walks every circuit in its validated traversal order. A
//! component receives the pressure demanded by the component on its first
//! outlet, maps its inlet iterates to outlet iterates, and each outlet is
//! copied across its connection to the inlet it feeds. The residual of a pass is the largest
//! relative change of any port pressure, enthalpy or mass flow.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use rc_components::{ComponentError, CycleComponent, EvalContext, PortState};
use rc_core::{CompId, PortId, relative_change};
use rc_fluids::{PropertyBackend, RefrigerantId};
use rc_graph::{GraphError, PortKind};
use tracing::{debug, info, warn};

use crate::config::{ENTHALPY_FLOOR, MASS_FLOW_FLOOR, PRESSURE_FLOOR, SolverConfig};
use crate::control::{CancelToken, SolveProgressEvent};
use crate::error::{SolverError, SolverResult};
use crate::initial::PortSeed;
use crate::problem::CycleProblem;

/// Terminal state of a solve.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveStatus {
    Converged,
    /// A component hit an infeasible state, or the residual kept growing.
    Diverged { reason: String },
    MaxIterationsExceeded,
    Cancelled,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Converged => f.write_str("converged"),
            SolveStatus::Diverged { reason } => write!(f, "diverged: {reason}"),
            SolveStatus::MaxIterationsExceeded => f.write_str("maximum iterations exceeded"),
            SolveStatus::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Port iterates indexed by `PortId::slot`.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleSolution {
    ports: Vec<PortState>,
}

impl CycleSolution {
    pub fn ports(&self) -> &[PortState] {
        &self.ports
    }

    pub fn port(&self, id: PortId) -> Option<&PortState> {
        self.ports.get(id.slot())
    }
}

/// Status, pass count, last residual and last iterate of a solve.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    pub iterations: usize,
    pub residual: f64,
    pub solution: CycleSolution,
}

impl SolveOutcome {
    pub fn is_converged(&self) -> bool {
        self.status == SolveStatus::Converged
    }
}

pub(crate) enum Verdict {
    Continue,
    Converged,
    Diverged(String),
}

/// Tracks the residual history of a solve.
pub(crate) struct ConvergenceMonitor {
    tolerance: f64,
    needed: usize,
    window: usize,
    streak: usize,
    growth: usize,
    last: Option<f64>,
}

impl ConvergenceMonitor {
    pub(crate) fn new(config: &SolverConfig) -> Self {
        Self {
            tolerance: config.tolerance,
            needed: config.consecutive_passes.max(1),
            window: config.divergence_window,
            streak: 0,
            growth: 0,
            last: None,
        }
    }

    pub(crate) fn observe(&mut self, residual: f64) -> Verdict {
        if !residual.is_finite() {
            return Verdict::Diverged(format!("non-finite residual {residual}"));
        }
        if residual < self.tolerance {
            self.streak += 1;
            self.growth = 0;
        } else {
            self.streak = 0;
            self.growth = match self.last {
                Some(last) if residual > last => self.growth + 1,
                _ => 0,
            };
        }
        self.last = Some(residual);

        if self.streak >= self.needed {
            Verdict::Converged
        } else if self.window > 0 && self.growth >= self.window {
            Verdict::Diverged(format!(
                "residual grew for {} consecutive passes",
                self.growth
            ))
        } else {
            Verdict::Continue
        }
    }
}

/// One component evaluation within a pass.
struct Step<'p> {
    model: &'p dyn CycleComponent,
    /// Model fed by the first outlet.
    next_model: &'p dyn CycleComponent,
    inlets: &'p [PortId],
    outlets: &'p [PortId],
    /// Inlet port fed by each outlet, same order as `outlets`.
    feeds: Vec<PortId>,
}

/// A circuit prepared for iteration.
struct Lane<'p> {
    refrigerant: &'p RefrigerantId,
    backend: Arc<dyn PropertyBackend>,
    steps: Vec<Step<'p>>,
}

/// Solve with default reporting.
pub fn solve(problem: &CycleProblem<'_>, config: &SolverConfig) -> SolverResult<SolveOutcome> {
    solve_with_progress(problem, config, None, &mut |_| {})
}

/// Solve with an optional cancellation token and a per-pass progress callback.
pub fn solve_with_progress(
    problem: &CycleProblem<'_>,
    config: &SolverConfig,
    cancel: Option<&CancelToken>,
    progress: &mut dyn FnMut(SolveProgressEvent),
) -> SolverResult<SolveOutcome> {
    let lanes = prepare(problem)?;
    let mut ports = initial_ports(problem, &lanes, config)?;
    let mut monitor = ConvergenceMonitor::new(config);
    let mut residual = f64::INFINITY;

    let finish = |status: SolveStatus, iterations: usize, residual: f64, ports: Vec<PortState>| {
        info!(%status, iterations, residual, "cycle solve finished");
        SolveOutcome {
            status,
            iterations,
            residual,
            solution: CycleSolution { ports },
        }
    };

    for iteration in 1..=config.max_iterations {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            return Ok(finish(SolveStatus::Cancelled, iteration - 1, residual, ports));
        }

        let previous = ports.clone();
        for lane in &lanes {
            if let Some(reason) = pass(lane, &mut ports)? {
                // `ports` is partly rewritten; report the last complete iterate.
                return Ok(finish(
                    SolveStatus::Diverged { reason },
                    iteration,
                    residual,
                    previous,
                ));
            }
        }

        residual = max_relative_change(&previous, &ports);
        debug!(iteration, residual, "fixed-point pass");
        progress(SolveProgressEvent {
            iteration,
            residual,
        });

        match monitor.observe(residual) {
            Verdict::Continue => {}
            Verdict::Converged => {
                return Ok(finish(SolveStatus::Converged, iteration, residual, ports));
            }
            Verdict::Diverged(reason) => {
                return Ok(finish(SolveStatus::Diverged { reason }, iteration, residual, ports));
            }
        }
    }

    Ok(finish(
        SolveStatus::MaxIterationsExceeded,
        config.max_iterations,
        residual,
        ports,
    ))
}

fn prepare<'p>(problem: &'p CycleProblem<'_>) -> SolverResult<Vec<Lane<'p>>> {
    let topology = problem.validate()?;
    let graph = problem.graph;

    let model = |id: CompId| {
        problem
            .component(id)
            .ok_or_else(|| SolverError::setup(format!("Component {id:?} has no model")))
    };

    let mut lanes = Vec::with_capacity(topology.circuits().len());
    for order in topology.circuits() {
        let circuit = graph.circuit(order.circuit).ok_or(GraphError::IdNotFound {
            what: "circuit",
            id: order.circuit,
        })?;
        let backend = problem.backends.backend(&circuit.refrigerant)?;

        let mut steps = Vec::with_capacity(order.order.len());
        for &id in &order.order {
            let comp = graph
                .component(id)
                .ok_or(GraphError::IdNotFound { what: "component", id })?;
            let feeds = comp
                .outlets()
                .iter()
                .map(|&port| {
                    graph.peer(port).ok_or(GraphError::DanglingPort {
                        comp: id,
                        port,
                        kind: PortKind::Outlet,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let next = graph.peer_component(comp.outlet()).ok_or(GraphError::DanglingPort {
                comp: id,
                port: comp.outlet(),
                kind: PortKind::Outlet,
            })?;
            steps.push(Step {
                model: model(id)?,
                next_model: model(next)?,
                inlets: comp.inlets(),
                outlets: comp.outlets(),
                feeds,
            });
        }
        lanes.push(Lane {
            refrigerant: &circuit.refrigerant,
            backend,
            steps,
        });
    }
    Ok(lanes)
}

fn initial_ports(
    problem: &CycleProblem<'_>,
    lanes: &[Lane<'_>],
    config: &SolverConfig,
) -> SolverResult<Vec<PortState>> {
    let n = problem.graph.ports().len();

    // Outlet seeds first so that an explicit inlet seed wins.
    let mut seeds: BTreeMap<PortId, PortSeed> = BTreeMap::new();
    for want_outlet in [true, false] {
        for (port, seed) in problem.initial.seeds() {
            let is_outlet = problem
                .graph
                .port(port)
                .is_some_and(|p| p.kind == PortKind::Outlet);
            if is_outlet == want_outlet {
                seeds.insert(problem.carrier(port), *seed);
            }
        }
    }

    let fallback = PortState::new(
        rc_core::units::pa(config.default_pressure),
        config.default_enthalpy,
        rc_core::units::kgps(config.default_mass_flow),
    );
    let mut ports = vec![fallback; n];
    for lane in lanes {
        for &inlet in lane.steps.iter().flat_map(|step| step.inlets) {
            let state = match (seeds.get(&inlet), problem.initial.warm(inlet)) {
                (Some(seed), _) => seed.resolve(lane.backend.as_ref(), lane.refrigerant, config)?,
                (None, Some(warm)) if warm.is_finite() => warm,
                _ => PortSeed::default().resolve(lane.backend.as_ref(), lane.refrigerant, config)?,
            };
            ports[inlet.slot()] = state;
        }
        // Outlets start equal to the inlet they feed.
        for step in &lane.steps {
            for (outlet, feed) in step.outlets.iter().zip(&step.feeds) {
                ports[outlet.slot()] = ports[feed.slot()];
            }
        }
    }
    Ok(ports)
}

/// One pass over a circuit. `Ok(Some(reason))` when a component reports an
/// infeasible state.
fn pass(lane: &Lane<'_>, ports: &mut [PortState]) -> SolverResult<Option<String>> {
    let base = EvalContext::new(lane.backend.as_ref(), lane.refrigerant);
    let mut inlets = Vec::new();
    for step in &lane.steps {
        inlets.clear();
        inlets.extend(step.inlets.iter().map(|port| ports[port.slot()]));
        let result = step
            .next_model
            .inlet_pressure_demand(&base)
            .and_then(|demand| step.model.evaluate(&base.with_downstream(demand), &inlets));
        match result {
            Ok(outlets) if outlets.len() != step.outlets.len() => {
                return Err(SolverError::setup(format!(
                    "'{}' produced {} outlet states for {} outlet ports",
                    step.model.name(),
                    outlets.len(),
                    step.outlets.len()
                )));
            }
            Ok(outlets) => {
                for ((port, feed), state) in step.outlets.iter().zip(&step.feeds).zip(outlets) {
                    ports[port.slot()] = state;
                    ports[feed.slot()] = state;
                }
            }
            Err(e @ ComponentError::InfeasibleState { .. }) => {
                warn!(component = step.model.name(), error = %e, "infeasible component state");
                return Ok(Some(e.to_string()));
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(None)
}

fn max_relative_change(previous: &[PortState], current: &[PortState]) -> f64 {
    let mut worst = 0.0_f64;
    for (a, b) in previous.iter().zip(current) {
        for r in [
            relative_change(a.pressure.value, b.pressure.value, PRESSURE_FLOOR),
            relative_change(a.enthalpy, b.enthalpy, ENTHALPY_FLOOR),
            relative_change(a.mass_flow.value, b.mass_flow.value, MASS_FLOW_FLOOR),
        ] {
            if r.is_nan() {
                return f64::NAN;
            }
            worst = worst.max(r);
        }
    }
    worst
}
