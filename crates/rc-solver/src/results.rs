//! Post-processing of a solved cycle.

use rc_components::{ComponentSummary, EvalContext};
use rc_core::{ParamSpec, ParameterStore, Parameterized, PortId, QuantityKind, UnitNormalizer};
use rc_fluids::{FluidState, StateVar};
use rc_graph::ComponentKind;

use crate::error::{SolverError, SolverResult};
use crate::problem::CycleProblem;
use crate::solve::CycleSolution;

static FIGURES: [ParamSpec; 5] = [
    ParamSpec::new("cooling_capacity", QuantityKind::Power),
    ParamSpec::new("heating_capacity", QuantityKind::Power),
    ParamSpec::new("compressor_power", QuantityKind::Power),
    ParamSpec::new("cop_cooling", QuantityKind::Dimensionless),
    ParamSpec::new("cop_heating", QuantityKind::Dimensionless),
];

/// Component summaries, full port states and cycle figures.
///
/// Cycle figures (`cooling_capacity`, `heating_capacity`, `compressor_power`,
/// `cop_cooling`, `cop_heating`) are canonical; read them through
/// [`UnitNormalizer::get_parameter`].
#[derive(Debug, Clone)]
pub struct CycleResults {
    summaries: Vec<ComponentSummary>,
    states: Vec<Option<FluidState>>,
    figures: ParameterStore,
}

impl CycleResults {
    /// Summarize every component and resolve every port of `solution`.
    pub fn from_solution(
        problem: &CycleProblem<'_>,
        solution: &CycleSolution,
    ) -> SolverResult<Self> {
        let topology = problem.validate()?;
        let graph = problem.graph;
        let mut summaries = Vec::with_capacity(graph.components().len());
        let mut states = vec![None; graph.ports().len()];

        for order in topology.circuits() {
            let Some(circuit) = graph.circuit(order.circuit) else {
                continue;
            };
            let backend = problem.backends.backend(&circuit.refrigerant)?;
            let ctx = EvalContext::new(backend.as_ref(), &circuit.refrigerant);

            for &id in &order.order {
                let (Some(comp), Some(model)) = (graph.component(id), problem.component(id))
                else {
                    return Err(SolverError::setup(format!("Component {id:?} has no model")));
                };
                let states_of = |ports: &[PortId]| {
                    ports
                        .iter()
                        .map(|&p| {
                            solution.port(p).copied().ok_or_else(|| {
                                SolverError::setup(format!("Solution lacks port {p:?}"))
                            })
                        })
                        .collect::<SolverResult<Vec<_>>>()
                };
                let (inlets, outlets) = (states_of(comp.inlets())?, states_of(comp.outlets())?);
                summaries.push(model.summarize(&ctx, &inlets, &outlets)?);

                for (p, s) in comp.ports().iter().zip(inlets.iter().chain(&outlets)) {
                    states[p.slot()] = Some(backend.state_from_two(
                        &circuit.refrigerant,
                        StateVar::Pressure(s.pressure.value),
                        StateVar::Enthalpy(s.enthalpy),
                    )?);
                }
            }
        }

        let total = |kind: ComponentKind, figure: &str| -> f64 {
            summaries
                .iter()
                .filter(|s| s.kind == kind)
                .filter_map(|s| s.get(figure))
                .sum()
        };
        let cooling = total(ComponentKind::Evaporator, "cooling_capacity");
        let heating = total(ComponentKind::Condenser, "heat_rejected");
        let work = total(ComponentKind::Compressor, "shaft_power");

        let mut values = vec![
            ("cooling_capacity", cooling),
            ("heating_capacity", heating),
            ("compressor_power", work),
        ];
        if work > 0.0 {
            values.push(("cop_cooling", cooling / work));
            values.push(("cop_heating", heating / work));
        }
        let figures = ParameterStore::from_canonical(&FIGURES, values)?;

        Ok(Self {
            summaries,
            states,
            figures,
        })
    }

    pub fn summaries(&self) -> &[ComponentSummary] {
        &self.summaries
    }

    pub fn summary(&self, name: &str) -> Option<&ComponentSummary> {
        self.summaries.iter().find(|s| s.name == name)
    }

    pub fn port_state(&self, port: PortId) -> Option<&FluidState> {
        self.states.get(port.slot())?.as_ref()
    }

    pub fn cop_cooling(&self) -> Option<f64> {
        self.figures.get("cop_cooling")
    }

    pub fn cop_heating(&self) -> Option<f64> {
        self.figures.get("cop_heating")
    }

    /// Every cycle figure in the units named by `unit_for`.
    pub fn figures_in<'u>(
        &self,
        normalizer: &UnitNormalizer<'_>,
        unit_for: impl Fn(QuantityKind) -> &'u str,
    ) -> SolverResult<Vec<(&'static str, rc_core::Quantity)>> {
        let mut out = Vec::new();
        for (spec, _) in self.figures.iter() {
            if let Some(q) = normalizer.get_parameter(self, spec.name, unit_for(spec.kind))? {
                out.push((spec.name, q));
            }
        }
        Ok(out)
    }
}

impl Parameterized for CycleResults {
    fn parameters(&self) -> &ParameterStore {
        &self.figures
    }

    fn parameters_mut(&mut self) -> &mut ParameterStore {
        &mut self.figures
    }
}
