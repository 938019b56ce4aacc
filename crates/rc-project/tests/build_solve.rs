//! Documents built into graphs and solved on the reference backend.

use std::path::Path;

use approx::assert_relative_eq;
use rc_core::Parameterized;
use rc_fluids::BackendRegistry;
use rc_graph::{GraphError, PortKind};
use rc_project::schema::PortSide;
use rc_project::{CycleDocument, ProjectError, build, load_yaml};
use rc_solver::{CycleResults, SolveStatus, solve};

fn load_demo(name: &str) -> CycleDocument {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos").join(name);
    load_yaml(&path).unwrap()
}

fn demo() -> CycleDocument {
    load_demo("basic_r134a.yaml")
}

#[test]
fn demo_builds_and_converges() {
    let backends = BackendRegistry::with_reference();
    let built = build(&demo(), &backends).unwrap();
    assert!(built.graph.is_validated());
    assert_eq!(built.solver.max_iterations, 100);

    let problem = built.problem(&backends).unwrap();
    let outcome = solve(&problem, &built.solver).unwrap();
    assert_eq!(outcome.status, SolveStatus::Converged);

    let results = CycleResults::from_solution(&problem, &outcome.solution).unwrap();
    let cooling = results.parameters().get("cooling_capacity").unwrap();
    assert_relative_eq!(cooling, 5000.0, max_relative = 1e-9);
    let cop = results.cop_cooling().unwrap();
    assert!(cop > 1.0 && cop < 10.0, "cop = {cop}");

    let evap = built.component_id("evap").unwrap();
    let outlet = built.graph.component(evap).unwrap().outlet();
    let r134a = &built.graph.circuits()[0].refrigerant;
    let p_lo = backends
        .backend(r134a)
        .unwrap()
        .saturation_pressure(r134a, 263.15)
        .unwrap();
    assert_relative_eq!(
        outcome.solution.port(outlet).unwrap().pressure.value,
        p_lo,
        max_relative = 1e-12
    );
}

#[test]
fn document_parameters_reach_the_models() {
    let backends = BackendRegistry::with_reference();
    let built = build(&demo(), &backends).unwrap();
    let problem = built.problem(&backends).unwrap();

    let comp = problem
        .component(built.component_id("comp").unwrap())
        .unwrap();
    assert_eq!(comp.parameters().get("isentropic_efficiency"), Some(0.7));
    let cond = problem
        .component(built.component_id("cond").unwrap())
        .unwrap();
    assert_eq!(cond.parameters().get("subcooling"), Some(5.0));
}

#[test]
fn seeds_land_on_the_named_port() {
    let backends = BackendRegistry::with_reference();
    let doc = demo();
    assert_eq!(doc.initial_values[0].port, PortSide::Inlet);
    let built = build(&doc, &backends).unwrap();

    let inlet = built
        .graph
        .component(built.component_id("comp").unwrap())
        .unwrap()
        .inlet();
    let seeds: Vec<_> = built.initial.seeds().collect();
    assert_eq!(seeds.len(), 1);
    assert_eq!(seeds[0].0, inlet);
    assert_eq!(seeds[0].1.saturation_temperature, Some(263.15));
}

#[test]
fn unknown_refrigerant_fails_build() {
    let mut doc = demo();
    doc.circuits[0].refrigerant = "unobtainium".to_string();
    let backends = BackendRegistry::with_reference();
    assert!(matches!(
        build(&doc, &backends),
        Err(ProjectError::Property(_))
    ));
}

#[test]
fn open_loop_fails_graph_validation() {
    let mut doc = demo();
    doc.circuits[0].connections.pop();
    let backends = BackendRegistry::with_reference();
    assert!(matches!(
        build(&doc, &backends),
        Err(ProjectError::Graph(GraphError::DanglingPort { .. }))
    ));
}

#[test]
fn split_demo_balances_both_evaporators() {
    let backends = BackendRegistry::with_reference();
    let built = build(&load_demo("split_evaporators_r134a.yaml"), &backends).unwrap();
    let problem = built.problem(&backends).unwrap();
    let outcome = solve(&problem, &built.solver).unwrap();
    assert_eq!(outcome.status, SolveStatus::Converged);

    let results = CycleResults::from_solution(&problem, &outcome.solution).unwrap();
    let figure = |name: &str, figure: &str| results.summary(name).unwrap().get(figure).unwrap();
    assert_relative_eq!(figure("Fridge evaporator", "cooling_capacity"), 3000.0, max_relative = 1e-9);
    assert_relative_eq!(figure("Suction header", "inlet_1_fraction"), 0.6, max_relative = 1e-5);
    assert_relative_eq!(
        figure("Suction header", "mass_flow"),
        figure("Compressor", "mass_flow"),
        max_relative = 1e-9
    );

    // the seed names the second mixer inlet
    let mix = built.graph.component(built.component_id("mix").unwrap()).unwrap();
    let seeds: Vec<_> = built.initial.seeds().collect();
    assert_eq!(seeds[0].0, mix.port_at(PortKind::Inlet, 1).unwrap());
    let freezer = built.component_id("evap_freezer").unwrap();
    assert_eq!(built.graph.peer_component(seeds[0].0), Some(freezer));
}
