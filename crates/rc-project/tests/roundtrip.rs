use std::path::{Path, PathBuf};

use rc_project::schema::*;
use rc_project::{
    LATEST_VERSION, ProjectError, ValidationError, load_json, load_yaml, save_json, save_yaml,
    validate_document,
};

fn demo_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/basic_r134a.yaml")
}

#[test]
fn roundtrip_yaml_empty_document() {
    let doc = CycleDocument {
        version: LATEST_VERSION,
        name: "Empty".to_string(),
        circuits: vec![],
        initial_values: vec![],
        solver: None,
    };
    validate_document(&doc).unwrap();

    let path = std::env::temp_dir().join("rc_project_roundtrip_empty.yaml");
    save_yaml(&path, &doc).unwrap();
    let loaded = load_yaml(&path).unwrap();
    assert_eq!(doc, loaded);
}

#[test]
fn demo_document_loads() {
    let doc = load_yaml(&demo_path()).unwrap();
    assert_eq!(doc.version, LATEST_VERSION);
    assert_eq!(doc.circuits.len(), 1);

    let circuit = &doc.circuits[0];
    assert_eq!(circuit.components.len(), 4);
    assert_eq!(circuit.connections.len(), 4);
    let evap = circuit.components.iter().find(|c| c.id == "evap").unwrap();
    assert_eq!(evap.kind, ComponentKindDef::Evaporator);
    assert_eq!(evap.parameters["saturation_temperature"], 263.15);

    let seed = &doc.initial_values[0];
    assert_eq!(seed.port, PortSide::Inlet);
    assert_eq!(seed.seed.quality, Some(1.0));
    assert_eq!(seed.seed.pressure, None);

    let solver = doc.solver.unwrap();
    assert_eq!(solver.max_iterations, 100);
    assert_eq!(solver.tolerance, rc_solver::SolverConfig::default().tolerance);
}

#[test]
fn roundtrip_demo_through_yaml_and_json() {
    let doc = load_yaml(&demo_path()).unwrap();

    let yaml = std::env::temp_dir().join("rc_project_roundtrip_demo.yaml");
    save_yaml(&yaml, &doc).unwrap();
    assert_eq!(load_yaml(&yaml).unwrap(), doc);

    let json = std::env::temp_dir().join("rc_project_roundtrip_demo.json");
    save_json(&json, &doc).unwrap();
    assert_eq!(load_json(&json).unwrap(), doc);
}

#[test]
fn version_zero_is_rejected_on_load() {
    let mut doc = load_yaml(&demo_path()).unwrap();
    doc.version = 0;
    let path = std::env::temp_dir().join("rc_project_roundtrip_v0.json");
    std::fs::write(&path, serde_json::to_string(&doc).unwrap()).unwrap();

    assert!(matches!(
        load_json(&path),
        Err(ProjectError::Validation(ValidationError::UnsupportedVersion { version: 0 }))
    ));
}

#[test]
fn save_refuses_invalid_document() {
    let mut doc = load_yaml(&demo_path()).unwrap();
    doc.circuits[0].connections[0].to = "nowhere".to_string();
    let path = std::env::temp_dir().join("rc_project_roundtrip_invalid.yaml");
    assert!(matches!(
        save_yaml(&path, &doc),
        Err(rc_project::ProjectError::Validation(_))
    ));
}

#[test]
fn port_numbers_survive_json() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/split_evaporators_r134a.yaml");
    let doc = load_yaml(&path).unwrap();
    let circuit = &doc.circuits[0];
    assert_eq!(circuit.connections[3].from_outlet, Some(2));
    assert_eq!(circuit.connections[0], ConnectionDef::new("comp", "cond"));
    assert_eq!(doc.initial_values[0].index, Some(2));

    let json = std::env::temp_dir().join("rc_project_roundtrip_split.json");
    save_json(&json, &doc).unwrap();
    assert_eq!(load_json(&json).unwrap(), doc);
    // unnumbered connections stay unnumbered
    let text = std::fs::read_to_string(&json).unwrap();
    assert_eq!(text.matches("from_outlet").count(), 2);
}
