//! rc-project: cycle document format, validation and graph building.
//!
//! Documents store topology and canonical values only; loading performs no
//! unit conversion.

pub mod build;
pub mod schema;
pub mod validate;

use std::path::Path;

use tracing::info;

pub use build::{BuiltCycle, build};
pub use schema::*;
pub use validate::{ValidationError, validate_document};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Graph error: {0}")]
    Graph(#[from] rc_graph::GraphError),

    #[error("Refrigerant error: {0}")]
    Property(#[from] rc_fluids::PropertyError),

    #[error("Parameter error: {0}")]
    Core(#[from] rc_core::CoreError),

    #[error("Problem setup error: {0}")]
    Solver(#[from] rc_solver::SolverError),
}

fn finish_load(doc: CycleDocument, path: &Path) -> ProjectResult<CycleDocument> {
    validate_document(&doc)?;
    info!(
        path = %path.display(),
        name = %doc.name,
        version = doc.version,
        circuits = doc.circuits.len(),
        "loaded cycle document"
    );
    Ok(doc)
}

pub fn load_yaml(path: &Path) -> ProjectResult<CycleDocument> {
    let content = std::fs::read_to_string(path)?;
    finish_load(serde_yaml::from_str(&content)?, path)
}

pub fn save_yaml(path: &Path, doc: &CycleDocument) -> ProjectResult<()> {
    validate_document(doc)?;
    std::fs::write(path, serde_yaml::to_string(doc)?)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<CycleDocument> {
    let content = std::fs::read_to_string(path)?;
    finish_load(serde_json::from_str(&content)?, path)
}

pub fn save_json(path: &Path, doc: &CycleDocument) -> ProjectResult<()> {
    validate_document(doc)?;
    std::fs::write(path, serde_json::to_string_pretty(doc)?)?;
    Ok(())
}
