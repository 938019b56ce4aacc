use thiserror::Error;

use crate::kind::QuantityKind;

pub type CoreResult<T> = Result<T, CoreError>;

/// Unit, quantity and parameter errors.
///
/// These indicate configuration or caller bugs and are never recovered
/// internally: every layer above propagates them unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Unknown unit '{unit}' for {kind}")]
    UnknownUnit { kind: QuantityKind, unit: String },

    #[error("Unknown quantity kind: {kind} has no registered canonical unit")]
    UnknownKind { kind: QuantityKind },

    #[error("Conflicting definition for unit '{unit}' of {kind}")]
    ConflictingDefinition { kind: QuantityKind, unit: String },

    #[error("Incompatible kind: expected {expected}, found {found}")]
    IncompatibleKind {
        expected: QuantityKind,
        found: QuantityKind,
    },

    #[error("Unknown parameter '{name}'")]
    UnknownParameter { name: String },

    #[error("Parameter '{name}' = {value} outside [{min}, {max}] (canonical)")]
    ParameterOutOfBounds {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Global unit registry already installed")]
    RegistryAlreadyInstalled,

    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Could not parse a quantity from '{input}'")]
    Parse { input: String },
}
