//! rc-components: component library for vapor-compression cycles.
//!
//! Provides the four elements of a basic cycle:
//! - [`Compressor`] with isentropic efficiency, fixed power and optional displacement
//! - [`Condenser`] / [`Evaporator`] with saturation, subcooling/superheat and capacity
//! - [`ExpansionValve`] (isenthalpic)
//!
//! plus [`Separator`] and [`Mixer`] for branched circuits.
//!
//! Every component implements [`CycleComponent`]: a deterministic map from the
//! inlet iterates to the outlet iterates. Parameters live in a canonical
//! [`ParameterStore`](rc_core::ParameterStore) and are written through
//! [`UnitNormalizer`](rc_core::UnitNormalizer).
//!
//! # Example
//!
//! ```
//! use rc_components::{CycleComponent, EvalContext, ExpansionValve, PortState};
//! use rc_core::units::{kgps, pa};
//! use rc_fluids::BackendRegistry;
//!
//! let registry = BackendRegistry::with_reference();
//! let r134a = registry.resolve("R134a").unwrap();
//! let backend = registry.backend(&r134a).unwrap();
//!
//! let ctx = EvalContext::new(backend.as_ref(), &r134a).with_downstream(Some(pa(2.0e5)));
//! let valve = ExpansionValve::new("txv");
//! let out = valve
//!     .evaluate(&ctx, &[PortState::new(pa(1.0e6), 2.4e5, kgps(0.05))])
//!     .unwrap();
//! assert_eq!(out[0].enthalpy, 2.4e5);
//! ```

mod common;
pub mod compressor;
pub mod condenser;
pub mod error;
pub mod evaporator;
pub mod expansion_valve;
pub mod mixer;
pub mod separator;
pub mod traits;

pub use compressor::Compressor;
pub use condenser::Condenser;
pub use error::{ComponentError, ComponentResult};
pub use evaporator::Evaporator;
pub use expansion_valve::ExpansionValve;
pub use mixer::Mixer;
pub use separator::Separator;
pub use traits::{ComponentSummary, CycleComponent, EvalContext, PortState};

use rc_core::ParamSpec;
use rc_graph::ComponentKind;

/// Fresh component model with default parameters.
pub fn build_component(kind: ComponentKind, name: impl Into<String>) -> Box<dyn CycleComponent> {
    match kind {
        ComponentKind::Compressor => Box::new(Compressor::new(name)),
        ComponentKind::Condenser => Box::new(Condenser::new(name)),
        ComponentKind::Evaporator => Box::new(Evaporator::new(name)),
        ComponentKind::ExpansionValve => Box::new(ExpansionValve::new(name)),
        ComponentKind::Mixer => Box::new(Mixer::new(name)),
        ComponentKind::Separator => Box::new(Separator::new(name)),
    }
}

/// Parameter declarations of a component kind.
pub fn param_specs(kind: ComponentKind) -> &'static [ParamSpec] {
    match kind {
        ComponentKind::Compressor => Compressor::param_specs(),
        ComponentKind::Condenser => Condenser::param_specs(),
        ComponentKind::Evaporator => Evaporator::param_specs(),
        ComponentKind::ExpansionValve => ExpansionValve::param_specs(),
        ComponentKind::Mixer => Mixer::param_specs(),
        ComponentKind::Separator => Separator::param_specs(),
    }
}
