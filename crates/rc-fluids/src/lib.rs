//! rc-fluids: refrigerant property backends for refcycle.
//!
//! Provides:
//! - `PropertyBackend` trait: the only way components obtain equation-of-state data
//! - `BackendRegistry` issuing opaque `RefrigerantId` tokens
//! - `StateVar` / `FluidState` in canonical units
//! - `ReferenceBackend`: analytic, deterministic correlations for common refrigerants
//! - `CoolPropBackend` (feature `coolprop`) via `rfluids`
//!
//! # Example
//!
//! ```
//! use rc_fluids::{BackendRegistry, StateVar};
//!
//! let registry = BackendRegistry::with_reference();
//! let r134a = registry.resolve("R-134a").unwrap();
//! let backend = registry.backend(&r134a).unwrap();
//! let sat = backend
//!     .state_from_two(&r134a, StateVar::Temperature(263.15), StateVar::Quality(1.0))
//!     .unwrap();
//! assert!(sat.pressure().value > 1.9e5);
//! ```

pub mod backend;
#[cfg(feature = "coolprop")]
pub mod coolprop;
pub mod error;
pub mod reference;
pub mod refrigerant;
pub mod state;

pub use backend::{CriticalPoint, PropertyBackend};
#[cfg(feature = "coolprop")]
pub use coolprop::CoolPropBackend;
pub use error::{PropertyError, PropertyResult};
pub use reference::{ReferenceBackend, RefrigerantParams, builtin_refrigerants};
pub use refrigerant::{BackendRegistry, RefrigerantId, refrigerant_key};
pub use state::{FluidState, Phase, Property, SpecEnthalpy, SpecEntropy, StateVar};
