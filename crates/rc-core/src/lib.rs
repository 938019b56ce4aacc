//! rc-core: units, quantities and parameters for refcycle.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + tolerances + float helpers)
//! - ids (compact IDs for graph objects)
//! - kind / registry / quantity (unit table, tagged values)
//! - params / normalize (canonical parameter stores and the unit boundary)

pub mod error;
pub mod ids;
pub mod kind;
pub mod normalize;
pub mod numeric;
pub mod params;
pub mod quantity;
pub mod registry;
pub mod units;

pub use error::{CoreError, CoreResult};
pub use ids::*;
pub use kind::QuantityKind;
pub use normalize::UnitNormalizer;
pub use numeric::*;
pub use params::{Bounds, ParamSpec, ParameterStore, Parameterized};
pub use quantity::Quantity;
pub use registry::{Conversion, UnitId, UnitRegistry, install_global};
pub use units::*;
