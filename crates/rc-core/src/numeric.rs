use crate::CoreError;

/// Floating point type used throughout the cycle model.
pub type Real = f64;

/// Absolute/relative tolerance pair used for approximate comparisons.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

impl Tolerances {
    /// Looser tolerance for values that went through an affine unit change.
    pub fn conversion() -> Self {
        Self {
            abs: 1e-9,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Relative change between two iterates, floored so values near zero
/// (reference-dependent enthalpies) do not blow the ratio up.
pub fn relative_change(old: Real, new: Real, floor: Real) -> Real {
    let scale = old.abs().max(new.abs()).max(floor);
    (new - old).abs() / scale
}
