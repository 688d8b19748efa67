use std::hash::Hash;

use malachite::Rational;
use ordered_float::NotNan;

/// The coordinate type for all of the geometry in this crate.
///
/// The sweep relies on its predicates (side-of-line, point comparison,
/// segment intersection) being mutually consistent, so the requirements here
/// are strict: total order, exact equality, and a field's worth of
/// arithmetic. `Rational` satisfies them exactly; the `NotNan` impls satisfy
/// them approximately, which is fine until the input has nearly-collinear
/// edges or nearly-coincident points.
pub trait Float:
    Sized
    + std::ops::Add<Self, Output = Self>
    + std::ops::Sub<Self, Output = Self>
    + std::ops::Mul<Self, Output = Self>
    + std::ops::Div<Self, Output = Self>
    + for<'a> std::ops::Add<&'a Self, Output = Self>
    + for<'a> std::ops::Sub<&'a Self, Output = Self>
    + for<'a> std::ops::Mul<&'a Self, Output = Self>
    + for<'a> std::ops::Div<&'a Self, Output = Self>
    + Clone
    + std::fmt::Debug
    + Ord
    + Eq
    + Hash
{
    /// Converts from an `f32`. Panics on non-finite input.
    fn from_f32(x: f32) -> Self;
}

impl Float for Rational {
    fn from_f32(x: f32) -> Self {
        Rational::try_from(x).unwrap()
    }
}

impl Float for NotNan<f32> {
    fn from_f32(x: f32) -> Self {
        NotNan::try_from(x).unwrap()
    }
}

impl Float for NotNan<f64> {
    fn from_f32(x: f32) -> Self {
        NotNan::try_from(f64::from(x)).unwrap()
    }
}
