//! Scalar abstraction over plain and derivative-carrying numbers
//!
//! The residual evaluator is written once, generically, and reused for both
//! plain evaluation (`f64`) and forward-mode sensitivity propagation
//! ([`Dual`]). Promotion of a plain number into the differentiable domain is
//! [`Scalar::from_f64`], which attaches a zero derivative; combining a plain
//! constant with a differentiable quantity therefore yields a differentiable
//! result, resolved at compile time.

mod dual;

pub use dual::Dual;

use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A scalar type suitable for compartmental-model arithmetic.
///
/// Implemented for `f64` (plain evaluation) and [`Dual`] (forward-mode AD).
/// The supertrait bounds also satisfy `nalgebra::Scalar`, so any `Scalar`
/// can populate a `nalgebra::DVector`.
pub trait Scalar:
    Copy
    + Debug
    + PartialEq
    + PartialOrd
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// Wrap an `f64` constant (derivative = 0 for AD types).
    fn from_f64(v: f64) -> Self;

    /// Extract the primal (function) value.
    fn value(&self) -> f64;

    /// Natural logarithm.
    fn ln(self) -> Self;

    /// Exponential.
    fn exp(self) -> Self;

    /// Square root.
    fn sqrt(self) -> Self;

    /// Power with `f64` exponent.
    fn powf(self, n: f64) -> Self;

    /// Integer power.
    fn powi(self, n: i32) -> Self;

    /// Absolute value.
    fn abs(self) -> Self;
}

impl Scalar for f64 {
    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }

    #[inline]
    fn value(&self) -> f64 {
        *self
    }

    #[inline]
    fn ln(self) -> Self {
        f64::ln(self)
    }

    #[inline]
    fn exp(self) -> Self {
        f64::exp(self)
    }

    #[inline]
    fn sqrt(self) -> Self {
        f64::sqrt(self)
    }

    #[inline]
    fn powf(self, n: f64) -> Self {
        f64::powf(self, n)
    }

    #[inline]
    fn powi(self, n: i32) -> Self {
        f64::powi(self, n)
    }

    #[inline]
    fn abs(self) -> Self {
        f64::abs(self)
    }
}
