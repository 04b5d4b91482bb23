//! Forward-mode automatic differentiation via dual numbers.

use std::cmp::Ordering;
use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use super::Scalar;

/// A dual number for forward-mode AD.
///
/// `val` holds the primal value, `dot` holds the derivative with respect to
/// the chosen independent variable. Seed one input with [`Dual::var`] and
/// lift the rest with [`Dual::constant`]; after evaluation, `dot` of the
/// result is the sensitivity of the output to that input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dual {
    /// Primal (function) value.
    pub val: f64,
    /// Tangent (derivative) value.
    pub dot: f64,
}

impl Dual {
    /// Create a constant (derivative = 0).
    #[inline]
    pub fn constant(val: f64) -> Self {
        Self { val, dot: 0.0 }
    }

    /// Create an independent variable (derivative = 1).
    #[inline]
    pub fn var(val: f64) -> Self {
        Self { val, dot: 1.0 }
    }

    /// Create a dual with explicit tangent.
    #[inline]
    pub fn new(val: f64, dot: f64) -> Self {
        Self { val, dot }
    }
}

impl Add for Dual {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            val: self.val + rhs.val,
            dot: self.dot + rhs.dot,
        }
    }
}

impl Sub for Dual {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            val: self.val - rhs.val,
            dot: self.dot - rhs.dot,
        }
    }
}

impl Mul for Dual {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self {
            val: self.val * rhs.val,
            dot: self.dot * rhs.val + self.val * rhs.dot,
        }
    }
}

impl Div for Dual {
    type Output = Self;
    #[inline]
    fn div(self, rhs: Self) -> Self {
        Self {
            val: self.val / rhs.val,
            dot: (self.dot * rhs.val - self.val * rhs.dot) / (rhs.val * rhs.val),
        }
    }
}

impl Neg for Dual {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self {
            val: -self.val,
            dot: -self.dot,
        }
    }
}

/// Ordered by primal value; tangents do not participate in comparisons.
impl PartialOrd for Dual {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.val.partial_cmp(&other.val)
    }
}

impl Scalar for Dual {
    #[inline]
    fn from_f64(v: f64) -> Self {
        Self::constant(v)
    }

    #[inline]
    fn value(&self) -> f64 {
        self.val
    }

    /// d/dx ln(x) = 1/x.
    #[inline]
    fn ln(self) -> Self {
        Self {
            val: self.val.ln(),
            dot: self.dot / self.val,
        }
    }

    /// d/dx exp(x) = exp(x).
    #[inline]
    fn exp(self) -> Self {
        let e = self.val.exp();
        Self {
            val: e,
            dot: self.dot * e,
        }
    }

    /// d/dx sqrt(x) = 1/(2*sqrt(x)).
    #[inline]
    fn sqrt(self) -> Self {
        let s = self.val.sqrt();
        Self {
            val: s,
            dot: self.dot / (2.0 * s),
        }
    }

    /// d/dx x^n = n * x^(n-1).
    #[inline]
    fn powf(self, n: f64) -> Self {
        Self {
            val: self.val.powf(n),
            dot: self.dot * n * self.val.powf(n - 1.0),
        }
    }

    /// d/dx x^n = n * x^(n-1).
    #[inline]
    fn powi(self, n: i32) -> Self {
        Self {
            val: self.val.powi(n),
            dot: self.dot * f64::from(n) * self.val.powi(n - 1),
        }
    }

    /// d/dx |x| = sign(x).
    #[inline]
    fn abs(self) -> Self {
        Self {
            val: self.val.abs(),
            dot: self.dot * self.val.signum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn arithmetic_tracks_tangents() {
        let x = Dual::var(3.0);
        let c = Dual::constant(2.0);

        // d/dx (2x + x*x) = 2 + 2x = 8
        let y = c * x + x * x;
        assert_relative_eq!(y.val, 15.0);
        assert_relative_eq!(y.dot, 8.0);

        // d/dx (1/x) = -1/x^2
        let z = Dual::constant(1.0) / x;
        assert_relative_eq!(z.dot, -1.0 / 9.0);
    }

    #[test]
    fn exp_chain_rule() {
        // d/dk exp(-k * t) at k = 0.1, t = 12
        let k = Dual::var(0.1);
        let t = Dual::constant(12.0);
        let y = (-k * t).exp();
        assert_relative_eq!(y.val, (-1.2f64).exp());
        assert_relative_eq!(y.dot, -12.0 * (-1.2f64).exp());
    }

    #[test]
    fn constants_carry_zero_tangent() {
        let c = Dual::from_f64(5.0);
        assert_eq!(c.dot, 0.0);
        assert_eq!(c.value(), 5.0);

        let x = Dual::var(2.0);
        assert_eq!((c * x).dot, 5.0);
    }
}
