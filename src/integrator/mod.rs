//! ODE integrator contract and reference implementation
//!
//! The residual evaluator consumes an integrator as an opaque service: given
//! a right-hand side, an initial state and a list of output times, it returns
//! one predicted state per output time. Rate inputs are piecewise-constant
//! for the duration of a single call; the evaluator splits an interval into
//! sub-spans whenever the rate vector changes.

mod rk4;

pub use rk4::Rk4;

use nalgebra::DVector;
use thiserror::Error;

use crate::scalar::Scalar;

/// Errors raised by an [`Integrator`].
///
/// The residual evaluator propagates these unchanged; it neither catches nor
/// suppresses integrator failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntegratorError {
    /// A requested output time precedes the current integration time
    #[error("requested output time {t1} precedes integration time {t0}")]
    InvalidSpan { t0: f64, t1: f64 },

    /// The state left the finite domain during integration
    #[error("state became non-finite at t = {time}")]
    NonFiniteState { time: f64 },

    /// The integrator produced no states for a non-empty output-time request
    #[error("integrator returned no states")]
    EmptyOutput,
}

/// Service that advances a compartmental system over time.
///
/// `rhs` is the model right-hand side `(t, x, p, rates, idata) -> dx/dt`.
/// Implementations must be generic over the scalar type so that derivative
/// information carried by the state or parameters flows through the produced
/// states.
pub trait Integrator<T: Scalar> {
    /// Integrate from `t0`, returning one state per entry of `ts`.
    ///
    /// `ts` must be non-decreasing and no earlier than `t0`. `rates` holds
    /// the per-compartment infusion rates held constant over the whole call;
    /// `idata` is passed through to the right-hand side untouched.
    #[allow(clippy::too_many_arguments)]
    fn integrate<F>(
        &self,
        rhs: &F,
        x0: DVector<T>,
        t0: f64,
        ts: &[f64],
        params: &DVector<T>,
        rates: &[f64],
        idata: &[i32],
    ) -> Result<Vec<DVector<T>>, IntegratorError>
    where
        F: Fn(f64, &DVector<T>, &DVector<T>, &[f64], &[i32]) -> DVector<T>;
}
