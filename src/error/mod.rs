//! Steady-state residual error types

use thiserror::Error;

use crate::integrator::IntegratorError;

/// Errors that can occur while evaluating a steady-state residual
///
/// Every failure aborts the current evaluation and surfaces to the caller;
/// no failure is downgraded to a default or zero residual.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SteadyStateError {
    /// The infusion does not finish before the next dose.
    ///
    /// Non-retryable for the offending candidate: the regime itself cannot
    /// be satisfied with the given amount/rate/interval combination.
    /// Superposing overlapping infusions from prior cycles is not
    /// implemented.
    #[error("infusion duration (amt / rate) is {duration}, but must not exceed the interdose interval {interval}")]
    InfeasibleInfusion { duration: f64, interval: f64 },

    /// Truncated infusions are not supported when the dose amount is a
    /// parameter; splitting the interval would require solving for a
    /// parameter-dependent breakpoint time.
    #[error("steady-state truncated infusion is not supported when the dose amount is a parameter")]
    UnsupportedRegime,

    /// A failure raised by the integrator collaborator, propagated unchanged
    #[error(transparent)]
    Integrator(#[from] IntegratorError),
}
