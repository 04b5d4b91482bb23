//! Steady-state residuals for compartmental pharmacokinetic models.
//!
//! Under a repeating dosing regimen the steady-state state vector is the
//! root of a fixed-point residual: candidate state minus the state predicted
//! one interdose interval later. This crate evaluates that residual for an
//! external nonlinear root finder, dispatching on the dosing regime (bolus,
//! truncated infusion, constant infusion) and delegating time advancement to
//! a pluggable [`Integrator`].
//!
//! The evaluator is generic over [`Scalar`], so the same code runs with
//! plain `f64` or with [`Dual`] numbers when sensitivities of the steady
//! state with respect to model parameters (or the dose amount itself) are
//! needed.
//!
//! ```
//! use nalgebra::DVector;
//! use steadysol::prelude::*;
//!
//! // One-compartment elimination with a per-compartment infusion rate.
//! fn rhs(
//!     _t: f64,
//!     x: &DVector<f64>,
//!     p: &DVector<f64>,
//!     rates: &[f64],
//!     _idata: &[i32],
//! ) -> DVector<f64> {
//!     DVector::from_element(1, rates[0] - p[0] * x[0])
//! }
//!
//! // 100 units every 12 h into compartment 1, as a bolus.
//! let system = SteadyStateResidual::fixed_amount(rhs, Rk4::new(1e-2), 12.0, 1);
//! let x = DVector::from_element(1, 20.0);
//! let y = DVector::from_element(1, 0.1);
//! let r = system.evaluate(&x, &y, &[0.0, 100.0], &[])?;
//! assert_eq!(r.len(), 1);
//! # Ok::<(), steadysol::SteadyStateError>(())
//! ```

pub mod error;
pub mod integrator;
pub mod residual;
pub mod scalar;

pub use error::SteadyStateError;
pub use integrator::{Integrator, IntegratorError, Rk4};
pub use residual::{AmountSource, Regime, SteadyStateResidual};
pub use scalar::{Dual, Scalar};

pub mod prelude {
    pub use crate::error::SteadyStateError;
    pub use crate::integrator::{Integrator, IntegratorError, Rk4};
    pub use crate::residual::{AmountSource, Regime, SteadyStateResidual};
    pub use crate::scalar::{Dual, Scalar};
}
