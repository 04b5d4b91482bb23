//! Steady-state residual evaluation
//!
//! Under a repeating dosing regimen, the steady-state concentration vector
//! `x*` is the root of `r(x) = x − advance(x)`, where `advance` predicts the
//! state one interdose interval later. This module computes `r` for a
//! candidate state; an external nonlinear root finder drives it to zero.
//!
//! Three dosing regimes are distinguished, derived per evaluation from the
//! infusion rate into the dosing compartment and the interdose interval:
//!
//! - **bolus** (`rate == 0`): add the dose amount to the dosing compartment
//!   and integrate over one interval;
//! - **truncated infusion** (`rate != 0`, `interval > 0`): integrate over
//!   the infusion-on sub-span, then over the remainder with all rates off;
//! - **constant infusion** (`rate != 0`, `interval <= 0`): no repeating
//!   cycle exists, so the residual is the instantaneous derivative itself.
//!
//! The evaluator is generic over [`Scalar`], so evaluating with [`Dual`]
//! states or parameters propagates sensitivities through the fixed point —
//! including through a bioavailability-adjusted dose amount when it lives in
//! the parameter vector (see [`AmountSource`]).
//!
//! [`Dual`]: crate::scalar::Dual

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::error::SteadyStateError;
use crate::integrator::Integrator;
use crate::scalar::Scalar;

/// Where the effective dose amount (e.g. bioavailability × amount) is read
/// from during an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmountSource {
    /// Trailing element of the numeric data vector; a plain number. The data
    /// vector is then `n_compartments` rates followed by the amount.
    Data,
    /// Trailing element of the parameter vector; may carry derivative
    /// information. The data vector holds only the rates, and the amount is
    /// stripped from the parameters before they reach the model.
    Parameters,
}

/// Dosing regime, derived from `(rate, interval)` — never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Regime {
    /// Instantaneous dose into the dosing compartment, repeated every
    /// interval
    Bolus,
    /// Constant-rate infusion that ends before the next dose
    TruncatedInfusion,
    /// Constant-rate infusion with no repeating cycle
    ConstantInfusion,
}

impl Regime {
    /// Classify the regime from the dosing-compartment rate and the
    /// interdose interval. `interval <= 0` is the sentinel for "no repeating
    /// cycle".
    pub fn classify(rate: f64, interval: f64) -> Self {
        if rate == 0.0 {
            Regime::Bolus
        } else if interval > 0.0 {
            Regime::TruncatedInfusion
        } else {
            Regime::ConstantInfusion
        }
    }
}

/// The algebraic system solved when computing a steady-state solution.
///
/// Holds the four construction-time pieces — right-hand side, integrator,
/// interdose interval and dosing compartment — plus the [`AmountSource`].
/// No field ever changes after construction and evaluation keeps no state
/// across calls, so a value may be shared freely between threads as long as
/// its collaborators allow it.
///
/// `F` is the model right-hand side `(t, x, p, rates, idata) -> dx/dt`; it
/// is called directly only in the constant-infusion branch and otherwise
/// reaches the model through the integrator.
#[derive(Debug, Clone)]
pub struct SteadyStateResidual<F, I> {
    rhs: F,
    integrator: I,
    interval: f64,
    cmt: usize,
    amount_source: AmountSource,
}

impl<F, I> SteadyStateResidual<F, I> {
    /// Residual system for a fixed (non-differentiable) dose amount.
    ///
    /// The amount is read from the trailing element of the data vector at
    /// each evaluation. `cmt` is the 1-based dosing compartment index;
    /// `interval <= 0` selects the constant-infusion regime whenever the
    /// rate is nonzero.
    pub fn fixed_amount(rhs: F, integrator: I, interval: f64, cmt: usize) -> Self {
        Self::new(rhs, integrator, interval, cmt, AmountSource::Data)
    }

    /// Residual system for a dose amount that is itself a parameter.
    ///
    /// The amount is read from the trailing element of the parameter vector,
    /// which is stripped before the remaining parameters are forwarded to
    /// the model. This variant keeps sensitivities flowing when e.g.
    /// bioavailability makes the effective amount a transformed parameter.
    pub fn variable_amount(rhs: F, integrator: I, interval: f64, cmt: usize) -> Self {
        Self::new(rhs, integrator, interval, cmt, AmountSource::Parameters)
    }

    fn new(rhs: F, integrator: I, interval: f64, cmt: usize, amount_source: AmountSource) -> Self {
        assert!(cmt >= 1, "dosing compartment index is 1-based, got {cmt}");
        Self {
            rhs,
            integrator,
            interval,
            cmt,
            amount_source,
        }
    }

    /// The interdose interval this system was built with.
    pub fn interval(&self) -> f64 {
        self.interval
    }

    /// The 1-based dosing compartment index.
    pub fn cmt(&self) -> usize {
        self.cmt
    }

    /// Where the dose amount is read from.
    pub fn amount_source(&self) -> AmountSource {
        self.amount_source
    }

    /// Evaluate the residual for a candidate steady-state vector `x`.
    ///
    /// `y` holds the model parameters (with the dose amount appended for the
    /// [`AmountSource::Parameters`] variant), `data` the per-compartment
    /// rates (with the dose amount appended for the [`AmountSource::Data`]
    /// variant), and `idata` model-specific integers passed through
    /// untouched. The returned vector always has the length of `x`: the
    /// discrepancy `x − advance(x)` for the repeating regimes, or the
    /// instantaneous derivative for a constant infusion.
    ///
    /// Plain inputs are lifted into `T` with [`Scalar::from_f64`], so the
    /// result carries whatever derivative information `x` and `y` do.
    pub fn evaluate<T: Scalar>(
        &self,
        x: &DVector<T>,
        y: &DVector<T>,
        data: &[f64],
        idata: &[i32],
    ) -> Result<DVector<T>, SteadyStateError>
    where
        F: Fn(f64, &DVector<T>, &DVector<T>, &[f64], &[i32]) -> DVector<T>,
        I: Integrator<T>,
    {
        let input = self.cmt - 1;
        let t0 = 0.0;

        let (rates, amt) = match self.amount_source {
            AmountSource::Data => {
                let (rates, tail) = data.split_at(data.len() - 1);
                (rates, T::from_f64(tail[0]))
            }
            AmountSource::Parameters => (data, y[y.len() - 1]),
        };
        // Parameters forwarded to the model: `y` as-is, or `y` with the
        // trailing amount stripped.
        let stripped = match self.amount_source {
            AmountSource::Data => None,
            AmountSource::Parameters => Some(DVector::from_iterator(
                y.len() - 1,
                y.iter().take(y.len() - 1).copied(),
            )),
        };
        let params = stripped.as_ref().unwrap_or(y);
        let rate = rates[input];

        match Regime::classify(rate, self.interval) {
            Regime::Bolus => {
                let mut x0 = x.clone();
                x0[input] = x0[input] + amt;
                let pred = single(self.integrator.integrate(
                    &self.rhs,
                    x0,
                    t0,
                    &[self.interval],
                    params,
                    rates,
                    idata,
                )?)?;
                Ok(difference(x, &pred))
            }
            Regime::TruncatedInfusion => {
                if self.amount_source == AmountSource::Parameters {
                    return Err(SteadyStateError::UnsupportedRegime);
                }
                // Duration of the active infusion within the interval.
                let delta = amt.value() / rate;
                if delta > self.interval {
                    return Err(SteadyStateError::InfeasibleInfusion {
                        duration: delta,
                        interval: self.interval,
                    });
                }
                // Infusion-on sub-span, then the remainder with all rates
                // off; the integrator only accepts piecewise-constant rates
                // per call.
                let mid = single(self.integrator.integrate(
                    &self.rhs,
                    x.clone(),
                    t0,
                    &[delta],
                    params,
                    rates,
                    idata,
                )?)?;
                let off = vec![0.0; rates.len()];
                let pred = single(self.integrator.integrate(
                    &self.rhs,
                    mid,
                    t0,
                    &[self.interval - delta],
                    params,
                    &off,
                    idata,
                )?)?;
                Ok(difference(x, &pred))
            }
            Regime::ConstantInfusion => {
                // No cycle to return to: steady state means the derivative
                // vanishes, so the residual is the right-hand side itself.
                Ok((self.rhs)(t0, x, params, rates, idata))
            }
        }
    }
}

/// The single predicted state of a one-output-time integration.
fn single<T: Scalar>(mut states: Vec<DVector<T>>) -> Result<DVector<T>, SteadyStateError> {
    states
        .pop()
        .ok_or(SteadyStateError::Integrator(
            crate::integrator::IntegratorError::EmptyOutput,
        ))
}

/// `x − pred`, elementwise.
fn difference<T: Scalar>(x: &DVector<T>, pred: &DVector<T>) -> DVector<T> {
    DVector::from_iterator(x.len(), x.iter().zip(pred.iter()).map(|(a, b)| *a - *b))
}
