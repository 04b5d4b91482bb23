//! Classical fourth-order Runge-Kutta integrator
//!
//! Fixed-step RK4 with a configurable maximum step size. Each span is cut
//! into equal steps no longer than `max_step`, so output times are hit
//! exactly. The stepper is generic over [`Scalar`], which is what lets dual
//! numbers ride through the integration and emerge as sensitivities of the
//! predicted state.
//!
//! Compartmental steady-state problems integrate over a single dosing
//! interval of a non-stiff (or mildly stiff) system, where fixed-step RK4 is
//! the standard accuracy/cost tradeoff. Stiff models should plug their own
//! implicit solver in through the [`Integrator`] trait.

use nalgebra::DVector;

use super::{Integrator, IntegratorError};
use crate::scalar::Scalar;

/// Fixed-step classical RK4.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rk4 {
    max_step: f64,
}

impl Rk4 {
    /// Create an integrator that never takes a step longer than `max_step`.
    ///
    /// # Panics
    /// Panics if `max_step` is not strictly positive and finite.
    pub fn new(max_step: f64) -> Self {
        assert!(
            max_step > 0.0 && max_step.is_finite(),
            "max_step must be strictly positive and finite, got {max_step}"
        );
        Self { max_step }
    }

    /// The configured maximum step size.
    pub fn max_step(&self) -> f64 {
        self.max_step
    }
}

impl Default for Rk4 {
    fn default() -> Self {
        Self::new(1e-2)
    }
}

impl<T: Scalar> Integrator<T> for Rk4 {
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
        F: Fn(f64, &DVector<T>, &DVector<T>, &[f64], &[i32]) -> DVector<T>,
    {
        let mut state = x0;
        let mut t = t0;
        let mut out = Vec::with_capacity(ts.len());

        for &t_end in ts {
            if t_end < t {
                return Err(IntegratorError::InvalidSpan { t0: t, t1: t_end });
            }
            let span = t_end - t;
            if span > 0.0 {
                let n_steps = (span / self.max_step).ceil().max(1.0) as usize;
                let h = span / n_steps as f64;
                for i in 0..n_steps {
                    let t_step = t + i as f64 * h;
                    state = step(rhs, t_step, &state, h, params, rates, idata);
                }
            }
            t = t_end;
            if state.iter().any(|v| !v.value().is_finite()) {
                return Err(IntegratorError::NonFiniteState { time: t });
            }
            out.push(state.clone());
        }

        Ok(out)
    }
}

/// One RK4 step of length `h` starting at `(t, y)`.
#[allow(clippy::too_many_arguments)]
fn step<T, F>(
    rhs: &F,
    t: f64,
    y: &DVector<T>,
    h: f64,
    params: &DVector<T>,
    rates: &[f64],
    idata: &[i32],
) -> DVector<T>
where
    T: Scalar,
    F: Fn(f64, &DVector<T>, &DVector<T>, &[f64], &[i32]) -> DVector<T>,
{
    let half = 0.5 * h;
    let k1 = rhs(t, y, params, rates, idata);
    let k2 = rhs(t + half, &axpy(y, half, &k1), params, rates, idata);
    let k3 = rhs(t + half, &axpy(y, half, &k2), params, rates, idata);
    let k4 = rhs(t + h, &axpy(y, h, &k3), params, rates, idata);

    let sixth = T::from_f64(h / 6.0);
    let two = T::from_f64(2.0);
    DVector::from_iterator(
        y.len(),
        (0..y.len()).map(|i| y[i] + sixth * (k1[i] + two * k2[i] + two * k3[i] + k4[i])),
    )
}

/// `y + a * k`, elementwise, without requiring vector-space ops on `T`.
fn axpy<T: Scalar>(y: &DVector<T>, a: f64, k: &DVector<T>) -> DVector<T> {
    let a = T::from_f64(a);
    DVector::from_iterator(y.len(), y.iter().zip(k.iter()).map(|(yi, ki)| *yi + a * *ki))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::Dual;
    use approx::assert_relative_eq;

    fn decay<T: Scalar>(
        _t: f64,
        x: &DVector<T>,
        p: &DVector<T>,
        rates: &[f64],
        _idata: &[i32],
    ) -> DVector<T> {
        DVector::from_element(1, T::from_f64(rates[0]) - p[0] * x[0])
    }

    #[test]
    fn matches_exponential_decay() {
        let rk4 = Rk4::new(1e-2);
        let x0 = DVector::from_element(1, 100.0);
        let p = DVector::from_element(1, 0.3);
        let states = rk4
            .integrate(&decay::<f64>, x0, 0.0, &[5.0], &p, &[0.0], &[])
            .unwrap();
        assert_eq!(states.len(), 1);
        assert_relative_eq!(states[0][0], 100.0 * (-1.5f64).exp(), epsilon = 1e-8);
    }

    #[test]
    fn hits_every_requested_output_time() {
        let rk4 = Rk4::new(1e-2);
        let x0 = DVector::from_element(1, 10.0);
        let p = DVector::from_element(1, 0.1);
        let states = rk4
            .integrate(&decay::<f64>, x0, 0.0, &[1.0, 2.0, 4.0], &p, &[0.0], &[])
            .unwrap();
        assert_eq!(states.len(), 3);
        for (t, s) in [1.0, 2.0, 4.0].iter().zip(&states) {
            assert_relative_eq!(s[0], 10.0 * (-0.1 * t).exp(), epsilon = 1e-9);
        }
    }

    #[test]
    fn zero_length_span_returns_initial_state() {
        let rk4 = Rk4::default();
        let x0 = DVector::from_element(1, 7.0);
        let p = DVector::from_element(1, 0.2);
        let states = rk4
            .integrate(&decay::<f64>, x0, 0.0, &[0.0], &p, &[0.0], &[])
            .unwrap();
        assert_eq!(states[0][0], 7.0);
    }

    #[test]
    fn rejects_backwards_output_times() {
        let rk4 = Rk4::default();
        let x0 = DVector::from_element(1, 1.0);
        let p = DVector::from_element(1, 0.1);
        let err = rk4
            .integrate(&decay::<f64>, x0, 1.0, &[0.5], &p, &[0.0], &[])
            .unwrap_err();
        assert_eq!(err, IntegratorError::InvalidSpan { t0: 1.0, t1: 0.5 });
    }

    #[test]
    fn propagates_dual_tangents_through_the_solution() {
        // x(t) = x0 * exp(-k t); dx/dk = -t * x(t)
        let rk4 = Rk4::new(1e-2);
        let x0 = DVector::from_element(1, Dual::constant(100.0));
        let p = DVector::from_element(1, Dual::var(0.3));
        let states = rk4
            .integrate(&decay::<Dual>, x0, 0.0, &[5.0], &p, &[0.0], &[])
            .unwrap();
        let expected = 100.0 * (-1.5f64).exp();
        assert_relative_eq!(states[0][0].val, expected, epsilon = 1e-8);
        assert_relative_eq!(states[0][0].dot, -5.0 * expected, epsilon = 1e-6);
    }
}
