use criterion::black_box;
use criterion::{criterion_group, criterion_main, Criterion};
use nalgebra::DVector;
use steadysol::prelude::*;

fn one_compartment<T: Scalar>(
    _t: f64,
    x: &DVector<T>,
    p: &DVector<T>,
    rates: &[f64],
    _idata: &[i32],
) -> DVector<T> {
    DVector::from_element(1, T::from_f64(rates[0]) - p[0] * x[0])
}

fn bolus_f64(c: &mut Criterion) {
    let system = SteadyStateResidual::fixed_amount(one_compartment::<f64>, Rk4::new(1e-2), 12.0, 1);
    let x = DVector::from_element(1, 20.0);
    let y = DVector::from_element(1, 0.1);
    c.bench_function("bolus_residual_f64", |b| {
        b.iter(|| black_box(system.evaluate(&x, &y, &[0.0, 100.0], &[]).unwrap()))
    });
}

fn bolus_dual(c: &mut Criterion) {
    let system =
        SteadyStateResidual::fixed_amount(one_compartment::<Dual>, Rk4::new(1e-2), 12.0, 1);
    let x = DVector::from_element(1, Dual::constant(20.0));
    let y = DVector::from_element(1, Dual::var(0.1));
    c.bench_function("bolus_residual_dual", |b| {
        b.iter(|| black_box(system.evaluate(&x, &y, &[0.0, 100.0], &[]).unwrap()))
    });
}

fn truncated_infusion_f64(c: &mut Criterion) {
    let system = SteadyStateResidual::fixed_amount(one_compartment::<f64>, Rk4::new(1e-2), 10.0, 1);
    let x = DVector::from_element(1, 15.0);
    let y = DVector::from_element(1, 0.2);
    c.bench_function("truncated_infusion_residual_f64", |b| {
        b.iter(|| black_box(system.evaluate(&x, &y, &[2.0, 4.0], &[]).unwrap()))
    });
}

fn constant_infusion_f64(c: &mut Criterion) {
    let system = SteadyStateResidual::fixed_amount(one_compartment::<f64>, Rk4::new(1e-2), 0.0, 1);
    let x = DVector::from_element(1, 50.0);
    let y = DVector::from_element(1, 0.1);
    c.bench_function("constant_infusion_residual_f64", |b| {
        b.iter(|| black_box(system.evaluate(&x, &y, &[5.0, 0.0], &[]).unwrap()))
    });
}

criterion_group!(
    benches,
    bolus_f64,
    bolus_dual,
    truncated_infusion_f64,
    constant_infusion_f64
);
criterion_main!(benches);
