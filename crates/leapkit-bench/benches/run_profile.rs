//! Criterion benchmarks for whole trajectories.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use leapkit_bench::{bench_config, reference_profile, stress_profile};
use leapkit_core::NoRules;
use leapkit_engine::{LeapMode, SimConfig, Simulator};
use leapkit_kinetics::MassAction;

fn bench_run_reference(c: &mut Criterion) {
    let profile = reference_profile().unwrap();
    let sim = Simulator::new(&profile.network, &MassAction, &NoRules);
    let cfg = bench_config(5.0, 42);

    c.bench_function("run_reference_pure", |b| {
        b.iter(|| {
            let traj = sim.run(&profile.initial, &cfg).unwrap();
            black_box(traj.len());
        });
    });

    let hybrid = SimConfig {
        mode: LeapMode::HybridFloor,
        ..cfg.clone()
    };
    c.bench_function("run_reference_hybrid", |b| {
        b.iter(|| {
            let traj = sim.run(&profile.initial, &hybrid).unwrap();
            black_box(traj.len());
        });
    });
}

fn bench_run_checkpoints(c: &mut Criterion) {
    let profile = reference_profile().unwrap();
    let sim = Simulator::new(&profile.network, &MassAction, &NoRules);
    let cfg = SimConfig::checkpoints((0..=50).map(|i| f64::from(i) * 0.1).collect::<Vec<_>>());

    c.bench_function("run_reference_checkpoints", |b| {
        b.iter(|| {
            let traj = sim.run(&profile.initial, &cfg).unwrap();
            black_box(traj.len());
        });
    });
}

fn bench_run_stress(c: &mut Criterion) {
    let profile = stress_profile(200).unwrap();
    let sim = Simulator::new(&profile.network, &MassAction, &NoRules);
    let cfg = bench_config(0.05, 42);

    c.bench_function("run_stress_200", |b| {
        b.iter(|| {
            let traj = sim.run(&profile.initial, &cfg).unwrap();
            black_box(traj.len());
        });
    });
}

criterion_group!(
    benches,
    bench_run_reference,
    bench_run_checkpoints,
    bench_run_stress
);
criterion_main!(benches);
