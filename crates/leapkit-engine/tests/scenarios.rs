//! Integration test: end-to-end runs on small reference networks.
//!
//! Each test drives the full loop through the mass-action evaluator and
//! checks an observable property of the resulting trajectory: ordering
//! of times, nonnegativity, conservation, and the behaviour of reserved
//! and rule-derived species.

use approx::assert_relative_eq;
use leapkit_core::{NetworkBuilder, NoRules, RateConstants};
use leapkit_engine::{simulate, LeapMode, Seed, SimConfig, Simulator, Termination};
use leapkit_kinetics::{AssignmentRules, MassAction};
use leapkit_test_utils::{networks, ConstantPropensity, CountingRules};

fn unit_checkpoints(n: u32) -> Vec<f64> {
    (0..=n).map(f64::from).collect()
}

#[test]
fn conversion_hits_every_checkpoint() {
    let net = networks::conversion(0.1);
    let cfg = SimConfig {
        seed: Seed::new(11),
        ..SimConfig::checkpoints(unit_checkpoints(10))
    };
    let traj = simulate(&net, &MassAction, &NoRules, &[100.0, 0.0], &cfg).unwrap();

    assert_eq!(traj.len(), 11);
    assert_eq!(traj.times(), unit_checkpoints(10).as_slice());
    assert_eq!(traj.termination(), Termination::Completed);

    let a = traj.column("A").unwrap();
    let b = traj.column("B").unwrap();
    assert!(a.windows(2).all(|w| w[1] <= w[0]), "A increased: {a:?}");
    assert!(b.windows(2).all(|w| w[1] >= w[0]), "B decreased: {b:?}");
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x + y, 100.0);
    }
    assert!(a[10] < 100.0, "no conversion happened");
}

#[test]
fn reversible_isomerization_conserves_mass() {
    let net = networks::isomerization(0.5, 0.5);
    for seed in 0..5 {
        let cfg = SimConfig {
            seed: Seed::new(seed),
            ..SimConfig::free_running(10.0)
        };
        let traj = simulate(&net, &MassAction, &NoRules, &[100.0, 0.0], &cfg).unwrap();
        for (_, x) in traj.samples() {
            assert!(x[0] >= 0.0 && x[1] >= 0.0);
            assert_eq!(x[0] + x[1], 100.0);
        }
    }
}

#[test]
fn net_rate_below_zero_is_clamped() {
    // kb·B dominates kf·A, so the single net column never fires.
    let net = networks::isomerization(0.5, 0.5);
    let cfg = SimConfig::checkpoints(vec![0.0, 1.0, 2.0]);
    let traj = simulate(&net, &MassAction, &NoRules, &[30.0, 70.0], &cfg).unwrap();
    for (_, x) in traj.samples() {
        assert_eq!(x, &[30.0, 70.0]);
    }
    assert_eq!(traj.metrics().degenerate_jumps, 2);
}

#[test]
fn hybrid_floor_takes_at_least_as_many_leaps() {
    let net = networks::decay(1.0);
    let run = |mode| {
        let cfg = SimConfig {
            mode,
            seed: Seed::new(2024),
            ..SimConfig::free_running(1.0)
        };
        simulate(&net, &MassAction, &NoRules, &[1000.0], &cfg).unwrap()
    };
    let pure = run(LeapMode::PureLeap);
    let hybrid = run(LeapMode::HybridFloor);
    assert!(pure.metrics().accepted_leaps > 1);
    assert!(hybrid.metrics().accepted_leaps >= pure.metrics().accepted_leaps);
}

#[test]
fn pure_leap_step_is_epsilon_for_large_first_order_populations() {
    // x·ε ≥ 1 and x ≥ 1/ε: τ = bound/|μ| = ε.
    let net = networks::decay(1.0);
    let cfg = SimConfig::free_running(0.2);
    let traj = simulate(&net, &MassAction, &NoRules, &[1000.0], &cfg).unwrap();
    for w in traj.times().windows(2) {
        assert_relative_eq!(w[1] - w[0], 0.045, epsilon = 1e-9);
    }
}

#[test]
fn reserved_clock_tracks_simulation_time() {
    let net = networks::conversion_with_clock(0.2);
    let cfg = SimConfig::checkpoints(unit_checkpoints(5));
    let traj = simulate(&net, &MassAction, &NoRules, &[50.0, 0.0, 0.0], &cfg).unwrap();

    assert_eq!(traj.species(), &["A".to_string(), "B".to_string()]);
    assert_eq!(traj.reserved_species(), &["time".to_string()]);
    assert_eq!(traj.sample(0).unwrap().len(), 2);

    let clock = traj.column("time").unwrap();
    for (c, t) in clock.iter().zip(traj.times()) {
        assert_relative_eq!(*c, *t, epsilon = 1e-9);
    }

    let cfg = SimConfig::free_running(3.0);
    let traj = simulate(&net, &MassAction, &NoRules, &[50.0, 0.0, 0.0], &cfg).unwrap();
    let clock = traj.column("time").unwrap();
    for (c, t) in clock.iter().zip(traj.times()) {
        assert_relative_eq!(*c, *t, epsilon = 1e-9);
    }
}

#[test]
fn assignment_rules_run_on_every_sample() {
    let net = NetworkBuilder::new()
        .species("A")
        .species("B")
        .species("total")
        .reaction(&[("A", 1)], &[("B", 1)], RateConstants::Irreversible(0.3))
        .build()
        .unwrap();
    let rules = AssignmentRules::builder(&net)
        .assign("total", &["A", "B"], |v| v[0] + v[1])
        .build()
        .unwrap();
    let cfg = SimConfig::free_running(5.0);
    // `total` starts wrong; the initial rule pass fixes it.
    let traj = simulate(&net, &MassAction, &rules, &[60.0, 40.0, 0.0], &cfg).unwrap();
    for (_, x) in traj.samples() {
        assert_eq!(x[2], x[0] + x[1]);
        assert_eq!(x[2], 100.0);
    }
}

#[test]
fn rules_invoked_once_initially_and_per_accepted_leap() {
    let net = networks::conversion(0.1);
    let rules = CountingRules::new();
    let cfg = SimConfig::free_running(4.0);
    let traj = simulate(&net, &MassAction, &rules, &[100.0, 0.0], &cfg).unwrap();
    assert_eq!(rules.calls() as u64, traj.metrics().accepted_leaps + 1);
}

#[test]
fn exempt_species_may_go_negative() {
    let net = networks::decay(1.0);
    let mut cfg = SimConfig::free_running(1.0);
    cfg.exempt.insert("A".to_string());
    let traj = simulate(&net, &ConstantPropensity::new(50.0), &NoRules, &[10.0], &cfg).unwrap();
    assert_eq!(traj.metrics().rejected_leaps, 0);
    assert!(traj.last().unwrap().1[0] < 0.0);
}

#[test]
fn identical_seeds_give_identical_trajectories() {
    let net = networks::binding(0.01, 0.5);
    let sim = Simulator::new(&net, &MassAction, &NoRules);
    let cfg = SimConfig {
        seed: Seed::new(7),
        ..SimConfig::free_running(2.0)
    };
    let a = sim.run(&[120.0, 80.0, 0.0], &cfg).unwrap();
    let b = sim.run(&[120.0, 80.0, 0.0], &cfg).unwrap();
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_eq!(a.times(), b.times());
    assert_eq!(a, b);

    let other = SimConfig {
        seed: Seed::new(8),
        ..cfg.clone()
    };
    let c = sim.run(&[120.0, 80.0, 0.0], &other).unwrap();
    assert_ne!(a.fingerprint(), c.fingerprint());
}

#[test]
fn legacy_seed_matches_scaled_seed() {
    let net = networks::conversion(0.1);
    let run = |seed| {
        let cfg = SimConfig {
            seed,
            ..SimConfig::free_running(3.0)
        };
        simulate(&net, &MassAction, &NoRules, &[100.0, 0.0], &cfg)
            .unwrap()
            .fingerprint()
    };
    assert_eq!(run(Seed::legacy(0.42)), run(Seed::new(42)));
}
