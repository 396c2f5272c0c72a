//! The simulation loop.
//!
//! [`Simulator`] ties the network and its two collaborators together and
//! runs one trajectory per [`run`](Simulator::run) call. Each iteration:
//!
//! 1. poll the deadline and cancellation token,
//! 2. evaluate and clamp propensities,
//! 3. size the step (controller, degenerate policy, `max_leap`, shrink),
//! 4. clamp to the next checkpoint if the step would overshoot it,
//! 5. attempt the leap, then apply rules and record on acceptance.
//!
//! A rejected leap leaves state and time unchanged and the next
//! iteration retries from the same state with a shrunken step.

use std::time::Instant;

use leapkit_core::{
    DerivedCache, PropensityError, PropensityEvaluator, ReactionId, ReactionNetwork, RuleEngine,
    SpeciesId,
};
use log::{debug, trace, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::{DegeneratePolicy, Reporting, SimConfig};
use crate::controller::LeapSizeController;
use crate::error::{InputError, SimError};
use crate::executor::{LeapExecutor, LeapOutcome};
use crate::metrics::RunMetrics;
use crate::trajectory::{Termination, Trajectory};

/// First non-exempt reacting species below zero, in network order.
fn first_negative(network: &ReactionNetwork, state: &[f64], exempt: &[bool]) -> Option<SpeciesId> {
    network
        .reacting()
        .iter()
        .copied()
        .find(|s| state[s.index()] < 0.0 && !exempt[s.index()])
}

/// `tau · factor^rejections`, with the exponent saturating at `i32::MAX`.
fn shrink(tau: f64, factor: f64, rejections: u32) -> f64 {
    if rejections == 0 {
        return tau;
    }
    tau * factor.powi(i32::try_from(rejections).unwrap_or(i32::MAX))
}

/// Runs tau-leaping trajectories over a fixed network.
///
/// Holds only shared references; one `Simulator` can run any number of
/// trajectories with different configurations and seeds.
pub struct Simulator<'a> {
    network: &'a ReactionNetwork,
    evaluator: &'a dyn PropensityEvaluator,
    rules: &'a dyn RuleEngine,
}

impl<'a> Simulator<'a> {
    /// Bind a network to its propensity evaluator and rule engine.
    pub fn new(
        network: &'a ReactionNetwork,
        evaluator: &'a dyn PropensityEvaluator,
        rules: &'a dyn RuleEngine,
    ) -> Self {
        Self {
            network,
            evaluator,
            rules,
        }
    }

    /// Simulate one trajectory from `initial`.
    ///
    /// `initial` has one entry per declared species, reserved species
    /// included, in network order. The run is a pure function of the
    /// network, `initial`, and `config` (seed included): identical inputs
    /// give bit-identical trajectories.
    ///
    /// # Errors
    ///
    /// - [`SimError::InvalidConfiguration`] before any simulation work.
    /// - [`SimError::DegenerateStepSize`] under [`DegeneratePolicy::Fail`].
    /// - [`SimError::FatalStall`] when the rejection budget runs out.
    /// - [`SimError::RuleViolation`] when rules push a non-exempt
    ///   reacting species below zero.
    /// - [`SimError::Propensity`] / [`SimError::Sampling`] from the
    ///   evaluator or the Poisson sampler.
    pub fn run(&self, initial: &[f64], config: &SimConfig) -> Result<Trajectory, SimError> {
        let started = Instant::now();
        let network = self.network;

        config.validate()?;
        let exempt = config.exempt_mask(network)?;
        network.check_state(initial)?;

        let mut state = initial.to_vec();
        let mut cache = DerivedCache::new(network.species_count());
        self.rules.apply(&mut state, &mut cache);
        network.check_state(&state)?;
        if let Some(s) = first_negative(network, &state, &exempt) {
            return Err(InputError::NegativeInitial {
                name: network.species_name(s).unwrap_or_default().to_string(),
                value: state[s.index()],
            }
            .into());
        }

        let controller = LeapSizeController::new(network, config.epsilon(), config.mode);
        let mut executor = LeapExecutor::new(network, exempt.clone());
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed.value());
        let mut rates = vec![0.0; network.reaction_count()];
        let mut metrics = RunMetrics::default();

        let names = |ids: &[SpeciesId]| {
            ids.iter()
                .map(|&s| network.species_name(s).unwrap_or_default().to_string())
                .collect::<Vec<_>>()
        };
        let mut trajectory = Trajectory::new(names(network.reacting()), names(network.reserved()));

        let (checkpoints, t_end): (&[f64], f64) = match &config.reporting {
            Reporting::FreeRunning { t_end } => (&[], *t_end),
            Reporting::Checkpoints(c) => (c.as_slice(), c.last().copied().unwrap_or(0.0)),
        };
        let aligned = matches!(config.reporting, Reporting::Checkpoints(_));

        let mut t = config.reporting.start_time();
        self.record(&mut trajectory, t, &state);
        let mut cursor = 1usize;
        let mut consecutive = 0u32;

        debug!(
            "simulating {} species / {} reactions, mode {:?}, seed {}, t_end {}",
            network.species_count(),
            network.reaction_count(),
            config.mode,
            config.seed.value(),
            t_end,
        );

        let termination = loop {
            let done = if aligned {
                cursor >= checkpoints.len()
            } else {
                t >= t_end
            };
            if done {
                break Termination::Completed;
            }
            if config.limits.deadline.is_some_and(|d| Instant::now() >= d) {
                break Termination::DeadlineElapsed;
            }
            if config
                .limits
                .cancel
                .as_ref()
                .is_some_and(|c| c.is_cancelled())
            {
                break Termination::Cancelled;
            }

            self.evaluate(&state, &mut rates)?;
            metrics.propensity_evaluations += 1;

            let horizon = if aligned { checkpoints[cursor] } else { t_end };
            let mut jumped = false;
            let mut tau = match controller.leap_size(network, &state, &rates, &mut rng) {
                Some(tau) => tau,
                None => match config.degenerate {
                    DegeneratePolicy::Fail => {
                        return Err(SimError::DegenerateStepSize { time: t });
                    }
                    DegeneratePolicy::JumpToHorizon => {
                        metrics.degenerate_jumps += 1;
                        warn!("degenerate step size at t = {t}, jumping toward {horizon}");
                        match config.max_leap {
                            Some(cap) => cap,
                            None => {
                                jumped = true;
                                horizon - t
                            }
                        }
                    }
                },
            };
            if let Some(cap) = config.max_leap {
                tau = tau.min(cap);
            }
            tau = shrink(tau, config.rejection.shrink_factor, consecutive);
            let mut snap = jumped && consecutive == 0;
            let clamped = aligned && (snap || t + tau >= horizon);
            if clamped {
                trace!("clamping step {tau} to checkpoint {horizon} at t = {t}");
                tau = horizon - t;
                snap = true;
            }

            match executor.try_leap(network, &mut state, &rates, tau, &mut rng)? {
                LeapOutcome::Accepted => {
                    self.rules.apply(&mut state, &mut cache);
                    t = if snap { horizon } else { t + tau };
                    if let Some(s) = first_negative(network, &state, &exempt) {
                        return Err(SimError::RuleViolation {
                            time: t,
                            name: network.species_name(s).unwrap_or_default().to_string(),
                            value: state[s.index()],
                        });
                    }
                    metrics.accepted_leaps += 1;
                    consecutive = 0;
                    if !aligned {
                        self.record(&mut trajectory, t, &state);
                    } else if clamped {
                        self.record(&mut trajectory, t, &state);
                        metrics.clamped_leaps += 1;
                        cursor += 1;
                    }
                }
                LeapOutcome::Rejected { species } => {
                    consecutive += 1;
                    metrics.rejected_leaps += 1;
                    metrics.max_consecutive_rejections =
                        metrics.max_consecutive_rejections.max(consecutive);
                    trace!(
                        "rejected leap of {tau} at t = {t}: '{}' would go negative ({consecutive} in a row)",
                        network.species_name(species).unwrap_or_default(),
                    );
                    if consecutive >= config.rejection.max_consecutive {
                        return Err(SimError::FatalStall {
                            time: t,
                            attempts: consecutive,
                        });
                    }
                }
            }
        };

        if aligned {
            let padded = trajectory.pad(&checkpoints[cursor.min(checkpoints.len())..]);
            metrics.padded_samples = padded as u64;
        }
        if termination != Termination::Completed {
            warn!(
                "run stopped early at t = {t} ({termination:?}), {} samples recorded",
                trajectory.len()
            );
        }

        metrics.total_us = started.elapsed().as_micros() as u64;
        debug!(
            "finished at t = {t}: {} accepted, {} rejected, {} samples in {}us",
            metrics.accepted_leaps,
            metrics.rejected_leaps,
            trajectory.len(),
            metrics.total_us,
        );
        trajectory.finish(termination, metrics);
        Ok(trajectory)
    }

    /// Evaluate propensities, clamping small negatives to zero.
    fn evaluate(&self, state: &[f64], rates: &mut [f64]) -> Result<(), SimError> {
        self.evaluator.compute(self.network, state, rates)?;
        for (j, rate) in rates.iter_mut().enumerate() {
            if !rate.is_finite() {
                return Err(PropensityError::NonFinite {
                    reaction: ReactionId(j as u32),
                    value: *rate,
                }
                .into());
            }
            if *rate < 0.0 {
                trace!("clamping propensity {} of reaction {j} to zero", *rate);
                *rate = 0.0;
            }
        }
        Ok(())
    }

    fn record(&self, trajectory: &mut Trajectory, t: f64, state: &[f64]) {
        trajectory.push(
            t,
            self.network.reacting().iter().map(|s| state[s.index()]),
            self.network.reserved().iter().map(|s| state[s.index()]),
        );
    }
}

/// Run a single trajectory. Shorthand for
/// [`Simulator::new`] followed by [`Simulator::run`].
pub fn simulate(
    network: &ReactionNetwork,
    evaluator: &dyn PropensityEvaluator,
    rules: &dyn RuleEngine,
    initial: &[f64],
    config: &SimConfig,
) -> Result<Trajectory, SimError> {
    Simulator::new(network, evaluator, rules).run(initial, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use leapkit_core::{NetworkBuilder, NoRules, RateConstants};

    /// Mass-action `A -> B` without pulling in the kinetics crate.
    struct FirstOrder(f64);

    impl PropensityEvaluator for FirstOrder {
        fn name(&self) -> &str {
            "first-order"
        }

        fn compute(
            &self,
            _network: &ReactionNetwork,
            concentrations: &[f64],
            rates: &mut [f64],
        ) -> Result<(), PropensityError> {
            rates[0] = self.0 * concentrations[0];
            Ok(())
        }
    }

    fn conversion() -> ReactionNetwork {
        NetworkBuilder::new()
            .species("A")
            .species("B")
            .reaction(&[("A", 1)], &[("B", 1)], RateConstants::Irreversible(0.1))
            .build()
            .unwrap()
    }

    #[test]
    fn checkpoint_run_hits_every_checkpoint() {
        let net = conversion();
        let checkpoints: Vec<f64> = (0..=10).map(f64::from).collect();
        let cfg = SimConfig::checkpoints(checkpoints.clone());
        let traj = simulate(&net, &FirstOrder(0.1), &NoRules, &[100.0, 0.0], &cfg).unwrap();
        assert_eq!(traj.times(), checkpoints.as_slice());
        assert_eq!(traj.termination(), Termination::Completed);
        assert_eq!(traj.metrics().clamped_leaps, 10);
        assert_eq!(traj.metrics().padded_samples, 0);
    }

    #[test]
    fn free_running_times_strictly_increase() {
        let net = conversion();
        let cfg = SimConfig::free_running(5.0);
        let traj = simulate(&net, &FirstOrder(0.1), &NoRules, &[100.0, 0.0], &cfg).unwrap();
        assert_eq!(traj.times()[0], 0.0);
        assert!(traj.times().windows(2).all(|w| w[1] > w[0]));
        assert!(traj.last().unwrap().0 >= 5.0);
        assert_eq!(traj.len() as u64, traj.metrics().accepted_leaps + 1);
    }

    #[test]
    fn invalid_inputs_detected_before_running() {
        let net = conversion();
        let cfg = SimConfig::free_running(1.0);
        match simulate(&net, &FirstOrder(0.1), &NoRules, &[100.0], &cfg) {
            Err(SimError::InvalidConfiguration(InputError::Network(_))) => {}
            other => panic!("expected InvalidConfiguration, got {other:?}"),
        }
        match simulate(&net, &FirstOrder(0.1), &NoRules, &[-1.0, 0.0], &cfg) {
            Err(SimError::InvalidConfiguration(InputError::NegativeInitial { name, .. })) => {
                assert_eq!(name, "A");
            }
            other => panic!("expected NegativeInitial, got {other:?}"),
        }
    }

    #[test]
    fn non_finite_propensity_is_an_error() {
        let net = conversion();
        let cfg = SimConfig::free_running(1.0);
        match simulate(&net, &FirstOrder(f64::NAN), &NoRules, &[100.0, 0.0], &cfg) {
            Err(SimError::Propensity(PropensityError::NonFinite { reaction, .. })) => {
                assert_eq!(reaction, ReactionId(0));
            }
            other => panic!("expected NonFinite, got {other:?}"),
        }
    }

    #[test]
    fn exhausted_species_jumps_to_horizon() {
        let net = conversion();
        let cfg = SimConfig::free_running(2.0);
        let traj = simulate(&net, &FirstOrder(0.1), &NoRules, &[0.0, 5.0], &cfg).unwrap();
        assert_eq!(traj.times(), &[0.0, 2.0]);
        assert_eq!(traj.metrics().degenerate_jumps, 1);
    }

    #[test]
    fn shrink_saturates_huge_rejection_counts() {
        assert_eq!(shrink(0.8, 0.5, 0), 0.8);
        assert_eq!(shrink(0.8, 0.5, 2), 0.2);
        let tiny = shrink(0.8, 0.5, u32::MAX);
        assert!(tiny.is_finite());
        assert_eq!(tiny, 0.0);
        assert_eq!(shrink(0.8, 1.0, u32::MAX), 0.8);
    }
}
