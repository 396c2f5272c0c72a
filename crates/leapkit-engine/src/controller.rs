//! Leap-size selection.
//!
//! Each reacting species `i` gets a [`LeapOrder`] at setup. Per step the
//! controller bounds the expected drift `μ_i = (ν·a)_i` and variance
//! `σ²_i = (ν²·a)_i` by
//!
//! ```text
//! bound_i = max(x_i / g_i(x_i) · ε, 1)
//! τ_leap  = min_i(bound_i / |μ_i|, bound_i² / |σ²_i|)   over nonzero terms
//! ```
//!
//! In [`LeapMode::HybridFloor`] the result is additionally floored by an
//! exponential waiting time with rate `Σa`.

use leapkit_core::{ReactionNetwork, SpeciesId};
use rand::Rng;

use crate::config::LeapMode;

/// Highest-order reaction a species takes part in, as seen from the side
/// of the reaction it appears on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeapOrder {
    /// Every reaction side containing the species has one distinct
    /// species. `max_coeff` is the largest coefficient it carries there.
    OrderOne {
        /// Largest stoichiometric coefficient of the species.
        max_coeff: u32,
    },
    /// Some reaction side containing the species has two distinct species.
    OrderTwo,
    /// Anything else, including species in no reaction.
    Default,
}

impl LeapOrder {
    /// Classify `species` from its participation set.
    ///
    /// A species that is a reactant is judged by the reactant side;
    /// otherwise by the product side.
    pub fn classify(network: &ReactionNetwork, species: SpeciesId) -> Self {
        let mut widest = 0usize;
        let mut max_coeff = 0u32;
        for &rid in network.participation().reactions_of(species) {
            let Some(reaction) = network.reaction(rid) else {
                continue;
            };
            let (side, coeff) = match reaction.reactant_coefficient(species) {
                0 => (&reaction.products, reaction.product_coefficient(species)),
                c => (&reaction.reactants, c),
            };
            if coeff == 0 {
                continue;
            }
            widest = widest.max(side.len());
            max_coeff = max_coeff.max(coeff);
        }
        match widest {
            1 => LeapOrder::OrderOne { max_coeff },
            2 => LeapOrder::OrderTwo,
            _ => LeapOrder::Default,
        }
    }

    /// Highest-order scaling `g(x)`.
    #[inline]
    pub fn g(self, x: f64) -> f64 {
        match self {
            LeapOrder::OrderOne { max_coeff: 1 } => 1.0,
            LeapOrder::OrderOne { .. } => 2.0,
            LeapOrder::OrderTwo if x > 1.0 => 2.0 + 1.0 / (x - 1.0),
            LeapOrder::OrderTwo => 2.0,
            LeapOrder::Default => 1.0,
        }
    }
}

/// Computes the largest safe step for the current state.
#[derive(Clone, Debug)]
pub struct LeapSizeController {
    orders: Vec<(SpeciesId, LeapOrder)>,
    epsilon: f64,
    mode: LeapMode,
}

impl LeapSizeController {
    /// Classify every reacting species of `network`.
    pub fn new(network: &ReactionNetwork, epsilon: f64, mode: LeapMode) -> Self {
        let orders = network
            .reacting()
            .iter()
            .map(|&s| (s, LeapOrder::classify(network, s)))
            .collect();
        Self {
            orders,
            epsilon,
            mode,
        }
    }

    /// Leap order assigned to `species`, if it is a reacting species.
    pub fn order_of(&self, species: SpeciesId) -> Option<LeapOrder> {
        self.orders
            .iter()
            .find(|(s, _)| *s == species)
            .map(|&(_, o)| o)
    }

    /// The mode this controller was built for.
    pub fn mode(&self) -> LeapMode {
        self.mode
    }

    /// The tau-leap bound alone. `None` when every drift and variance
    /// term is zero.
    pub fn tau_leap(&self, network: &ReactionNetwork, state: &[f64], rates: &[f64]) -> Option<f64> {
        let stoich = network.stoichiometry();
        let mut tau = f64::INFINITY;
        for &(species, order) in &self.orders {
            let i = species.index();
            let x = state[i];
            let bound = (x / order.g(x) * self.epsilon).max(1.0);
            let mu = stoich.drift(i, rates).abs();
            let sigma2 = stoich.variance(i, rates).abs();
            if mu > 0.0 {
                tau = tau.min(bound / mu);
            }
            if sigma2 > 0.0 {
                tau = tau.min(bound * bound / sigma2);
            }
        }
        tau.is_finite().then_some(tau)
    }

    /// Step size for this iteration. `None` signals a degenerate step.
    ///
    /// `rates` must already be clamped to be non-negative. In hybrid mode
    /// one uniform variate is drawn per call, whether or not it ends up
    /// driving the step.
    pub fn leap_size<R: Rng + ?Sized>(
        &self,
        network: &ReactionNetwork,
        state: &[f64],
        rates: &[f64],
        rng: &mut R,
    ) -> Option<f64> {
        let tau_leap = self.tau_leap(network, state, rates);
        match self.mode {
            LeapMode::PureLeap => tau_leap,
            LeapMode::HybridFloor => {
                let total: f64 = rates.iter().sum();
                let mut r: f64 = rng.random();
                while r == 0.0 {
                    r = rng.random();
                }
                let tau_gillespie = (1.0 / r).ln() / total;
                let floor = (tau_gillespie.is_finite() && tau_gillespie > 0.0)
                    .then_some(tau_gillespie);
                match (tau_leap, floor) {
                    (Some(a), Some(b)) => Some(a.max(b)),
                    (a, b) => a.or(b),
                }
            }
        }
    }
}
