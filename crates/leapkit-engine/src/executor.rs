//! Sampling and committing a single leap.
//!
//! Firings are drawn as `k_j ~ Poisson(a_j · τ)`. The resulting update
//! `Δx = ν · k` is staged in a scratch buffer and only committed if no
//! non-exempt reacting species would drop below zero. A rejected leap
//! leaves the state untouched.

use leapkit_core::{ReactionId, ReactionNetwork, SpeciesId};
use rand::Rng;
use rand_distr::{Distribution, Poisson};

use crate::error::SimError;

/// Result of a leap attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeapOutcome {
    /// The update was committed.
    Accepted,
    /// The update was discarded because `species` would have gone
    /// negative.
    Rejected {
        /// First offending species in network order.
        species: SpeciesId,
    },
}

/// Applies sampled firings to a state vector, all-or-nothing.
///
/// Owns its scratch buffers so a run allocates them once.
#[derive(Clone, Debug)]
pub struct LeapExecutor {
    reacting: Vec<SpeciesId>,
    reserved: Vec<SpeciesId>,
    exempt: Vec<bool>,
    firings: Vec<f64>,
    staged: Vec<f64>,
}

impl LeapExecutor {
    /// Executor for `network`. `exempt` is a per-species mask in network
    /// order; exempt species may go negative.
    pub fn new(network: &ReactionNetwork, exempt: Vec<bool>) -> Self {
        Self {
            reacting: network.reacting().to_vec(),
            reserved: network.reserved().to_vec(),
            exempt,
            firings: vec![0.0; network.reaction_count()],
            staged: vec![0.0; network.reacting().len()],
        }
    }

    /// Whether `species` is allowed to go negative.
    pub fn is_exempt(&self, species: SpeciesId) -> bool {
        self.exempt.get(species.index()).copied().unwrap_or(false)
    }

    /// Firing counts drawn by the most recent attempt.
    pub fn last_firings(&self) -> &[f64] {
        &self.firings
    }

    /// Draw firings for a step of length `tau` and try to commit them.
    ///
    /// On acceptance the reacting species of `state` hold the updated
    /// counts and every reserved species has advanced by `tau`. Rule
    /// application and the clock are the caller's responsibility.
    ///
    /// # Errors
    ///
    /// [`SimError::Sampling`] if some mean `a_j · τ` is non-finite or too
    /// large for the Poisson sampler.
    pub fn try_leap<R: Rng + ?Sized>(
        &mut self,
        network: &ReactionNetwork,
        state: &mut [f64],
        rates: &[f64],
        tau: f64,
        rng: &mut R,
    ) -> Result<LeapOutcome, SimError> {
        for (j, (k, &a)) in self.firings.iter_mut().zip(rates).enumerate() {
            let mean = a * tau;
            *k = if mean == 0.0 {
                0.0
            } else {
                let poisson = Poisson::new(mean).map_err(|_| SimError::Sampling {
                    reaction: ReactionId(j as u32),
                    mean,
                })?;
                poisson.sample(rng)
            };
        }

        let stoich = network.stoichiometry();
        for (slot, &species) in self.staged.iter_mut().zip(&self.reacting) {
            let i = species.index();
            let next = state[i] + stoich.apply_firings(i, &self.firings);
            if next < 0.0 && !self.exempt[i] {
                return Ok(LeapOutcome::Rejected { species });
            }
            *slot = next;
        }

        for (&value, &species) in self.staged.iter().zip(&self.reacting) {
            state[species.index()] = value;
        }
        for &species in &self.reserved {
            state[species.index()] += tau;
        }
        Ok(LeapOutcome::Accepted)
    }
}
