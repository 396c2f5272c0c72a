//! Collaborator traits: propensity evaluation and rule application.
//!
//! The engine never computes reaction rates or derived species itself.
//! It calls out through these two seams, so kinetics laws and algebraic
//! rules can be swapped without touching the leap loop.

use crate::error::PropensityError;
use crate::id::SpeciesId;
use crate::network::ReactionNetwork;

/// Computes per-reaction propensities from the current state.
///
/// # Contract
///
/// - `compute()` MUST be pure in `concentrations`: same inputs produce
///   identical outputs. The engine relies on this for bit-identical
///   trajectories.
/// - `rates` has exactly `network.reaction_count()` entries. Write every
///   entry.
/// - Rates should be non-negative. Small negative values from upstream
///   floating error are clamped to zero by the engine; NaN or infinity is
///   an error.
///
/// # Examples
///
/// ```
/// use leapkit_core::{PropensityError, PropensityEvaluator, ReactionNetwork};
///
/// /// Every reaction fires at a fixed rate regardless of state.
/// struct Constant(f64);
///
/// impl PropensityEvaluator for Constant {
///     fn name(&self) -> &str { "constant" }
///
///     fn compute(
///         &self,
///         _network: &ReactionNetwork,
///         _concentrations: &[f64],
///         rates: &mut [f64],
///     ) -> Result<(), PropensityError> {
///         rates.fill(self.0);
///         Ok(())
///     }
/// }
/// ```
pub trait PropensityEvaluator: Send + Sync {
    /// Human-readable name for error reporting and logs.
    fn name(&self) -> &str;

    /// Fill `rates` with one propensity per reaction.
    ///
    /// `concentrations` covers every declared species in network order,
    /// reserved species included. Rate constants and reactant/product
    /// coefficients come from `network.reactions()`.
    fn compute(
        &self,
        network: &ReactionNetwork,
        concentrations: &[f64],
        rates: &mut [f64],
    ) -> Result<(), PropensityError>;
}

/// Last value written to each rule-derived species.
///
/// Handed to [`RuleEngine::apply`] on every call so rules can see what
/// they produced previously. One cache lives per trajectory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DerivedCache {
    values: Vec<Option<f64>>,
}

impl DerivedCache {
    /// Empty cache sized for `species_count` species.
    pub fn new(species_count: usize) -> Self {
        Self {
            values: vec![None; species_count],
        }
    }

    /// Previously derived value of `species`, if any.
    pub fn get(&self, species: SpeciesId) -> Option<f64> {
        self.values.get(species.index()).copied().flatten()
    }

    /// Record a derived value.
    pub fn set(&mut self, species: SpeciesId, value: f64) {
        let i = species.index();
        if i >= self.values.len() {
            self.values.resize(i + 1, None);
        }
        self.values[i] = Some(value);
    }

    /// Number of species with a recorded value.
    pub fn derived_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

/// Enforces algebraic/assignment relationships on the state.
///
/// Invoked once on the initial state and once after every accepted leap.
/// Implementations mutate `concentrations` in place.
pub trait RuleEngine: Send + Sync {
    /// Apply all rules to `concentrations`.
    fn apply(&self, concentrations: &mut [f64], cache: &mut DerivedCache);
}

/// A rule engine with no rules.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRules;

impl RuleEngine for NoRules {
    fn apply(&self, _concentrations: &mut [f64], _cache: &mut DerivedCache) {}
}
