//! Law-of-mass-action propensities.
//!
//! For reaction `j` with reactant coefficients `c_s`:
//!
//! - irreversible: `a_j = k · Π x_s^c_s`
//! - reversible: `a_j = kf · Π reactants − kb · Π products`
//!
//! A reversible reaction owns a single stoichiometry column, so its
//! propensity is the *net* forward rate. It goes negative when the
//! backward direction dominates; the engine clamps that to zero before
//! sampling.

use leapkit_core::{
    Coefficients, PropensityError, PropensityEvaluator, RateConstants, ReactionNetwork,
};

/// Mass-action propensity evaluator.
#[derive(Clone, Copy, Debug, Default)]
pub struct MassAction;

impl MassAction {
    /// Product of `x_s^c_s` over one side of a reaction.
    #[inline]
    fn mass_product(side: &Coefficients, x: &[f64]) -> f64 {
        side.iter()
            .map(|&(s, c)| x[s.index()].powi(c as i32))
            .product()
    }
}

impl PropensityEvaluator for MassAction {
    fn name(&self) -> &str {
        "MassAction"
    }

    fn compute(
        &self,
        network: &ReactionNetwork,
        concentrations: &[f64],
        rates: &mut [f64],
    ) -> Result<(), PropensityError> {
        if rates.len() != network.reaction_count() {
            return Err(PropensityError::LengthMismatch {
                expected: network.reaction_count(),
                got: rates.len(),
            });
        }
        if concentrations.len() != network.species_count() {
            return Err(PropensityError::ExecutionFailed {
                reason: format!(
                    "state has {} entries, network has {} species",
                    concentrations.len(),
                    network.species_count()
                ),
            });
        }

        for (rate, reaction) in rates.iter_mut().zip(network.reactions()) {
            let forward = Self::mass_product(&reaction.reactants, concentrations);
            *rate = match reaction.rates {
                RateConstants::Irreversible(k) => k * forward,
                RateConstants::Reversible {
                    forward: kf,
                    backward: kb,
                } => kf * forward - kb * Self::mass_product(&reaction.products, concentrations),
            };
        }
        Ok(())
    }
}
