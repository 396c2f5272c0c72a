//! Reaction definitions: coefficients and rate constants.

use smallvec::SmallVec;

use crate::id::SpeciesId;

/// Stoichiometric coefficients on one side of a reaction.
///
/// Each species appears at most once; `2A + B` is `[(A, 2), (B, 1)]`.
/// Inline storage covers every elementary reaction without allocating.
pub type Coefficients = SmallVec<[(SpeciesId, u32); 4]>;

/// Rate constants of a reaction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RateConstants {
    /// One-way reaction with a single rate constant.
    Irreversible(f64),
    /// Two-way reaction. Both directions share one stoichiometry column
    /// and are combined into a single net rate.
    Reversible {
        /// Forward rate constant.
        forward: f64,
        /// Backward rate constant.
        backward: f64,
    },
}

impl RateConstants {
    /// Split into `(forward, backward)`; `backward` is `None` for
    /// irreversible reactions.
    pub fn split(self) -> (f64, Option<f64>) {
        match self {
            Self::Irreversible(k) => (k, None),
            Self::Reversible { forward, backward } => (forward, Some(backward)),
        }
    }

    /// Whether both constants are finite and non-negative.
    pub fn is_valid(self) -> bool {
        let ok = |k: f64| k.is_finite() && k >= 0.0;
        match self {
            Self::Irreversible(k) => ok(k),
            Self::Reversible { forward, backward } => ok(forward) && ok(backward),
        }
    }
}

/// A single reaction: reactant and product coefficients plus rates.
#[derive(Clone, Debug, PartialEq)]
pub struct Reaction {
    /// Left-hand side coefficients.
    pub reactants: Coefficients,
    /// Right-hand side coefficients.
    pub products: Coefficients,
    /// Rate constant(s).
    pub rates: RateConstants,
}

impl Reaction {
    /// Coefficient of `species` among the reactants (0 if absent).
    pub fn reactant_coefficient(&self, species: SpeciesId) -> u32 {
        coefficient(&self.reactants, species)
    }

    /// Coefficient of `species` among the products (0 if absent).
    pub fn product_coefficient(&self, species: SpeciesId) -> u32 {
        coefficient(&self.products, species)
    }

    /// Net change of `species` when this reaction fires once.
    pub fn net_change(&self, species: SpeciesId) -> i64 {
        i64::from(self.product_coefficient(species)) - i64::from(self.reactant_coefficient(species))
    }

    /// Whether `species` appears on either side.
    pub fn involves(&self, species: SpeciesId) -> bool {
        self.reactants.iter().any(|&(s, _)| s == species)
            || self.products.iter().any(|&(s, _)| s == species)
    }
}

fn coefficient(side: &Coefficients, species: SpeciesId) -> u32 {
    side.iter()
        .find(|&&(s, _)| s == species)
        .map_or(0, |&(_, c)| c)
}
