//! The species × reaction stoichiometry matrix.

use crate::reaction::Reaction;

/// Net population change per reaction firing, `products − reactants`.
///
/// Stored row-major (`species × reaction`). The elementwise square is
/// cached at construction since every leap needs it for the variance
/// term. Immutable after construction.
#[derive(Clone, Debug, PartialEq)]
pub struct StoichiometryMatrix {
    species: usize,
    reactions: usize,
    entries: Vec<i64>,
    squared: Vec<f64>,
}

impl StoichiometryMatrix {
    /// Build the matrix for `species_count` species from a reaction list.
    pub fn from_reactions(species_count: usize, reactions: &[Reaction]) -> Self {
        let n_r = reactions.len();
        let mut entries = vec![0i64; species_count * n_r];
        for (j, reaction) in reactions.iter().enumerate() {
            for &(s, c) in &reaction.reactants {
                entries[s.index() * n_r + j] -= i64::from(c);
            }
            for &(s, c) in &reaction.products {
                entries[s.index() * n_r + j] += i64::from(c);
            }
        }
        Self::from_entries(species_count, n_r, entries)
    }

    /// Build from explicit rows, one per species.
    ///
    /// Returns `None` if the rows are ragged.
    pub fn from_rows(rows: &[Vec<i64>]) -> Option<Self> {
        let n_r = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != n_r) {
            return None;
        }
        let entries = rows.iter().flatten().copied().collect();
        Some(Self::from_entries(rows.len(), n_r, entries))
    }

    fn from_entries(species: usize, reactions: usize, entries: Vec<i64>) -> Self {
        let squared = entries.iter().map(|&v| (v * v) as f64).collect();
        Self {
            species,
            reactions,
            entries,
            squared,
        }
    }

    /// Number of rows.
    pub fn species_count(&self) -> usize {
        self.species
    }

    /// Number of columns.
    pub fn reaction_count(&self) -> usize {
        self.reactions
    }

    /// Entry `(species, reaction)`.
    #[inline]
    pub fn get(&self, species: usize, reaction: usize) -> i64 {
        self.entries[species * self.reactions + reaction]
    }

    /// Row of net changes for one species across all reactions.
    #[inline]
    pub fn row(&self, species: usize) -> &[i64] {
        let start = species * self.reactions;
        &self.entries[start..start + self.reactions]
    }

    /// Row of the squared matrix for one species.
    #[inline]
    pub fn squared_row(&self, species: usize) -> &[f64] {
        let start = species * self.reactions;
        &self.squared[start..start + self.reactions]
    }

    /// Expected drift of one species, `(ν · a)_i`.
    #[inline]
    pub fn drift(&self, species: usize, rates: &[f64]) -> f64 {
        self.row(species)
            .iter()
            .zip(rates)
            .map(|(&v, &a)| v as f64 * a)
            .sum()
    }

    /// Expected variance of one species, `(ν² · a)_i`.
    #[inline]
    pub fn variance(&self, species: usize, rates: &[f64]) -> f64 {
        self.squared_row(species)
            .iter()
            .zip(rates)
            .map(|(&v, &a)| v * a)
            .sum()
    }

    /// Population change of one species for a vector of firing counts,
    /// `(ν · k)_i`.
    #[inline]
    pub fn apply_firings(&self, species: usize, firings: &[f64]) -> f64 {
        self.drift(species, firings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::SpeciesId;
    use crate::reaction::RateConstants;
    use smallvec::smallvec;

    fn chain() -> Vec<Reaction> {
        // A -> B, B -> C
        vec![
            Reaction {
                reactants: smallvec![(SpeciesId(0), 1)],
                products: smallvec![(SpeciesId(1), 1)],
                rates: RateConstants::Irreversible(1.0),
            },
            Reaction {
                reactants: smallvec![(SpeciesId(1), 1)],
                products: smallvec![(SpeciesId(2), 1)],
                rates: RateConstants::Irreversible(1.0),
            },
        ]
    }

    #[test]
    fn matrix_matches_hand_computed_chain() {
        let m = StoichiometryMatrix::from_reactions(3, &chain());
        let expected = StoichiometryMatrix::from_rows(&[
            vec![-1, 0],
            vec![1, -1],
            vec![0, 1],
        ])
        .unwrap();
        assert_eq!(m, expected);
        assert_eq!(m.species_count(), 3);
        assert_eq!(m.reaction_count(), 2);
    }

    #[test]
    fn drift_and_variance() {
        let m = StoichiometryMatrix::from_reactions(3, &chain());
        let a = [2.0, 3.0];
        assert_eq!(m.drift(0, &a), -2.0);
        assert_eq!(m.drift(1, &a), -1.0);
        assert_eq!(m.drift(2, &a), 3.0);
        assert_eq!(m.variance(1, &a), 5.0);
    }

    #[test]
    fn squared_entries_cached() {
        let m = StoichiometryMatrix::from_rows(&[vec![-2, 3]]).unwrap();
        assert_eq!(m.squared_row(0), &[4.0, 9.0]);
    }

    #[test]
    fn ragged_rows_rejected() {
        assert!(StoichiometryMatrix::from_rows(&[vec![1, 0], vec![1]]).is_none());
    }

    // ── Property tests ──────────────────────────────────────────

    use proptest::prelude::*;

    const N_SPECIES: usize = 4;

    fn arb_side() -> impl Strategy<Value = crate::reaction::Coefficients> {
        proptest::collection::btree_map(0..N_SPECIES as u32, 1u32..4, 0..3)
            .prop_map(|m| m.into_iter().map(|(s, c)| (SpeciesId(s), c)).collect())
    }

    fn arb_reaction() -> impl Strategy<Value = Reaction> {
        (arb_side(), arb_side()).prop_map(|(reactants, products)| Reaction {
            reactants,
            products,
            rates: RateConstants::Irreversible(1.0),
        })
    }

    proptest! {
        #[test]
        fn entries_match_net_change(reactions in proptest::collection::vec(arb_reaction(), 1..6)) {
            let m = StoichiometryMatrix::from_reactions(N_SPECIES, &reactions);
            for (j, r) in reactions.iter().enumerate() {
                for s in 0..N_SPECIES {
                    prop_assert_eq!(m.get(s, j), r.net_change(SpeciesId(s as u32)));
                }
            }
        }

        #[test]
        fn variance_is_non_negative(
            reactions in proptest::collection::vec(arb_reaction(), 1..6),
            scale in 0.0f64..100.0,
        ) {
            let m = StoichiometryMatrix::from_reactions(N_SPECIES, &reactions);
            let rates = vec![scale; reactions.len()];
            for s in 0..N_SPECIES {
                prop_assert!(m.variance(s, &rates) >= 0.0);
            }
        }
    }
}
