//! Species → reaction participation sets.

use smallvec::SmallVec;

use crate::id::{ReactionId, SpeciesId};
use crate::reaction::Reaction;

/// For every species, the reactions in which it appears on either side.
///
/// Built once with the network and consulted at engine setup to classify
/// leap orders. Reaction IDs within a set are ascending.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParticipationMap {
    sets: Vec<SmallVec<[ReactionId; 4]>>,
}

impl ParticipationMap {
    /// Build from a reaction list over `species_count` species.
    pub fn from_reactions(species_count: usize, reactions: &[Reaction]) -> Self {
        let mut sets: Vec<SmallVec<[ReactionId; 4]>> = vec![SmallVec::new(); species_count];
        for (j, reaction) in reactions.iter().enumerate() {
            let id = ReactionId(j as u32);
            for &(s, _) in reaction.reactants.iter().chain(reaction.products.iter()) {
                let set = &mut sets[s.index()];
                if set.last() != Some(&id) {
                    set.push(id);
                }
            }
        }
        Self { sets }
    }

    /// Reactions involving `species`.
    pub fn reactions_of(&self, species: SpeciesId) -> &[ReactionId] {
        self.sets
            .get(species.index())
            .map_or(&[][..], |s| s.as_slice())
    }

    /// Number of species covered.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Whether the map covers no species.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reaction::RateConstants;
    use smallvec::smallvec;

    #[test]
    fn species_in_both_sides_listed_once() {
        // A -> B ; B -> C ; A + C -> A
        let reactions = vec![
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
            Reaction {
                reactants: smallvec![(SpeciesId(0), 1), (SpeciesId(2), 1)],
                products: smallvec![(SpeciesId(0), 1)],
                rates: RateConstants::Irreversible(1.0),
            },
        ];
        let map = ParticipationMap::from_reactions(4, &reactions);
        assert_eq!(map.reactions_of(SpeciesId(0)), &[ReactionId(0), ReactionId(2)]);
        assert_eq!(map.reactions_of(SpeciesId(1)), &[ReactionId(0), ReactionId(1)]);
        assert_eq!(map.reactions_of(SpeciesId(2)), &[ReactionId(1), ReactionId(2)]);
        assert!(map.reactions_of(SpeciesId(3)).is_empty());
        assert!(map.reactions_of(SpeciesId(9)).is_empty());
        assert_eq!(map.len(), 4);
    }
}
