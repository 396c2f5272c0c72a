//! The reaction network and its builder.
//!
//! [`ReactionNetwork`] is the immutable, validated description of a
//! chemical system: the declared species (in caller order), the reactions,
//! and the derived [`StoichiometryMatrix`] and [`ParticipationMap`]. All
//! name → index resolution happens once in [`NetworkBuilder::build`];
//! nothing downstream searches by name.

use indexmap::IndexMap;

use crate::error::NetworkError;
use crate::id::{ReactionId, SpeciesId};
use crate::participation::ParticipationMap;
use crate::reaction::{Coefficients, RateConstants, Reaction};
use crate::species::SpeciesKind;
use crate::stoichiometry::StoichiometryMatrix;

// ── NetworkBuilder ──────────────────────────────────────────────

struct PendingReaction {
    reactants: Vec<(String, u32)>,
    products: Vec<(String, u32)>,
    rates: RateConstants,
}

/// Builder for [`ReactionNetwork`].
///
/// Species are declared first (their order becomes the state-vector order),
/// then reactions refer to them by name.
///
/// ```
/// use leapkit_core::{NetworkBuilder, RateConstants};
///
/// let net = NetworkBuilder::new()
///     .species("A")
///     .species("B")
///     .reaction(&[("A", 1)], &[("B", 1)], RateConstants::Irreversible(0.1))
///     .build()
///     .unwrap();
/// assert_eq!(net.species_count(), 2);
/// assert_eq!(net.stoichiometry().row(0), &[-1]);
/// ```
#[derive(Default)]
pub struct NetworkBuilder {
    species: Vec<(String, SpeciesKind)>,
    reactions: Vec<PendingReaction>,
}

impl NetworkBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a species. Reserved words (see
    /// [`RESERVED_WORDS`](crate::RESERVED_WORDS)) become
    /// [`SpeciesKind::Reserved`]; everything else is reacting.
    pub fn species(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = SpeciesKind::classify(&name);
        self.species.push((name, kind));
        self
    }

    /// Declare a reserved time-accumulator species regardless of its name.
    pub fn reserved(mut self, name: impl Into<String>) -> Self {
        self.species.push((name.into(), SpeciesKind::Reserved));
        self
    }

    /// Add a reaction. Coefficients for a repeated species on one side
    /// are summed.
    pub fn reaction(
        mut self,
        reactants: &[(&str, u32)],
        products: &[(&str, u32)],
        rates: RateConstants,
    ) -> Self {
        let own = |side: &[(&str, u32)]| {
            side.iter()
                .map(|&(n, c)| (n.to_string(), c))
                .collect::<Vec<_>>()
        };
        self.reactions.push(PendingReaction {
            reactants: own(reactants),
            products: own(products),
            rates,
        });
        self
    }

    /// Validate and build the network.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError`] if no species or no reactions were
    /// declared, a species name repeats, a reaction names an unknown or
    /// reserved species, a coefficient is zero, or a rate constant is
    /// negative or non-finite.
    pub fn build(self) -> Result<ReactionNetwork, NetworkError> {
        if self.species.is_empty() {
            return Err(NetworkError::NoSpecies);
        }
        if self.reactions.is_empty() {
            return Err(NetworkError::NoReactions);
        }
        if u32::try_from(self.species.len()).is_err() {
            return Err(NetworkError::CountOverflow {
                what: "species",
                count: self.species.len(),
            });
        }
        if u32::try_from(self.reactions.len()).is_err() {
            return Err(NetworkError::CountOverflow {
                what: "reaction",
                count: self.reactions.len(),
            });
        }

        let mut species: IndexMap<String, SpeciesKind> = IndexMap::with_capacity(self.species.len());
        for (name, kind) in self.species {
            if species.contains_key(&name) {
                return Err(NetworkError::DuplicateSpecies { name });
            }
            species.insert(name, kind);
        }

        let mut reactions = Vec::with_capacity(self.reactions.len());
        for (j, pending) in self.reactions.into_iter().enumerate() {
            let id = ReactionId(j as u32);
            if !pending.rates.is_valid() {
                let (forward, backward) = pending.rates.split();
                let value = if forward.is_finite() && forward >= 0.0 {
                    backward.unwrap_or(forward)
                } else {
                    forward
                };
                return Err(NetworkError::InvalidRateConstant { reaction: id, value });
            }
            reactions.push(Reaction {
                reactants: resolve_side(&species, id, &pending.reactants)?,
                products: resolve_side(&species, id, &pending.products)?,
                rates: pending.rates,
            });
        }

        let n = species.len();
        let stoichiometry = StoichiometryMatrix::from_reactions(n, &reactions);
        let participation = ParticipationMap::from_reactions(n, &reactions);
        let (mut reacting, mut reserved) = (Vec::new(), Vec::new());
        for (i, kind) in species.values().enumerate() {
            match kind {
                SpeciesKind::Reacting => reacting.push(SpeciesId(i as u32)),
                SpeciesKind::Reserved => reserved.push(SpeciesId(i as u32)),
            }
        }

        Ok(ReactionNetwork {
            species,
            reactions,
            stoichiometry,
            participation,
            reacting,
            reserved,
        })
    }
}

fn resolve_side(
    species: &IndexMap<String, SpeciesKind>,
    reaction: ReactionId,
    side: &[(String, u32)],
) -> Result<Coefficients, NetworkError> {
    let mut out = Coefficients::new();
    for (name, coeff) in side {
        let (idx, _, kind) = species
            .get_full(name)
            .ok_or_else(|| NetworkError::UnknownSpecies { name: name.clone() })?;
        if *kind == SpeciesKind::Reserved {
            return Err(NetworkError::ReservedInReaction {
                reaction,
                name: name.clone(),
            });
        }
        if *coeff == 0 {
            return Err(NetworkError::ZeroCoefficient {
                reaction,
                name: name.clone(),
            });
        }
        let id = SpeciesId(idx as u32);
        match out.iter_mut().find(|(s, _)| *s == id) {
            Some((_, c)) => *c += coeff,
            None => out.push((id, *coeff)),
        }
    }
    Ok(out)
}

// ── ReactionNetwork ─────────────────────────────────────────────

/// A validated, immutable reaction network.
#[derive(Clone, Debug)]
pub struct ReactionNetwork {
    species: IndexMap<String, SpeciesKind>,
    reactions: Vec<Reaction>,
    stoichiometry: StoichiometryMatrix,
    participation: ParticipationMap,
    reacting: Vec<SpeciesId>,
    reserved: Vec<SpeciesId>,
}

impl ReactionNetwork {
    /// Number of declared species, reacting and reserved.
    pub fn species_count(&self) -> usize {
        self.species.len()
    }

    /// Number of reactions.
    pub fn reaction_count(&self) -> usize {
        self.reactions.len()
    }

    /// Resolve a species name.
    pub fn species_id(&self, name: &str) -> Option<SpeciesId> {
        self.species.get_index_of(name).map(|i| SpeciesId(i as u32))
    }

    /// Name of a species.
    pub fn species_name(&self, id: SpeciesId) -> Option<&str> {
        self.species.get_index(id.index()).map(|(n, _)| n.as_str())
    }

    /// All species names in declaration order.
    pub fn species_names(&self) -> impl Iterator<Item = &str> {
        self.species.keys().map(String::as_str)
    }

    /// Kind of a species.
    pub fn kind(&self, id: SpeciesId) -> Option<SpeciesKind> {
        self.species.get_index(id.index()).map(|(_, k)| *k)
    }

    /// Reactions in declaration order.
    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    /// A single reaction.
    pub fn reaction(&self, id: ReactionId) -> Option<&Reaction> {
        self.reactions.get(id.index())
    }

    /// The stoichiometry matrix (all species × all reactions).
    pub fn stoichiometry(&self) -> &StoichiometryMatrix {
        &self.stoichiometry
    }

    /// The participation map.
    pub fn participation(&self) -> &ParticipationMap {
        &self.participation
    }

    /// Reacting species in declaration order.
    pub fn reacting(&self) -> &[SpeciesId] {
        &self.reacting
    }

    /// Reserved species in declaration order.
    pub fn reserved(&self) -> &[SpeciesId] {
        &self.reserved
    }

    /// Check a full state vector: one finite entry per species.
    pub fn check_state(&self, state: &[f64]) -> Result<(), NetworkError> {
        if state.len() != self.species.len() {
            return Err(NetworkError::StateLengthMismatch {
                expected: self.species.len(),
                got: state.len(),
            });
        }
        for (name, &value) in self.species.keys().zip(state) {
            if !value.is_finite() {
                return Err(NetworkError::NonFiniteState {
                    name: name.clone(),
                    value,
                });
            }
        }
        Ok(())
    }

    /// Build a state vector from `(name, value)` pairs. Species not listed
    /// start at zero.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::UnknownSpecies`] for a name that was not
    /// declared, or [`NetworkError::NonFiniteState`] for a NaN/inf value.
    pub fn state_from(&self, values: &[(&str, f64)]) -> Result<Vec<f64>, NetworkError> {
        let mut state = vec![0.0; self.species.len()];
        for &(name, value) in values {
            let idx = self
                .species
                .get_index_of(name)
                .ok_or_else(|| NetworkError::UnknownSpecies {
                    name: name.to_string(),
                })?;
            state[idx] = value;
        }
        self.check_state(&state)?;
        Ok(state)
    }
}
