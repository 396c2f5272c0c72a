//! Core types and traits for the leapkit tau-leaping engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the reaction-network data model shared by the rest of the workspace:
//! typed IDs, species and reaction definitions, the stoichiometry matrix,
//! the participation map, the collaborator traits, and error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod network;
pub mod participation;
pub mod reaction;
pub mod species;
pub mod stoichiometry;
pub mod traits;

pub use error::{NetworkError, PropensityError};
pub use id::{ReactionId, SpeciesId};
pub use network::{NetworkBuilder, ReactionNetwork};
pub use participation::ParticipationMap;
pub use reaction::{Coefficients, RateConstants, Reaction};
pub use species::{is_reserved_word, SpeciesKind, RESERVED_WORDS};
pub use stoichiometry::StoichiometryMatrix;
pub use traits::{DerivedCache, NoRules, PropensityEvaluator, RuleEngine};
