//! Error types for network construction and propensity evaluation.
//!
//! Organized by subsystem: [`NetworkError`] covers everything detected
//! while building a [`ReactionNetwork`](crate::ReactionNetwork) or checking
//! a state vector against it; [`PropensityError`] is returned by
//! [`PropensityEvaluator`](crate::PropensityEvaluator) implementations.

use thiserror::Error;

use crate::id::ReactionId;

/// Malformed or inconsistent network inputs.
///
/// All variants are detected before any simulation work starts.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum NetworkError {
    /// No species were declared.
    #[error("network declares no species")]
    NoSpecies,
    /// No reactions were declared.
    #[error("network declares no reactions")]
    NoReactions,
    /// The same species name was declared twice.
    #[error("species '{name}' declared more than once")]
    DuplicateSpecies {
        /// The repeated name.
        name: String,
    },
    /// A reaction, state entry, or rule refers to an undeclared species.
    #[error("unknown species '{name}'")]
    UnknownSpecies {
        /// The name that failed to resolve.
        name: String,
    },
    /// A reserved (time-accumulator) species appears in a reaction.
    #[error("reserved species '{name}' cannot take part in reaction {reaction}")]
    ReservedInReaction {
        /// The offending reaction.
        reaction: ReactionId,
        /// The reserved species name.
        name: String,
    },
    /// A stoichiometric coefficient of zero was given.
    #[error("reaction {reaction} has a zero coefficient for '{name}'")]
    ZeroCoefficient {
        /// The offending reaction.
        reaction: ReactionId,
        /// The species with the zero coefficient.
        name: String,
    },
    /// A rate constant is negative, NaN, or infinite.
    #[error("reaction {reaction} has invalid rate constant {value}")]
    InvalidRateConstant {
        /// The offending reaction.
        reaction: ReactionId,
        /// The rejected value.
        value: f64,
    },
    /// A state vector does not have one entry per declared species.
    #[error("state has {got} entries, network declares {expected} species")]
    StateLengthMismatch {
        /// Number of declared species.
        expected: usize,
        /// Length of the supplied vector.
        got: usize,
    },
    /// A state entry is NaN or infinite.
    #[error("species '{name}' has non-finite value {value}")]
    NonFiniteState {
        /// The species name.
        name: String,
        /// The rejected value.
        value: f64,
    },
    /// Species or reaction count does not fit in a `u32` index.
    #[error("{what} count {count} exceeds u32::MAX")]
    CountOverflow {
        /// `"species"` or `"reaction"`.
        what: &'static str,
        /// The count that overflowed.
        count: usize,
    },
}

/// Errors from a [`PropensityEvaluator`](crate::PropensityEvaluator).
#[derive(Clone, Debug, PartialEq, Error)]
pub enum PropensityError {
    /// The evaluator could not produce rates.
    #[error("propensity evaluation failed: {reason}")]
    ExecutionFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// A rate came back NaN or infinite.
    #[error("non-finite propensity {value} for reaction {reaction}")]
    NonFinite {
        /// The reaction whose rate is invalid.
        reaction: ReactionId,
        /// The rejected value.
        value: f64,
    },
    /// The evaluator wrote the wrong number of rates.
    #[error("propensity vector has {got} entries, network has {expected} reactions")]
    LengthMismatch {
        /// Number of reactions.
        expected: usize,
        /// Number of rates produced.
        got: usize,
    },
}
