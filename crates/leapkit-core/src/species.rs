//! Species classification.

/// Names that are always treated as [`SpeciesKind::Reserved`] when a
/// species is declared without an explicit kind.
///
/// These are the event/time words of the network description language:
/// a species named `time` is a clock, not a population.
pub const RESERVED_WORDS: &[&str] = &[
    "t", "time", "status", "status2", "timer", "finish", "delay", "dtime",
];

/// Returns `true` if `name` is one of the [`RESERVED_WORDS`].
pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// How a species is advanced by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpeciesKind {
    /// Updated by stoichiometry when reactions fire.
    Reacting,
    /// A monotone time accumulator: advanced by `+tau` on every accepted
    /// leap and never touched by stoichiometry.
    Reserved,
}

impl SpeciesKind {
    /// The kind a species gets when declared by name alone.
    pub fn classify(name: &str) -> Self {
        if is_reserved_word(name) {
            Self::Reserved
        } else {
            Self::Reacting
        }
    }
}
