//! Reference networks used across the test suites.
//!
//! Every builder here is known-valid, so constructors panic on error.

use leapkit_core::{NetworkBuilder, RateConstants, ReactionNetwork};

fn build(builder: NetworkBuilder) -> ReactionNetwork {
    match builder.build() {
        Ok(net) => net,
        Err(e) => panic!("fixture network failed to build: {e}"),
    }
}

/// `A -> ∅` at rate `k`.
pub fn decay(k: f64) -> ReactionNetwork {
    build(
        NetworkBuilder::new()
            .species("A")
            .reaction(&[("A", 1)], &[], RateConstants::Irreversible(k)),
    )
}

/// `A -> B` at rate `k`.
pub fn conversion(k: f64) -> ReactionNetwork {
    build(
        NetworkBuilder::new()
            .species("A")
            .species("B")
            .reaction(&[("A", 1)], &[("B", 1)], RateConstants::Irreversible(k)),
    )
}

/// `A <=> B` with forward rate `kf` and backward rate `kb`.
pub fn isomerization(kf: f64, kb: f64) -> ReactionNetwork {
    build(NetworkBuilder::new().species("A").species("B").reaction(
        &[("A", 1)],
        &[("B", 1)],
        RateConstants::Reversible {
            forward: kf,
            backward: kb,
        },
    ))
}

/// `A -> B` with a `time` accumulator species.
pub fn conversion_with_clock(k: f64) -> ReactionNetwork {
    build(
        NetworkBuilder::new()
            .species("A")
            .species("B")
            .species("time")
            .reaction(&[("A", 1)], &[("B", 1)], RateConstants::Irreversible(k)),
    )
}

/// `A + B -> C` at rate `k1` and `C -> A + B` at rate `k2`.
pub fn binding(k1: f64, k2: f64) -> ReactionNetwork {
    build(
        NetworkBuilder::new()
            .species("A")
            .species("B")
            .species("C")
            .reaction(
                &[("A", 1), ("B", 1)],
                &[("C", 1)],
                RateConstants::Irreversible(k1),
            )
            .reaction(
                &[("C", 1)],
                &[("A", 1), ("B", 1)],
                RateConstants::Irreversible(k2),
            ),
    )
}

/// Birth-death: `∅ -> X` at `birth`, `X -> ∅` at `death`.
pub fn birth_death(birth: f64, death: f64) -> ReactionNetwork {
    build(
        NetworkBuilder::new()
            .species("X")
            .reaction(&[], &[("X", 1)], RateConstants::Irreversible(birth))
            .reaction(&[("X", 1)], &[], RateConstants::Irreversible(death)),
    )
}
