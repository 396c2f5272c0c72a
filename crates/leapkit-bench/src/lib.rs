//! Benchmark profiles for the leapkit engine.
//!
//! - [`reference_profile`]: a 10-species decay chain with reversible
//!   dimerization at the head, sized for per-step benchmarks.
//! - [`stress_profile`]: the same shape with `n` chain links.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use leapkit_core::{NetworkBuilder, NetworkError, RateConstants, ReactionNetwork};
use leapkit_engine::{Seed, SimConfig};

/// Network plus a matching initial state.
pub struct Profile {
    pub network: ReactionNetwork,
    pub initial: Vec<f64>,
}

/// Build a chain `2 S0 <=> S1`, `S1 -> S2 -> ... -> S(n-1)`.
///
/// `S0` starts at `population`, everything else at zero.
pub fn chain(links: usize, population: f64) -> Result<Profile, NetworkError> {
    let names: Vec<String> = (0..links.max(2)).map(|i| format!("S{i}")).collect();
    let mut builder = NetworkBuilder::new();
    for name in &names {
        builder = builder.species(name.as_str());
    }
    builder = builder.reaction(
        &[(names[0].as_str(), 2)],
        &[(names[1].as_str(), 1)],
        RateConstants::Reversible {
            forward: 0.001,
            backward: 0.1,
        },
    );
    for pair in names[1..].windows(2) {
        builder = builder.reaction(
            &[(pair[0].as_str(), 1)],
            &[(pair[1].as_str(), 1)],
            RateConstants::Irreversible(0.5),
        );
    }
    let network = builder.build()?;
    let mut initial = vec![0.0; network.species_count()];
    initial[0] = population;
    Ok(Profile { network, initial })
}

/// 10 species, 10 000 molecules.
pub fn reference_profile() -> Result<Profile, NetworkError> {
    chain(10, 10_000.0)
}

/// `links` species, 10 000 molecules.
pub fn stress_profile(links: usize) -> Result<Profile, NetworkError> {
    chain(links, 10_000.0)
}

/// Free-running configuration over `[0, t_end]` with a fixed seed.
pub fn bench_config(t_end: f64, seed: u64) -> SimConfig {
    SimConfig {
        seed: Seed::new(seed),
        ..SimConfig::free_running(t_end)
    }
}
