//! leapkit: adaptive tau-leaping simulation of chemical reaction networks.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all leapkit sub-crates. For most users, adding `leapkit` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use leapkit::prelude::*;
//!
//! // A -> B at rate 0.1.
//! let network = NetworkBuilder::new()
//!     .species("A")
//!     .species("B")
//!     .reaction(&[("A", 1)], &[("B", 1)], RateConstants::Irreversible(0.1))
//!     .build()
//!     .unwrap();
//! let initial = network.state_from(&[("A", 100.0)]).unwrap();
//!
//! // Record at t = 0, 1, ..., 10.
//! let config = SimConfig {
//!     seed: Seed::new(42),
//!     ..SimConfig::checkpoints((0..=10).map(f64::from).collect::<Vec<_>>())
//! };
//! let trajectory = simulate(&network, &MassAction, &NoRules, &initial, &config).unwrap();
//!
//! assert_eq!(trajectory.len(), 11);
//! for (_, x) in trajectory.samples() {
//!     assert_eq!(x[0] + x[1], 100.0);
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `leapkit-core` | IDs, network model, stoichiometry, collaborator traits |
//! | [`kinetics`] | `leapkit-kinetics` | Mass-action propensities and assignment rules |
//! | [`engine`] | `leapkit-engine` | Configuration, leap sizing, the simulation loop |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`leapkit-core`).
///
/// Contains the network builder, the stoichiometry matrix, error types,
/// and the collaborator traits ([`types::PropensityEvaluator`],
/// [`types::RuleEngine`]).
pub use leapkit_core as types;

/// Reference collaborators (`leapkit-kinetics`).
pub use leapkit_kinetics as kinetics;

/// The simulation engine (`leapkit-engine`).
///
/// [`engine::simulate`] runs one trajectory; [`engine::Simulator`] binds a
/// network once and runs many.
pub use leapkit_engine as engine;

/// Common imports for typical leapkit usage.
///
/// ```rust
/// use leapkit::prelude::*;
/// ```
pub mod prelude {
    // Network model
    pub use leapkit_core::{
        NetworkBuilder, RateConstants, ReactionId, ReactionNetwork, SpeciesId, SpeciesKind,
    };

    // Collaborators
    pub use leapkit_core::{DerivedCache, NoRules, PropensityEvaluator, RuleEngine};
    pub use leapkit_kinetics::{AssignmentRules, MassAction};

    // Errors
    pub use leapkit_core::{NetworkError, PropensityError};
    pub use leapkit_engine::{ConfigError, InputError, SimError};

    // Engine
    pub use leapkit_engine::{
        simulate, CancelToken, DegeneratePolicy, LeapMode, RejectionPolicy, Reporting, RunMetrics,
        Seed, SimConfig, Simulator, Termination, Trajectory,
    };
}
