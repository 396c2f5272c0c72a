//! Adaptive tau-leaping simulation engine.
//!
//! Provides [`simulate`] and the reusable [`Simulator`], which advance a
//! reaction network in variable-size leaps. Each leap fires many
//! Poisson-distributed reaction events while bounding the relative change
//! of every population. Infeasible leaps are rejected atomically and
//! retried with a smaller step. Supports free-running and
//! checkpoint-aligned reporting.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cancel;
pub mod config;
pub mod controller;
pub mod error;
pub mod executor;
pub mod metrics;
pub mod simulator;
pub mod trajectory;

pub use cancel::CancelToken;
pub use config::{
    ConfigError, DegeneratePolicy, LeapMode, RejectionPolicy, Reporting, RunLimits, Seed,
    SimConfig, EPSILON_SCALE,
};
pub use controller::{LeapOrder, LeapSizeController};
pub use error::{InputError, SimError};
pub use executor::{LeapExecutor, LeapOutcome};
pub use metrics::RunMetrics;
pub use simulator::{simulate, Simulator};
pub use trajectory::{Termination, Trajectory};
