//! Reference collaborators for the leapkit engine.
//!
//! The engine treats propensity evaluation and rule application as
//! external. This crate provides the standard implementations:
//!
//! - [`MassAction`]: law-of-mass-action propensities, with net rates for
//!   reversible reactions.
//! - [`AssignmentRules`]: ordered `target = f(inputs)` assignments run
//!   after every accepted leap.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod mass_action;
pub mod rules;

pub use mass_action::MassAction;
pub use rules::{AssignmentRules, AssignmentRulesBuilder};
