//! Test fixtures and mock collaborators for leapkit development.
//!
//! Provides small reference networks ([`networks`]) and mock
//! implementations of the collaborator traits ([`fixtures`]) for
//! engine tests and benchmarks.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod networks;

pub use fixtures::{CancelAfter, ConstantPropensity, CountingRules, FailingPropensity};
