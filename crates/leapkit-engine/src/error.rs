//! Simulation errors.
//!
//! Every failure a run can report is a [`SimError`]. Input problems are
//! grouped under [`SimError::InvalidConfiguration`] and are detected
//! before the first propensity evaluation.

use leapkit_core::{NetworkError, PropensityError, ReactionId};
use thiserror::Error;

use crate::config::ConfigError;

/// Malformed or inconsistent simulation inputs.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum InputError {
    /// The network or initial state vector is invalid.
    #[error(transparent)]
    Network(#[from] NetworkError),
    /// The run configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A non-exempt reacting species starts below zero.
    #[error("species '{name}' starts at {value}, but is not exempt from the nonnegativity check")]
    NegativeInitial {
        /// The species name.
        name: String,
        /// Its initial value after rules were applied.
        value: f64,
    },
}

/// Errors returned by [`simulate`](crate::simulate).
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SimError {
    /// Inputs were rejected at entry; no simulation work was done.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] InputError),
    /// No finite step size exists and the degenerate policy is `Fail`.
    #[error("degenerate step size at t = {time}: every drift and variance term is zero")]
    DegenerateStepSize {
        /// Simulation time at which the step could not be sized.
        time: f64,
    },
    /// Too many consecutive leaps were rejected.
    #[error("stalled at t = {time} after {attempts} consecutive rejected leaps")]
    FatalStall {
        /// Simulation time of the stalled state.
        time: f64,
        /// Number of consecutive rejections.
        attempts: u32,
    },
    /// A rule drove a non-exempt reacting species below zero after an
    /// accepted leap.
    #[error("rules set species '{name}' to {value} at t = {time}, but it is not exempt from the nonnegativity check")]
    RuleViolation {
        /// Simulation time of the offending state.
        time: f64,
        /// The species name.
        name: String,
        /// The value the rules assigned.
        value: f64,
    },
    /// The propensity evaluator failed or returned an unusable rate.
    #[error(transparent)]
    Propensity(#[from] PropensityError),
    /// A Poisson mean `a_j · τ` could not be sampled.
    #[error("cannot sample Poisson firings for reaction {reaction} with mean {mean}")]
    Sampling {
        /// The reaction being sampled.
        reaction: ReactionId,
        /// The rejected mean.
        mean: f64,
    },
}

impl From<NetworkError> for SimError {
    fn from(e: NetworkError) -> Self {
        SimError::InvalidConfiguration(InputError::Network(e))
    }
}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        SimError::InvalidConfiguration(InputError::Config(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_lift_into_invalid_configuration() {
        let err: SimError = ConfigError::EmptyCheckpoints.into();
        assert_eq!(
            err,
            SimError::InvalidConfiguration(InputError::Config(ConfigError::EmptyCheckpoints))
        );
        assert!(err.to_string().starts_with("invalid configuration"));
    }

    #[test]
    fn stall_display_reports_attempts() {
        let err = SimError::FatalStall {
            time: 2.5,
            attempts: 64,
        };
        assert_eq!(
            err.to_string(),
            "stalled at t = 2.5 after 64 consecutive rejected leaps"
        );
    }

    #[test]
    fn rule_violation_names_species() {
        let err = SimError::RuleViolation {
            time: 1.0,
            name: "C".to_string(),
            value: -3.0,
        };
        assert!(err.to_string().contains("'C'"));
        assert!(err.to_string().contains("-3"));
    }
}
