//! Run configuration, validation, and error types.
//!
//! [`SimConfig`] is the input for a single trajectory.
//! [`validate()`](SimConfig::validate) checks structural invariants that
//! do not depend on the network; [`exempt_mask()`](SimConfig::exempt_mask)
//! resolves the exemption set against it. [`simulate`](crate::simulate)
//! runs both before any simulation work.

use std::time::Instant;

use indexmap::IndexSet;
use leapkit_core::ReactionNetwork;
use thiserror::Error;

use crate::cancel::CancelToken;

/// Scale applied to the step coefficient to obtain the error control
/// parameter `ε`.
pub const EPSILON_SCALE: f64 = 0.03;

// ── LeapMode ───────────────────────────────────────────────────────

/// How the leap size is chosen from the tau-leap bound.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LeapMode {
    /// `τ = τ_leap`.
    #[default]
    PureLeap,
    /// `τ = max(τ_leap, τ_gillespie)` where `τ_gillespie` is an
    /// exponentially distributed waiting time with rate `Σa`.
    HybridFloor,
}

// ── Reporting ──────────────────────────────────────────────────────

/// When samples are recorded.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Reporting {
    /// Record after every accepted leap until `t ≥ t_end`. Starts at
    /// `t = 0`. The final sample may lie past `t_end`.
    FreeRunning {
        /// End of the simulated interval.
        t_end: f64,
    },
    /// Record exactly at each checkpoint. The first checkpoint is the
    /// start time and receives the initial sample.
    Checkpoints(Vec<f64>),
}

impl Reporting {
    /// Time at which the trajectory starts.
    pub fn start_time(&self) -> f64 {
        match self {
            Reporting::FreeRunning { .. } => 0.0,
            Reporting::Checkpoints(c) => c.first().copied().unwrap_or(0.0),
        }
    }
}

// ── Seed ───────────────────────────────────────────────────────────

/// Per-trajectory RNG seed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Seed(pub u64);

impl Seed {
    /// Use `value` as the seed directly.
    pub const fn new(value: u64) -> Self {
        Seed(value)
    }

    /// Legacy scaling: a fractional seed is multiplied by 100 and
    /// truncated. Negative or NaN inputs map to 0.
    ///
    /// ```
    /// # use leapkit_engine::Seed;
    /// assert_eq!(Seed::legacy(0.4217), Seed::new(42));
    /// ```
    pub fn legacy(value: f64) -> Self {
        Seed((value * 100.0).trunc() as u64)
    }

    /// The raw seed value.
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for Seed {
    fn from(v: u64) -> Self {
        Seed(v)
    }
}

// ── RejectionPolicy ────────────────────────────────────────────────

/// Bounded retry for infeasible leaps.
///
/// After `n` consecutive rejections the next attempt uses
/// `τ · shrink_factor^n`. Reaching `max_consecutive` rejections fails
/// the run with [`SimError::FatalStall`](crate::SimError::FatalStall).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RejectionPolicy {
    /// Consecutive rejections tolerated before giving up. Default: 64.
    pub max_consecutive: u32,
    /// Multiplier applied per consecutive rejection, in `(0, 1]`.
    /// `1.0` retries with the unchanged step. Default: 0.5.
    pub shrink_factor: f64,
}

impl Default for RejectionPolicy {
    fn default() -> Self {
        Self {
            max_consecutive: 64,
            shrink_factor: 0.5,
        }
    }
}

// ── DegeneratePolicy ───────────────────────────────────────────────

/// What to do when no drift or variance term constrains the step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DegeneratePolicy {
    /// Fail with [`SimError::DegenerateStepSize`](crate::SimError::DegenerateStepSize).
    Fail,
    /// Step to `max_leap` if set, otherwise to the next reporting
    /// horizon (next checkpoint or `t_end`).
    #[default]
    JumpToHorizon,
}

// ── RunLimits ──────────────────────────────────────────────────────

/// Runtime-only stop conditions. Never serialized.
#[derive(Clone, Debug, Default)]
pub struct RunLimits {
    /// Wall-clock instant after which the run stops early.
    pub deadline: Option<Instant>,
    /// Caller-held cancellation flag.
    pub cancel: Option<CancelToken>,
}

impl PartialEq for RunLimits {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.cancel.is_some() == other.cancel.is_some()
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`SimConfig::validate()`] and
/// [`SimConfig::exempt_mask()`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// `step_coefficient` is NaN, infinite, zero, or negative.
    #[error("step coefficient must be finite and positive, got {value}")]
    InvalidStepCoefficient {
        /// The invalid value.
        value: f64,
    },
    /// `t_end` is NaN, infinite, zero, or negative.
    #[error("t_end must be finite and positive, got {value}")]
    InvalidEndTime {
        /// The invalid value.
        value: f64,
    },
    /// The checkpoint list is empty.
    #[error("checkpoint list is empty")]
    EmptyCheckpoints,
    /// A checkpoint is NaN, infinite, or negative.
    #[error("checkpoint {index} is {value}; checkpoints must be finite and non-negative")]
    InvalidCheckpoint {
        /// Position in the list.
        index: usize,
        /// The invalid value.
        value: f64,
    },
    /// Checkpoints are not strictly ascending.
    #[error("checkpoint {index} ({value}) does not exceed the previous checkpoint")]
    UnsortedCheckpoints {
        /// Position of the first out-of-order checkpoint.
        index: usize,
        /// Its value.
        value: f64,
    },
    /// `RejectionPolicy` invariant violated.
    #[error("invalid rejection policy: {reason}")]
    InvalidRejectionPolicy {
        /// Which invariant was violated.
        reason: String,
    },
    /// `max_leap` is NaN, infinite, zero, or negative.
    #[error("max_leap must be finite and positive, got {value}")]
    InvalidMaxLeap {
        /// The invalid value.
        value: f64,
    },
    /// The exemption set names a species the network does not declare.
    #[error("exempt species '{name}' is not declared in the network")]
    UnknownExemptSpecies {
        /// The unresolved name.
        name: String,
    },
}

// ── SimConfig ──────────────────────────────────────────────────────

/// Complete configuration for one trajectory.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Step-size mode. Default: [`LeapMode::PureLeap`].
    pub mode: LeapMode,
    /// Multiplier on [`EPSILON_SCALE`]. Default: 1.5, giving `ε = 0.045`.
    pub step_coefficient: f64,
    /// Sampling discipline.
    pub reporting: Reporting,
    /// RNG seed for this trajectory.
    pub seed: Seed,
    /// Species allowed to go negative. Typically the targets of
    /// assignment rules.
    pub exempt: IndexSet<String>,
    /// Retry policy for infeasible leaps.
    pub rejection: RejectionPolicy,
    /// Handling of steps with no finite bound.
    pub degenerate: DegeneratePolicy,
    /// Upper bound applied to every step.
    pub max_leap: Option<f64>,
    /// Deadline and cancellation.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub limits: RunLimits,
}

impl SimConfig {
    /// Free-running configuration over `[0, t_end]` with defaults for
    /// everything else.
    pub fn free_running(t_end: f64) -> Self {
        Self::with_reporting(Reporting::FreeRunning { t_end })
    }

    /// Checkpoint-aligned configuration with defaults for everything else.
    pub fn checkpoints(checkpoints: impl Into<Vec<f64>>) -> Self {
        Self::with_reporting(Reporting::Checkpoints(checkpoints.into()))
    }

    fn with_reporting(reporting: Reporting) -> Self {
        Self {
            mode: LeapMode::default(),
            step_coefficient: 1.5,
            reporting,
            seed: Seed::default(),
            exempt: IndexSet::new(),
            rejection: RejectionPolicy::default(),
            degenerate: DegeneratePolicy::default(),
            max_leap: None,
            limits: RunLimits::default(),
        }
    }

    /// Error control parameter `ε = 0.03 · step_coefficient`.
    pub fn epsilon(&self) -> f64 {
        EPSILON_SCALE * self.step_coefficient
    }

    /// Check structural invariants. Called automatically by
    /// [`simulate`](crate::simulate).
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Step coefficient finite and positive.
        if !self.step_coefficient.is_finite() || self.step_coefficient <= 0.0 {
            return Err(ConfigError::InvalidStepCoefficient {
                value: self.step_coefficient,
            });
        }
        // 2. Reporting horizon.
        match &self.reporting {
            Reporting::FreeRunning { t_end } => {
                if !t_end.is_finite() || *t_end <= 0.0 {
                    return Err(ConfigError::InvalidEndTime { value: *t_end });
                }
            }
            Reporting::Checkpoints(points) => {
                if points.is_empty() {
                    return Err(ConfigError::EmptyCheckpoints);
                }
                for (index, &value) in points.iter().enumerate() {
                    if !value.is_finite() || value < 0.0 {
                        return Err(ConfigError::InvalidCheckpoint { index, value });
                    }
                }
                // 2a. Strictly ascending.
                for (index, pair) in points.windows(2).enumerate() {
                    if pair[1] <= pair[0] {
                        return Err(ConfigError::UnsortedCheckpoints {
                            index: index + 1,
                            value: pair[1],
                        });
                    }
                }
            }
        }
        // 3. RejectionPolicy invariants.
        let r = &self.rejection;
        if r.max_consecutive == 0 {
            return Err(ConfigError::InvalidRejectionPolicy {
                reason: "max_consecutive must be at least 1".to_string(),
            });
        }
        if !r.shrink_factor.is_finite() || r.shrink_factor <= 0.0 || r.shrink_factor > 1.0 {
            return Err(ConfigError::InvalidRejectionPolicy {
                reason: format!(
                    "shrink_factor must be in (0.0, 1.0], got {}",
                    r.shrink_factor,
                ),
            });
        }
        // 4. max_leap, if present.
        if let Some(cap) = self.max_leap {
            if !cap.is_finite() || cap <= 0.0 {
                return Err(ConfigError::InvalidMaxLeap { value: cap });
            }
        }
        Ok(())
    }

    /// Resolve the exemption set to a per-species mask in network order.
    pub fn exempt_mask(&self, network: &ReactionNetwork) -> Result<Vec<bool>, ConfigError> {
        let mut mask = vec![false; network.species_count()];
        for name in &self.exempt {
            let id = network
                .species_id(name)
                .ok_or_else(|| ConfigError::UnknownExemptSpecies { name: name.clone() })?;
            mask[id.index()] = true;
        }
        Ok(mask)
    }
}
