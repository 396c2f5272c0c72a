//! Per-run counters for the simulation engine.
//!
//! [`RunMetrics`] is attached to every [`Trajectory`](crate::Trajectory)
//! and summarizes how the loop behaved: how many leaps were taken,
//! rejected, clamped, or forced by the degenerate policy.

/// Counters and timing collected over one trajectory.
///
/// All durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunMetrics {
    /// Wall-clock time for the whole run, in microseconds.
    pub total_us: u64,
    /// Leaps committed to the state.
    pub accepted_leaps: u64,
    /// Leaps discarded because a non-exempt species would go negative.
    pub rejected_leaps: u64,
    /// Longest run of consecutive rejections.
    pub max_consecutive_rejections: u32,
    /// Accepted leaps whose step was shortened to land on a checkpoint.
    pub clamped_leaps: u64,
    /// Steps sized by [`DegeneratePolicy::JumpToHorizon`](crate::DegeneratePolicy::JumpToHorizon).
    pub degenerate_jumps: u64,
    /// Samples appended by checkpoint padding after an early stop.
    pub padded_samples: u64,
    /// Calls into the propensity evaluator.
    pub propensity_evaluations: u64,
}

impl RunMetrics {
    /// Total leap attempts, accepted or not.
    pub fn attempts(&self) -> u64 {
        self.accepted_leaps + self.rejected_leaps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = RunMetrics::default();
        assert_eq!(m.total_us, 0);
        assert_eq!(m.attempts(), 0);
        assert_eq!(m.max_consecutive_rejections, 0);
    }

    #[test]
    fn attempts_sum_accepted_and_rejected() {
        let m = RunMetrics {
            accepted_leaps: 7,
            rejected_leaps: 3,
            ..Default::default()
        };
        assert_eq!(m.attempts(), 10);
    }
}
