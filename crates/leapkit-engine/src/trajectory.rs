//! Recorded samples of a single run.

use crate::metrics::RunMetrics;

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

#[inline]
fn fnv1a_u64(mut hash: u64, v: u64) -> u64 {
    for &b in &v.to_le_bytes() {
        hash = (hash ^ b as u64).wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Why the simulation loop stopped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// Reached `t_end` or the last checkpoint.
    #[default]
    Completed,
    /// The wall-clock deadline passed.
    DeadlineElapsed,
    /// The cancellation token was raised.
    Cancelled,
}

impl Termination {
    /// Whether the run covered its full horizon.
    pub fn is_complete(self) -> bool {
        self == Termination::Completed
    }
}

/// Ordered `(time, species vector)` samples.
///
/// Values cover reacting species only, in network order. Reserved
/// species are engine bookkeeping and are kept in a separate table with
/// one row per sample.
///
/// Equality ignores [`RunMetrics::total_us`]; two runs with identical
/// inputs and seed compare equal.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trajectory {
    species: Vec<String>,
    reserved_species: Vec<String>,
    times: Vec<f64>,
    values: Vec<f64>,
    reserved: Vec<f64>,
    termination: Termination,
    metrics: RunMetrics,
}

impl PartialEq for Trajectory {
    fn eq(&self, other: &Self) -> bool {
        let timeless = |m: &RunMetrics| RunMetrics {
            total_us: 0,
            ..m.clone()
        };
        self.species == other.species
            && self.reserved_species == other.reserved_species
            && self.times == other.times
            && self.values == other.values
            && self.reserved == other.reserved
            && self.termination == other.termination
            && timeless(&self.metrics) == timeless(&other.metrics)
    }
}

impl Trajectory {
    pub(crate) fn new(species: Vec<String>, reserved_species: Vec<String>) -> Self {
        Self {
            species,
            reserved_species,
            times: Vec::new(),
            values: Vec::new(),
            reserved: Vec::new(),
            termination: Termination::Completed,
            metrics: RunMetrics::default(),
        }
    }

    /// Append one sample. `reacting` and `reserved` must match the
    /// declared widths.
    pub(crate) fn push(
        &mut self,
        time: f64,
        reacting: impl IntoIterator<Item = f64>,
        reserved: impl IntoIterator<Item = f64>,
    ) {
        self.times.push(time);
        self.values.extend(reacting);
        self.reserved.extend(reserved);
        debug_assert_eq!(self.values.len(), self.times.len() * self.species.len());
        debug_assert_eq!(
            self.reserved.len(),
            self.times.len() * self.reserved_species.len()
        );
    }

    /// Repeat the last sample at each of `times`. Returns the number of
    /// samples added.
    pub(crate) fn pad(&mut self, times: &[f64]) -> usize {
        let n = self.species.len();
        let m = self.reserved_species.len();
        let Some(last) = self.times.len().checked_sub(1) else {
            return 0;
        };
        for &t in times {
            self.times.push(t);
            self.values.extend_from_within(last * n..(last + 1) * n);
            self.reserved.extend_from_within(last * m..(last + 1) * m);
        }
        times.len()
    }

    pub(crate) fn finish(&mut self, termination: Termination, metrics: RunMetrics) {
        self.termination = termination;
        self.metrics = metrics;
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether there are no samples.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Sample times.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Names of the recorded reacting species, in column order.
    pub fn species(&self) -> &[String] {
        &self.species
    }

    /// Names of the reserved species, in column order.
    pub fn reserved_species(&self) -> &[String] {
        &self.reserved_species
    }

    /// Reacting-species values of sample `i`.
    pub fn sample(&self, i: usize) -> Option<&[f64]> {
        let n = self.species.len();
        (i < self.times.len()).then(|| &self.values[i * n..(i + 1) * n])
    }

    /// Reserved-species values of sample `i`.
    pub fn reserved_sample(&self, i: usize) -> Option<&[f64]> {
        let m = self.reserved_species.len();
        (i < self.times.len()).then(|| &self.reserved[i * m..(i + 1) * m])
    }

    /// Iterate `(time, values)` pairs.
    pub fn samples(&self) -> impl Iterator<Item = (f64, &[f64])> + '_ {
        let n = self.species.len();
        self.times
            .iter()
            .enumerate()
            .map(move |(i, &t)| (t, &self.values[i * n..(i + 1) * n]))
    }

    /// The final sample.
    pub fn last(&self) -> Option<(f64, &[f64])> {
        let i = self.times.len().checked_sub(1)?;
        Some((self.times[i], self.sample(i)?))
    }

    /// Time series of one species, reacting or reserved.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        if let Some(c) = self.species.iter().position(|s| s == name) {
            let n = self.species.len();
            return Some(self.values.iter().skip(c).step_by(n).copied().collect());
        }
        let c = self.reserved_species.iter().position(|s| s == name)?;
        let m = self.reserved_species.len();
        Some(self.reserved.iter().skip(c).step_by(m).copied().collect())
    }

    /// Why the run stopped.
    pub fn termination(&self) -> Termination {
        self.termination
    }

    /// Counters collected during the run.
    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    /// FNV-1a hash over the bit patterns of every time and value.
    ///
    /// Two runs with identical inputs and seed produce the same
    /// fingerprint. Not cryptographically secure.
    pub fn fingerprint(&self) -> u64 {
        let mut hash = FNV_OFFSET;
        hash = fnv1a_u64(hash, self.times.len() as u64);
        for &t in &self.times {
            hash = fnv1a_u64(hash, t.to_bits());
        }
        for &v in self.values.iter().chain(&self.reserved) {
            hash = fnv1a_u64(hash, v.to_bits());
        }
        hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_species() -> Trajectory {
        let mut t = Trajectory::new(vec!["A".into(), "B".into()], vec!["time".into()]);
        t.push(0.0, [10.0, 0.0], [0.0]);
        t.push(0.5, [7.0, 3.0], [0.5]);
        t
    }

    #[test]
    fn samples_and_columns() {
        let t = two_species();
        assert_eq!(t.len(), 2);
        assert_eq!(t.sample(1), Some(&[7.0, 3.0][..]));
        assert_eq!(t.sample(2), None);
        assert_eq!(t.column("B"), Some(vec![0.0, 3.0]));
        assert_eq!(t.column("time"), Some(vec![0.0, 0.5]));
        assert_eq!(t.column("nope"), None);
        assert_eq!(t.last(), Some((0.5, &[7.0, 3.0][..])));
        assert_eq!(t.samples().count(), 2);
    }

    #[test]
    fn padding_repeats_last_state() {
        let mut t = two_species();
        assert_eq!(t.pad(&[1.0, 2.0]), 2);
        assert_eq!(t.times(), &[0.0, 0.5, 1.0, 2.0]);
        assert_eq!(t.sample(3), Some(&[7.0, 3.0][..]));
        assert_eq!(t.reserved_sample(3), Some(&[0.5][..]));
    }

    #[test]
    fn padding_empty_trajectory_is_noop() {
        let mut t = Trajectory::new(vec!["A".into()], vec![]);
        assert_eq!(t.pad(&[1.0]), 0);
        assert!(t.is_empty());
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = two_species();
        let b = two_species();
        assert_eq!(a.fingerprint(), b.fingerprint());

        let mut c = two_species();
        c.push(1.0, [7.0, 3.0], [1.0]);
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn equality_ignores_wall_clock_time() {
        let mut a = two_species();
        let mut b = two_species();
        let metrics = RunMetrics {
            accepted_leaps: 1,
            total_us: 10,
            ..RunMetrics::default()
        };
        a.finish(Termination::Completed, metrics.clone());
        b.finish(
            Termination::Completed,
            RunMetrics {
                total_us: 9_999,
                ..metrics.clone()
            },
        );
        assert_eq!(a, b);

        b.finish(
            Termination::Completed,
            RunMetrics {
                accepted_leaps: 2,
                ..metrics
            },
        );
        assert_ne!(a, b);
    }

    #[test]
    fn default_termination_is_complete() {
        assert!(two_species().termination().is_complete());
        assert!(!Termination::Cancelled.is_complete());
    }
}
