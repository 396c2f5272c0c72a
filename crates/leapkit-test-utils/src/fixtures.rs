//! Mock collaborators for engine testing.
//!
//! - [`ConstantPropensity`]: every reaction fires at a fixed rate.
//! - [`FailingPropensity`]: fails deterministically after N calls.
//! - [`CancelAfter`]: wraps an evaluator and fires a callback after N calls.
//! - [`CountingRules`]: a rule engine that counts its invocations.

use std::sync::atomic::{AtomicUsize, Ordering};

use leapkit_core::{
    DerivedCache, PropensityError, PropensityEvaluator, ReactionNetwork, RuleEngine, SpeciesId,
};

/// Writes the same rate for every reaction, regardless of state.
///
/// Ignores the state entirely, so it can drive a species negative on
/// purpose. Useful for exercising rejection and stall handling.
pub struct ConstantPropensity {
    pub rate: f64,
}

impl ConstantPropensity {
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }
}

impl PropensityEvaluator for ConstantPropensity {
    fn name(&self) -> &str {
        "constant"
    }

    fn compute(
        &self,
        _network: &ReactionNetwork,
        _concentrations: &[f64],
        rates: &mut [f64],
    ) -> Result<(), PropensityError> {
        rates.fill(self.rate);
        Ok(())
    }
}

/// Succeeds for `succeed_count` calls, then fails.
pub struct FailingPropensity {
    inner: Box<dyn PropensityEvaluator>,
    succeed_count: usize,
    call_count: AtomicUsize,
}

impl FailingPropensity {
    pub fn new(inner: impl PropensityEvaluator + 'static, succeed_count: usize) -> Self {
        Self {
            inner: Box::new(inner),
            succeed_count,
            call_count: AtomicUsize::new(0),
        }
    }
}

impl PropensityEvaluator for FailingPropensity {
    fn name(&self) -> &str {
        "failing"
    }

    fn compute(
        &self,
        network: &ReactionNetwork,
        concentrations: &[f64],
        rates: &mut [f64],
    ) -> Result<(), PropensityError> {
        let count = self.call_count.fetch_add(1, Ordering::Relaxed);
        if count >= self.succeed_count {
            return Err(PropensityError::ExecutionFailed {
                reason: format!("deliberate failure after {} calls", self.succeed_count),
            });
        }
        self.inner.compute(network, concentrations, rates)
    }
}

/// Delegates to `inner` and invokes `on_limit` on call number `limit`.
///
/// Typically `on_limit` cancels a token, so the engine stops at the
/// start of the following iteration.
pub struct CancelAfter<P> {
    inner: P,
    limit: usize,
    calls: AtomicUsize,
    on_limit: Box<dyn Fn() + Send + Sync>,
}

impl<P: PropensityEvaluator> CancelAfter<P> {
    pub fn new(inner: P, limit: usize, on_limit: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            inner,
            limit,
            calls: AtomicUsize::new(0),
            on_limit: Box::new(on_limit),
        }
    }

    /// Number of calls seen so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl<P: PropensityEvaluator> PropensityEvaluator for CancelAfter<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn compute(
        &self,
        network: &ReactionNetwork,
        concentrations: &[f64],
        rates: &mut [f64],
    ) -> Result<(), PropensityError> {
        let n = self.calls.fetch_add(1, Ordering::Relaxed) + 1;
        if n == self.limit {
            (self.on_limit)();
        }
        self.inner.compute(network, concentrations, rates)
    }
}

/// Rule engine that records how often it ran and optionally sets one
/// species to the sum of others.
#[derive(Default)]
pub struct CountingRules {
    calls: AtomicUsize,
    sum: Option<(SpeciesId, Vec<SpeciesId>)>,
}

impl CountingRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also assign `target = Σ inputs` on every call.
    pub fn summing(target: SpeciesId, inputs: Vec<SpeciesId>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            sum: Some((target, inputs)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl RuleEngine for CountingRules {
    fn apply(&self, concentrations: &mut [f64], cache: &mut DerivedCache) {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if let Some((target, inputs)) = &self.sum {
            let value = inputs.iter().map(|s| concentrations[s.index()]).sum();
            concentrations[target.index()] = value;
            cache.set(*target, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::networks;

    #[test]
    fn failing_propensity_fails_after_budget() {
        let net = networks::decay(1.0);
        let p = FailingPropensity::new(ConstantPropensity::new(2.0), 1);
        let mut rates = [0.0];
        assert!(p.compute(&net, &[1.0], &mut rates).is_ok());
        assert_eq!(rates, [2.0]);
        assert!(p.compute(&net, &[1.0], &mut rates).is_err());
    }

    #[test]
    fn cancel_after_fires_once_at_limit() {
        use std::sync::atomic::AtomicBool;
        use std::sync::Arc;

        let net = networks::decay(1.0);
        let flag = Arc::new(AtomicBool::new(false));
        let raised = flag.clone();
        let p = CancelAfter::new(ConstantPropensity::new(1.0), 2, move || {
            raised.store(true, Ordering::Release)
        });
        let mut rates = [0.0];
        p.compute(&net, &[1.0], &mut rates).unwrap();
        assert!(!flag.load(Ordering::Acquire));
        p.compute(&net, &[1.0], &mut rates).unwrap();
        assert!(flag.load(Ordering::Acquire));
        assert_eq!(p.calls(), 2);
    }

    #[test]
    fn counting_rules_sum() {
        let rules = CountingRules::summing(SpeciesId(2), vec![SpeciesId(0), SpeciesId(1)]);
        let mut state = vec![1.0, 2.0, 0.0];
        let mut cache = DerivedCache::new(3);
        rules.apply(&mut state, &mut cache);
        assert_eq!(state[2], 3.0);
        assert_eq!(rules.calls(), 1);
    }
}
