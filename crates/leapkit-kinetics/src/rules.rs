//! Assignment rules: `target = f(inputs)` evaluated after each leap.
//!
//! Rules run in declaration order, so a later rule sees the values
//! assigned by an earlier one. Targets are the species a network
//! description marks as "modified"; callers usually also list them as
//! exempt from the nonnegativity check, see [`AssignmentRules::targets`].
//!
//! Constructed via the builder pattern: [`AssignmentRules::builder`].

use std::fmt;

use leapkit_core::{DerivedCache, NetworkError, ReactionNetwork, RuleEngine, SpeciesId};
use smallvec::SmallVec;

type RuleFn = Box<dyn Fn(&[f64]) -> f64 + Send + Sync>;

struct Rule {
    target: SpeciesId,
    inputs: SmallVec<[SpeciesId; 4]>,
    func: RuleFn,
}

/// An ordered list of assignment rules over a fixed network.
pub struct AssignmentRules {
    rules: Vec<Rule>,
}

/// Builder for [`AssignmentRules`].
///
/// Species names are resolved against the network once, at
/// [`build`](AssignmentRulesBuilder::build) time.
pub struct AssignmentRulesBuilder<'n> {
    network: &'n ReactionNetwork,
    pending: Vec<(String, Vec<String>, RuleFn)>,
}

impl AssignmentRules {
    /// Create a builder bound to `network`.
    pub fn builder(network: &ReactionNetwork) -> AssignmentRulesBuilder<'_> {
        AssignmentRulesBuilder {
            network,
            pending: Vec::new(),
        }
    }

    /// Species assigned by some rule, in rule order.
    pub fn targets(&self) -> impl Iterator<Item = SpeciesId> + '_ {
        self.rules.iter().map(|r| r.target)
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'n> AssignmentRulesBuilder<'n> {
    /// Add the rule `target = func(inputs...)`.
    ///
    /// `func` receives the input values in the order given.
    pub fn assign<F>(mut self, target: &str, inputs: &[&str], func: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        self.pending.push((
            target.to_string(),
            inputs.iter().map(|s| s.to_string()).collect(),
            Box::new(func),
        ));
        self
    }

    /// Resolve every name and build the rule list.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::UnknownSpecies`] if a target or input is
    /// not declared in the network.
    pub fn build(self) -> Result<AssignmentRules, NetworkError> {
        let resolve = |name: &str| {
            self.network
                .species_id(name)
                .ok_or_else(|| NetworkError::UnknownSpecies {
                    name: name.to_string(),
                })
        };
        let mut rules = Vec::with_capacity(self.pending.len());
        for (target, inputs, func) in self.pending {
            let target = resolve(target.as_str())?;
            let inputs = inputs
                .iter()
                .map(|n| resolve(n.as_str()))
                .collect::<Result<SmallVec<_>, _>>()?;
            rules.push(Rule {
                target,
                inputs,
                func,
            });
        }
        Ok(AssignmentRules { rules })
    }
}

impl RuleEngine for AssignmentRules {
    fn apply(&self, concentrations: &mut [f64], cache: &mut DerivedCache) {
        let mut args: SmallVec<[f64; 4]> = SmallVec::new();
        for rule in &self.rules {
            args.clear();
            args.extend(rule.inputs.iter().map(|s| concentrations[s.index()]));
            let value = (rule.func)(&args);
            concentrations[rule.target.index()] = value;
            cache.set(rule.target, value);
        }
    }
}

impl fmt::Debug for AssignmentRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssignmentRules")
            .field(
                "targets",
                &self.rules.iter().map(|r| r.target).collect::<Vec<_>>(),
            )
            .finish()
    }
}
