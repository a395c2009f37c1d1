use crate::scenario::Scenario;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

///
/// EffectiveRules
///
/// The flattened per-field rule lists after scenario filtering, in the shape
/// the external rule engine consumes. An empty map means "nothing to
/// validate" and the caller treats it as vacuous success.
///

pub type EffectiveRules = BTreeMap<String, Vec<String>>;

///
/// RuleSpec
///
/// One rule expression plus an optional scenario restriction. `None` means
/// the rule applies to every scenario. The expression itself is opaque to
/// this layer; only the engine interprets it.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RuleSpec {
    pub rule: String,
    pub scenarios: Option<BTreeSet<Scenario>>,
}

impl RuleSpec {
    /// A rule that applies in every scenario.
    pub fn any(rule: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            scenarios: None,
        }
    }

    /// A rule restricted to the named scenarios.
    pub fn only(
        rule: impl Into<String>,
        scenarios: impl IntoIterator<Item = impl Into<Scenario>>,
    ) -> Self {
        Self {
            rule: rule.into(),
            scenarios: Some(scenarios.into_iter().map(Into::into).collect()),
        }
    }

    #[must_use]
    pub fn applies_to(&self, scenario: &Scenario) -> bool {
        self.scenarios
            .as_ref()
            .is_none_or(|set| set.contains(scenario))
    }
}

///
/// RuleSet
///
/// A record's declared rule table: field name to ordered rule specs, in
/// declaration order. Declaring the same field twice appends to its spec
/// list.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct RuleSet {
    fields: Vec<(String, Vec<RuleSpec>)>,
}

impl RuleSet {
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Builder-style field declaration.
    #[must_use]
    pub fn field(
        mut self,
        name: impl Into<String>,
        specs: impl IntoIterator<Item = RuleSpec>,
    ) -> Self {
        let name = name.into();
        let specs: Vec<RuleSpec> = specs.into_iter().collect();

        if let Some((_, existing)) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            existing.extend(specs);
        } else {
            self.fields.push((name, specs));
        }

        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Resolve the effective flat rule list per field for a scenario.
    ///
    /// A non-empty `fields` filter restricts the declaration to those keys
    /// first. Specs are kept in declared order when they carry no scenario
    /// restriction or their set contains the active scenario; all matching
    /// specs are collected, never short-circuited. Fields with no surviving
    /// specs are omitted entirely.
    ///
    /// Pure: no side effects on the declaration or the record.
    #[must_use]
    pub fn effective(&self, scenario: &Scenario, fields: &[&str]) -> EffectiveRules {
        let mut out = EffectiveRules::new();

        for (name, specs) in &self.fields {
            if !fields.is_empty() && !fields.contains(&name.as_str()) {
                continue;
            }

            let matched: Vec<String> = specs
                .iter()
                .filter(|spec| spec.applies_to(scenario))
                .map(|spec| spec.rule.clone())
                .collect();

            if !matched.is_empty() {
                out.entry(name.clone()).or_default().extend(matched);
            }
        }

        out
    }
}
