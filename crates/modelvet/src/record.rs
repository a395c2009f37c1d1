use crate::{
    bag::ErrorBag,
    relation::LoadedRelation,
    rules::RuleSet,
    scenario::Scenario,
    value::Value,
};
use std::collections::{BTreeMap, BTreeSet};

///
/// Validatable
///
/// The capability contract a record type implements to take part in
/// validation. This is the whole ORM boundary: attribute access, the
/// persistence flag, the primary key, the mutable scenario, the owned error
/// bag, and the already-loaded relations. The orchestration logic lives once
/// in [`crate::validator::Validator`] and operates over this trait; nothing
/// here knows how rows are stored or loaded.
///
/// Relation traversal only ever sees children as `&mut dyn Validatable`, so
/// "does this object support validation" is settled by the type system, not
/// by runtime probing.
///

pub trait Validatable {
    /// The record's declared rule table.
    fn rules(&self) -> RuleSet;

    fn attribute(&self, name: &str) -> Option<Value>;

    fn attributes(&self) -> BTreeMap<String, Value>;

    fn set_attribute(&mut self, name: &str, value: Value);

    /// Whether the record already exists in storage.
    fn persisted(&self) -> bool;

    fn primary_key_name(&self) -> &str;

    /// Current primary key value; `Value::Null` when unset.
    fn primary_key_value(&self) -> Value {
        self.attribute(self.primary_key_name())
            .unwrap_or(Value::Null)
    }

    fn scenario(&self) -> &Scenario;

    fn set_scenario(&mut self, scenario: Scenario);

    fn is_scenario(&self, label: &str) -> bool {
        self.scenario().as_str() == label
    }

    fn reset_scenario(&mut self) {
        self.set_scenario(Scenario::unset());
    }

    /// The scenario a validation pass runs under: the explicitly set one
    /// when non-empty, else the persistence default.
    fn active_scenario(&self) -> Scenario {
        let scenario = self.scenario();
        if scenario.is_unset() {
            Scenario::default_for(self.persisted())
        } else {
            scenario.clone()
        }
    }

    fn errors(&self) -> &ErrorBag;

    fn errors_mut(&mut self) -> &mut ErrorBag;

    fn has_errors(&self) -> bool {
        !self.errors().is_empty()
    }

    fn attribute_errors(&self, name: &str) -> &[String] {
        self.errors().get(name)
    }

    fn attribute_has_errors(&self, name: &str) -> bool {
        self.errors().has(name)
    }

    fn attribute_remove_errors(&mut self, name: &str) {
        self.errors_mut().remove_all(name);
    }

    /// Which loaded relations a validation pass may descend into.
    fn relation_policy(&self) -> RelationPolicy {
        RelationPolicy::All
    }

    /// The record's currently loaded relations. Must hand out only
    /// already-materialized children and must never trigger a load; that
    /// bound is what keeps traversal recursion finite.
    fn loaded_relations_mut(&mut self) -> Vec<LoadedRelation<'_>> {
        Vec::new()
    }
}

///
/// RelationPolicy
///
/// Whether relation traversal runs, and for which relation names.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum RelationPolicy {
    #[default]
    All,
    None,
    Only(BTreeSet<String>),
}

impl RelationPolicy {
    /// Allow-list constructor.
    pub fn only(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::Only(names.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn allows(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::None => false,
            Self::Only(names) => names.contains(name),
        }
    }
}
