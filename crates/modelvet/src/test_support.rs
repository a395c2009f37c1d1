//! Shared fixtures for validator tests: an in-memory record type, a small
//! rule-interpreting engine, and instrumented hook dispatchers.

use crate::{
    bag::ErrorBag,
    engine::RuleEngine,
    error::EngineError,
    hook::{HookDispatcher, HookEvent, HookOutcome},
    record::{RelationPolicy, Validatable},
    relation::{LoadedRelation, RelationModel, RelationTarget},
    rules::{EffectiveRules, RuleSet, RuleSpec},
    scenario::Scenario,
    value::Value,
};
use std::{cell::Cell, collections::BTreeMap, rc::Rc};

///
/// TestRecord
///
/// In-memory record with explicit attributes, rules, and owned relation
/// children. Mirrors what a host ORM adapter would expose.
///

pub(crate) struct TestRecord {
    pub(crate) attributes: BTreeMap<String, Value>,
    pub(crate) rules: RuleSet,
    pub(crate) exists: bool,
    pub(crate) scenario: Scenario,
    pub(crate) errors: ErrorBag,
    pub(crate) policy: RelationPolicy,
    pub(crate) relations: Vec<(RelationModel, RelChildren)>,
}

pub(crate) enum RelChildren {
    One(Box<TestRecord>),
    Many(Vec<TestRecord>),
}

impl TestRecord {
    pub(crate) fn new(rules: RuleSet) -> Self {
        Self {
            attributes: BTreeMap::new(),
            rules,
            exists: false,
            scenario: Scenario::unset(),
            errors: ErrorBag::new(),
            policy: RelationPolicy::All,
            relations: Vec::new(),
        }
    }

    pub(crate) fn attr(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.to_string(), value.into());
        self
    }

    pub(crate) fn saved(mut self) -> Self {
        self.exists = true;
        self
    }

    pub(crate) fn relation_one(mut self, model: RelationModel, child: Self) -> Self {
        self.relations.push((model, RelChildren::One(Box::new(child))));
        self
    }

    pub(crate) fn relation_many(mut self, model: RelationModel, children: Vec<Self>) -> Self {
        self.relations.push((model, RelChildren::Many(children)));
        self
    }

    pub(crate) fn child(&self, name: &str) -> &Self {
        match self
            .relations
            .iter()
            .find(|(model, _)| model.name == name)
            .map(|(_, children)| children)
        {
            Some(RelChildren::One(child)) => child,
            _ => panic!("no to-one relation named {name}"),
        }
    }

    pub(crate) fn children(&self, name: &str) -> &[Self] {
        match self
            .relations
            .iter()
            .find(|(model, _)| model.name == name)
            .map(|(_, children)| children)
        {
            Some(RelChildren::Many(children)) => children,
            _ => panic!("no to-many relation named {name}"),
        }
    }
}

impl Validatable for TestRecord {
    fn rules(&self) -> RuleSet {
        self.rules.clone()
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        self.attributes.get(name).cloned()
    }

    fn attributes(&self) -> BTreeMap<String, Value> {
        self.attributes.clone()
    }

    fn set_attribute(&mut self, name: &str, value: Value) {
        self.attributes.insert(name.to_string(), value);
    }

    fn persisted(&self) -> bool {
        self.exists
    }

    fn primary_key_name(&self) -> &str {
        "id"
    }

    fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    fn set_scenario(&mut self, scenario: Scenario) {
        self.scenario = scenario;
    }

    fn errors(&self) -> &ErrorBag {
        &self.errors
    }

    fn errors_mut(&mut self) -> &mut ErrorBag {
        &mut self.errors
    }

    fn relation_policy(&self) -> RelationPolicy {
        self.policy.clone()
    }

    fn loaded_relations_mut(&mut self) -> Vec<LoadedRelation<'_>> {
        self.relations
            .iter_mut()
            .map(|(model, children)| LoadedRelation {
                model: *model,
                target: match children {
                    RelChildren::One(child) => RelationTarget::One(child.as_mut()),
                    RelChildren::Many(children) => RelationTarget::Many(
                        children
                            .iter_mut()
                            .map(|child| child as &mut dyn Validatable)
                            .collect(),
                    ),
                },
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Fixture rule tables (post / author / comment / tag graph)
// ---------------------------------------------------------------------------

pub(crate) fn post_rules() -> RuleSet {
    RuleSet::new()
        .field(
            "id",
            [
                RuleSpec::any("integer"),
                RuleSpec::only("required", [Scenario::UPDATE]),
            ],
        )
        .field("title", [RuleSpec::any("string"), RuleSpec::any("required")])
        .field("position", [RuleSpec::any("integer")])
}

pub(crate) fn author_rules() -> RuleSet {
    RuleSet::new()
        .field("id", [RuleSpec::any("integer")])
        .field("name", [RuleSpec::any("string"), RuleSpec::any("required")])
}

pub(crate) fn comment_rules() -> RuleSet {
    RuleSet::new()
        .field(
            "post_id",
            [RuleSpec::any("integer"), RuleSpec::any("required")],
        )
        .field("body", [RuleSpec::any("string"), RuleSpec::any("required")])
}

pub(crate) fn tag_rules() -> RuleSet {
    RuleSet::new().field("label", [RuleSpec::any("string"), RuleSpec::any("required")])
}

///
/// LinkedRecord
///
/// Heap-allocated record whose single relation points at a peer through a
/// raw pointer. Owned trees cannot express a mutually-loaded graph; hosts
/// backed by arenas or shared cells can, and the traversal's visited set is
/// what keeps such a graph finite. `passes` counts full validation passes.
///

pub(crate) struct LinkedRecord {
    pub(crate) attributes: BTreeMap<String, Value>,
    pub(crate) scenario: Scenario,
    pub(crate) errors: ErrorBag,
    pub(crate) passes: Rc<Cell<usize>>,
    pub(crate) peer: *mut LinkedRecord,
    pub(crate) peer_model: RelationModel,
}

impl LinkedRecord {
    fn new(peer_model: RelationModel) -> Self {
        Self {
            attributes: BTreeMap::new(),
            scenario: Scenario::unset(),
            errors: ErrorBag::new(),
            passes: Rc::new(Cell::new(0)),
            peer: std::ptr::null_mut(),
            peer_model,
        }
    }

    /// A mutually-loaded pair: `a` has-one `b`, `b` belongs-to `a`.
    /// The caller owns both and must release them with [`Self::free`].
    pub(crate) fn pair() -> (*mut Self, *mut Self) {
        let a = Box::into_raw(Box::new(Self::new(RelationModel::has_one(
            "profile", "owner_id",
        ))));
        let b = Box::into_raw(Box::new(Self::new(RelationModel::belongs_to(
            "owner", "owner_id", "id",
        ))));

        unsafe {
            (*a).peer = b;
            (*b).peer = a;
        }

        (a, b)
    }

    pub(crate) unsafe fn free(a: *mut Self, b: *mut Self) {
        unsafe {
            drop(Box::from_raw(a));
            drop(Box::from_raw(b));
        }
    }
}

impl Validatable for LinkedRecord {
    fn rules(&self) -> RuleSet {
        // one call per validation pass; doubles as the pass counter
        self.passes.set(self.passes.get() + 1);
        RuleSet::new()
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        self.attributes.get(name).cloned()
    }

    fn attributes(&self) -> BTreeMap<String, Value> {
        self.attributes.clone()
    }

    fn set_attribute(&mut self, name: &str, value: Value) {
        self.attributes.insert(name.to_string(), value);
    }

    fn persisted(&self) -> bool {
        false
    }

    fn primary_key_name(&self) -> &str {
        "id"
    }

    fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    fn set_scenario(&mut self, scenario: Scenario) {
        self.scenario = scenario;
    }

    fn errors(&self) -> &ErrorBag {
        &self.errors
    }

    fn errors_mut(&mut self) -> &mut ErrorBag {
        &mut self.errors
    }

    fn loaded_relations_mut(&mut self) -> Vec<LoadedRelation<'_>> {
        if self.peer.is_null() {
            return Vec::new();
        }

        vec![LoadedRelation {
            model: self.peer_model,
            target: RelationTarget::One(unsafe { &mut *self.peer }),
        }]
    }
}

///
/// StubEngine
///
/// Minimal rule interpreter covering the expressions the fixtures declare.
/// Non-required rules skip null/missing values, matching the usual engine
/// convention that only `required` asserts presence.
///

pub(crate) struct StubEngine;

impl RuleEngine for StubEngine {
    fn run(
        &self,
        data: &BTreeMap<String, Value>,
        rules: &EffectiveRules,
    ) -> Result<ErrorBag, EngineError> {
        let mut bag = ErrorBag::new();

        for (field, field_rules) in rules {
            let value = data.get(field);

            for rule in field_rules {
                match rule.as_str() {
                    "required" => {
                        if !value.is_some_and(Value::is_present) {
                            bag.add(field, format!("{field} is required"));
                        }
                    }
                    "integer" => {
                        if let Some(value) = value
                            && !value.is_null()
                            && value.as_int().is_none()
                        {
                            bag.add(field, format!("{field} must be an integer"));
                        }
                    }
                    "string" => {
                        if let Some(value) = value
                            && !value.is_null()
                            && value.as_text().is_none()
                        {
                            bag.add(field, format!("{field} must be a string"));
                        }
                    }
                    other => {
                        return Err(EngineError::new(format!("unknown rule: {other}")));
                    }
                }
            }
        }

        Ok(bag)
    }
}

///
/// BrokenEngine
///

pub(crate) struct BrokenEngine;

impl RuleEngine for BrokenEngine {
    fn run(
        &self,
        _data: &BTreeMap<String, Value>,
        _rules: &EffectiveRules,
    ) -> Result<ErrorBag, EngineError> {
        Err(EngineError::new("engine backend unavailable"))
    }
}

///
/// CountingHooks
///
/// Records how often each lifecycle event fired; never vetoes.
///

pub(crate) struct CountingHooks {
    pub(crate) validating: Rc<Cell<usize>>,
    pub(crate) validated: Rc<Cell<usize>>,
}

impl CountingHooks {
    pub(crate) fn new() -> (Self, Rc<Cell<usize>>, Rc<Cell<usize>>) {
        let validating = Rc::new(Cell::new(0));
        let validated = Rc::new(Cell::new(0));
        let hooks = Self {
            validating: Rc::clone(&validating),
            validated: Rc::clone(&validated),
        };
        (hooks, validating, validated)
    }
}

impl HookDispatcher for CountingHooks {
    fn fire(&self, event: HookEvent, _record: &mut dyn Validatable) -> HookOutcome {
        match event {
            HookEvent::Validating => self.validating.set(self.validating.get() + 1),
            HookEvent::Validated => self.validated.set(self.validated.get() + 1),
        }
        HookOutcome::Proceed
    }
}

///
/// VetoHooks
///
/// Vetoes every `Validating` event.
///

pub(crate) struct VetoHooks;

impl HookDispatcher for VetoHooks {
    fn fire(&self, event: HookEvent, _record: &mut dyn Validatable) -> HookOutcome {
        match event {
            HookEvent::Validating => HookOutcome::Halt,
            HookEvent::Validated => HookOutcome::Proceed,
        }
    }
}
