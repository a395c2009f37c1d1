use crate::{
    bag::ErrorBag,
    engine::RuleEngine,
    error::ValidateError,
    hook::{HookDispatcher, HookEvent, NoHooks},
    record::{RelationPolicy, Validatable},
    relation::{RelationKind, RelationTarget},
    rules::EffectiveRules,
    value::Value,
};
use std::collections::{BTreeMap, BTreeSet};

///
/// Validator
///
/// Drives the validation lifecycle for a record: lifecycle hooks, scenario
/// resolution, relation traversal with foreign-key backfill, effective-rule
/// resolution, and the hand-off to the external rule engine. Ordinary rule
/// failures land in the record's error bag; `Err` is reserved for broken
/// collaborators.
///
/// Collaborators are fixed at construction. The same validator instance can
/// run any number of records.
///

pub struct Validator {
    engine: Box<dyn RuleEngine>,
    hooks: Box<dyn HookDispatcher>,
}

impl Validator {
    pub fn new(engine: impl RuleEngine + 'static) -> Self {
        Self {
            engine: Box::new(engine),
            hooks: Box::new(NoHooks),
        }
    }

    #[must_use]
    pub fn with_hooks(mut self, hooks: impl HookDispatcher + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    /// Validate every declared field of `record`.
    ///
    /// Returns `Ok(true)` iff the pass left no errors in the record's bag.
    /// Never changes the record's scenario; mutates its error bag and, via
    /// relation traversal, foreign-key attributes on the record and its
    /// loaded children.
    pub fn validate(&self, record: &mut dyn Validatable) -> Result<bool, ValidateError> {
        self.validate_fields(record, &[])
    }

    /// Validate only the requested fields (all fields when empty). A filter
    /// disjoint from the declaration validates nothing and succeeds
    /// vacuously.
    pub fn validate_fields(
        &self,
        record: &mut dyn Validatable,
        fields: &[&str],
    ) -> Result<bool, ValidateError> {
        let mut visited = BTreeSet::new();
        self.validate_pass(record, fields, &mut visited)
    }

    /// Whether `field` is effectively required under the record's active
    /// scenario: true iff a `required`-family rule is in force and fails
    /// once the field is removed from the record's attributes.
    pub fn is_required(
        &self,
        record: &dyn Validatable,
        field: &str,
    ) -> Result<bool, ValidateError> {
        let scenario = record.active_scenario();
        let effective = record.rules().effective(&scenario, &[field]);

        let required: Vec<String> = effective
            .get(field)
            .map(|rules| {
                rules
                    .iter()
                    .filter(|rule| rule.starts_with("required"))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if required.is_empty() {
            return Ok(false);
        }

        let mut data = record.attributes();
        data.remove(field);

        let mut probe = EffectiveRules::new();
        probe.insert(field.to_string(), required);

        let failures = self.engine.run(&data, &probe)?;
        Ok(failures.has(field))
    }

    /// One full lifecycle pass. `visited` carries record identities across
    /// the recursion so a cyclic loaded graph terminates.
    fn validate_pass(
        &self,
        record: &mut dyn Validatable,
        fields: &[&str],
        visited: &mut BTreeSet<usize>,
    ) -> Result<bool, ValidateError> {
        if self.hooks.fire(HookEvent::Validating, record).is_halt() {
            // veto: abort untouched, errors keep their pre-call state
            return Ok(false);
        }

        record.errors_mut().flush();
        visited.insert(identity(record));

        let scenario = record.active_scenario();

        // relations first: traversal may backfill foreign keys the record's
        // own rules depend on
        self.traverse(record, visited)?;

        let effective = record.rules().effective(&scenario, fields);
        if !effective.is_empty() {
            let mut data = BTreeMap::new();
            for field in effective.keys() {
                data.insert(
                    field.clone(),
                    record.attribute(field).unwrap_or(Value::Null),
                );
            }

            let failures = self.engine.run(&data, &effective)?;
            record.errors_mut().merge(failures);
        }

        self.hooks.fire(HookEvent::Validated, record);

        Ok(!record.has_errors())
    }

    /// Walk the record's loaded relations, validating each child and folding
    /// its errors into the parent's bag under path-qualified keys.
    ///
    /// Parent-side foreign-key writes are deferred until the child borrows
    /// end, then applied before the parent's own field rules run.
    fn traverse(
        &self,
        record: &mut dyn Validatable,
        visited: &mut BTreeSet<usize>,
    ) -> Result<(), ValidateError> {
        let policy = record.relation_policy();
        if policy == RelationPolicy::None {
            return Ok(());
        }

        let parent_key = record.primary_key_value();
        let mut folded = ErrorBag::new();
        let mut backfills: Vec<(&'static str, Value)> = Vec::new();

        for relation in record.loaded_relations_mut() {
            if !policy.allows(relation.model.name) {
                continue;
            }

            let model = relation.model;
            match (model.kind, relation.target) {
                (RelationKind::BelongsTo, RelationTarget::One(child)) => {
                    self.validate_child(child, model.name.to_string(), &mut folded, visited)?;

                    // a persisted child's owner key is copied as-is, absent
                    // included; the stand-in is only for unresolvable children
                    let value = if child.persisted() && child.primary_key_value().is_present() {
                        child.attribute(model.owner_key).unwrap_or(Value::Null)
                    } else {
                        Value::UNRESOLVED_KEY
                    };
                    backfills.push((model.foreign_key, value));
                }

                (RelationKind::HasOne, RelationTarget::One(child)) => {
                    backfill_child_key(child, model.foreign_key, &parent_key);
                    self.validate_child(child, model.name.to_string(), &mut folded, visited)?;
                }

                (RelationKind::HasMany, RelationTarget::Many(children)) => {
                    for (index, child) in children.into_iter().enumerate() {
                        backfill_child_key(child, model.foreign_key, &parent_key);
                        self.validate_child(child, model.indexed_name(index), &mut folded, visited)?;
                    }
                }

                (RelationKind::ManyToMany, RelationTarget::Many(children)) => {
                    for (index, child) in children.into_iter().enumerate() {
                        self.validate_child(child, model.indexed_name(index), &mut folded, visited)?;
                    }
                }

                // kind/shape mismatch is a host adapter bug, not a rule
                // failure; skip rather than guess
                _ => {}
            }
        }

        for (foreign_key, value) in backfills {
            record.set_attribute(foreign_key, value);
        }
        record.errors_mut().merge(folded);

        Ok(())
    }

    /// Run a full validation pass on one child and fold its errors under
    /// `path.childField`. Children already on the active path are skipped.
    fn validate_child(
        &self,
        child: &mut dyn Validatable,
        path: String,
        folded: &mut ErrorBag,
        visited: &mut BTreeSet<usize>,
    ) -> Result<(), ValidateError> {
        if visited.contains(&identity(child)) {
            return Ok(());
        }

        let ok = self.validate_pass(child, &[], visited)?;
        if !ok {
            folded.merge_under(&path, child.errors());
        }

        Ok(())
    }
}

/// Object identity for the per-call visited set: the record's thin address.
fn identity(record: &dyn Validatable) -> usize {
    std::ptr::from_ref(record).cast::<()>() as usize
}

/// Backfill an owned child's foreign key from the parent's primary key when
/// the child has no value of its own yet. An unset parent key degrades to the
/// unresolved-key stand-in so the child's `required` rule still holds.
fn backfill_child_key(child: &mut dyn Validatable, foreign_key: &str, parent_key: &Value) {
    let current = child.attribute(foreign_key).unwrap_or(Value::Null);
    if current.is_present() {
        return;
    }

    let value = if parent_key.is_present() {
        parent_key.clone()
    } else {
        Value::UNRESOLVED_KEY
    };
    child.set_attribute(foreign_key, value);
}
