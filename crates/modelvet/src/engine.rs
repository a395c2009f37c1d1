use crate::{bag::ErrorBag, error::EngineError, rules::EffectiveRules, value::Value};
use std::collections::BTreeMap;

///
/// RuleEngine
///
/// Boundary to the external rule-execution engine. The engine decides what a
/// rule expression means for a value; this crate only decides which rules
/// apply and how results are merged.
///
/// An empty returned bag means success. `Err` is reserved for hard engine
/// failures (e.g. an unparseable rule expression) and propagates out of the
/// validation pass untouched.
///

pub trait RuleEngine {
    fn run(
        &self,
        data: &BTreeMap<String, Value>,
        rules: &EffectiveRules,
    ) -> Result<ErrorBag, EngineError>;
}
