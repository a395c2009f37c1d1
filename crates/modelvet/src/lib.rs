//! Scenario-aware validation for relational model records: a record validates
//! its own fields, and recursively its already-loaded relations, against
//! declarative rule sets before being persisted. Rule semantics stay behind
//! the [`engine::RuleEngine`] boundary; persistence stays behind
//! [`record::Validatable`].
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod bag;
pub mod engine;
pub mod error;
pub mod hook;
pub mod record;
pub mod relation;
pub mod rules;
pub mod scenario;
pub mod validator;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Prelude contains only domain vocabulary plus the validator entry point.
/// No errors, engines, or dispatchers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        bag::ErrorBag,
        record::{RelationPolicy, Validatable},
        relation::{LoadedRelation, RelationKind, RelationModel, RelationTarget},
        rules::{RuleSet, RuleSpec},
        scenario::Scenario,
        validator::Validator,
        value::Value,
    };
}
