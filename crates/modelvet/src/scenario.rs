use derive_more::{Deref, DerefMut};
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// Scenario
///
/// Opaque label selecting which rule specs are active for a validation pass.
/// The empty label means "unset"; an unset scenario is resolved from the
/// record's persistence state at validation time. An explicitly set non-empty
/// scenario is never overridden.
///

#[derive(
    Clone, Debug, Default, Deref, DerefMut, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd,
    Serialize,
)]
pub struct Scenario(String);

impl Scenario {
    /// Default scenario for records that have never been persisted.
    pub const INSERT: &'static str = "insert";

    /// Default scenario for records that already exist in storage.
    pub const UPDATE: &'static str = "update";

    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    #[must_use]
    pub const fn unset() -> Self {
        Self(String::new())
    }

    #[must_use]
    pub fn insert() -> Self {
        Self::new(Self::INSERT)
    }

    #[must_use]
    pub fn update() -> Self {
        Self::new(Self::UPDATE)
    }

    /// Reserved default when no scenario was set explicitly.
    #[must_use]
    pub fn default_for(persisted: bool) -> Self {
        if persisted {
            Self::update()
        } else {
            Self::insert()
        }
    }

    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Scenario {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for Scenario {
    fn from(label: String) -> Self {
        Self(label)
    }
}
