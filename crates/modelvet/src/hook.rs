use crate::record::Validatable;

///
/// HookEvent
///
/// Lifecycle points a validation pass announces to observers.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HookEvent {
    /// Fires before anything else in a pass; may veto the whole pass.
    Validating,
    /// Fires after the pass; its outcome is ignored.
    Validated,
}

///
/// HookOutcome
///
/// `Proceed` covers both "listeners ran fine" and "no listeners at all".
/// `Halt` is an explicit veto: the pass aborts immediately and reports
/// failure without touching the record's error bag.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HookOutcome {
    Proceed,
    Halt,
}

impl HookOutcome {
    #[must_use]
    pub const fn is_halt(self) -> bool {
        matches!(self, Self::Halt)
    }
}

///
/// HookDispatcher
///
/// Observer boundary handed to the validator at construction. A panic in a
/// dispatcher propagates untouched; the validator makes no attempt to
/// recover broken collaborators.
///

pub trait HookDispatcher {
    fn fire(&self, event: HookEvent, record: &mut dyn Validatable) -> HookOutcome;
}

///
/// NoHooks
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NoHooks;

impl HookDispatcher for NoHooks {
    fn fire(&self, _event: HookEvent, _record: &mut dyn Validatable) -> HookOutcome {
        HookOutcome::Proceed
    }
}
