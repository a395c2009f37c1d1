use thiserror::Error as ThisError;

///
/// ValidateError
///
/// The single fatal-error surface of the crate. Ordinary rule failures are
/// data in an [`crate::bag::ErrorBag`], never an `Err`; this enum is reserved
/// for broken collaborators, which the orchestrator does not try to recover.
///

#[derive(Debug, ThisError)]
pub enum ValidateError {
    #[error(transparent)]
    Engine(#[from] EngineError),
}

///
/// EngineError
///
/// Hard failure raised by the external rule-execution engine (as opposed to
/// rule failures, which the engine reports as messages).
///

#[derive(Debug, ThisError)]
#[error("rule engine failure: {message}")]
pub struct EngineError {
    pub message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
