use std::borrow::Cow;

/// Result of one iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure(String),
}

impl Outcome {
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success => None,
            Self::Failure(m) => Some(m),
        }
    }
}

/// A single named predicate evaluated by an iteration (`status was 200`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub name: Cow<'static, str>,
    pub passed: bool,
}

/// What an iteration hands back to the runner on normal completion.
pub trait IntoOutcome {
    /// Individual checks to record as metrics. Empty unless the value carries checks.
    fn checks(&self) -> &[CheckResult] {
        &[]
    }

    fn into_outcome(self) -> Outcome;
}

impl IntoOutcome for Outcome {
    fn into_outcome(self) -> Outcome {
        self
    }
}

impl IntoOutcome for () {
    fn into_outcome(self) -> Outcome {
        Outcome::Success
    }
}
