use std::borrow::Cow;

use crate::outcome::{CheckResult, IntoOutcome, Outcome};

/// Named assertions collected during one iteration.
///
/// The iteration is successful only if every recorded check passed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checks {
    results: Vec<CheckResult>,
}

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `name` and returns `passed` so callers can branch on it.
    pub fn check(&mut self, name: impl Into<Cow<'static, str>>, passed: bool) -> bool {
        self.results.push(CheckResult {
            name: name.into(),
            passed,
        });
        passed
    }

    /// Shorthand for a single check.
    pub fn single(name: impl Into<Cow<'static, str>>, passed: bool) -> Self {
        let mut checks = Self::new();
        checks.check(name, passed);
        checks
    }

    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|c| c.passed)
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }
}

impl IntoOutcome for Checks {
    fn checks(&self) -> &[CheckResult] {
        &self.results
    }

    fn into_outcome(self) -> Outcome {
        let failed: Vec<&str> = self
            .results
            .iter()
            .filter(|c| !c.passed)
            .map(|c| c.name.as_ref())
            .collect();

        if failed.is_empty() {
            Outcome::Success
        } else {
            Outcome::Failure(format!("check failed: {}", failed.join(", ")))
        }
    }
}
