use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::ledger::{ErrorLedger, ErrorSink, TracingErrorSink};
use crate::outcome::Outcome;

/// Point-in-time copy of the success/failure counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub success: u64,
    pub failure: u64,
}

impl Counters {
    pub fn total(&self) -> u64 {
        self.success.saturating_add(self.failure)
    }
}

/// Tallies iteration outcomes and reports each distinct failure message once.
///
/// Shared by every virtual user for the lifetime of a run.
pub struct OutcomeAccountant {
    success: AtomicU64,
    failure: AtomicU64,
    ledger: ErrorLedger,
    sink: Arc<dyn ErrorSink>,
}

impl OutcomeAccountant {
    pub fn new(sink: Arc<dyn ErrorSink>) -> Self {
        Self {
            success: AtomicU64::new(0),
            failure: AtomicU64::new(0),
            ledger: ErrorLedger::default(),
            sink,
        }
    }

    pub fn record(&self, outcome: &Outcome) {
        match outcome {
            Outcome::Success => {
                self.success.fetch_add(1, Ordering::Relaxed);
            }
            Outcome::Failure(message) => {
                self.failure.fetch_add(1, Ordering::Relaxed);
                self.log_unique_error(message);
            }
        }
    }

    /// Emits `message` to the sink unless it was already emitted. Returns whether it was.
    pub fn log_unique_error(&self, message: &str) -> bool {
        if !self.ledger.first_sighting(message) {
            return false;
        }
        self.sink.emit(message);
        true
    }

    pub fn success_count(&self) -> u64 {
        self.success.load(Ordering::Relaxed)
    }

    pub fn failure_count(&self) -> u64 {
        self.failure.load(Ordering::Relaxed)
    }

    pub fn counters(&self) -> Counters {
        Counters {
            success: self.success_count(),
            failure: self.failure_count(),
        }
    }

    pub fn unique_errors(&self) -> usize {
        self.ledger.len()
    }
}

impl Default for OutcomeAccountant {
    fn default() -> Self {
        Self::new(Arc::new(TracingErrorSink))
    }
}

impl fmt::Debug for OutcomeAccountant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutcomeAccountant")
            .field("success", &self.success_count())
            .field("failure", &self.failure_count())
            .field("unique_errors", &self.unique_errors())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn recording() -> (OutcomeAccountant, Arc<Mutex<Vec<String>>>) {
        let emitted = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let emitted = emitted.clone();
            move |m: &str| emitted.lock().push(m.to_string())
        };
        (OutcomeAccountant::new(Arc::new(sink)), emitted)
    }

    #[test]
    fn success_only_touches_success_counter() {
        let (acc, emitted) = recording();
        acc.record(&Outcome::Success);
        acc.record(&Outcome::Success);

        assert_eq!(acc.counters(), Counters { success: 2, failure: 0 });
        assert!(emitted.lock().is_empty());
    }

    #[test]
    fn log_unique_error_is_idempotent() {
        let (acc, emitted) = recording();
        assert!(acc.log_unique_error("failed to run setup phase: no db"));
        assert!(!acc.log_unique_error("failed to run setup phase: no db"));

        assert_eq!(acc.failure_count(), 0);
        assert_eq!(emitted.lock().len(), 1);
        assert_eq!(acc.unique_errors(), 1);
    }

    #[test]
    fn counters_total_matches_recorded() {
        let (acc, _) = recording();
        for i in 0..10 {
            if i % 3 == 0 {
                acc.record(&Outcome::failure(format!("e{}", i % 2)));
            } else {
                acc.record(&Outcome::Success);
            }
        }
        assert_eq!(acc.counters().total(), 10);
        assert_eq!(acc.failure_count(), 4);
    }
}
