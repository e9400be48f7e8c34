use ahash::AHashSet;
use parking_lot::Mutex;

/// Destination for deduplicated error messages.
pub trait ErrorSink: Send + Sync {
    fn emit(&self, message: &str);
}

impl<F> ErrorSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn emit(&self, message: &str) {
        self(message)
    }
}

/// Emits every message as a `tracing` error event on the `hiveload::errors` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingErrorSink;

impl ErrorSink for TracingErrorSink {
    fn emit(&self, message: &str) {
        tracing::error!(target: "hiveload::errors", "{message}");
    }
}

/// Set of error messages already reported during this run.
#[derive(Debug, Default)]
pub struct ErrorLedger {
    seen: Mutex<AHashSet<String>>,
}

impl ErrorLedger {
    /// Inserts `message` and returns `true` if it had not been seen before.
    ///
    /// Lookup and insert happen under one lock, so concurrent callers with the same
    /// message get exactly one `true`.
    pub fn first_sighting(&self, message: &str) -> bool {
        let mut seen = self.seen.lock();
        if seen.contains(message) {
            return false;
        }
        seen.insert(message.to_owned());
        true
    }

    pub fn contains(&self, message: &str) -> bool {
        self.seen.lock().contains(message)
    }

    pub fn len(&self) -> usize {
        self.seen.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
