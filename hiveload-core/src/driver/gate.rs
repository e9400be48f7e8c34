use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use super::config::RunPlan;

/// Hands out iteration permits to VUs until the budget or the deadline is exhausted.
#[derive(Debug)]
pub struct IterationGate {
    issued: AtomicU64,
    budget: Option<u64>,
    duration: Option<Duration>,
    deadline: OnceLock<Instant>,
}

impl IterationGate {
    pub fn new(budget: Option<u64>, duration: Option<Duration>) -> Self {
        Self {
            issued: AtomicU64::new(0),
            budget,
            duration,
            deadline: OnceLock::new(),
        }
    }

    pub fn for_plan(plan: &RunPlan) -> Self {
        Self::new(plan.iterations, plan.duration)
    }

    /// Pins the deadline to `started + duration`. Only the first call has an effect.
    pub fn start_at(&self, started: Instant) {
        if let Some(duration) = self.duration {
            let _ = self.deadline.set(started + duration);
        }
    }

    pub fn issued(&self) -> u64 {
        let issued = self.issued.load(Ordering::Relaxed);
        self.budget.map_or(issued, |b| issued.min(b))
    }

    /// Returns `true` if the caller may run one more iteration.
    pub fn next(&self) -> bool {
        if self.duration.is_some() {
            let now = Instant::now();
            // Lazily start on the first permit if nobody called `start_at`.
            self.start_at(now);
            if self.deadline.get().is_some_and(|deadline| now >= *deadline) {
                return false;
            }
        }

        let idx = self.issued.fetch_add(1, Ordering::Relaxed);
        match self.budget {
            Some(total) => idx < total,
            // Neither budget nor duration => single iteration.
            None if self.duration.is_none() => idx == 0,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_is_shared_and_exact() {
        let gate = IterationGate::new(Some(3), None);
        let granted = (0..10).filter(|_| gate.next()).count();
        assert_eq!(granted, 3);
        assert_eq!(gate.issued(), 3);
    }

    #[test]
    fn no_budget_no_duration_runs_once() {
        let gate = IterationGate::new(None, None);
        assert!(gate.next());
        assert!(!gate.next());
    }

    #[test]
    fn expired_deadline_stops_permits() {
        let gate = IterationGate::new(None, Some(Duration::from_millis(5)));
        gate.start_at(Instant::now() - Duration::from_millis(10));
        assert!(!gate.next());
    }

    #[test]
    fn duration_without_budget_keeps_granting_before_deadline() {
        let gate = IterationGate::new(None, Some(Duration::from_secs(60)));
        gate.start_at(Instant::now());
        assert!((0..100).all(|_| gate.next()));
    }
}
