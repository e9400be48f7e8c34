use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use hiveload_core::{
    BoxError, Checks, LifecycleController, Outcome, OutcomeAccountant, WorkloadRunner,
};
use parking_lot::Mutex;

#[derive(Default)]
struct RecordingSink {
    emitted: Mutex<Vec<String>>,
}

impl RecordingSink {
    fn emitted(&self) -> Vec<String> {
        self.emitted.lock().clone()
    }
}

impl hiveload_core::ErrorSink for RecordingSink {
    fn emit(&self, message: &str) {
        self.emitted.lock().push(message.to_string());
    }
}

fn accountant() -> (Arc<OutcomeAccountant>, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    (Arc::new(OutcomeAccountant::new(sink.clone())), sink)
}

#[test]
fn mixed_outcomes_are_tallied_and_deduplicated() {
    let (acc, sink) = accountant();

    for outcome in [
        Outcome::Success,
        Outcome::failure("timeout"),
        Outcome::failure("timeout"),
        Outcome::Success,
        Outcome::failure("conn refused"),
    ] {
        acc.record(&outcome);
    }

    assert_eq!(acc.success_count(), 2);
    assert_eq!(acc.failure_count(), 3);
    assert_eq!(sink.emitted(), vec!["timeout", "conn refused"]);
}

#[test]
fn counters_sum_to_number_of_recorded_outcomes() {
    let (acc, sink) = accountant();
    let messages = ["a", "b", "a", "c", "b", "a"];

    let mut recorded = 0u64;
    for (i, m) in messages.iter().cycle().take(50).enumerate() {
        if i % 4 == 0 {
            acc.record(&Outcome::Success);
        } else {
            acc.record(&Outcome::failure(*m));
        }
        recorded += 1;
    }

    assert_eq!(acc.counters().total(), recorded);
    let mut emitted = sink.emitted();
    emitted.sort();
    assert_eq!(emitted, vec!["a", "b", "c"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_identical_failures_emit_once() -> anyhow::Result<()> {
    let (acc, sink) = accountant();
    let runner = WorkloadRunner::new(acc.clone());
    let n = 64u64;

    let mut handles = Vec::new();
    for _ in 0..n {
        let runner = runner.clone();
        handles.push(tokio::spawn(async move {
            runner
                .run(|| async {
                    tokio::task::yield_now().await;
                    Err::<Outcome, BoxError>("connection reset by peer".into())
                })
                .await
        }));
    }
    for h in handles {
        h.await?;
    }

    assert_eq!(acc.failure_count(), n);
    assert_eq!(acc.success_count(), 0);
    assert_eq!(
        sink.emitted(),
        vec!["failed to run test: connection reset by peer"]
    );
    Ok(())
}

#[tokio::test]
async fn setup_then_teardown_without_iterations() {
    let (acc, sink) = accountant();
    let controller = LifecycleController::new(acc.clone());
    let setups = AtomicU32::new(0);
    let teardowns = AtomicU32::new(0);

    let ctx = controller
        .setup(|| async {
            setups.fetch_add(1, Ordering::Relaxed);
            Ok(())
        })
        .await;
    let ran = controller
        .teardown(|| async {
            teardowns.fetch_add(1, Ordering::Relaxed);
            Ok(())
        })
        .await;
    let again = controller
        .teardown(|| async {
            teardowns.fetch_add(1, Ordering::Relaxed);
            Ok(())
        })
        .await;

    let report = controller.report(&ctx);
    assert!(ran);
    assert!(!again);
    assert_eq!(setups.load(Ordering::Relaxed), 1);
    assert_eq!(teardowns.load(Ordering::Relaxed), 1);
    assert_eq!(report.success_count, 0);
    assert_eq!(report.failure_count, 0);
    assert!(sink.emitted().is_empty());
}

#[tokio::test]
async fn lifecycle_failures_are_logged_once_and_not_counted() {
    let (acc, sink) = accountant();
    let controller = LifecycleController::new(acc.clone());

    controller
        .setup(|| async { Err::<(), BoxError>("database \"hive\" does not exist".into()) })
        .await;
    controller
        .teardown(|| async { Err::<(), BoxError>("database \"hive\" does not exist".into()) })
        .await;

    assert_eq!(
        sink.emitted(),
        vec![
            "failed to run setup phase: database \"hive\" does not exist",
            "failed to run teardown phase: database \"hive\" does not exist",
        ]
    );
    assert_eq!(acc.failure_count(), 0);
}

#[tokio::test]
async fn failed_iteration_does_not_affect_the_next_one() {
    let (acc, sink) = accountant();
    let runner = WorkloadRunner::new(acc.clone());

    let first = runner
        .run(|| async {
            if acc.failure_count() == 0 {
                panic!("first call blows up");
            }
            Ok::<_, BoxError>(Checks::new())
        })
        .await;
    let second = runner
        .run(|| async { Ok::<_, BoxError>(Checks::single("status was 200", true)) })
        .await;

    assert!(!first.is_success());
    assert_eq!(second, Outcome::Success);
    assert_eq!(acc.counters().success, 1);
    assert_eq!(acc.counters().failure, 1);
    assert_eq!(sink.emitted().len(), 1);
}

#[tokio::test]
async fn failed_check_becomes_failure_outcome() {
    let (acc, sink) = accountant();
    let runner = WorkloadRunner::new(acc.clone());

    let outcome = runner
        .run(|| async { Ok::<_, BoxError>(Checks::single("status was 200", false)) })
        .await;

    assert_eq!(outcome, Outcome::failure("check failed: status was 200"));
    assert_eq!(sink.emitted(), vec!["check failed: status was 200"]);
}
