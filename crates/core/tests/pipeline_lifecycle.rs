//! Pipeline lifecycle integration tests.
//!
//! These tests drive the pipeline with mock adapters and verify:
//! - Status transitions (queued -> processing -> done/failed)
//! - One notification message per task, created once and edited in place
//! - Source file cleanup on success
//! - Mutual exclusion of the encode body across concurrent tasks

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio::time::{sleep, timeout};

use remuxarr_core::testing::{fixtures, MockNotifier, MockProber, MockTranscoder};
use remuxarr_core::{Task, TaskHandle, TaskPipeline, TaskStatus, TranscodeProgress};

/// Test helper bundling the pipeline with its mocks.
struct TestHarness {
    pipeline: Arc<TaskPipeline<MockProber, MockTranscoder, MockNotifier>>,
    prober: MockProber,
    transcoder: MockTranscoder,
    notifier: MockNotifier,
    source_dir: TempDir,
}

impl TestHarness {
    async fn new() -> Self {
        let prober = MockProber::new();
        let transcoder = MockTranscoder::new();
        let notifier = MockNotifier::new();

        prober.set_default_result(fixtures::probe_result("120.0")).await;

        let pipeline = Arc::new(TaskPipeline::new(
            prober.clone(),
            transcoder.clone(),
            notifier.clone(),
        ));

        Self {
            pipeline,
            prober,
            transcoder,
            notifier,
            source_dir: TempDir::new().expect("Failed to create source dir"),
        }
    }

    /// Creates a real source file and a task pointing at it.
    fn create_task(&self, name: &str) -> (TaskHandle, PathBuf) {
        let source = self.source_dir.path().join(name);
        std::fs::write(&source, b"fake media content").expect("Failed to create source file");
        let task = Task::from_watched_path(&source).expect("watched path should qualify");
        (TaskHandle::new(task), source)
    }

    /// Waits until the notifier has recorded at least `count` sends.
    async fn wait_for_sends(&self, count: usize) {
        timeout(Duration::from_secs(5), async {
            while self.notifier.send_count().await < count {
                sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("Timed out waiting for notification sends");
    }
}

#[tokio::test]
async fn test_successful_task_lifecycle() {
    let harness = TestHarness::new().await;
    let (task, source) = harness.create_task("movie.mkv");

    harness.pipeline.run(task.clone()).await;

    let sends = harness.notifier.sends().await;
    assert_eq!(sends.len(), 3);
    assert_eq!(sends[0].status, TaskStatus::Queued);
    assert_eq!(sends[1].status, TaskStatus::Processing);
    assert_eq!(sends[2].status, TaskStatus::Done);

    // Probe attached before the post-probe notification
    assert!(sends[0].probe.is_none());
    assert!(sends[1].probe.is_some());

    assert_eq!(task.snapshot().await.status, TaskStatus::Done);
    assert!(!source.exists(), "source file should be deleted on success");
}

#[tokio::test]
async fn test_notification_handle_created_once_and_reused() {
    let harness = TestHarness::new().await;
    let (task, _source) = harness.create_task("movie.mkv");

    harness.pipeline.run(task.clone()).await;

    let sends = harness.notifier.sends().await;
    let handle = sends[0].notification_handle.clone();
    assert_eq!(handle, Some("msg-0".to_string()));
    for send in &sends {
        assert_eq!(send.notification_handle, handle);
    }
    assert_eq!(task.snapshot().await.notification_handle, handle);
}

#[tokio::test]
async fn test_probe_failure_is_terminal() {
    let harness = TestHarness::new().await;
    harness.prober.set_fail(true).await;
    let (task, source) = harness.create_task("movie.mkv");

    harness.pipeline.run(task.clone()).await;

    // Exactly one send after the queued one, and no encoder run
    let sends = harness.notifier.sends().await;
    assert_eq!(sends.len(), 2);
    assert_eq!(sends[0].status, TaskStatus::Queued);
    assert_eq!(sends[1].status, TaskStatus::Failed);
    assert_eq!(harness.transcoder.job_count().await, 0);
    assert_eq!(task.snapshot().await.status, TaskStatus::Failed);
    assert!(source.exists(), "failed task must not delete the source");
}

#[tokio::test]
async fn test_transcode_failure_is_terminal() {
    let harness = TestHarness::new().await;
    harness.transcoder.set_fail(true).await;
    let (task, source) = harness.create_task("movie.mkv");

    harness.pipeline.run(task.clone()).await;

    let sends = harness.notifier.sends().await;
    assert_eq!(sends.len(), 3);
    assert_eq!(sends[2].status, TaskStatus::Failed);
    assert_eq!(task.snapshot().await.status, TaskStatus::Failed);
    assert!(source.exists(), "failed task must not delete the source");
}

#[tokio::test]
async fn test_progress_ticks_send_detached_notifications() {
    let harness = TestHarness::new().await;
    harness
        .transcoder
        .set_progress_script(vec![
            TranscodeProgress {
                speed: "2.5x".to_string(),
                timestamp_secs: 30.0,
            },
            TranscodeProgress {
                speed: "2.5x".to_string(),
                timestamp_secs: 60.0,
            },
        ])
        .await;
    let (task, _source) = harness.create_task("movie.mkv");

    harness.pipeline.run(task.clone()).await;

    // 3 lifecycle sends plus 2 detached progress sends
    harness.wait_for_sends(5).await;
    let sends = harness.notifier.sends().await;
    let progress_sends: Vec<_> = sends.iter().filter(|s| s.progress.is_some()).collect();
    assert!(progress_sends.len() >= 2);
    assert!(progress_sends
        .iter()
        .any(|s| s.progress.as_ref().unwrap().speed == "2.5x"));
}

#[tokio::test]
async fn test_notification_failures_do_not_affect_task() {
    let harness = TestHarness::new().await;
    harness.notifier.set_fail(true).await;
    let (task, source) = harness.create_task("movie.mkv");

    harness.pipeline.run(task.clone()).await;

    assert_eq!(task.snapshot().await.status, TaskStatus::Done);
    assert!(!source.exists());
    assert_eq!(harness.notifier.send_count().await, 0);
}

#[tokio::test]
async fn test_concurrent_tasks_never_overlap_processing() {
    let harness = TestHarness::new().await;
    harness
        .transcoder
        .set_tick_delay(Duration::from_millis(30))
        .await;
    harness
        .transcoder
        .set_progress_script(vec![TranscodeProgress::default()])
        .await;

    let (task_a, _) = harness.create_task("first.mkv");
    let (task_b, _) = harness.create_task("second.mkv");

    harness.pipeline.spawn(task_a.clone());
    harness.pipeline.spawn(task_b.clone());

    timeout(Duration::from_secs(5), async {
        loop {
            let a = task_a.snapshot().await.status;
            let b = task_b.snapshot().await.status;
            if a.is_terminal() && b.is_terminal() {
                break;
            }
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("Tasks did not finish in time");

    let windows = harness.transcoder.windows().await;
    assert_eq!(windows.len(), 2);
    let (a_start, a_end) = windows[0];
    let (b_start, b_end) = windows[1];
    assert!(
        a_end <= b_start || b_end <= a_start,
        "transcode windows must not overlap"
    );
    assert_eq!(harness.prober.probe_count().await, 2);
}
