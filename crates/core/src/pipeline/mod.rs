//! Task pipeline: probe, transcode, cleanup, notify.
//!
//! Any number of tasks may be created and queued concurrently, but the
//! probe/transcode/cleanup body runs under a single shared gate so at most
//! one encode is in flight system-wide. The external encoder is CPU and IO
//! heavy; serializing bounds resource usage regardless of how bursty the
//! trigger sources are.

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::media::{MediaProber, Transcoder, UpdateCallback};
use crate::notifier::Notifier;
use crate::task::{TaskHandle, TaskStatus};

/// Drives tasks through probe -> transcode -> cleanup, reporting lifecycle
/// state through the notifier.
pub struct TaskPipeline<P, T, N> {
    prober: P,
    transcoder: T,
    notifier: Arc<N>,
    encode_gate: Arc<Mutex<()>>,
}

impl<P, T, N> TaskPipeline<P, T, N>
where
    P: MediaProber + 'static,
    T: Transcoder + 'static,
    N: Notifier + 'static,
{
    pub fn new(prober: P, transcoder: T, notifier: N) -> Self {
        Self {
            prober,
            transcoder,
            notifier: Arc::new(notifier),
            encode_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Runs a task on a new tokio task, so trigger sources never block.
    pub fn spawn(self: &Arc<Self>, task: TaskHandle) {
        let pipeline = Arc::clone(self);
        tokio::spawn(async move { pipeline.run(task).await });
    }

    /// Runs one task to completion.
    pub async fn run(&self, task: TaskHandle) {
        let (id, source) = {
            let snapshot = task.snapshot().await;
            (snapshot.id, snapshot.source_path)
        };
        info!(task = %id, path = %source.display(), "task queued");
        self.notify(&task).await;

        // One encode in flight system-wide. The guard covers probe,
        // transcode and cleanup and is released on every exit path.
        let _guard = self.encode_gate.lock().await;
        task.transition(TaskStatus::Processing).await;

        match self.prober.probe(&source).await {
            Ok(probe) => task.set_probe(probe).await,
            Err(e) => {
                warn!(task = %id, error = %e, "probe failed");
                self.fail(&task).await;
                return;
            }
        }
        self.notify(&task).await;

        let on_tick = self.tick_callback(&task);
        if let Err(e) = self.transcoder.transcode(&task, on_tick).await {
            warn!(task = %id, error = %e, "transcode failed");
            self.fail(&task).await;
            return;
        }

        if let Err(e) = tokio::fs::remove_file(&source).await {
            debug!(task = %id, error = %e, "could not remove source file");
        }
        task.transition(TaskStatus::Done).await;
        info!(task = %id, "task done");
        self.notify(&task).await;
    }

    /// Builds the per-tick callback handed to the transcoder. Each tick
    /// dispatches a detached send so slow notification I/O never stalls
    /// the encoder's status stream reader.
    fn tick_callback(&self, task: &TaskHandle) -> UpdateCallback {
        let notifier = Arc::clone(&self.notifier);
        let task = task.clone();
        Arc::new(move || {
            let notifier = Arc::clone(&notifier);
            let task = task.clone();
            tokio::spawn(async move {
                if let Err(e) = notifier.send(&task).await {
                    debug!(error = %e, "progress notification dropped");
                }
            });
        })
    }

    async fn fail(&self, task: &TaskHandle) {
        task.transition(TaskStatus::Failed).await;
        self.notify(task).await;
    }

    /// Best-effort send: notification failures are logged and never affect
    /// the task's outcome.
    async fn notify(&self, task: &TaskHandle) {
        if let Err(e) = self.notifier.send(task).await {
            warn!(error = %e, "notification failed");
        }
    }
}
