//! Mock media adapters for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::media::{
    MediaProber, ProbeError, ProbeResult, TranscodeError, TranscodeProgress, Transcoder,
    UpdateCallback,
};
use crate::task::TaskHandle;

/// Mock implementation of the `MediaProber` trait.
///
/// Provides controllable behavior for testing:
/// - Pre-configured probe results per path, plus a default
/// - Simulated failure
/// - Recorded probe calls for assertions
#[derive(Debug, Clone, Default)]
pub struct MockProber {
    results: Arc<RwLock<HashMap<PathBuf, ProbeResult>>>,
    default_result: Arc<RwLock<Option<ProbeResult>>>,
    fail: Arc<RwLock<bool>>,
    probed: Arc<RwLock<Vec<PathBuf>>>,
}

impl MockProber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the probe result for a specific path.
    pub async fn set_result(&self, path: impl AsRef<Path>, result: ProbeResult) {
        self.results
            .write()
            .await
            .insert(path.as_ref().to_path_buf(), result);
    }

    /// Set the result returned for paths without a specific one.
    pub async fn set_default_result(&self, result: ProbeResult) {
        *self.default_result.write().await = Some(result);
    }

    /// Make every probe fail.
    pub async fn set_fail(&self, fail: bool) {
        *self.fail.write().await = fail;
    }

    /// Paths probed so far, in call order.
    pub async fn probed_paths(&self) -> Vec<PathBuf> {
        self.probed.read().await.clone()
    }

    pub async fn probe_count(&self) -> usize {
        self.probed.read().await.len()
    }
}

#[async_trait]
impl MediaProber for MockProber {
    async fn probe(&self, path: &Path) -> Result<ProbeResult, ProbeError> {
        self.probed.write().await.push(path.to_path_buf());

        if *self.fail.read().await {
            return Err(ProbeError::ProbeFailed {
                stderr: "mock probe failure".to_string(),
            });
        }
        if let Some(result) = self.results.read().await.get(path) {
            return Ok(result.clone());
        }
        if let Some(result) = self.default_result.read().await.clone() {
            return Ok(result);
        }
        Err(ProbeError::ParseError {
            reason: "no mock probe result configured".to_string(),
        })
    }
}

/// Mock implementation of the `Transcoder` trait.
///
/// Drives scripted progress updates through the task handle the same way
/// the real adapter does, and records each transcode's start/end instants
/// so tests can assert that runs never overlap.
#[derive(Debug, Clone)]
pub struct MockTranscoder {
    scripted_progress: Arc<RwLock<Vec<TranscodeProgress>>>,
    tick_delay: Arc<RwLock<Duration>>,
    fail: Arc<RwLock<bool>>,
    jobs: Arc<RwLock<Vec<(PathBuf, PathBuf)>>>,
    windows: Arc<RwLock<Vec<(Instant, Instant)>>>,
}

impl Default for MockTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTranscoder {
    pub fn new() -> Self {
        Self {
            scripted_progress: Arc::new(RwLock::new(Vec::new())),
            tick_delay: Arc::new(RwLock::new(Duration::from_millis(1))),
            fail: Arc::new(RwLock::new(false)),
            jobs: Arc::new(RwLock::new(Vec::new())),
            windows: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Script the progress updates emitted during each transcode, one tick
    /// per update.
    pub async fn set_progress_script(&self, updates: Vec<TranscodeProgress>) {
        *self.scripted_progress.write().await = updates;
    }

    /// Delay between scripted ticks (also the minimum transcode duration).
    pub async fn set_tick_delay(&self, delay: Duration) {
        *self.tick_delay.write().await = delay;
    }

    /// Make every transcode fail after its scripted ticks.
    pub async fn set_fail(&self, fail: bool) {
        *self.fail.write().await = fail;
    }

    /// The (source, output) pairs transcoded so far.
    pub async fn jobs(&self) -> Vec<(PathBuf, PathBuf)> {
        self.jobs.read().await.clone()
    }

    pub async fn job_count(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Start/end instants of every transcode run.
    pub async fn windows(&self) -> Vec<(Instant, Instant)> {
        self.windows.read().await.clone()
    }
}

#[async_trait]
impl Transcoder for MockTranscoder {
    async fn transcode(
        &self,
        task: &TaskHandle,
        on_tick: UpdateCallback,
    ) -> Result<(), TranscodeError> {
        let started = Instant::now();
        {
            let snapshot = task.snapshot().await;
            self.jobs
                .write()
                .await
                .push((snapshot.source_path, snapshot.output_path));
        }

        let script = self.scripted_progress.read().await.clone();
        let delay = *self.tick_delay.read().await;
        tokio::time::sleep(delay).await;
        for progress in script {
            task.set_progress(progress).await;
            on_tick();
            tokio::time::sleep(delay).await;
        }

        self.windows.write().await.push((started, Instant::now()));

        if *self.fail.read().await {
            return Err(TranscodeError::TranscodeFailed {
                code: Some(1),
                stderr: "mock transcode failure".to_string(),
            });
        }
        Ok(())
    }
}
