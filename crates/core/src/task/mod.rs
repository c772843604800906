//! Task model: one file's journey through the probe/transcode pipeline.
//!
//! A [`Task`] is created by a trigger source (filesystem watcher or inbound
//! webhook), carried through the pipeline behind a [`TaskHandle`], and
//! dropped once its terminal notification has been sent. There is no
//! persisted task store.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::media::{ProbeResult, TranscodeProgress};

/// Suffix given to files produced from watcher-triggered tasks.
pub const WATCH_OUTPUT_SUFFIX: &str = ".out.mp4";

/// Suffix given to files produced from webhook-triggered tasks.
pub const IMPORT_OUTPUT_SUFFIX: &str = ".h264.aac.stereo.remux.mp4";

/// Lifecycle status of a task.
///
/// Transitions are monotonic: `Queued -> Processing -> (Done | Failed)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Queued,
    Processing,
    Done,
    Failed,
}

impl TaskStatus {
    /// Embed color used when rendering a notification for this status.
    pub fn color(&self) -> u32 {
        match self {
            TaskStatus::Queued => 0xa855f7,
            TaskStatus::Processing => 0xf97316,
            TaskStatus::Done => 0x22c55e,
            TaskStatus::Failed => 0xef4444,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Failed)
    }
}

/// One file's pipeline run.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: Uuid,
    /// Input file. Immutable after creation.
    pub source_path: PathBuf,
    /// Where the transcoded file will be written. Immutable after creation.
    pub output_path: PathBuf,
    /// Set once the probe step completes.
    pub probe: Option<ProbeResult>,
    /// Present only while processing, once the encoder has reported at
    /// least one update.
    pub progress: Option<TranscodeProgress>,
    /// Identifier of the externally created notification message. Set
    /// exactly once after the first successful send, then reused for every
    /// edit.
    pub notification_handle: Option<String>,
    pub status: TaskStatus,
}

impl Task {
    pub fn new(source_path: PathBuf, output_path: PathBuf) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_path,
            output_path,
            probe: None,
            progress: None,
            notification_handle: None,
            status: TaskStatus::Queued,
        }
    }

    /// Builds a task for a file observed by the filesystem watcher.
    ///
    /// Returns `None` for the pipeline's own output files so the watcher
    /// never re-triggers on them. The output path is the source path with
    /// its extension replaced by the watch output suffix.
    pub fn from_watched_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        if is_pipeline_output(name) {
            return None;
        }
        let output_path = path.with_extension("out.mp4");
        Some(Self::new(path.to_path_buf(), output_path))
    }

    /// Builds a task for a file reported by a media-library manager.
    ///
    /// The source path joins the configured root folder with the payload's
    /// folder path and relative path; the output lands next to it, named
    /// after the slugged title.
    pub fn from_import(
        root_folder: &Path,
        folder_path: &str,
        relative_path: &str,
        title: &str,
    ) -> Self {
        let folder = root_folder.join(folder_path.trim_start_matches('/'));
        let source_path = folder.join(relative_path);
        let output_path = folder.join(import_output_file_name(title));
        Self::new(source_path, output_path)
    }

    /// Applies a status transition, returning whether it was legal.
    /// Illegal transitions leave the task untouched.
    pub fn transition(&mut self, next: TaskStatus) -> bool {
        use TaskStatus::*;
        let allowed = matches!(
            (self.status, next),
            (Queued, Processing) | (Processing, Done) | (Processing, Failed)
        );
        if allowed {
            self.status = next;
        }
        allowed
    }
}

/// Whether a file name carries one of the pipeline's output suffixes.
pub fn is_pipeline_output(file_name: &str) -> bool {
    file_name.ends_with(WATCH_OUTPUT_SUFFIX) || file_name.ends_with(IMPORT_OUTPUT_SUFFIX)
}

/// Human-readable output file name for an imported title, e.g.
/// `The.Big.Heat.1953.h264.aac.stereo.remux.mp4`.
pub fn import_output_file_name(title: &str) -> String {
    static NON_ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new("[^A-Za-z0-9]+").unwrap());
    let slug = NON_ALPHANUMERIC.replace_all(title, ".");
    format!("{}{}", slug.trim_matches('.'), IMPORT_OUTPUT_SUFFIX)
}

/// Shared handle to a task.
///
/// The pipeline body and the detached notification sends fired from
/// progress ticks both hold one of these; all mutation goes through the
/// inner lock.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    inner: Arc<RwLock<Task>>,
}

impl TaskHandle {
    pub fn new(task: Task) -> Self {
        Self {
            inner: Arc::new(RwLock::new(task)),
        }
    }

    /// Clones the task's current state.
    pub async fn snapshot(&self) -> Task {
        self.inner.read().await.clone()
    }

    pub async fn status(&self) -> TaskStatus {
        self.inner.read().await.status
    }

    /// Applies a status transition, returning whether it was legal.
    pub async fn transition(&self, next: TaskStatus) -> bool {
        self.inner.write().await.transition(next)
    }

    pub async fn set_probe(&self, probe: ProbeResult) {
        self.inner.write().await.probe = Some(probe);
    }

    pub async fn set_progress(&self, progress: TranscodeProgress) {
        self.inner.write().await.progress = Some(progress);
    }

    /// Records the notification message id. The first write wins; the
    /// handle is never reassigned afterwards.
    pub async fn set_notification_handle(&self, id: String) -> bool {
        let mut task = self.inner.write().await;
        if task.notification_handle.is_none() {
            task.notification_handle = Some(id);
            true
        } else {
            false
        }
    }
}
