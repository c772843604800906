//! Trait definitions for the media module.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use crate::task::TaskHandle;

use super::error::{ProbeError, TranscodeError};
use super::types::ProbeResult;

/// Callback fired for each encoder progress tick.
///
/// Implementations must not block: the transcode adapter keeps draining the
/// encoder's status stream while the callback runs, so any slow work (such
/// as a notification send) has to be dispatched onto its own task.
pub type UpdateCallback = Arc<dyn Fn() + Send + Sync>;

/// Inspects a media file via an external process.
#[async_trait]
pub trait MediaProber: Send + Sync {
    /// Probes a media file, blocking until the external inspector exits.
    async fn probe(&self, path: &Path) -> Result<ProbeResult, ProbeError>;
}

/// Re-encodes a media file via an external process that streams progress as
/// it runs.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Transcodes the task's source file to its output path.
    ///
    /// Progress updates are written into the task as the encoder reports
    /// them; `on_tick` fires once per progress tick. The caller stays
    /// responsible for deleting the source file on success.
    async fn transcode(
        &self,
        task: &TaskHandle,
        on_tick: UpdateCallback,
    ) -> Result<(), TranscodeError>;
}
