//! Lifecycle notifications for tasks.
//!
//! A notifier keeps a 1:1 mapping between a task and one externally visible
//! message: the first send creates the message and records its id on the
//! task, every later send edits that same message in place. Delivery is
//! best-effort; callers log errors and never let them affect the pipeline.

mod discord;
mod render;

pub use discord::DiscordNotifier;
pub use render::{format_duration, render_payload, render_progress_bar, PROGRESS_BAR_WIDTH};

use async_trait::async_trait;
use thiserror::Error;

use crate::task::TaskHandle;

/// Errors contacting the notification endpoint. Never terminal for a task.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook response missing message id")]
    MissingMessageId,
}

/// Delivers a task's current state to an external channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Renders the task's current snapshot and sends it.
    ///
    /// The first successful send records the message handle on the task;
    /// subsequent sends edit the same message.
    async fn send(&self, task: &TaskHandle) -> Result<(), NotifyError>;
}
