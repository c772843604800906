//! Discord webhook notifier.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::render::render_payload;
use super::{Notifier, NotifyError};
use crate::task::TaskHandle;

#[derive(Debug, Deserialize)]
struct MessageResponse {
    id: String,
}

/// Notifier that posts task state to a Discord webhook.
///
/// With no webhook URL configured every send is a silent no-op, so an
/// unconfigured deployment degrades gracefully instead of failing tasks.
pub struct DiscordNotifier {
    webhook_url: Option<String>,
    http: reqwest::Client,
}

impl DiscordNotifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            webhook_url,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn send(&self, task: &TaskHandle) -> Result<(), NotifyError> {
        let Some(webhook_url) = &self.webhook_url else {
            return Ok(());
        };

        let (payload, handle) = {
            let snapshot = task.snapshot().await;
            (render_payload(&snapshot), snapshot.notification_handle)
        };

        let request = match &handle {
            // Edit the message created by the first send
            Some(id) => self.http.patch(format!("{}/messages/{}", webhook_url, id)),
            None => self.http.post(webhook_url),
        };

        let response = request
            .query(&[("wait", "true")])
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        if handle.is_none() {
            let message: MessageResponse = response.json().await?;
            if message.id.is_empty() {
                return Err(NotifyError::MissingMessageId);
            }
            debug!(message_id = %message.id, "notification message created");
            task.set_notification_handle(message.id).await;
        }

        Ok(())
    }
}
