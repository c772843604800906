//! Mock notifier for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::notifier::{Notifier, NotifyError};
use crate::task::{Task, TaskHandle};

/// Mock implementation of the `Notifier` trait.
///
/// Records a full task snapshot per send and assigns sequential message
/// handles the way the real client does on the first send.
#[derive(Debug, Clone)]
pub struct MockNotifier {
    sends: Arc<RwLock<Vec<Task>>>,
    assign_handles: Arc<RwLock<bool>>,
    fail: Arc<RwLock<bool>>,
    next_id: Arc<AtomicU64>,
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            sends: Arc::new(RwLock::new(Vec::new())),
            assign_handles: Arc::new(RwLock::new(true)),
            fail: Arc::new(RwLock::new(false)),
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Stop assigning message handles, simulating an endpoint whose
    /// responses cannot be used.
    pub async fn set_assign_handles(&self, assign: bool) {
        *self.assign_handles.write().await = assign;
    }

    /// Make every send fail.
    pub async fn set_fail(&self, fail: bool) {
        *self.fail.write().await = fail;
    }

    /// Task snapshots recorded per send, in delivery order.
    pub async fn sends(&self) -> Vec<Task> {
        self.sends.read().await.clone()
    }

    pub async fn send_count(&self) -> usize {
        self.sends.read().await.len()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(&self, task: &TaskHandle) -> Result<(), NotifyError> {
        if *self.fail.read().await {
            return Err(NotifyError::MissingMessageId);
        }
        if *self.assign_handles.read().await {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            task.set_notification_handle(format!("msg-{}", id)).await;
        }
        let snapshot = task.snapshot().await;
        self.sends.write().await.push(snapshot);
        Ok(())
    }
}
