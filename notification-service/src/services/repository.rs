use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::Notification;

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn save(&self, notification: Notification) -> Result<()>;

    /// Notifications addressed to `user_id`, oldest first.
    async fn find_by_recipient(&self, user_id: &str) -> Result<Vec<Notification>>;

    /// Set status to read. `None` when the id is unknown; an already-read
    /// notification is returned unchanged.
    async fn mark_read(&self, id: &str) -> Result<Option<Notification>>;
}

#[derive(Clone, Default)]
pub struct InMemoryNotificationRepository {
    notifications: Arc<RwLock<Vec<Notification>>>,
}

impl InMemoryNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn save(&self, notification: Notification) -> Result<()> {
        self.notifications.write().await.push(notification);
        Ok(())
    }

    async fn find_by_recipient(&self, user_id: &str) -> Result<Vec<Notification>> {
        let notifications = self.notifications.read().await;
        Ok(notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn mark_read(&self, id: &str) -> Result<Option<Notification>> {
        let mut notifications = self.notifications.write().await;
        Ok(notifications.iter_mut().find(|n| n.id == id).map(|n| {
            n.mark_read();
            n.clone()
        }))
    }
}
