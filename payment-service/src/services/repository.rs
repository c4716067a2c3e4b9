use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::LedgerEntry;

/// Ledger storage. Entries are immutable once saved.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn save(&self, entry: LedgerEntry) -> Result<()>;

    async fn find_by_id(&self, id: &str) -> Result<Option<LedgerEntry>>;

    /// Entries created by `user_id`, oldest first.
    async fn find_by_owner(&self, user_id: &str) -> Result<Vec<LedgerEntry>>;
}

#[derive(Clone, Default)]
pub struct InMemoryPaymentRepository {
    entries: Arc<RwLock<Vec<LedgerEntry>>>,
}

impl InMemoryPaymentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn save(&self, entry: LedgerEntry) -> Result<()> {
        self.entries.write().await.push(entry);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<LedgerEntry>> {
        let entries = self.entries.read().await;
        Ok(entries.iter().find(|e| e.id == id).cloned())
    }

    async fn find_by_owner(&self, user_id: &str) -> Result<Vec<LedgerEntry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect())
    }
}
