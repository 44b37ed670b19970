use crate::domain::ports::TransactionRepository;
use crate::domain::transaction::Transaction;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory repository for declined transactions.
///
/// Uses `Arc<RwLock<HashMap<u64, Transaction>>>` so clones share the same data.
/// Saving a transaction with an id that is already stored replaces it.
#[derive(Default, Clone)]
pub struct InMemoryTransactionRepository {
    transactions: Arc<RwLock<HashMap<u64, Transaction>>>,
}

impl InMemoryTransactionRepository {
    /// Creates a new, empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn save(&self, tx: Transaction) -> Result<()> {
        let mut transactions = self.transactions.write().await;
        transactions.insert(tx.id, tx);
        Ok(())
    }

    async fn get(&self, id: u64) -> Result<Option<Transaction>> {
        let transactions = self.transactions.read().await;
        Ok(transactions.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Transaction>> {
        let transactions = self.transactions.read().await;
        let mut all: Vec<Transaction> = transactions.values().cloned().collect();
        all.sort_by_key(|tx| tx.id);
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transaction::TransactionStatus;

    fn declined(id: u64) -> Transaction {
        Transaction {
            id,
            status: Some(TransactionStatus::Declined),
            errors: [("invoice".to_string(), "Invoice is required".to_string())].into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_in_memory_save_and_get() {
        let repository = InMemoryTransactionRepository::new();
        repository.save(declined(1)).await.unwrap();

        let retrieved = repository.get(1).await.unwrap().unwrap();
        assert_eq!(retrieved, declined(1));
        assert!(repository.get(2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_in_memory_get_all_sorted_by_id() {
        let repository = InMemoryTransactionRepository::new();
        for id in [3, 1, 2] {
            repository.save(declined(id)).await.unwrap();
        }

        let ids: Vec<u64> = repository
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|tx| tx.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let repository = InMemoryTransactionRepository::new();
        let clone = repository.clone();

        clone.save(declined(5)).await.unwrap();
        assert!(repository.get(5).await.unwrap().is_some());
    }
}
