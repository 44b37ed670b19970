use super::transaction::Transaction;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Persistence port for transactions leaving the pipeline as declined.
///
/// Implementations own their durability guarantees. The pipeline calls
/// `save` once per declined transaction and does not retry on failure.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn save(&self, tx: Transaction) -> Result<()>;
    async fn get(&self, id: u64) -> Result<Option<Transaction>>;
    async fn get_all(&self) -> Result<Vec<Transaction>>;
}

/// Repository handle shared between the worker and whoever reads back declined transactions.
pub type SharedTransactionRepository = Arc<dyn TransactionRepository>;
