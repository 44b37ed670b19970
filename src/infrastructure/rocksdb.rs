use crate::domain::ports::TransactionRepository;
use crate::domain::transaction::Transaction;
use crate::error::{PaymentError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family holding declined transactions, keyed by transaction id.
pub const CF_TRANSACTIONS: &str = "transactions";

/// A persistent transaction repository backed by RocksDB.
///
/// Transactions are stored as JSON under their big-endian id, so iteration
/// order matches id order. `Clone` shares the underlying `Arc<DB>`.
#[derive(Clone)]
pub struct RocksDBTransactionRepository {
    db: Arc<DB>,
}

impl RocksDBTransactionRepository {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// # Arguments
    ///
    /// * `path` - The filesystem path where the database will be stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_transactions = ColumnFamilyDescriptor::new(CF_TRANSACTIONS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_transactions])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn transactions(&self) -> Result<&ColumnFamily> {
        self.db.cf_handle(CF_TRANSACTIONS).ok_or_else(|| {
            PaymentError::PersistenceError("Transactions column family not found".to_string())
        })
    }
}

#[async_trait]
impl TransactionRepository for RocksDBTransactionRepository {
    async fn save(&self, tx: Transaction) -> Result<()> {
        let cf = self.transactions()?;
        let value = serde_json::to_vec(&tx)?;
        self.db.put_cf(cf, tx.id.to_be_bytes(), value)?;
        Ok(())
    }

    async fn get(&self, id: u64) -> Result<Option<Transaction>> {
        let cf = self.transactions()?;
        match self.db.get_pinned_cf(cf, id.to_be_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn get_all(&self) -> Result<Vec<Transaction>> {
        let cf = self.transactions()?;

        let mut transactions = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            transactions.push(serde_json::from_slice(&value)?);
        }
        Ok(transactions)
    }
}
