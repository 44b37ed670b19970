use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Persistence error: {0}")]
    PersistenceError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Validation worker is not running")]
    WorkerNotRunning,
    #[error("Validation worker failed: {0}")]
    WorkerFailed(#[from] tokio::task::JoinError),
    #[error("No Tokio runtime available to start the validation worker")]
    NoRuntime,
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDBError(#[from] rocksdb::Error),
}

pub type Result<T> = std::result::Result<T, PaymentError>;
