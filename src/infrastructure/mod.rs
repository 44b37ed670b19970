//! Storage adapters implementing the `TransactionRepository` port.

pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
