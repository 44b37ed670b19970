use crate::domain::transaction::Transaction;
use crate::error::{PaymentError, Result};
use std::io::{BufRead, BufReader, Read};

/// Reads transactions from a newline-delimited JSON source.
///
/// Each non-blank line holds one transaction. A line that fails to parse
/// yields an `Err` item and reading carries on with the next line.
pub struct TransactionReader<R: Read> {
    reader: BufReader<R>,
}

impl<R: Read> TransactionReader<R> {
    /// Creates a new `TransactionReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        Self {
            reader: BufReader::new(source),
        }
    }

    /// Returns an iterator that lazily reads and deserializes transactions.
    pub fn transactions(self) -> impl Iterator<Item = Result<Transaction>> {
        self.reader.lines().filter_map(|line| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(serde_json::from_str(&line).map_err(PaymentError::from)),
            Err(e) => Some(Err(PaymentError::from(e))),
        })
    }
}
