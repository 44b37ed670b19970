use crate::domain::transaction::Transaction;
use crate::error::Result;
use std::io::Write;

/// Writes transactions as newline-delimited JSON.
pub struct TransactionWriter<W: Write> {
    writer: W,
}

impl<W: Write> TransactionWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_transaction(&mut self, tx: &Transaction) -> Result<()> {
        serde_json::to_writer(&mut self.writer, tx)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    pub fn write_transactions<I>(&mut self, transactions: I) -> Result<()>
    where
        I: IntoIterator<Item = Transaction>,
    {
        for tx in transactions {
            self.write_transaction(&tx)?;
        }
        self.flush()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
