#![allow(dead_code)]

use async_trait::async_trait;
use payment_validator::domain::ports::TransactionRepository;
use payment_validator::domain::transaction::{Card, CardHolder, Transaction};
use payment_validator::error::Result;
use rust_decimal_macros::dec;
use std::io::Write;
use std::path::Path;
use tokio::sync::Mutex;

pub fn valid_transaction(id: u64) -> Transaction {
    Transaction {
        id,
        invoice: 1001,
        amount: dec!(19.99),
        currency: "USD".to_string(),
        card_holder: Some(CardHolder {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
        }),
        card: Some(Card {
            pan: "4111111111111111".to_string(),
            expiry: "12/29".to_string(),
        }),
        ..Default::default()
    }
}

/// Records every save call in order, including repeated ids.
#[derive(Default)]
pub struct RecordingRepository {
    saved: Mutex<Vec<Transaction>>,
}

impl RecordingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn saved(&self) -> Vec<Transaction> {
        self.saved.lock().await.clone()
    }
}

#[async_trait]
impl TransactionRepository for RecordingRepository {
    async fn save(&self, tx: Transaction) -> Result<()> {
        self.saved.lock().await.push(tx);
        Ok(())
    }

    async fn get(&self, id: u64) -> Result<Option<Transaction>> {
        Ok(self.saved.lock().await.iter().find(|tx| tx.id == id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Transaction>> {
        Ok(self.saved().await)
    }
}

pub fn write_ndjson(path: &Path, lines: &[&str]) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    for line in lines {
        writeln!(file, "{}", line)?;
    }
    Ok(())
}

pub const VALID_LINE: &str = r#"{"id": 1, "invoice": 1001, "amount": 19.99, "currency": "USD", "card_holder": {"name": "Jane Doe", "email": "jane@example.com"}, "card": {"pan": "4111111111111111", "expiry": "12/29"}}"#;
pub const NEGATIVE_AMOUNT_LINE: &str = r#"{"id": 2, "invoice": 1002, "amount": -5, "currency": "USD", "card_holder": {"name": "Jane Doe", "email": "jane@example.com"}, "card": {"pan": "4111111111111111", "expiry": "12/29"}}"#;
pub const MISSING_CARD_LINE: &str = r#"{"id": 3, "invoice": 1003, "amount": "10.00", "currency": "EUR", "card_holder": {"name": "John Roe", "email": "john@example.com"}}"#;
pub const PRE_DECLINED_VALID_LINE: &str = r#"{"id": 4, "invoice": 1004, "amount": "7.50", "currency": "USD", "card_holder": {"name": "Jane Doe", "email": "jane@example.com"}, "card": {"pan": "4111111111111111", "expiry": "12/29"}, "status": "Declined", "errors": {"amount": "stale"}}"#;
