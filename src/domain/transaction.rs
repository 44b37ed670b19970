use super::validation::ValidationResult;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field name to human-readable message, as recorded on a declined transaction.
pub type FieldErrors = BTreeMap<String, String>;

/// Status stamped on a transaction once it has left the validation pipeline.
///
/// The pipeline itself only ever assigns `Declined`; any other value is set
/// by downstream stages and carried through serialization untouched.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub enum TransactionStatus {
    Declined,
    #[serde(untagged)]
    Other(String),
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
pub struct CardHolder {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
pub struct Card {
    #[serde(default)]
    pub pan: String,
    #[serde(default)]
    pub expiry: String,
}

/// One payment attempt flowing through the pipeline.
///
/// Every field except `id` defaults to its zero value when absent from the
/// input, so incomplete records still deserialize and are reported by the
/// rule chain instead of being rejected at the edge.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
pub struct Transaction {
    /// Identity assigned by the producer before the transaction enters the pipeline.
    pub id: u64,
    #[serde(default)]
    pub invoice: u64,
    #[serde(default)]
    pub amount: Decimal,
    #[serde(default)]
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_holder: Option<CardHolder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TransactionStatus>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: FieldErrors,
}

impl Transaction {
    /// Stamps the transaction as declined with the errors of a failed pass.
    ///
    /// Status and errors always change together. A result without errors
    /// leaves the transaction untouched and returns `false`.
    pub fn decline(&mut self, result: ValidationResult) -> bool {
        if result.is_valid() {
            return false;
        }
        self.status = Some(TransactionStatus::Declined);
        self.errors = result.into_errors();
        true
    }

    /// Drops any status or errors the transaction arrived with.
    ///
    /// Returns `true` if something was cleared.
    pub fn clear_outcome(&mut self) -> bool {
        let stale = self.status.is_some() || !self.errors.is_empty();
        self.status = None;
        self.errors.clear();
        stale
    }

    pub fn is_declined(&self) -> bool {
        self.status == Some(TransactionStatus::Declined)
    }
}
