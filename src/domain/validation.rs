use super::transaction::{FieldErrors, Transaction};
use rust_decimal::Decimal;

/// Outcome of one validation pass.
///
/// Errors are keyed by field name. A second error for the same field
/// replaces the first one: the last rule to report on a field wins.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    errors: FieldErrors,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(field.into(), message.into());
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn into_errors(self) -> FieldErrors {
        self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A stateless check applied to a transaction.
///
/// Rules only report: they receive the transaction by shared reference and
/// record zero or more field errors in `result`. Missing sub-records are a
/// validation failure to report, never a reason to panic.
pub trait ValidationRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn apply(&self, transaction: &Transaction, result: &mut ValidationResult);
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Flags every required field that is zero-valued or blank.
#[derive(Debug, Default, Clone, Copy)]
pub struct FieldsPresentRule;

impl ValidationRule for FieldsPresentRule {
    fn name(&self) -> &'static str {
        "fields_present"
    }

    fn apply(&self, transaction: &Transaction, result: &mut ValidationResult) {
        if transaction.invoice == 0 {
            result.add_error("invoice", "Invoice is required");
        }
        if transaction.amount.is_zero() {
            result.add_error("amount", "Amount is required.");
        }
        if is_blank(&transaction.currency) {
            result.add_error("currency", "Currency is required.");
        }

        let (name, email) = transaction
            .card_holder
            .as_ref()
            .map_or(("", ""), |holder| (holder.name.as_str(), holder.email.as_str()));
        if is_blank(name) {
            result.add_error("name", "Name is required.");
        }
        if is_blank(email) {
            result.add_error("email", "Email is required.");
        }

        let (pan, expiry) = transaction
            .card
            .as_ref()
            .map_or(("", ""), |card| (card.pan.as_str(), card.expiry.as_str()));
        if is_blank(pan) {
            result.add_error("pan", "Pan is required.");
        }
        if is_blank(expiry) {
            result.add_error("expiry", "Expiry is required.");
        }
    }
}

/// Flags the amount when it is not strictly positive.
#[derive(Debug, Default, Clone, Copy)]
pub struct PositiveAmountRule;

impl ValidationRule for PositiveAmountRule {
    fn name(&self) -> &'static str {
        "positive_amount"
    }

    fn apply(&self, transaction: &Transaction, result: &mut ValidationResult) {
        if transaction.amount <= Decimal::ZERO {
            result.add_error("amount", "Amount should be a positive double.");
        }
    }
}

pub type RuleBox = Box<dyn ValidationRule>;

/// Ordered set of rules, fixed once constructed.
pub struct RuleChain {
    rules: Vec<RuleBox>,
}

impl RuleChain {
    pub fn new(rules: Vec<RuleBox>) -> Self {
        Self { rules }
    }

    /// Runs every rule in registration order into a fresh result.
    pub fn validate(&self, transaction: &Transaction) -> ValidationResult {
        let mut result = ValidationResult::new();
        for rule in &self.rules {
            rule.apply(transaction, &mut result);
        }
        result
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleChain {
    fn default() -> Self {
        Self::new(vec![Box::new(FieldsPresentRule), Box::new(PositiveAmountRule)])
    }
}
