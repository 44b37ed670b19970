//! Domain layer: the transaction record, the validation rules applied to it
//! and the persistence port for declined transactions.

pub mod ports;
pub mod transaction;
pub mod validation;
