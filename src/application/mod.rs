//! Application layer orchestrating the validation pipeline.
//!
//! `ValidationService` owns the rule chain and a single background worker
//! that drains the inbound channel, forwarding valid transactions and
//! persisting declined ones. `singleton` holds the one shared instance for
//! callers that cannot have it injected.

pub mod singleton;
pub mod validation_service;
