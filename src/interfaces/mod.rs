//! Edges of the pipeline: decoding inbound transactions and encoding the ones that leave it.

pub mod json;
