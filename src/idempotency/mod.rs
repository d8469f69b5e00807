//! Idempotency module
//!
//! Prevents duplicate commits using caller-supplied idempotency keys.

mod registry;

pub use registry::{normalize_key, IdempotencyRecord, IdempotencyRegistry};
