//! Shared plumbing for Couplet services.
//!
//! Health handlers, tracing init, request-id middleware, the gateway
//! identity extractor, and the single-flight fetch coalescer.

pub mod health;
pub mod identity;
pub mod middleware;
pub mod serde;
pub mod singleflight;
pub mod tracing;
