//! Application layer orchestrating domain logic and infrastructure.

pub mod bundle;
pub mod pipeline;
pub mod preflight;
pub mod sink;
