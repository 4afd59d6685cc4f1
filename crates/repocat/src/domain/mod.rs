//! Core domain types shared across layers.

pub mod errors;
pub mod model;
