//! Repository Module
//!
//! Data access layer for the price service.

pub mod stock;

// Re-export for convenience
pub use stock as stock_repository;
