//! Service Module
//!
//! Business logic layer for the price service.
//! Services orchestrate between repositories and the live market source.

pub mod market;
pub mod stock;

// Re-export for convenience
pub use stock as stock_service;
