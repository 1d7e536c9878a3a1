//! Data Transfer Objects for the HTTP API
//!
//! Request shapes are read from query strings, so every field is a scalar.
//! Response shapes wrap domain types in a page envelope.

pub mod page;
pub mod stock;
