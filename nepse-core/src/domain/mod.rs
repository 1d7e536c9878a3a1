//! Core domain types
//!
//! A quote is one row of the exchange's daily price table. A record is a
//! quote that has been persisted and carries its serial number.

pub mod stock;
