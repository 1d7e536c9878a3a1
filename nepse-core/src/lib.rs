//! NEPSE Core
//!
//! Core types and helpers shared by the NEPSE price service.
//!
//! This crate contains:
//! - Domain types: price rows as stored and as scraped
//! - DTOs: request and response shapes of the HTTP API
//! - Helpers: date formats, pagination and price-table parsing

pub mod dates;
pub mod domain;
pub mod dto;
pub mod pagination;
pub mod table;
