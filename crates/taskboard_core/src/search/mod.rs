//! Board view queries.
//!
//! # Responsibility
//! - Filter board items for list views without touching stored positions.

pub mod filter;
