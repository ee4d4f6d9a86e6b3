//! Board domain model.
//!
//! # Responsibility
//! - Define the item record, its closed lane/priority vocabularies and the
//!   board aggregate that owns every item of one account.
//! - Validate create/edit payloads before they reach ordering logic.
//!
//! # Invariants
//! - Every item is identified by a stable `ItemId`.
//! - Deletion is a hard remove; the former lane is renumbered densely.

pub mod board;
pub mod item;
