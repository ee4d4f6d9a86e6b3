//! Snapshot persistence for boards.
//!
//! # Responsibility
//! - Define the per-account snapshot contract used by the store.
//! - Isolate SQLite and wire-format details from store orchestration.
//!
//! # Invariants
//! - Every write replaces the whole snapshot for one account key.
//! - Load failures never propagate past `load_or_empty`.

pub mod memory_repo;
pub mod snapshot_repo;
