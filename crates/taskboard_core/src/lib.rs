//! Core domain logic for the task board.
//! This crate is the single source of truth for lane ordering invariants.

pub mod clock;
pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::ordering::{plan_move, remove_item, MovePlan, MoveRequest, OrderingError};
pub use engine::transition::{apply_transition, completion_effect, CompletionEffect};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::board::{Board, BoardStats};
pub use model::item::{Item, ItemDraft, ItemId, ItemPatch, ItemValidationError, Lane, Priority};
pub use repo::memory_repo::MemorySnapshotRepository;
pub use repo::snapshot_repo::{
    load_or_empty, RepoError, RepoResult, SnapshotRepository, SqliteSnapshotRepository,
};
pub use search::filter::{filter_board, ItemFilter, LaneView};
pub use service::board_service::{BoardError, BoardResult, BoardStore, MoveOutcome};
pub use service::intent::{
    parse_item_id, parse_lane, parse_priority, BoardEffect, BoardIntent, IntentError,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
