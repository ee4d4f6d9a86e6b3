//! FFI use-case API for Flutter-facing board calls.
//!
//! # Responsibility
//! - Expose board intents (create, edit, delete, move) and read views to Dart
//!   via FRB.
//! - Parse untyped labels and id strings at the boundary so malformed input
//!   never reaches the board store.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Each account's board lives in a process-wide session; a change that
//!   failed to persist stays visible to later calls.
//! - Lane and priority labels are lowercase (`todo|doing|done`,
//!   `low|medium|high`) on the way in and out.

use crate::session::{with_session, SessionStore};
use log::warn;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use taskboard_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, parse_item_id,
    parse_lane, parse_priority, ping as ping_inner, BoardEffect, BoardIntent, Item,
    ItemDraft, ItemFilter, ItemPatch, Lane,
};

const BOARD_DB_FILE_NAME: &str = "taskboard_board.sqlite3";
static BOARD_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Item projection returned to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardItem {
    /// Stable item ID in string form.
    pub item_id: String,
    pub title: String,
    pub description: Option<String>,
    /// Lane label (`todo|doing|done`).
    pub lane: String,
    /// Priority label (`low|medium|high`).
    pub priority: String,
    pub assignee: String,
    pub created_at_ms: i64,
    /// Present exactly when `lane == "done"`.
    pub completed_at_ms: Option<i64>,
    /// Zero-based position within the lane.
    pub order: u32,
}

/// Action response envelope for board intents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardActionResponse {
    /// Whether the intent was accepted and persisted.
    pub ok: bool,
    /// Whether the session board changed. `false` for no-op moves and
    /// deletes; `true` with `ok = false` when the change was kept in memory
    /// but could not be persisted.
    pub changed: bool,
    /// Affected item, when the intent produced one.
    pub item: Option<BoardItem>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl BoardActionResponse {
    fn from_effect(effect: BoardEffect) -> Self {
        match effect {
            BoardEffect::Created(item) => Self::success("Item created.", Some(item)),
            BoardEffect::Updated(item) => Self::success("Item updated.", Some(item)),
            BoardEffect::Moved(item) => Self::success("Item moved.", Some(item)),
            BoardEffect::Deleted(_) => Self::success("Item deleted.", None),
            BoardEffect::Unchanged => Self {
                ok: true,
                changed: false,
                item: None,
                message: "No change.".to_string(),
            },
        }
    }

    fn success(message: &str, item: Option<Item>) -> Self {
        Self {
            ok: true,
            changed: true,
            item: item.map(to_board_item),
            message: message.to_string(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            changed: false,
            item: None,
            message: message.into(),
        }
    }

    fn unsaved(message: impl Into<String>) -> Self {
        Self {
            changed: true,
            ..Self::failure(message)
        }
    }
}

/// List response envelope for lane and filtered views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardListResponse {
    /// Items in lane order (`todo`, `doing`, `done`), each lane in display order.
    pub items: Vec<BoardItem>,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

impl BoardListResponse {
    fn failure(message: String) -> Self {
        Self {
            items: Vec::new(),
            message,
        }
    }
}

/// Per-lane counts for one board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardStatsResponse {
    pub ok: bool,
    pub total: u32,
    pub todo: u32,
    pub doing: u32,
    pub done: u32,
    pub message: String,
}

/// Creates an item at the end of `lane`.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Blank title/assignee or unknown labels fail without writing.
#[flutter_rust_bridge::frb(sync)]
pub fn board_create_item(
    account_key: String,
    title: String,
    description: Option<String>,
    assignee: String,
    priority: String,
    lane: String,
) -> BoardActionResponse {
    let intent = create_intent(title, description, assignee, &priority, &lane);
    run_intent("board_create_item", &account_key, intent)
}

/// Edits an item. `None` leaves a field unchanged.
///
/// `description: Some("")` clears the description. A lane change appends the
/// item to the end of the new lane.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn board_update_item(
    account_key: String,
    item_id: String,
    title: Option<String>,
    description: Option<String>,
    assignee: Option<String>,
    priority: Option<String>,
    lane: Option<String>,
) -> BoardActionResponse {
    let intent = edit_intent(&item_id, title, description, assignee, priority, lane);
    run_intent("board_update_item", &account_key, intent)
}

/// Deletes an item. Deleting an unknown id succeeds with `changed = false`.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn board_delete_item(account_key: String, item_id: String) -> BoardActionResponse {
    let intent = parse_item_id(&item_id)
        .map(|id| BoardIntent::Delete { id })
        .map_err(|err| err.to_string());
    run_intent("board_delete_item", &account_key, intent)
}

/// Moves an item to `index` within `lane`.
///
/// Negative indexes clamp to the lane start, oversized ones to its end.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Moving an item onto its own slot succeeds with `changed = false`.
#[flutter_rust_bridge::frb(sync)]
pub fn board_move_item(
    account_key: String,
    item_id: String,
    lane: String,
    index: i64,
) -> BoardActionResponse {
    let intent = move_intent(&item_id, &lane, index);
    run_intent("board_move_item", &account_key, intent)
}

/// Lists one lane in display order.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; failures return an empty list with a message.
#[flutter_rust_bridge::frb(sync)]
pub fn board_list_lane(account_key: String, lane: String) -> BoardListResponse {
    let lane = match parse_lane(&lane) {
        Ok(lane) => lane,
        Err(err) => return BoardListResponse::failure(format!("board_list_lane failed: {err}")),
    };
    match with_board_store(&account_key, |store| Ok(store.lane(lane))) {
        Ok(items) => list_response(items),
        Err(err) => BoardListResponse::failure(format!("board_list_lane failed: {err}")),
    }
}

/// Lists the board filtered by title text and assignee.
///
/// Blank or missing filters match everything.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; failures return an empty list with a message.
#[flutter_rust_bridge::frb(sync)]
pub fn board_search(
    account_key: String,
    text: Option<String>,
    assignee: Option<String>,
) -> BoardListResponse {
    let filter = ItemFilter { text, assignee };
    let result = with_board_store(&account_key, |store| {
        Ok(store
            .filter(&filter)
            .into_iter()
            .flat_map(|view| view.items)
            .collect::<Vec<_>>())
    });
    match result {
        Ok(items) => list_response(items),
        Err(err) => BoardListResponse::failure(format!("board_search failed: {err}")),
    }
}

/// Returns per-lane item counts.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn board_stats(account_key: String) -> BoardStatsResponse {
    match with_board_store(&account_key, |store| Ok(store.stats())) {
        Ok(stats) => BoardStatsResponse {
            ok: true,
            total: saturating_u32(stats.total),
            todo: saturating_u32(stats.count(Lane::Todo)),
            doing: saturating_u32(stats.count(Lane::Doing)),
            done: saturating_u32(stats.count(Lane::Done)),
            message: String::new(),
        },
        Err(err) => BoardStatsResponse {
            ok: false,
            total: 0,
            todo: 0,
            doing: 0,
            done: 0,
            message: format!("board_stats failed: {err}"),
        },
    }
}

/// Returns distinct assignees in first-seen order.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; failures return an empty list.
#[flutter_rust_bridge::frb(sync)]
pub fn board_assignees(account_key: String) -> Vec<String> {
    with_board_store(&account_key, |store| Ok(store.assignees())).unwrap_or_else(|err| {
        warn!("event=ffi_call module=ffi status=error call=board_assignees error={err}");
        Vec::new()
    })
}

fn create_intent(
    title: String,
    description: Option<String>,
    assignee: String,
    priority: &str,
    lane: &str,
) -> Result<BoardIntent, String> {
    let priority = parse_priority(priority).map_err(|err| err.to_string())?;
    let lane = parse_lane(lane).map_err(|err| err.to_string())?;
    let mut draft = ItemDraft::new(title, assignee, priority, lane);
    draft.description = description;
    Ok(BoardIntent::Create(draft))
}

fn edit_intent(
    item_id: &str,
    title: Option<String>,
    description: Option<String>,
    assignee: Option<String>,
    priority: Option<String>,
    lane: Option<String>,
) -> Result<BoardIntent, String> {
    let id = parse_item_id(item_id).map_err(|err| err.to_string())?;
    let priority = priority
        .as_deref()
        .map(parse_priority)
        .transpose()
        .map_err(|err| err.to_string())?;
    let lane = lane
        .as_deref()
        .map(parse_lane)
        .transpose()
        .map_err(|err| err.to_string())?;
    let patch = ItemPatch {
        title,
        description: description.map(Some),
        assignee,
        priority,
        lane,
    };
    Ok(BoardIntent::Edit { id, patch })
}

fn move_intent(item_id: &str, lane: &str, index: i64) -> Result<BoardIntent, String> {
    Ok(BoardIntent::Move {
        id: parse_item_id(item_id).map_err(|err| err.to_string())?,
        lane: parse_lane(lane).map_err(|err| err.to_string())?,
        index: clamp_index(index),
    })
}

fn run_intent(
    call: &str,
    account_key: &str,
    intent: Result<BoardIntent, String>,
) -> BoardActionResponse {
    run_intent_at(&resolve_board_db_path(), call, account_key, intent)
}

fn run_intent_at(
    db_path: &Path,
    call: &str,
    account_key: &str,
    intent: Result<BoardIntent, String>,
) -> BoardActionResponse {
    let result = intent
        .and_then(|intent| with_session(db_path, account_key, |store| Ok(store.apply(intent))));
    match result {
        Ok(Ok(effect)) => BoardActionResponse::from_effect(effect),
        Ok(Err(err)) if err.is_persistence() => {
            warn!("event=ffi_call module=ffi status=error call={call} error_code=persist_failed");
            BoardActionResponse::unsaved(format!("{call} failed: {err}"))
        }
        Ok(Err(err)) => BoardActionResponse::failure(format!("{call} failed: {err}")),
        Err(err) => BoardActionResponse::failure(format!("{call} failed: {err}")),
    }
}

fn with_board_store<T>(
    account_key: &str,
    f: impl FnOnce(&mut SessionStore) -> Result<T, String>,
) -> Result<T, String> {
    with_session(&resolve_board_db_path(), account_key, f)
}

fn resolve_board_db_path() -> PathBuf {
    BOARD_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("TASKBOARD_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(BOARD_DB_FILE_NAME)
        })
        .clone()
}

fn clamp_index(index: i64) -> usize {
    usize::try_from(index.max(0)).unwrap_or(usize::MAX)
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn list_response(items: Vec<Item>) -> BoardListResponse {
    let message = if items.is_empty() {
        "No items.".to_string()
    } else {
        format!("Found {} item(s).", items.len())
    };
    BoardListResponse {
        items: items.into_iter().map(to_board_item).collect(),
        message,
    }
}

fn to_board_item(item: Item) -> BoardItem {
    BoardItem {
        item_id: item.id.to_string(),
        title: item.title,
        description: item.description,
        lane: item.lane.as_str().to_string(),
        priority: item.priority.as_str().to_string(),
        assignee: item.assignee,
        created_at_ms: item.created_at,
        completed_at_ms: item.completed_at,
        order: item.order,
    }
}
