//! Per-account board sessions kept alive across FFI calls.
//!
//! # Responsibility
//! - Hold one `BoardStore` per `(db_path, account_key)` for the process
//!   lifetime, so the in-memory board stays authoritative between calls.
//!
//! # Invariants
//! - A store is loaded from storage once, on first use.
//! - A change whose write-through failed stays on the session board and is
//!   persisted by the next successful write.
//! - Access is serialized by one registry lock.

use log::info;
use rusqlite::Connection;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock, PoisonError};
use taskboard_core::db::open_db;
use taskboard_core::{Board, BoardStore, RepoResult, SnapshotRepository, SqliteSnapshotRepository};

pub(crate) type SessionStore = BoardStore<OwnedSnapshotRepository>;

type SessionKey = (PathBuf, String);

static SESSIONS: OnceLock<Mutex<HashMap<SessionKey, SessionStore>>> = OnceLock::new();

/// Snapshot repository that owns its connection.
pub(crate) struct OwnedSnapshotRepository {
    conn: Connection,
}

impl OwnedSnapshotRepository {
    fn open(db_path: &Path) -> Result<Self, String> {
        let conn = open_db(db_path).map_err(|err| format!("board DB open failed: {err}"))?;
        SqliteSnapshotRepository::try_new(&conn)
            .map_err(|err| format!("board repo init failed: {err}"))?;
        Ok(Self { conn })
    }

    fn sqlite(&self) -> RepoResult<SqliteSnapshotRepository<'_>> {
        SqliteSnapshotRepository::try_new(&self.conn)
    }
}

impl SnapshotRepository for OwnedSnapshotRepository {
    fn save(&self, account_key: &str, board: &Board) -> RepoResult<()> {
        self.sqlite()?.save(account_key, board)
    }

    fn load(&self, account_key: &str) -> RepoResult<Option<Board>> {
        self.sqlite()?.load(account_key)
    }
}

/// Runs `f` against the session store of `account_key` in `db_path`,
/// opening it on first use.
///
/// # Errors
/// - Returns an error when `account_key` is blank.
/// - Returns an error when the database cannot be opened on first use.
pub(crate) fn with_session<T>(
    db_path: &Path,
    account_key: &str,
    f: impl FnOnce(&mut SessionStore) -> Result<T, String>,
) -> Result<T, String> {
    let account_key = account_key.trim();
    if account_key.is_empty() {
        return Err("account_key cannot be empty".to_string());
    }

    let mut sessions = SESSIONS
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(PoisonError::into_inner);

    let store = match sessions.entry((db_path.to_path_buf(), account_key.to_string())) {
        Entry::Occupied(entry) => entry.into_mut(),
        Entry::Vacant(entry) => {
            let repo = OwnedSnapshotRepository::open(db_path)?;
            let store = entry.insert(BoardStore::open(account_key, repo));
            info!(
                "event=session_open module=ffi status=ok item_count={}",
                store.board().len()
            );
            store
        }
    };
    f(store)
}
