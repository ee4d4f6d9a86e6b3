//! Board snapshot repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist one whole-board snapshot per account key.
//! - Keep the snapshot wire format (JSON array of items) in one place.
//!
//! # Invariants
//! - Writes are whole-snapshot overwrites, never deltas.
//! - Decoding rejects invalid items and duplicate ids instead of masking them.
//! - `load_or_empty` never fails: unreadable storage yields an empty board.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::board::Board;
use log::{info, warn};
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for snapshot persistence operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Snapshot payload could not be encoded or decoded.
    Serialization(serde_json::Error),
    /// Snapshot decoded but violates item invariants.
    InvalidData(String),
    /// Storage backend refused the call.
    Unavailable(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "snapshot serialization failed: {err}"),
            Self::InvalidData(message) => write!(f, "invalid snapshot data: {message}"),
            Self::Unavailable(message) => write!(f, "snapshot storage unavailable: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "snapshot repository requires schema version {expected_version}, got {actual_version}"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::InvalidData(_) => None,
            Self::Unavailable(_) => None,
            Self::UninitializedConnection { .. } => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Repository interface for per-account board snapshots.
pub trait SnapshotRepository {
    /// Overwrites the snapshot stored under `account_key`.
    fn save(&self, account_key: &str, board: &Board) -> RepoResult<()>;
    /// Loads the snapshot stored under `account_key`, if any.
    fn load(&self, account_key: &str) -> RepoResult<Option<Board>>;
}

impl<T: SnapshotRepository + ?Sized> SnapshotRepository for &T {
    fn save(&self, account_key: &str, board: &Board) -> RepoResult<()> {
        (**self).save(account_key, board)
    }

    fn load(&self, account_key: &str) -> RepoResult<Option<Board>> {
        (**self).load(account_key)
    }
}

/// Serializes a board into the snapshot wire format.
pub fn encode_snapshot(board: &Board) -> RepoResult<String> {
    Ok(serde_json::to_string(board)?)
}

/// Parses and checks a snapshot payload.
///
/// # Errors
/// - `Serialization` when the payload is not a JSON item array.
/// - `InvalidData` when an item fails validation or ids repeat.
pub fn decode_snapshot(payload: &str) -> RepoResult<Board> {
    let board: Board = serde_json::from_str(payload)?;
    for item in board.items() {
        item.validate().map_err(|err| {
            RepoError::InvalidData(format!("item {} rejected: {err}", item.id))
        })?;
    }
    if board.has_duplicate_ids() {
        return Err(RepoError::InvalidData(
            "snapshot contains duplicate item ids".to_string(),
        ));
    }
    Ok(board)
}

/// Loads the board for `account_key`, falling back to an empty board.
///
/// A stored board that is not dense is renumbered per lane by
/// `(order, id)`; a dense board is returned as stored.
pub fn load_or_empty<R: SnapshotRepository + ?Sized>(repo: &R, account_key: &str) -> Board {
    match repo.load(account_key) {
        Ok(Some(board)) => {
            if board.is_dense() {
                info!(
                    "event=snapshot_load module=repo status=ok item_count={}",
                    board.len()
                );
                return board;
            }
            warn!(
                "event=snapshot_load module=repo status=ok item_count={} repair=renumbered error_code=non_dense_lanes",
                board.len()
            );
            board.normalized()
        }
        Ok(None) => {
            info!("event=snapshot_load module=repo status=noop item_count=0");
            Board::new()
        }
        Err(err) => {
            warn!(
                "event=snapshot_load module=repo status=error error_code=snapshot_unreadable error={err}"
            );
            Board::new()
        }
    }
}

/// SQLite-backed snapshot repository.
pub struct SqliteSnapshotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSnapshotRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl SnapshotRepository for SqliteSnapshotRepository<'_> {
    fn save(&self, account_key: &str, board: &Board) -> RepoResult<()> {
        let payload = encode_snapshot(board)?;
        self.conn.execute(
            "INSERT INTO board_snapshots (account_key, payload, item_count)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(account_key) DO UPDATE SET
                payload = excluded.payload,
                item_count = excluded.item_count,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![account_key, payload, board.len() as i64],
        )?;
        Ok(())
    }

    fn load(&self, account_key: &str) -> RepoResult<Option<Board>> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload
                 FROM board_snapshots
                 WHERE account_key = ?1;",
                [account_key],
                |row| row.get(0),
            )
            .optional()?;

        payload.as_deref().map(decode_snapshot).transpose()
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}
