//! In-memory snapshot repository.
//!
//! Stores encoded payloads, so decoding and corruption paths behave like the
//! SQLite implementation. Counts saves and can be told to fail them, which
//! lets callers observe write-through behavior.

use crate::model::board::Board;
use crate::repo::snapshot_repo::{
    decode_snapshot, encode_snapshot, RepoError, RepoResult, SnapshotRepository,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Single-threaded in-memory snapshot store.
#[derive(Debug, Default)]
pub struct MemorySnapshotRepository {
    slots: RefCell<HashMap<String, String>>,
    save_calls: Cell<usize>,
    fail_saves: Cell<bool>,
}

impl MemorySnapshotRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `save` calls received, failed ones included.
    pub fn save_count(&self) -> usize {
        self.save_calls.get()
    }

    /// Makes subsequent saves fail with `RepoError::Unavailable`.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }

    /// Raw payload stored under `account_key`.
    pub fn raw_payload(&self, account_key: &str) -> Option<String> {
        self.slots.borrow().get(account_key).cloned()
    }

    /// Stores a raw payload, bypassing encoding.
    pub fn put_raw_payload(&self, account_key: impl Into<String>, payload: impl Into<String>) {
        self.slots
            .borrow_mut()
            .insert(account_key.into(), payload.into());
    }
}

impl SnapshotRepository for MemorySnapshotRepository {
    fn save(&self, account_key: &str, board: &Board) -> RepoResult<()> {
        self.save_calls.set(self.save_calls.get() + 1);
        if self.fail_saves.get() {
            return Err(RepoError::Unavailable("saves disabled".to_string()));
        }
        let payload = encode_snapshot(board)?;
        self.slots
            .borrow_mut()
            .insert(account_key.to_string(), payload);
        Ok(())
    }

    fn load(&self, account_key: &str) -> RepoResult<Option<Board>> {
        self.slots
            .borrow()
            .get(account_key)
            .map(|payload| decode_snapshot(payload))
            .transpose()
    }
}
