//! Board store: the single writer of one account's board.
//!
//! # Responsibility
//! - Validate create/edit intents and route lane changes through ordering.
//! - Apply transition side effects, commit the new board as one value and
//!   write the full snapshot through to the repository.
//!
//! # Invariants
//! - The board is dense before and after every public call.
//! - A call that fails validation or references a missing item writes
//!   nothing, in memory or in storage.
//! - A failed write-through is reported but never rolled back: the in-memory
//!   board stays authoritative for the session.
//! - Logged events carry ids, lanes and counts only, never item text.

use crate::clock::{Clock, SystemClock};
use crate::engine::ordering::{
    plan_move, remove_item, MovePlan, MoveRequest, MovedBoard, OrderingError,
};
use crate::engine::transition::apply_transition;
use crate::model::board::{Board, BoardStats};
use crate::model::item::{Item, ItemDraft, ItemId, ItemPatch, ItemValidationError, Lane};
use crate::repo::snapshot_repo::{load_or_empty, RepoError, SnapshotRepository};
use crate::search::filter::{filter_board, ItemFilter, LaneView};
use crate::service::intent::{BoardEffect, BoardIntent};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type BoardResult<T> = Result<T, BoardError>;

/// Errors reported by board store operations.
#[derive(Debug)]
pub enum BoardError {
    /// Required field missing or blank. Nothing changed.
    Validation(ItemValidationError),
    /// Referenced item does not exist. Nothing changed.
    NotFound(ItemId),
    /// Write-through failed. The in-memory change is kept.
    Persistence(RepoError),
}

impl BoardError {
    /// Returns whether the in-memory board was changed despite the error.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "item not found: {id}"),
            Self::Persistence(err) => write!(f, "board change not persisted: {err}"),
        }
    }
}

impl Error for BoardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<ItemValidationError> for BoardError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<OrderingError> for BoardError {
    fn from(value: OrderingError) -> Self {
        match value {
            OrderingError::NotFound(id) => Self::NotFound(id),
        }
    }
}

/// Result of a move intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Item now sits at the requested slot.
    Moved(Item),
    /// Item already sat at the requested slot; nothing was written.
    Unchanged,
}

/// Owner of one account's board.
pub struct BoardStore<R: SnapshotRepository> {
    account_key: String,
    board: Board,
    repo: R,
    clock: Box<dyn Clock>,
}

impl<R: SnapshotRepository> BoardStore<R> {
    /// Loads the board stored under `account_key`.
    ///
    /// Never fails: unreadable storage starts an empty board.
    pub fn open(account_key: impl Into<String>, repo: R) -> Self {
        let account_key = account_key.into();
        let board = load_or_empty(&repo, &account_key);
        Self {
            account_key,
            board,
            repo,
            clock: Box::new(SystemClock),
        }
    }

    /// Replaces the time source used for timestamps.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn account_key(&self) -> &str {
        &self.account_key
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Snapshot of every item. No cross-lane ordering guarantee.
    pub fn list(&self) -> Vec<Item> {
        self.board.items().to_vec()
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.board.get(id)
    }

    /// Items of one lane in display order.
    pub fn lane(&self, lane: Lane) -> Vec<Item> {
        self.board.lane(lane).into_iter().cloned().collect()
    }

    pub fn stats(&self) -> BoardStats {
        self.board.stats()
    }

    /// Distinct assignees, first-seen order.
    pub fn assignees(&self) -> Vec<String> {
        self.board
            .assignees()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Filtered per-lane view.
    pub fn filter(&self, filter: &ItemFilter) -> Vec<LaneView> {
        filter_board(&self.board, filter)
    }

    /// Creates an item at the end of its lane.
    ///
    /// # Errors
    /// - `Validation` when a required field is missing; nothing changes.
    /// - `Persistence` when the write-through fails; the item stays on the
    ///   in-memory board.
    pub fn create(&mut self, draft: ItemDraft) -> BoardResult<Item> {
        let valid = draft.validate().map_err(|err| {
            debug!("event=item_create module=board status=error error_code=validation reason={err}");
            BoardError::Validation(err)
        })?;

        let order = self.board.lane_len(valid.lane) as u32;
        let item = valid.into_item(self.clock.now_ms(), order);

        let mut next = self.board.clone();
        next.items_mut().push(item.clone());
        self.commit(next);

        info!(
            "event=item_create module=board status=ok item_id={} lane={} order={} item_count={}",
            item.id,
            item.lane,
            item.order,
            self.board.len()
        );
        self.persist("item_create")?;
        Ok(item)
    }

    /// Edits an item's fields.
    ///
    /// A lane change is routed through the ordering engine: the item is
    /// appended to the end of the new lane, the old lane is renumbered and
    /// the completion timestamp follows the transition policy.
    ///
    /// An empty patch returns the item unchanged without writing.
    ///
    /// # Errors
    /// - `NotFound` when `id` is absent.
    /// - `Validation` when a patched field is blank.
    /// - `Persistence` when the write-through fails; the edit is kept.
    pub fn update(&mut self, id: ItemId, patch: ItemPatch) -> BoardResult<Item> {
        let current = self.board.get(id).cloned().ok_or(BoardError::NotFound(id))?;
        if patch.is_empty() {
            debug!("event=item_update module=board status=noop item_id={id}");
            return Ok(current);
        }

        let mut edited = current.clone();
        patch.apply_fields(&mut edited)?;

        let mut next = self.board.clone();
        if let Some(slot) = next.item_mut(id) {
            *slot = edited;
        }

        if let Some(lane) = patch.lane.filter(|lane| *lane != current.lane) {
            if let Some(moved) = self.plan_with_transition(&next, &MoveRequest::to_end(id, lane))? {
                next = moved.board;
            }
        }

        self.commit(next);
        let updated = self.board.get(id).cloned().ok_or(BoardError::NotFound(id))?;
        info!(
            "event=item_update module=board status=ok item_id={} lane={} order={}",
            updated.id, updated.lane, updated.order
        );
        self.persist("item_update")?;
        Ok(updated)
    }

    /// Deletes an item and closes the gap in its lane.
    ///
    /// Returns `Ok(false)` without writing when `id` is absent.
    pub fn delete(&mut self, id: ItemId) -> BoardResult<bool> {
        let Some(removed) = remove_item(&self.board, id) else {
            debug!("event=item_delete module=board status=noop item_id={id}");
            return Ok(false);
        };

        self.commit(removed.board);
        info!(
            "event=item_delete module=board status=ok item_id={id} lane={} from_index={} item_count={}",
            removed.item.lane,
            removed.from_index,
            self.board.len()
        );
        self.persist("item_delete")?;
        Ok(true)
    }

    /// Moves an item to `dest_index` of `dest_lane`.
    ///
    /// `dest_index` is clamped to the destination lane size. Moving an item
    /// onto its own slot writes nothing.
    ///
    /// # Errors
    /// - `NotFound` when `id` is absent.
    /// - `Persistence` when the write-through fails; the move is kept.
    pub fn move_item(
        &mut self,
        id: ItemId,
        dest_lane: Lane,
        dest_index: usize,
    ) -> BoardResult<MoveOutcome> {
        let request = MoveRequest::new(id, dest_lane, dest_index);
        let Some(moved) = self.plan_with_transition(&self.board, &request)? else {
            debug!("event=item_move module=board status=noop item_id={id}");
            return Ok(MoveOutcome::Unchanged);
        };

        info!(
            "event=item_move module=board status=ok item_id={id} from_lane={} from_index={} to_lane={} to_index={}",
            moved.from_lane, moved.from_index, moved.to_lane, moved.to_index
        );
        self.commit(moved.board);
        self.persist("item_move")?;

        let item = self.board.get(id).cloned().ok_or(BoardError::NotFound(id))?;
        Ok(MoveOutcome::Moved(item))
    }

    /// Executes one tagged intent.
    pub fn apply(&mut self, intent: BoardIntent) -> BoardResult<BoardEffect> {
        match intent {
            BoardIntent::Create(draft) => self.create(draft).map(BoardEffect::Created),
            BoardIntent::Edit { id, patch } => self.update(id, patch).map(BoardEffect::Updated),
            BoardIntent::Delete { id } => Ok(if self.delete(id)? {
                BoardEffect::Deleted(id)
            } else {
                BoardEffect::Unchanged
            }),
            BoardIntent::Move { id, lane, index } => {
                Ok(match self.move_item(id, lane, index)? {
                    MoveOutcome::Moved(item) => BoardEffect::Moved(item),
                    MoveOutcome::Unchanged => BoardEffect::Unchanged,
                })
            }
        }
    }

    fn plan_with_transition(
        &self,
        board: &Board,
        request: &MoveRequest,
    ) -> BoardResult<Option<MovedBoard>> {
        match plan_move(board, request)? {
            MovePlan::Unchanged => Ok(None),
            MovePlan::Moved(mut moved) => {
                let now = self.clock.now_ms();
                if let Some(item) = moved.board.item_mut(request.item_id) {
                    *item = apply_transition(item.clone(), moved.from_lane, moved.to_lane, now);
                }
                Ok(Some(moved))
            }
        }
    }

    fn commit(&mut self, next: Board) {
        debug_assert!(next.is_dense(), "committed board must keep lanes dense");
        self.board = next;
    }

    fn persist(&self, event: &'static str) -> BoardResult<()> {
        self.repo
            .save(&self.account_key, &self.board)
            .map_err(|err| {
                warn!(
                    "event={event} module=board status=error error_code=persist_failed item_count={} error={err}",
                    self.board.len()
                );
                BoardError::Persistence(err)
            })
    }
}
