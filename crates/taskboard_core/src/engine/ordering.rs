//! Lane ordering engine.
//!
//! # Responsibility
//! - Compute the board that results from moving one item to a lane/index.
//! - Compute the board that results from removing one item.
//!
//! # Invariants
//! - Pure: the input board is never mutated; a new board is returned.
//! - Every lane touched by an operation is rebuilt and renumbered `0..k`.
//! - Items outside the touched lanes keep their order and vector position.
//! - Lane sequences are read as `order ASC, id ASC`.

use crate::model::board::Board;
use crate::model::item::{Item, ItemId, Lane};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Move intent resolved to a destination slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    pub item_id: ItemId,
    pub dest_lane: Lane,
    /// Target index after the move. Clamped to the destination lane size
    /// excluding the moved item.
    pub dest_index: usize,
}

impl MoveRequest {
    pub fn new(item_id: ItemId, dest_lane: Lane, dest_index: usize) -> Self {
        Self {
            item_id,
            dest_lane,
            dest_index,
        }
    }

    /// Targets the end of `dest_lane`.
    pub fn to_end(item_id: ItemId, dest_lane: Lane) -> Self {
        Self::new(item_id, dest_lane, usize::MAX)
    }
}

/// Result of planning a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovePlan {
    /// The item already sits at the requested slot. Nothing to write.
    Unchanged,
    /// New board with the item at its requested slot.
    Moved(MovedBoard),
}

/// Board produced by a move plus where the item went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedBoard {
    pub board: Board,
    pub from_lane: Lane,
    pub from_index: usize,
    pub to_lane: Lane,
    pub to_index: usize,
}

impl MovedBoard {
    pub fn crosses_lanes(&self) -> bool {
        self.from_lane != self.to_lane
    }
}

/// Board produced by a removal plus the removed item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedItem {
    pub board: Board,
    pub item: Item,
    pub from_index: usize,
}

/// Errors from ordering operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderingError {
    /// Item id is absent from the board.
    NotFound(ItemId),
}

impl Display for OrderingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "item not found: {id}"),
        }
    }
}

impl Error for OrderingError {}

/// Plans a same-lane reorder or cross-lane transfer.
///
/// # Errors
/// - `OrderingError::NotFound` when `request.item_id` is not on the board.
pub fn plan_move(board: &Board, request: &MoveRequest) -> Result<MovePlan, OrderingError> {
    let id = request.item_id;
    let item = board.get(id).ok_or(OrderingError::NotFound(id))?;
    let from_lane = item.lane;

    let mut source = board.lane_ids(from_lane);
    let from_index = source
        .iter()
        .position(|candidate| *candidate == id)
        .ok_or(OrderingError::NotFound(id))?;
    source.remove(from_index);

    if request.dest_lane == from_lane {
        let to_index = request.dest_index.min(source.len());
        if to_index == from_index {
            return Ok(MovePlan::Unchanged);
        }
        source.insert(to_index, id);

        let mut next = board.clone();
        next.assign_orders(&source);
        return Ok(MovePlan::Moved(MovedBoard {
            board: next,
            from_lane,
            from_index,
            to_lane: from_lane,
            to_index,
        }));
    }

    let mut destination = board.lane_ids(request.dest_lane);
    let to_index = request.dest_index.min(destination.len());
    destination.insert(to_index, id);

    let mut next = board.clone();
    if let Some(moved) = next.item_mut(id) {
        moved.lane = request.dest_lane;
    }
    next.assign_orders(&source);
    next.assign_orders(&destination);

    Ok(MovePlan::Moved(MovedBoard {
        board: next,
        from_lane,
        from_index,
        to_lane: request.dest_lane,
        to_index,
    }))
}

/// Removes one item and closes the gap it leaves in its lane.
///
/// Returns `None` when the id is absent.
pub fn remove_item(board: &Board, id: ItemId) -> Option<RemovedItem> {
    let (lane, from_index) = board.position_of(id)?;

    let mut next = board.clone();
    let slot = next.items().iter().position(|item| item.id == id)?;
    let item = next.items_mut().remove(slot);

    let remaining = next.lane_ids(lane);
    next.assign_orders(&remaining);

    Some(RemovedItem {
        board: next,
        item,
        from_index,
    })
}
