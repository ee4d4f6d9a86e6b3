//! Board aggregate: every item owned by one account.
//!
//! # Responsibility
//! - Hold the item set as one value that is replaced, never patched, by the
//!   store.
//! - Provide deterministic per-lane projections.
//!
//! # Invariants
//! - Lane projections are ordered by `order ASC, id ASC`.
//! - A board handed out by the store is dense: each lane with `k` items
//!   carries exactly the orders `0..k`.

use crate::model::item::{Item, ItemId, Lane};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Full item collection for one account.
///
/// Serializes as a plain array of item records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    items: Vec<Item>,
}

/// Item counts per lane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BoardStats {
    pub total: usize,
    pub todo: usize,
    pub doing: usize,
    pub done: usize,
}

impl BoardStats {
    /// Count for one lane.
    pub fn count(&self, lane: Lane) -> usize {
        match lane {
            Lane::Todo => self.todo,
            Lane::Doing => self.doing,
            Lane::Done => self.done,
        }
    }
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an item set without touching positions.
    pub fn from_items(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Item> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Finds one item by id.
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Items of one lane in display order.
    pub fn lane(&self, lane: Lane) -> Vec<&Item> {
        let mut items = self
            .items
            .iter()
            .filter(|item| item.lane == lane)
            .collect::<Vec<_>>();
        items.sort_by(|left, right| compare_position(left, right));
        items
    }

    /// Ids of one lane in display order.
    pub fn lane_ids(&self, lane: Lane) -> Vec<ItemId> {
        self.lane(lane).into_iter().map(|item| item.id).collect()
    }

    pub fn lane_len(&self, lane: Lane) -> usize {
        self.items.iter().filter(|item| item.lane == lane).count()
    }

    /// Lane and display index of one item.
    pub fn position_of(&self, id: ItemId) -> Option<(Lane, usize)> {
        let item = self.get(id)?;
        let index = self
            .lane(item.lane)
            .iter()
            .position(|candidate| candidate.id == id)?;
        Some((item.lane, index))
    }

    /// Returns whether every lane carries exactly the orders `0..k`.
    pub fn is_dense(&self) -> bool {
        Lane::ALL.iter().all(|lane| {
            self.lane(*lane)
                .iter()
                .enumerate()
                .all(|(index, item)| item.order as usize == index)
        })
    }

    /// Returns whether any id appears more than once.
    pub fn has_duplicate_ids(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.items.len());
        self.items.iter().any(|item| !seen.insert(item.id))
    }

    /// Renumbers every lane densely, keeping the current `(order, id)`
    /// sequence. A dense board is returned unchanged.
    pub fn normalized(mut self) -> Self {
        for lane in Lane::ALL {
            let ids = self.lane_ids(lane);
            self.assign_orders(&ids);
        }
        self
    }

    /// Per-lane counts.
    pub fn stats(&self) -> BoardStats {
        let mut stats = BoardStats {
            total: self.items.len(),
            ..BoardStats::default()
        };
        for item in &self.items {
            match item.lane {
                Lane::Todo => stats.todo += 1,
                Lane::Doing => stats.doing += 1,
                Lane::Done => stats.done += 1,
            }
        }
        stats
    }

    /// Distinct assignees in first-seen order.
    pub fn assignees(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .map(|item| item.assignee.as_str())
            .filter(|assignee| seen.insert(*assignee))
            .collect()
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<Item> {
        &mut self.items
    }

    pub(crate) fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Writes `order = position` for every id in `sequence`.
    pub(crate) fn assign_orders(&mut self, sequence: &[ItemId]) {
        for (index, id) in sequence.iter().enumerate() {
            if let Some(item) = self.items.iter_mut().find(|item| item.id == *id) {
                item.order = index as u32;
            }
        }
    }
}

/// Display ordering inside a lane. Ties on `order` fall back to `id`.
pub(crate) fn compare_position(left: &Item, right: &Item) -> Ordering {
    left.order
        .cmp(&right.order)
        .then_with(|| left.id.cmp(&right.id))
}
