//! In-memory item filtering for board views.
//!
//! # Responsibility
//! - Match items by title text and assignee.
//! - Project matches per lane in display order.
//!
//! # Invariants
//! - Text matching is a case-insensitive substring match on `title`.
//! - Assignee matching is exact after trim.
//! - Blank filter fields match everything.
//! - Output always lists every lane, in `Lane::ALL` order.

use crate::model::board::Board;
use crate::model::item::{Item, Lane};

/// Filter options for board views.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    /// Title text to search for.
    pub text: Option<String>,
    /// Exact assignee to keep.
    pub assignee: Option<String>,
}

impl ItemFilter {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            assignee: None,
        }
    }

    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Returns whether `item` passes every set criterion.
    pub fn matches(&self, item: &Item) -> bool {
        let text_ok = match normalized(self.text.as_deref()) {
            Some(needle) => item.title.to_lowercase().contains(&needle.to_lowercase()),
            None => true,
        };
        let assignee_ok = match normalized(self.assignee.as_deref()) {
            Some(assignee) => item.assignee == assignee,
            None => true,
        };
        text_ok && assignee_ok
    }
}

/// Matching items of one lane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneView {
    pub lane: Lane,
    pub items: Vec<Item>,
}

/// Applies `filter` and groups matches per lane.
pub fn filter_board(board: &Board, filter: &ItemFilter) -> Vec<LaneView> {
    Lane::ALL
        .iter()
        .map(|lane| LaneView {
            lane: *lane,
            items: board
                .lane(*lane)
                .into_iter()
                .filter(|item| filter.matches(item))
                .cloned()
                .collect(),
        })
        .collect()
}

fn normalized(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
