//! Work item domain model.
//!
//! # Responsibility
//! - Define the canonical item record stored on a board.
//! - Define the closed lane/priority vocabularies and their stable labels.
//! - Validate user-provided fields before they reach the board.
//!
//! # Invariants
//! - `id` is stable and never reused for another item.
//! - `created_at` is set once at creation and never mutated.
//! - `completed_at` is present only while the item sits in `Lane::Done`,
//!   unless a caller constructs an item by hand.
//! - `order` is the zero-based rank inside `lane`; the board keeps it dense.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every work item.
pub type ItemId = Uuid;

/// Board lane. The set is closed and its declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lane {
    /// Not started.
    Todo,
    /// Work is in progress.
    Doing,
    /// Completed.
    Done,
}

impl Lane {
    /// All lanes in display order.
    pub const ALL: [Lane; 3] = [Lane::Todo, Lane::Doing, Lane::Done];

    /// Stable wire label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Doing => "doing",
            Self::Done => "done",
        }
    }

    /// Parses a wire label, case-insensitive and trimmed.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "todo" => Some(Self::Todo),
            "doing" => Some(Self::Doing),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

impl Display for Lane {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Item priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Stable wire label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parses a wire label, case-insensitive and trimmed.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors for user-provided item fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemValidationError {
    /// Title is missing or blank after trim.
    EmptyTitle,
    /// Assignee is missing or blank after trim.
    EmptyAssignee,
    /// Priority was not provided.
    MissingPriority,
    /// Lane was not provided.
    MissingLane,
    /// Nil UUID is not a valid stable identifier.
    NilId,
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be blank"),
            Self::EmptyAssignee => write!(f, "assignee must not be blank"),
            Self::MissingPriority => write!(f, "priority is required"),
            Self::MissingLane => write!(f, "lane is required"),
            Self::NilId => write!(f, "item id must not be nil"),
        }
    }
}

impl Error for ItemValidationError {}

/// Canonical work item record.
///
/// Serialized with camelCase field names; optional fields are omitted
/// rather than written as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub lane: Lane,
    pub priority: Priority,
    pub assignee: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds. Present while the item is done.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    pub order: u32,
}

impl Item {
    /// Returns whether the item currently sits in the done lane.
    pub fn is_done(&self) -> bool {
        self.lane == Lane::Done
    }

    /// Validates the user-editable fields of a stored item.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.id.is_nil() {
            return Err(ItemValidationError::NilId);
        }
        if self.title.trim().is_empty() {
            return Err(ItemValidationError::EmptyTitle);
        }
        if self.assignee.trim().is_empty() {
            return Err(ItemValidationError::EmptyAssignee);
        }
        Ok(())
    }
}

/// Fields supplied by a create intent.
///
/// `priority` and `lane` are optional here so a boundary that forwards a
/// partially filled form gets a `ValidationError` instead of a default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDraft {
    pub title: String,
    pub description: Option<String>,
    pub assignee: String,
    pub priority: Option<Priority>,
    pub lane: Option<Lane>,
}

impl ItemDraft {
    /// Creates a draft with all required fields set.
    pub fn new(
        title: impl Into<String>,
        assignee: impl Into<String>,
        priority: Priority,
        lane: Lane,
    ) -> Self {
        Self {
            title: title.into(),
            description: None,
            assignee: assignee.into(),
            priority: Some(priority),
            lane: Some(lane),
        }
    }

    /// Sets the optional description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Normalizes and validates the draft.
    ///
    /// Title and assignee are trimmed; a blank description becomes `None`.
    pub fn validate(self) -> Result<ValidDraft, ItemValidationError> {
        let title = normalize_required(self.title).ok_or(ItemValidationError::EmptyTitle)?;
        let assignee =
            normalize_required(self.assignee).ok_or(ItemValidationError::EmptyAssignee)?;
        let priority = self.priority.ok_or(ItemValidationError::MissingPriority)?;
        let lane = self.lane.ok_or(ItemValidationError::MissingLane)?;
        Ok(ValidDraft {
            title,
            description: normalize_optional(self.description),
            assignee,
            priority,
            lane,
        })
    }
}

/// Draft that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDraft {
    pub title: String,
    pub description: Option<String>,
    pub assignee: String,
    pub priority: Priority,
    pub lane: Lane,
}

impl ValidDraft {
    /// Materializes an item with a generated id.
    pub fn into_item(self, created_at: i64, order: u32) -> Item {
        let completed_at = (self.lane == Lane::Done).then_some(created_at);
        Item {
            id: Uuid::new_v4(),
            title: self.title,
            description: self.description,
            lane: self.lane,
            priority: self.priority,
            assignee: self.assignee,
            created_at,
            completed_at,
            order,
        }
    }
}

/// Field changes supplied by an edit intent. `None` leaves a field as is.
///
/// `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub assignee: Option<String>,
    pub priority: Option<Priority>,
    pub lane: Option<Lane>,
}

impl ItemPatch {
    /// Returns whether the patch carries no change at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.assignee.is_none()
            && self.priority.is_none()
            && self.lane.is_none()
    }

    /// Applies non-positional fields onto `item`.
    ///
    /// `lane` is left untouched; lane changes go through the
    /// ordering engine.
    pub fn apply_fields(&self, item: &mut Item) -> Result<(), ItemValidationError> {
        if let Some(title) = &self.title {
            item.title =
                normalize_required(title.clone()).ok_or(ItemValidationError::EmptyTitle)?;
        }
        if let Some(assignee) = &self.assignee {
            item.assignee =
                normalize_required(assignee.clone()).ok_or(ItemValidationError::EmptyAssignee)?;
        }
        if let Some(description) = &self.description {
            item.description = normalize_optional(description.clone());
        }
        if let Some(priority) = self.priority {
            item.priority = priority;
        }
        Ok(())
    }
}

fn normalize_required(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(normalize_required)
}
