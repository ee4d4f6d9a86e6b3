//! Tagged board intents and boundary parsing.
//!
//! # Responsibility
//! - Represent each user intent with one fixed payload shape.
//! - Turn untyped boundary input (labels, id strings) into typed values so
//!   malformed payloads fail before reaching the store.

use crate::model::item::{Item, ItemDraft, ItemId, ItemPatch, Lane, Priority};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// One user intent against a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardIntent {
    Create(ItemDraft),
    Edit { id: ItemId, patch: ItemPatch },
    Delete { id: ItemId },
    Move { id: ItemId, lane: Lane, index: usize },
}

/// Observable result of applying one intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEffect {
    Created(Item),
    Updated(Item),
    Deleted(ItemId),
    Moved(Item),
    /// The intent was accepted but changed nothing; no write happened.
    Unchanged,
}

/// Boundary parse failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentError {
    InvalidItemId(String),
    UnknownLane(String),
    UnknownPriority(String),
}

impl Display for IntentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidItemId(value) => write!(f, "invalid item id `{value}`"),
            Self::UnknownLane(value) => {
                write!(f, "unknown lane `{value}`; expected todo|doing|done")
            }
            Self::UnknownPriority(value) => {
                write!(f, "unknown priority `{value}`; expected low|medium|high")
            }
        }
    }
}

impl Error for IntentError {}

/// Parses a non-nil item id.
pub fn parse_item_id(value: &str) -> Result<ItemId, IntentError> {
    let trimmed = value.trim();
    match Uuid::parse_str(trimmed) {
        Ok(id) if !id.is_nil() => Ok(id),
        _ => Err(IntentError::InvalidItemId(trimmed.to_string())),
    }
}

pub fn parse_lane(value: &str) -> Result<Lane, IntentError> {
    Lane::parse(value).ok_or_else(|| IntentError::UnknownLane(value.trim().to_string()))
}

pub fn parse_priority(value: &str) -> Result<Priority, IntentError> {
    Priority::parse(value).ok_or_else(|| IntentError::UnknownPriority(value.trim().to_string()))
}
