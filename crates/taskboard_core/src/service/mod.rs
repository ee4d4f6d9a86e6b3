//! Board use-case services.
//!
//! # Responsibility
//! - Own the board for one account and orchestrate engine, policy and
//!   persistence calls behind intent-level APIs.
//! - Keep FFI/CLI layers decoupled from storage details.

pub mod board_service;
pub mod intent;
