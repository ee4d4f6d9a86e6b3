//! FFI boundary crate for the task board.

pub mod api;
mod session;
