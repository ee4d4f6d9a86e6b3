//! Pure board computations invoked by the store.
//!
//! # Responsibility
//! - Plan reorders, transfers and removals that keep lanes dense.
//! - Map lane transitions to completion timestamp side effects.
//!
//! # Invariants
//! - Nothing here holds references to items beyond one call.
//! - Inputs are never mutated in place; callers commit the returned values.

pub mod ordering;
pub mod transition;
