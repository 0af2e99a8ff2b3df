//! Domain model for recorded places.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every place is identified by a stable, opaque `PlaceId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod place;
