//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract for places.
//! - Isolate SQLite query details from store orchestration.
//!
//! # Invariants
//! - Repository writes enforce `Place::validate()` before persistence.
//! - A missing row is reported as `Ok(None)` / `AlreadyAbsent`, never as a
//!   transport error.

pub mod place_repo;
