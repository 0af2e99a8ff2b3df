//! Cross-screen change propagation.
//!
//! # Responsibility
//! - Carry "the place set changed" signals from writers to live projections.
//!
//! # Invariants
//! - No ambient global bus: every screen receives the bus explicitly.

pub mod bus;
