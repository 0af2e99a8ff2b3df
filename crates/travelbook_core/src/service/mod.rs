//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the place store API.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod place_store;
