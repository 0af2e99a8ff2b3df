//! Core domain logic for TravelBook.
//! This crate is the single source of truth for recorded places and for the
//! protocol that keeps list and detail screens consistent.

pub mod cache;
pub mod db;
pub mod draft;
pub mod logging;
pub mod model;
pub mod repo;
pub mod screen;
pub mod service;
pub mod sync;

pub use cache::{CacheError, PlaceListCache, PlaceListEntry};
pub use draft::{CommitFailure, DraftBuilder, DraftError};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::place::{Coordinate, Place, PlaceField, PlaceId, PlaceValidationError};
pub use repo::place_repo::{
    DeleteOutcome, PlaceRepository, RepoError, RepoResult, SqlitePlaceRepository,
};
pub use screen::detail_screen::{DetailScreen, DetailState, MapAnnotation};
pub use screen::list_screen::ListScreen;
pub use screen::{DetailTarget, ScreenError};
pub use service::place_store::{PlaceStore, StoreError, StoreResult};
pub use sync::bus::{SubscriptionId, SyncBus, SyncError, SyncEvent};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
