//! Place store: the single source of truth for recorded places.
//!
//! # Responsibility
//! - Provide create/fetch-all/fetch-by-id/delete entry points for screens.
//! - Translate repository outcomes into the store error taxonomy.
//! - Emit metadata-only diagnostic events for every operation.
//!
//! # Invariants
//! - A failed `create` leaves no record behind.
//! - `NotFound` is an expected outcome, kept apart from persistence failures.
//! - User-entered title/comment text is never logged.

use crate::model::place::{Coordinate, Place, PlaceId, PlaceValidationError};
use crate::repo::place_repo::{DeleteOutcome, PlaceRepository, RepoError};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error taxonomy.
#[derive(Debug)]
pub enum StoreError {
    /// Input failed record validation; nothing was written.
    Invalid(PlaceValidationError),
    /// No place with this id exists.
    NotFound(PlaceId),
    /// Underlying storage failed; safe to retry.
    Persistence(RepoError),
}

impl StoreError {
    /// Whether the failure came from storage rather than from the caller.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "invalid place: {err}"),
            Self::NotFound(id) => write!(f, "place not found: {id}"),
            Self::Persistence(err) => write!(f, "place storage failed: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Invalid(err),
            other => Self::Persistence(other),
        }
    }
}

/// Store facade over a place repository.
pub struct PlaceStore<R: PlaceRepository> {
    repo: R,
}

impl<R: PlaceRepository> PlaceStore<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists a new place and returns its freshly generated identity.
    ///
    /// Input is validated before any write.
    pub fn create(
        &self,
        title: impl Into<String>,
        comment: impl Into<String>,
        coordinate: Coordinate,
    ) -> StoreResult<PlaceId> {
        let started_at = Instant::now();
        let place = Place::new(title, comment, coordinate);

        if let Err(err) = place.validate() {
            warn!(
                "event=place_create module=store status=rejected field={}",
                err.field()
            );
            return Err(StoreError::Invalid(err));
        }

        match self.repo.create_place(&place) {
            Ok(id) => {
                info!(
                    "event=place_create module=store status=ok place_id={id} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(id)
            }
            Err(err) => {
                error!(
                    "event=place_create module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }

    /// Returns every stored place in insertion order.
    pub fn fetch_all(&self) -> StoreResult<Vec<Place>> {
        match self.repo.list_places() {
            Ok(places) => {
                debug!(
                    "event=place_fetch_all module=store status=ok count={}",
                    places.len()
                );
                Ok(places)
            }
            Err(err) => {
                error!("event=place_fetch_all module=store status=error error={err}");
                Err(StoreError::Persistence(err))
            }
        }
    }

    /// Looks a place up by identity.
    pub fn fetch_by_id(&self, id: PlaceId) -> StoreResult<Place> {
        match self.repo.get_place(id) {
            Ok(Some(place)) => Ok(place),
            Ok(None) => {
                debug!("event=place_fetch module=store status=not_found place_id={id}");
                Err(StoreError::NotFound(id))
            }
            Err(err) => {
                error!("event=place_fetch module=store status=error place_id={id} error={err}");
                Err(StoreError::Persistence(err))
            }
        }
    }

    /// Removes a place by identity.
    ///
    /// A missing id succeeds with `DeleteOutcome::AlreadyAbsent`.
    pub fn delete(&self, id: PlaceId) -> StoreResult<DeleteOutcome> {
        match self.repo.delete_place(id) {
            Ok(outcome) => {
                info!(
                    "event=place_delete module=store status=ok place_id={id} outcome={}",
                    match outcome {
                        DeleteOutcome::Deleted => "deleted",
                        DeleteOutcome::AlreadyAbsent => "already_absent",
                    }
                );
                Ok(outcome)
            }
            Err(err) => {
                error!("event=place_delete module=store status=error place_id={id} error={err}");
                Err(StoreError::Persistence(err))
            }
        }
    }

    /// Number of stored places.
    pub fn count(&self) -> StoreResult<u64> {
        self.repo.count_places().map_err(StoreError::Persistence)
    }
}
