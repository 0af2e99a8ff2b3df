//! Ordered list projection used by the place list screen.
//!
//! # Responsibility
//! - Mirror the store as `(id, title)` rows at the last refresh.
//! - Resolve a selected row into the identity a detail screen needs.
//!
//! # Invariants
//! - Refresh replaces the whole projection; it is never merged.
//! - The only incremental patch is removal of a row whose store deletion has
//!   already been confirmed.
//! - A failed refresh or delete leaves the projection untouched.

use crate::model::place::{Place, PlaceId};
use crate::repo::place_repo::{DeleteOutcome, PlaceRepository};
use crate::service::place_store::{PlaceStore, StoreError};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One row of the list projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceListEntry {
    pub id: PlaceId,
    pub title: String,
}

impl From<&Place> for PlaceListEntry {
    fn from(place: &Place) -> Self {
        Self {
            id: place.id(),
            title: place.title().to_string(),
        }
    }
}

/// List cache errors.
#[derive(Debug)]
pub enum CacheError {
    IndexOutOfRange { index: usize, len: usize },
    Store(StoreError),
}

impl Display for CacheError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "list row {index} is out of range (len {len})")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CacheError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::IndexOutOfRange { .. } => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for CacheError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Read-through projection of the place store.
#[derive(Debug, Default)]
pub struct PlaceListCache {
    entries: Vec<PlaceListEntry>,
}

impl PlaceListCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-queries the store and replaces the projection in store order.
    ///
    /// On failure the previous rows stay visible and the error is returned.
    pub fn refresh<R: PlaceRepository>(&mut self, store: &PlaceStore<R>) -> Result<(), StoreError> {
        let places = store.fetch_all()?;
        self.entries = places.iter().map(PlaceListEntry::from).collect();
        debug!(
            "event=list_refresh module=cache status=ok count={}",
            self.entries.len()
        );
        Ok(())
    }

    /// Returns the row at `index`.
    pub fn entry_at(&self, index: usize) -> Option<&PlaceListEntry> {
        self.entries.get(index)
    }

    /// Drops the row at `index`.
    ///
    /// Only call this after the store has confirmed deletion of that row's
    /// id; `delete_at` does both steps in the right order.
    pub fn remove_at(&mut self, index: usize) -> Option<PlaceListEntry> {
        if index >= self.entries.len() {
            return None;
        }
        Some(self.entries.remove(index))
    }

    /// Deletes the place shown at `index` and then drops its row.
    ///
    /// The row is removed only after the store reports success.
    pub fn delete_at<R: PlaceRepository>(
        &mut self,
        index: usize,
        store: &PlaceStore<R>,
    ) -> Result<PlaceListEntry, CacheError> {
        let id = match self.entry_at(index) {
            Some(entry) => entry.id,
            None => {
                return Err(CacheError::IndexOutOfRange {
                    index,
                    len: self.entries.len(),
                })
            }
        };

        match store.delete(id) {
            Ok(outcome) => {
                if outcome == DeleteOutcome::AlreadyAbsent {
                    debug!("event=list_delete module=cache status=stale_row place_id={id}");
                }
                self.remove_at(index).ok_or(CacheError::IndexOutOfRange {
                    index,
                    len: self.entries.len(),
                })
            }
            Err(err) => {
                warn!("event=list_delete module=cache status=kept_row place_id={id}");
                Err(err.into())
            }
        }
    }

    pub fn entries(&self) -> &[PlaceListEntry] {
        &self.entries
    }

    pub fn ids(&self) -> Vec<PlaceId> {
        self.entries.iter().map(|entry| entry.id).collect()
    }

    /// Row index currently showing `id`, if any.
    pub fn position_of(&self, id: PlaceId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
