//! Detail / creation screen coordinator.
//!
//! # Responsibility
//! - Hydrate an existing place by identity, or stage a new one in a draft.
//! - Save drafts and announce the new place on the bus.
//! - Provide annotation data for the map collaborator.
//!
//! # Invariants
//! - Draft operations are only valid in `DetailState::Drafting`.
//! - `save` publishes at most once, after the store confirmed the write.
//! - A failed save keeps the draft for retry.

use super::{DetailTarget, ScreenError};
use crate::draft::DraftBuilder;
use crate::model::place::{Coordinate, Place, PlaceId};
use crate::repo::place_repo::PlaceRepository;
use crate::service::place_store::{PlaceStore, StoreError};
use crate::sync::bus::{SyncBus, SyncEvent};
use log::info;

/// Pin data handed to the map renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct MapAnnotation {
    pub title: String,
    pub subtitle: String,
    pub coordinate: Coordinate,
}

/// Everything a detail screen can be showing.
#[derive(Debug, Clone)]
pub enum DetailState {
    /// Creating a new place.
    Drafting(DraftBuilder),
    /// Showing a stored place.
    Viewing(Place),
    /// The requested place no longer exists.
    Missing(PlaceId),
}

pub struct DetailScreen<'s, R: PlaceRepository> {
    store: &'s PlaceStore<R>,
    state: DetailState,
}

impl<'s, R: PlaceRepository> DetailScreen<'s, R> {
    /// Opens the screen for `target`.
    ///
    /// A stale id yields `DetailState::Missing`; only storage failures are
    /// returned as errors.
    pub fn open(store: &'s PlaceStore<R>, target: DetailTarget) -> Result<Self, StoreError> {
        let state = match target {
            DetailTarget::New => DetailState::Drafting(DraftBuilder::new()),
            DetailTarget::Existing(id) => match store.fetch_by_id(id) {
                Ok(place) => DetailState::Viewing(place),
                Err(StoreError::NotFound(id)) => DetailState::Missing(id),
                Err(err) => return Err(err),
            },
        };
        Ok(Self { store, state })
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn is_drafting(&self) -> bool {
        matches!(self.state, DetailState::Drafting(_))
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), ScreenError> {
        self.draft_mut()?.set_title(title);
        Ok(())
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) -> Result<(), ScreenError> {
        self.draft_mut()?.set_comment(comment);
        Ok(())
    }

    /// Marks the place location chosen on the map.
    pub fn mark_location(&mut self, coordinate: Coordinate) -> Result<(), ScreenError> {
        self.draft_mut()?.set_coordinate(coordinate)?;
        Ok(())
    }

    /// Commits the draft, switches to viewing the stored record and notifies
    /// listeners. The viewed record is the one just written; no second read.
    ///
    /// `NotifyFailed` still means the place was stored; do not retry the save.
    pub fn save(&mut self, bus: &SyncBus<'_>) -> Result<PlaceId, ScreenError> {
        let draft = match &mut self.state {
            DetailState::Drafting(draft) => std::mem::take(draft),
            _ => return Err(ScreenError::NotDrafting),
        };

        let place = match draft.commit_place(self.store) {
            Ok(place) => place,
            Err(failure) => {
                self.state = DetailState::Drafting(failure.draft);
                return Err(ScreenError::Draft(failure.error));
            }
        };
        let id = place.id();
        self.state = DetailState::Viewing(place);

        match bus.publish(SyncEvent::PlaceCreated(id)) {
            Ok(delivered) => {
                info!("event=detail_save module=screen status=ok place_id={id} delivered={delivered}");
                Ok(id)
            }
            Err(error) => Err(ScreenError::NotifyFailed { id, error }),
        }
    }

    /// Pin for the map, once there is a location to show.
    pub fn annotation(&self) -> Option<MapAnnotation> {
        match &self.state {
            DetailState::Viewing(place) => Some(MapAnnotation {
                title: place.title().to_string(),
                subtitle: place.comment().to_string(),
                coordinate: place.coordinate(),
            }),
            DetailState::Drafting(draft) => Some(MapAnnotation {
                title: draft.title()?.trim().to_string(),
                subtitle: draft.comment()?.trim().to_string(),
                coordinate: draft.coordinate()?,
            }),
            DetailState::Missing(_) => None,
        }
    }

    fn draft_mut(&mut self) -> Result<&mut DraftBuilder, ScreenError> {
        match &mut self.state {
            DetailState::Drafting(draft) => Ok(draft),
            _ => Err(ScreenError::NotDrafting),
        }
    }
}
