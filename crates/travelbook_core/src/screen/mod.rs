//! Screen coordinators for the list and detail views.
//!
//! # Responsibility
//! - Drive store, cache, draft and bus on behalf of UI shells.
//! - Keep each screen's state explicit so create and view paths never share
//!   mutable state by accident.
//!
//! # Invariants
//! - A list screen receives invalidation events only while active.
//! - A detail screen publishes `PlaceCreated` only after the store confirmed
//!   persistence.
//!
//! Rendering, gestures and navigation stay with the UI shell.

use crate::draft::DraftError;
use crate::model::place::PlaceId;
use crate::service::place_store::StoreError;
use crate::sync::bus::SyncError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod detail_screen;
pub mod list_screen;

/// What a detail screen should show when it opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailTarget {
    /// Creation mode with an empty draft.
    New,
    /// View an existing place by identity.
    Existing(PlaceId),
}

/// Screen-level errors.
#[derive(Debug)]
pub enum ScreenError {
    /// A draft operation was attempted on a screen that is not creating.
    NotDrafting,
    Draft(DraftError),
    Store(StoreError),
    /// The place was saved but listeners could not be notified.
    NotifyFailed { id: PlaceId, error: SyncError },
}

impl Display for ScreenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotDrafting => write!(f, "screen is not in creation mode"),
            Self::Draft(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::NotifyFailed { id, error } => {
                write!(f, "place {id} saved but change notification failed: {error}")
            }
        }
    }
}

impl Error for ScreenError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotDrafting => None,
            Self::Draft(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::NotifyFailed { error, .. } => Some(error),
        }
    }
}

impl From<DraftError> for ScreenError {
    fn from(value: DraftError) -> Self {
        Self::Draft(value)
    }
}

impl From<StoreError> for ScreenError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}
