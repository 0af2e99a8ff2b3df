//! Staged place under construction.
//!
//! # Responsibility
//! - Collect title, comment and coordinate from a creation screen.
//! - Gate location marking until the place can be labelled.
//! - Hand a fully validated record to the store exactly once.
//!
//! # Invariants
//! - A draft is never partially committed.
//! - A coordinate can only be set once title and comment are non-empty.
//! - A failed commit returns the draft unchanged so the user can retry.

use crate::model::place::{Coordinate, Place, PlaceField, PlaceId, PlaceValidationError};
use crate::repo::place_repo::PlaceRepository;
use crate::service::place_store::{PlaceStore, StoreError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Draft validation and commit errors.
#[derive(Debug)]
pub enum DraftError {
    /// The named field is unset or blank.
    MissingField { field: PlaceField },
    /// The supplied coordinate cannot be stored.
    InvalidCoordinate(PlaceValidationError),
    Store(StoreError),
}

impl Display for DraftError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { field } => write!(f, "missing required field: {field}"),
            Self::InvalidCoordinate(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DraftError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MissingField { .. } => None,
            Self::InvalidCoordinate(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for DraftError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Failed commit: the error plus the untouched draft.
#[derive(Debug)]
pub struct CommitFailure {
    pub error: DraftError,
    pub draft: DraftBuilder,
}

impl CommitFailure {
    pub fn into_draft(self) -> DraftBuilder {
        self.draft
    }
}

impl Display for CommitFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "commit failed: {}", self.error)
    }
}

impl Error for CommitFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}

/// Uncommitted place, owned by the screen creating it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftBuilder {
    title: Option<String>,
    comment: Option<String>,
    coordinate: Option<Coordinate>,
}

impl DraftBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = Some(comment.into());
    }

    /// Marks the place location.
    ///
    /// Rejected with `MissingField` naming title first, then comment, while
    /// either is still blank.
    pub fn set_coordinate(&mut self, coordinate: Coordinate) -> Result<(), DraftError> {
        if let Some(field) = self.first_missing_label() {
            return Err(DraftError::MissingField { field });
        }
        coordinate
            .validate()
            .map_err(DraftError::InvalidCoordinate)?;
        self.coordinate = Some(coordinate);
        Ok(())
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        self.coordinate
    }

    /// Checks that the draft can be committed.
    pub fn validate(&self) -> Result<(), DraftError> {
        if let Some(field) = self.first_missing_label() {
            return Err(DraftError::MissingField { field });
        }
        if self.coordinate.is_none() {
            return Err(DraftError::MissingField {
                field: PlaceField::Coordinate,
            });
        }
        Ok(())
    }

    /// Validates and persists the draft, consuming it on success.
    ///
    /// Title and comment are stored trimmed.
    pub fn commit<R: PlaceRepository>(
        self,
        store: &PlaceStore<R>,
    ) -> Result<PlaceId, CommitFailure> {
        self.commit_place(store).map(|place| place.id())
    }

    /// Like `commit`, but returns the record exactly as it was stored.
    pub fn commit_place<R: PlaceRepository>(
        self,
        store: &PlaceStore<R>,
    ) -> Result<Place, CommitFailure> {
        if let Err(error) = self.validate() {
            return Err(CommitFailure { error, draft: self });
        }

        let Some(coordinate) = self.coordinate else {
            return Err(CommitFailure {
                error: DraftError::MissingField {
                    field: PlaceField::Coordinate,
                },
                draft: self,
            });
        };
        let title = trimmed(self.title.as_deref());
        let comment = trimmed(self.comment.as_deref());

        match store.create(title.clone(), comment.clone(), coordinate) {
            Ok(id) => Ok(Place::with_id(id, title, comment, coordinate)),
            Err(err) => Err(CommitFailure {
                error: err.into(),
                draft: self,
            }),
        }
    }

    fn first_missing_label(&self) -> Option<PlaceField> {
        if is_blank(self.title.as_deref()) {
            return Some(PlaceField::Title);
        }
        if is_blank(self.comment.as_deref()) {
            return Some(PlaceField::Comment);
        }
        None
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |text| text.trim().is_empty())
}

fn trimmed(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}
