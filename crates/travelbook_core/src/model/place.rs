//! Place domain model.
//!
//! # Responsibility
//! - Define the canonical place record shared by list and detail screens.
//! - Own field-level validation used by every write path.
//!
//! # Invariants
//! - `PlaceId` is generated once, never reused and never derived from title.
//! - A persisted place always has non-empty `title`/`comment` and a valid
//!   coordinate.
//! - Equality and hashing are defined by `id` only.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use uuid::Uuid;

/// Opaque stable identity of one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceId(Uuid);

impl PlaceId {
    /// Generates a fresh random identity.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for PlaceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PlaceId {
    type Err = uuid::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim()).map(Self)
    }
}

/// User-fillable place fields, used to name what is missing or invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceField {
    Title,
    Comment,
    Coordinate,
}

impl PlaceField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Comment => "comment",
            Self::Coordinate => "coordinate",
        }
    }
}

impl Display for PlaceField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// WGS84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Checks that both components are finite and inside WGS84 bounds.
    pub fn validate(&self) -> Result<(), PlaceValidationError> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(PlaceValidationError::NonFiniteCoordinate);
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(PlaceValidationError::LatitudeOutOfRange(self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(PlaceValidationError::LongitudeOutOfRange(self.longitude));
        }
        Ok(())
    }
}

/// Field-level validation failures for place records.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaceValidationError {
    EmptyTitle,
    EmptyComment,
    NonFiniteCoordinate,
    LatitudeOutOfRange(f64),
    LongitudeOutOfRange(f64),
}

impl PlaceValidationError {
    /// Field the user has to correct.
    pub fn field(&self) -> PlaceField {
        match self {
            Self::EmptyTitle => PlaceField::Title,
            Self::EmptyComment => PlaceField::Comment,
            Self::NonFiniteCoordinate
            | Self::LatitudeOutOfRange(_)
            | Self::LongitudeOutOfRange(_) => PlaceField::Coordinate,
        }
    }
}

impl Display for PlaceValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::EmptyComment => write!(f, "comment must not be empty"),
            Self::NonFiniteCoordinate => write!(f, "coordinate must be finite"),
            Self::LatitudeOutOfRange(value) => {
                write!(f, "latitude {value} is outside [-90, 90]")
            }
            Self::LongitudeOutOfRange(value) => {
                write!(f, "longitude {value} is outside [-180, 180]")
            }
        }
    }
}

impl Error for PlaceValidationError {}

/// Canonical persisted place record.
///
/// Immutable after construction: there is no edit path, only create and
/// delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    id: PlaceId,
    title: String,
    comment: String,
    coordinate: Coordinate,
}

impl Place {
    /// Creates a new place with a freshly generated identity.
    pub fn new(
        title: impl Into<String>,
        comment: impl Into<String>,
        coordinate: Coordinate,
    ) -> Self {
        Self::with_id(PlaceId::new(), title, comment, coordinate)
    }

    /// Rebuilds a place whose identity already exists (storage read path).
    ///
    /// Does not validate; callers run `validate()` when the source is untrusted.
    pub fn with_id(
        id: PlaceId,
        title: impl Into<String>,
        comment: impl Into<String>,
        coordinate: Coordinate,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            comment: comment.into(),
            coordinate,
        }
    }

    pub fn id(&self) -> PlaceId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn latitude(&self) -> f64 {
        self.coordinate.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.coordinate.longitude
    }

    /// Validates persisted-record invariants.
    ///
    /// Checks run in field order: title, comment, coordinate.
    pub fn validate(&self) -> Result<(), PlaceValidationError> {
        if self.title.trim().is_empty() {
            return Err(PlaceValidationError::EmptyTitle);
        }
        if self.comment.trim().is_empty() {
            return Err(PlaceValidationError::EmptyComment);
        }
        self.coordinate.validate()
    }
}

impl PartialEq for Place {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Place {}

impl Hash for Place {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::{Coordinate, Place, PlaceField, PlaceId, PlaceValidationError};

    #[test]
    fn equality_is_identity_only() {
        let id = PlaceId::new();
        let a = Place::with_id(id, "a", "x", Coordinate::new(1.0, 2.0));
        let b = Place::with_id(id, "b", "y", Coordinate::new(3.0, 4.0));
        assert_eq!(a, b);
        assert_ne!(a, Place::new("a", "x", Coordinate::new(1.0, 2.0)));
    }

    #[test]
    fn place_id_parses_its_display_form() {
        let id = PlaceId::new();
        let parsed: PlaceId = id.to_string().parse().expect("display form should parse");
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<PlaceId>().is_err());
    }

    #[test]
    fn validate_reports_first_invalid_field() {
        let place = Place::new("  ", "", Coordinate::new(f64::NAN, 0.0));
        assert_eq!(place.validate(), Err(PlaceValidationError::EmptyTitle));

        let place = Place::new("Tower", " \n", Coordinate::new(0.0, 0.0));
        assert_eq!(place.validate(), Err(PlaceValidationError::EmptyComment));
    }

    #[test]
    fn serializes_id_as_plain_uuid_string() {
        let place = Place::new("Pier", "Windy", Coordinate::new(1.0, 2.0));
        let json = serde_json::to_value(&place).expect("place should serialize");
        assert_eq!(json["id"], place.id().to_string());
        assert_eq!(json["coordinate"]["latitude"], 1.0);

        let back: Place = serde_json::from_value(json).expect("place should deserialize");
        assert_eq!(back.id(), place.id());
        assert_eq!(back.title(), "Pier");
    }

    #[test]
    fn coordinate_rejects_non_finite_and_out_of_range_values() {
        assert_eq!(
            Coordinate::new(f64::INFINITY, 0.0).validate(),
            Err(PlaceValidationError::NonFiniteCoordinate)
        );
        let err = Coordinate::new(91.0, 0.0).validate().unwrap_err();
        assert_eq!(err.field(), PlaceField::Coordinate);
        assert!(Coordinate::new(0.0, -180.5).validate().is_err());
        assert!(Coordinate::new(-90.0, 180.0).validate().is_ok());
    }
}
