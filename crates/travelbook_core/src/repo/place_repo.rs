//! Place repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/list/get/delete over the canonical `places` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Place::validate()` before SQL mutations.
//! - Lookups are primary-key queries on `uuid`, never fetch-then-filter.
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::db::DbError;
use crate::model::place::{Coordinate, Place, PlaceId, PlaceValidationError};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PLACE_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    comment,
    latitude,
    longitude
FROM places";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for place persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(PlaceValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted place data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<PlaceValidationError> for RepoError {
    fn from(value: PlaceValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Result of a delete request.
///
/// Deleting an id that is not stored is not an error: the effect the caller
/// asked for already holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    AlreadyAbsent,
}

/// Repository interface for place persistence.
pub trait PlaceRepository {
    fn create_place(&self, place: &Place) -> RepoResult<PlaceId>;
    /// Lists every place in insertion order.
    fn list_places(&self) -> RepoResult<Vec<Place>>;
    fn get_place(&self, id: PlaceId) -> RepoResult<Option<Place>>;
    fn delete_place(&self, id: PlaceId) -> RepoResult<DeleteOutcome>;
    fn count_places(&self) -> RepoResult<u64>;
}

impl<R: PlaceRepository + ?Sized> PlaceRepository for &R {
    fn create_place(&self, place: &Place) -> RepoResult<PlaceId> {
        (**self).create_place(place)
    }

    fn list_places(&self) -> RepoResult<Vec<Place>> {
        (**self).list_places()
    }

    fn get_place(&self, id: PlaceId) -> RepoResult<Option<Place>> {
        (**self).get_place(id)
    }

    fn delete_place(&self, id: PlaceId) -> RepoResult<DeleteOutcome> {
        (**self).delete_place(id)
    }

    fn count_places(&self) -> RepoResult<u64> {
        (**self).count_places()
    }
}

/// SQLite-backed place repository.
pub struct SqlitePlaceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePlaceRepository<'conn> {
    /// Wraps a connection opened through `db::open_db*`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PlaceRepository for SqlitePlaceRepository<'_> {
    fn create_place(&self, place: &Place) -> RepoResult<PlaceId> {
        place.validate()?;

        self.conn.execute(
            "INSERT INTO places (
                uuid,
                title,
                comment,
                latitude,
                longitude
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                place.id().to_string(),
                place.title(),
                place.comment(),
                place.latitude(),
                place.longitude(),
            ],
        )?;

        Ok(place.id())
    }

    fn list_places(&self) -> RepoResult<Vec<Place>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PLACE_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut places = Vec::new();

        while let Some(row) = rows.next()? {
            places.push(parse_place_row(row)?);
        }

        Ok(places)
    }

    fn get_place(&self, id: PlaceId) -> RepoResult<Option<Place>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PLACE_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_place_row(row)?));
        }

        Ok(None)
    }

    fn delete_place(&self, id: PlaceId) -> RepoResult<DeleteOutcome> {
        let changed = self
            .conn
            .execute("DELETE FROM places WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Ok(DeleteOutcome::AlreadyAbsent);
        }

        Ok(DeleteOutcome::Deleted)
    }

    fn count_places(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM places;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative place count `{count}`")))
    }
}

fn parse_place_row(row: &Row<'_>) -> RepoResult<Place> {
    let uuid_text: String = row.get("uuid")?;
    let id: PlaceId = uuid_text.parse().map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in places.uuid"))
    })?;

    let place = Place::with_id(
        id,
        row.get::<_, String>("title")?,
        row.get::<_, String>("comment")?,
        Coordinate::new(row.get("latitude")?, row.get("longitude")?),
    );
    place.validate().map_err(|err| {
        RepoError::InvalidData(format!("place {id} violates record invariants: {err}"))
    })?;
    Ok(place)
}
