//! FFI use-case API for the Flutter shell.
//!
//! # Responsibility
//! - Expose place create/list/get/delete to Dart via FRB.
//! - Turn core errors into envelopes with user-presentable messages.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Place ids cross the boundary as canonical UUID strings.
//! - Each call opens its own connection; the shell refreshes its list after
//!   a successful create or delete.

use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;
use travelbook_core::db::open_db;
use travelbook_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Coordinate, DeleteOutcome, DraftBuilder, DraftError, Place, PlaceId, PlaceStore,
    SqlitePlaceRepository, StoreError,
};

const PLACES_DB_FILE_NAME: &str = "travelbook_places.sqlite3";
const PLACES_DB_PATH_ENV: &str = "TRAVELBOOK_DB_PATH";
static PLACES_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - UI-thread safe for current implementation.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - UI-thread safe for current implementation.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Sync call; may create the log directory.
/// - Idempotent for the same `level + log_dir`; other values are rejected.
/// - Never panics; returns an empty string on success and an error message
///   otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Pins the places database file for this process.
///
/// Must run before the first place call.
///
/// # FFI contract
/// - Sync call, non-blocking; does not touch the file system.
/// - Repeating with the same path is accepted; a different path is rejected.
/// - Never panics; returns an empty string on success and an error message
///   otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_places_db_path(path: String) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "places db path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = PLACES_DB_PATH.get_or_init(|| requested.clone());
    if *active != requested {
        return format!(
            "places db path already set to `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        );
    }
    String::new()
}

/// One row for the place list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceListItem {
    pub place_id: String,
    pub title: String,
}

/// Full place payload for the detail screen.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceDetail {
    pub place_id: String,
    pub title: String,
    pub comment: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&Place> for PlaceDetail {
    fn from(place: &Place) -> Self {
        Self {
            place_id: place.id().to_string(),
            title: place.title().to_string(),
            comment: place.comment().to_string(),
            latitude: place.latitude(),
            longitude: place.longitude(),
        }
    }
}

/// Envelope for create/delete calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceActionResponse {
    pub ok: bool,
    pub place_id: Option<String>,
    /// Name of the field the user must fill in, when that is the failure.
    pub missing_field: Option<String>,
    pub message: String,
}

impl PlaceActionResponse {
    fn success(message: impl Into<String>, place_id: PlaceId) -> Self {
        Self {
            ok: true,
            place_id: Some(place_id.to_string()),
            missing_field: None,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            place_id: None,
            missing_field: None,
            message: message.into(),
        }
    }
}

/// Envelope for the list call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceListResponse {
    pub ok: bool,
    pub items: Vec<PlaceListItem>,
    pub message: String,
}

/// Envelope for the detail call. `ok && place.is_none()` means not found.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceDetailResponse {
    pub ok: bool,
    pub place: Option<PlaceDetail>,
    pub message: String,
}

/// Creates a place from the creation screen fields.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - On a blank field, `missing_field` names it and nothing is written.
/// - Returns the created place id on success.
#[flutter_rust_bridge::frb(sync)]
pub fn place_create(
    title: String,
    comment: String,
    latitude: f64,
    longitude: f64,
) -> PlaceActionResponse {
    let mut draft = DraftBuilder::new();
    draft.set_title(title);
    draft.set_comment(comment);
    if let Err(err) = draft.set_coordinate(Coordinate::new(latitude, longitude)) {
        return draft_failure(err);
    }

    let result = with_place_store(|store| draft.commit(store).map_err(|failure| failure.error));
    match result {
        Ok(Ok(place_id)) => PlaceActionResponse::success("Place saved.", place_id),
        Ok(Err(err)) => draft_failure(err),
        Err(message) => PlaceActionResponse::failure(message),
    }
}

/// Lists all places in insertion order.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Returns an empty `items` list with `ok = false` on storage failure.
#[flutter_rust_bridge::frb(sync)]
pub fn place_list() -> PlaceListResponse {
    match with_place_store(|store| store.fetch_all()) {
        Ok(Ok(places)) => {
            let items = places
                .iter()
                .map(|place| PlaceListItem {
                    place_id: place.id().to_string(),
                    title: place.title().to_string(),
                })
                .collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No places yet.".to_string()
            } else {
                format!("{} place(s).", items.len())
            };
            PlaceListResponse {
                ok: true,
                items,
                message,
            }
        }
        Ok(Err(err)) => list_failure(format!("Could not load places: {err}")),
        Err(message) => list_failure(message),
    }
}

/// Fetches one place by id.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - A missing place is `ok = true` with `place = None`; a malformed id or
///   storage failure is `ok = false`.
#[flutter_rust_bridge::frb(sync)]
pub fn place_get(place_id: String) -> PlaceDetailResponse {
    let id = match parse_place_id(&place_id) {
        Ok(id) => id,
        Err(message) => return detail_response(false, None, message),
    };

    match with_place_store(|store| store.fetch_by_id(id)) {
        Ok(Ok(place)) => detail_response(true, Some(PlaceDetail::from(&place)), "Place loaded."),
        Ok(Err(StoreError::NotFound(_))) => detail_response(true, None, "Place no longer exists."),
        Ok(Err(err)) => detail_response(false, None, format!("Could not load place: {err}")),
        Err(message) => detail_response(false, None, message),
    }
}

/// Deletes one place by id.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Deleting an already-missing place succeeds; a malformed id is rejected
///   before storage is opened.
#[flutter_rust_bridge::frb(sync)]
pub fn place_delete(place_id: String) -> PlaceActionResponse {
    let id = match parse_place_id(&place_id) {
        Ok(id) => id,
        Err(message) => return PlaceActionResponse::failure(message),
    };

    match with_place_store(|store| store.delete(id)) {
        Ok(Ok(DeleteOutcome::Deleted)) => PlaceActionResponse::success("Place deleted.", id),
        Ok(Ok(DeleteOutcome::AlreadyAbsent)) => {
            PlaceActionResponse::success("Place was already deleted.", id)
        }
        Ok(Err(err)) => PlaceActionResponse::failure(format!("Could not delete place: {err}")),
        Err(message) => PlaceActionResponse::failure(message),
    }
}

fn draft_failure(err: DraftError) -> PlaceActionResponse {
    match err {
        DraftError::MissingField { field } => PlaceActionResponse {
            ok: false,
            place_id: None,
            missing_field: Some(field.as_str().to_string()),
            message: format!("Please fill in the {field} first."),
        },
        DraftError::InvalidCoordinate(inner) => {
            PlaceActionResponse::failure(format!("Invalid location: {inner}"))
        }
        DraftError::Store(inner) => {
            PlaceActionResponse::failure(format!("Could not save place: {inner}"))
        }
    }
}

fn list_failure(message: String) -> PlaceListResponse {
    PlaceListResponse {
        ok: false,
        items: Vec::new(),
        message,
    }
}

fn detail_response(
    ok: bool,
    place: Option<PlaceDetail>,
    message: impl Into<String>,
) -> PlaceDetailResponse {
    PlaceDetailResponse {
        ok,
        place,
        message: message.into(),
    }
}

fn parse_place_id(raw: &str) -> Result<PlaceId, String> {
    raw.parse::<PlaceId>()
        .map_err(|_| format!("invalid place id `{}`", raw.trim()))
}

fn resolve_places_db_path() -> PathBuf {
    PLACES_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(PLACES_DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(PLACES_DB_FILE_NAME)
        })
        .clone()
}

/// Opens the configured database and runs `f` against a place store.
///
/// The outer error carries connection failures as display messages.
fn with_place_store<T>(
    f: impl FnOnce(&PlaceStore<SqlitePlaceRepository<'_>>) -> T,
) -> Result<T, String> {
    let db_path = resolve_places_db_path();
    let conn = open_db(&db_path).map_err(|err| {
        warn!("event=ffi_db_open module=ffi status=error error={err}");
        format!("Could not open places database: {err}")
    })?;
    let store = PlaceStore::new(SqlitePlaceRepository::new(&conn));
    Ok(f(&store))
}
