use std::cell::Cell;
use travelbook_core::db::open_db_in_memory;
use travelbook_core::{
    CacheError, Coordinate, DeleteOutcome, DetailScreen, DetailState, DetailTarget, DraftError,
    ListScreen, Place, PlaceField, PlaceId, PlaceRepository, PlaceStore, RepoError, RepoResult,
    ScreenError, SqlitePlaceRepository, StoreError, SyncBus,
};

/// Repository wrapper whose reads or writes can be made to fail on demand.
struct FlakyRepo<'conn> {
    inner: SqlitePlaceRepository<'conn>,
    fail_writes: Cell<bool>,
    fail_reads: Cell<bool>,
}

impl<'conn> FlakyRepo<'conn> {
    fn new(conn: &'conn rusqlite::Connection) -> Self {
        Self {
            inner: SqlitePlaceRepository::new(conn),
            fail_writes: Cell::new(false),
            fail_reads: Cell::new(false),
        }
    }

    fn check(flag: &Cell<bool>) -> RepoResult<()> {
        if flag.get() {
            return Err(RepoError::InvalidData("injected storage failure".to_string()));
        }
        Ok(())
    }
}

impl PlaceRepository for FlakyRepo<'_> {
    fn create_place(&self, place: &Place) -> RepoResult<PlaceId> {
        Self::check(&self.fail_writes)?;
        self.inner.create_place(place)
    }

    fn list_places(&self) -> RepoResult<Vec<Place>> {
        Self::check(&self.fail_reads)?;
        self.inner.list_places()
    }

    fn get_place(&self, id: PlaceId) -> RepoResult<Option<Place>> {
        Self::check(&self.fail_reads)?;
        self.inner.get_place(id)
    }

    fn delete_place(&self, id: PlaceId) -> RepoResult<DeleteOutcome> {
        Self::check(&self.fail_writes)?;
        self.inner.delete_place(id)
    }

    fn count_places(&self) -> RepoResult<u64> {
        Self::check(&self.fail_reads)?;
        self.inner.count_places()
    }
}

fn fill_draft<R: PlaceRepository>(
    detail: &mut DetailScreen<'_, R>,
    title: &str,
    comment: &str,
    coordinate: Coordinate,
) {
    detail.set_title(title).unwrap();
    detail.set_comment(comment).unwrap();
    detail.mark_location(coordinate).unwrap();
}

#[test]
fn saving_on_detail_screen_refreshes_active_list() {
    let conn = open_db_in_memory().unwrap();
    let store = PlaceStore::new(SqlitePlaceRepository::new(&conn));
    let bus = SyncBus::new();
    let mut list = ListScreen::new(&store, &bus);
    list.activate().unwrap();
    assert_eq!(list.row_count(), 0);

    let mut detail = DetailScreen::open(&store, list.add()).unwrap();
    fill_draft(
        &mut detail,
        "Eiffel Tower",
        "Beautiful view",
        Coordinate::new(48.8584, 2.2945),
    );
    let id = detail.save(&bus).unwrap();

    let rows = list.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, id);
    assert_eq!(rows[0].title, "Eiffel Tower");
    assert!(matches!(detail.state(), DetailState::Viewing(place) if place.id() == id));
}

#[test]
fn inactive_list_is_not_refreshed_until_reactivated() {
    let conn = open_db_in_memory().unwrap();
    let store = PlaceStore::new(SqlitePlaceRepository::new(&conn));
    let bus = SyncBus::new();
    let mut list = ListScreen::new(&store, &bus);
    list.activate().unwrap();
    assert!(list.deactivate());
    assert_eq!(bus.subscriber_count(), 0);

    let mut detail = DetailScreen::open(&store, DetailTarget::New).unwrap();
    fill_draft(&mut detail, "Pier", "Windy", Coordinate::new(10.0, 20.0));
    detail.save(&bus).unwrap();
    assert_eq!(list.row_count(), 0);

    list.activate().unwrap();
    assert_eq!(list.row_count(), 1);
}

#[test]
fn dropping_list_screen_unsubscribes() {
    let conn = open_db_in_memory().unwrap();
    let store = PlaceStore::new(SqlitePlaceRepository::new(&conn));
    let bus = SyncBus::new();
    {
        let mut list = ListScreen::new(&store, &bus);
        list.activate().unwrap();
        assert_eq!(bus.subscriber_count(), 1);
    }
    assert_eq!(bus.subscriber_count(), 0);
}

#[test]
fn selected_row_opens_place_with_annotation() {
    let conn = open_db_in_memory().unwrap();
    let store = PlaceStore::new(SqlitePlaceRepository::new(&conn));
    let id = store
        .create("Galata Tower", "Sunset", Coordinate::new(41.0256, 28.9744))
        .unwrap();
    let bus = SyncBus::new();
    let mut list = ListScreen::new(&store, &bus);
    list.activate().unwrap();

    let target = list.select(0).unwrap();
    assert_eq!(target, DetailTarget::Existing(id));
    assert!(list.select(1).is_none());

    let mut detail = DetailScreen::open(&store, target).unwrap();
    let annotation = detail.annotation().unwrap();
    assert_eq!(annotation.title, "Galata Tower");
    assert_eq!(annotation.subtitle, "Sunset");
    assert_eq!(annotation.coordinate, Coordinate::new(41.0256, 28.9744));

    assert!(matches!(
        detail.set_title("renamed"),
        Err(ScreenError::NotDrafting)
    ));
    assert!(matches!(detail.save(&bus), Err(ScreenError::NotDrafting)));
}

#[test]
fn confirmed_delete_removes_row_and_record() {
    let conn = open_db_in_memory().unwrap();
    let store = PlaceStore::new(SqlitePlaceRepository::new(&conn));
    let keep = store.create("Keep", "a", Coordinate::new(1.0, 1.0)).unwrap();
    let gone = store.create("Gone", "b", Coordinate::new(2.0, 2.0)).unwrap();
    let bus = SyncBus::new();
    let mut list = ListScreen::new(&store, &bus);
    list.activate().unwrap();

    let removed = list.delete_row(1).unwrap();
    assert_eq!(removed.id, gone);

    let ids: Vec<PlaceId> = list.rows().iter().map(|row| row.id).collect();
    assert_eq!(ids, vec![keep]);
    let stored: Vec<PlaceId> = store.fetch_all().unwrap().iter().map(Place::id).collect();
    assert_eq!(stored, ids);

    let detail = DetailScreen::open(&store, DetailTarget::Existing(gone)).unwrap();
    assert!(matches!(detail.state(), DetailState::Missing(id) if *id == gone));
    assert!(detail.annotation().is_none());
}

#[test]
fn stale_row_delete_still_drops_row() {
    let conn = open_db_in_memory().unwrap();
    let store = PlaceStore::new(SqlitePlaceRepository::new(&conn));
    let id = store.create("Stale", "row", Coordinate::new(1.0, 1.0)).unwrap();
    let bus = SyncBus::new();
    let mut list = ListScreen::new(&store, &bus);
    list.activate().unwrap();

    store.delete(id).unwrap();
    let removed = list.delete_row(0).unwrap();
    assert_eq!(removed.id, id);
    assert_eq!(list.row_count(), 0);
}

#[test]
fn failed_delete_keeps_row_and_record() {
    let conn = open_db_in_memory().unwrap();
    let repo = FlakyRepo::new(&conn);
    let store = PlaceStore::new(&repo);
    let id = store.create("Sticky", "row", Coordinate::new(1.0, 1.0)).unwrap();
    let bus = SyncBus::new();
    let mut list = ListScreen::new(&store, &bus);
    list.activate().unwrap();

    repo.fail_writes.set(true);
    let err = list.delete_row(0).unwrap_err();
    assert!(matches!(err, CacheError::Store(StoreError::Persistence(_))));
    assert_eq!(list.rows().len(), 1);
    assert_eq!(list.rows()[0].id, id);

    repo.fail_writes.set(false);
    assert!(store.fetch_by_id(id).is_ok());
}

#[test]
fn failed_save_keeps_draft_and_publishes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let repo = FlakyRepo::new(&conn);
    let store = PlaceStore::new(&repo);
    let bus = SyncBus::new();
    let mut list = ListScreen::new(&store, &bus);
    list.activate().unwrap();

    let mut detail = DetailScreen::open(&store, DetailTarget::New).unwrap();
    fill_draft(&mut detail, "Harbour", "Boats", Coordinate::new(5.0, 5.0));

    repo.fail_writes.set(true);
    let err = detail.save(&bus).unwrap_err();
    assert!(matches!(
        err,
        ScreenError::Draft(DraftError::Store(StoreError::Persistence(_)))
    ));
    assert!(detail.is_drafting());
    assert!(detail.annotation().is_some());
    assert_eq!(list.row_count(), 0);

    repo.fail_writes.set(false);
    let id = detail.save(&bus).unwrap();
    assert_eq!(list.rows()[0].id, id);
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn failed_refresh_keeps_previous_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = FlakyRepo::new(&conn);
    let store = PlaceStore::new(&repo);
    store.create("First", "one", Coordinate::new(1.0, 1.0)).unwrap();
    let bus = SyncBus::new();
    let mut list = ListScreen::new(&store, &bus);
    list.activate().unwrap();
    assert!(!list.load_failed());

    repo.fail_reads.set(true);
    assert!(list.refresh().is_err());
    assert!(list.load_failed());
    assert_eq!(list.row_count(), 1);

    repo.fail_reads.set(false);
    list.refresh().unwrap();
    assert!(!list.load_failed());
}

#[test]
fn marking_location_without_comment_names_comment() {
    let conn = open_db_in_memory().unwrap();
    let store = PlaceStore::new(SqlitePlaceRepository::new(&conn));
    let mut detail = DetailScreen::open(&store, DetailTarget::New).unwrap();

    detail.set_title("Eiffel Tower").unwrap();
    let err = detail
        .mark_location(Coordinate::new(48.8584, 2.2945))
        .unwrap_err();
    assert!(matches!(
        err,
        ScreenError::Draft(DraftError::MissingField {
            field: PlaceField::Comment
        })
    ));
    assert!(detail.annotation().is_none());
}

#[test]
fn save_shows_stored_place_even_when_reads_fail() {
    let conn = open_db_in_memory().unwrap();
    let repo = FlakyRepo::new(&conn);
    let store = PlaceStore::new(&repo);
    let bus = SyncBus::new();

    let mut detail = DetailScreen::open(&store, DetailTarget::New).unwrap();
    fill_draft(&mut detail, " Pier ", "Windy", Coordinate::new(10.0, 20.0));
    repo.fail_reads.set(true);
    let id = detail.save(&bus).unwrap();

    match detail.state() {
        DetailState::Viewing(place) => {
            assert_eq!(place.id(), id);
            assert_eq!(place.title(), "Pier");
            assert_eq!(place.coordinate(), Coordinate::new(10.0, 20.0));
        }
        other => panic!("expected viewing state, got {other:?}"),
    }
    let annotation = detail.annotation().expect("saved place should have a pin");
    assert_eq!(annotation.title, "Pier");
    assert_eq!(annotation.subtitle, "Windy");

    repo.fail_reads.set(false);
    assert_eq!(store.fetch_by_id(id).unwrap().title(), "Pier");
}
