use std::collections::HashSet;
use travelbook_core::db::open_db_in_memory;
use travelbook_core::{
    Coordinate, DraftBuilder, DraftError, PlaceField, PlaceId, PlaceStore, SqlitePlaceRepository,
};

fn filled_draft(title: &str, comment: &str, coordinate: Coordinate) -> DraftBuilder {
    let mut draft = DraftBuilder::new();
    draft.set_title(title);
    draft.set_comment(comment);
    draft.set_coordinate(coordinate).unwrap();
    draft
}

#[test]
fn commit_with_missing_field_returns_draft_untouched() {
    let conn = open_db_in_memory().unwrap();
    let store = PlaceStore::new(SqlitePlaceRepository::new(&conn));

    let mut draft = DraftBuilder::new();
    draft.set_title("Eiffel Tower");
    let failure = draft.clone().commit(&store).unwrap_err();
    assert!(matches!(
        failure.error,
        DraftError::MissingField {
            field: PlaceField::Comment
        }
    ));
    assert_eq!(failure.into_draft(), draft);
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn commit_without_coordinate_names_coordinate() {
    let conn = open_db_in_memory().unwrap();
    let store = PlaceStore::new(SqlitePlaceRepository::new(&conn));

    let mut draft = DraftBuilder::new();
    draft.set_title("Pier");
    draft.set_comment("Windy");
    let failure = draft.commit(&store).unwrap_err();
    assert!(matches!(
        failure.error,
        DraftError::MissingField {
            field: PlaceField::Coordinate
        }
    ));
}

#[test]
fn commit_stores_trimmed_text() {
    let conn = open_db_in_memory().unwrap();
    let store = PlaceStore::new(SqlitePlaceRepository::new(&conn));

    let id = filled_draft("  Pier \n", "\tWindy ", Coordinate::new(1.5, -2.5))
        .commit(&store)
        .unwrap();

    let place = store.fetch_by_id(id).unwrap();
    assert_eq!(place.title(), "Pier");
    assert_eq!(place.comment(), "Windy");
    assert_eq!(place.coordinate(), Coordinate::new(1.5, -2.5));
}

#[test]
fn commits_return_fresh_unique_ids() {
    let conn = open_db_in_memory().unwrap();
    let store = PlaceStore::new(SqlitePlaceRepository::new(&conn));

    let ids: HashSet<PlaceId> = (0..5)
        .map(|_| {
            filled_draft("Same", "Same", Coordinate::new(0.0, 0.0))
                .commit(&store)
                .unwrap()
        })
        .collect();
    assert_eq!(ids.len(), 5);
}

#[test]
fn commit_without_title_names_title() {
    let conn = open_db_in_memory().unwrap();
    let store = PlaceStore::new(SqlitePlaceRepository::new(&conn));

    let mut draft = DraftBuilder::new();
    draft.set_comment("Beautiful view");
    let failure = draft.commit(&store).unwrap_err();
    assert!(matches!(
        failure.error,
        DraftError::MissingField {
            field: PlaceField::Title
        }
    ));
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn commit_after_clearing_title_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let store = PlaceStore::new(SqlitePlaceRepository::new(&conn));

    let mut draft = filled_draft(
        "Eiffel Tower",
        "Beautiful view",
        Coordinate::new(48.8584, 2.2945),
    );
    draft.set_title("   ");
    assert!(matches!(
        draft.validate(),
        Err(DraftError::MissingField {
            field: PlaceField::Title
        })
    ));

    let failure = draft.commit(&store).unwrap_err();
    assert!(matches!(
        failure.error,
        DraftError::MissingField {
            field: PlaceField::Title
        }
    ));
    assert_eq!(
        failure.into_draft().coordinate(),
        Some(Coordinate::new(48.8584, 2.2945))
    );
    assert_eq!(store.count().unwrap(), 0);
}
