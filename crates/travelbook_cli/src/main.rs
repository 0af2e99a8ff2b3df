//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `travelbook_core` linkage without the Flutter/FFI runtime.
//! - Run one in-memory create/list/delete cycle and print the counts.

use std::process::ExitCode;
use travelbook_core::db::open_db_in_memory;
use travelbook_core::{Coordinate, PlaceStore, SqlitePlaceRepository};

fn main() -> ExitCode {
    println!("travelbook_core ping={}", travelbook_core::ping());
    println!("travelbook_core version={}", travelbook_core::core_version());

    match store_probe() {
        Ok((after_create, after_delete)) => {
            println!("store_probe created={after_create} remaining={after_delete}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("store_probe failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn store_probe() -> Result<(usize, usize), Box<dyn std::error::Error>> {
    let conn = open_db_in_memory()?;
    let store = PlaceStore::new(SqlitePlaceRepository::new(&conn));
    let id = store.create("probe", "smoke check", Coordinate::new(0.0, 0.0))?;
    let after_create = store.fetch_all()?.len();
    store.delete(id)?;
    let after_delete = store.fetch_all()?.len();
    Ok((after_create, after_delete))
}
