//! Place list screen coordinator.
//!
//! # Responsibility
//! - Load the list projection on activation and keep it fresh while active.
//! - Turn row selection into a detail target.
//! - Run the confirmation-gated delete path.
//!
//! # Invariants
//! - Subscribed to the bus exactly while active; dropping the screen
//!   unsubscribes.
//! - Rows disappear only after the store confirmed deletion.

use super::DetailTarget;
use crate::cache::{CacheError, PlaceListCache, PlaceListEntry};
use crate::repo::place_repo::PlaceRepository;
use crate::service::place_store::{PlaceStore, StoreError};
use crate::sync::bus::{SubscriptionId, SyncBus, SyncEvent};
use log::{debug, warn};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// List screen state shared with its bus handler.
pub struct ListScreen<'b, 's, R: PlaceRepository> {
    store: &'s PlaceStore<R>,
    bus: &'b SyncBus<'s>,
    cache: Rc<RefCell<PlaceListCache>>,
    load_failed: Rc<Cell<bool>>,
    subscription: Option<SubscriptionId>,
}

impl<'b, 's, R: PlaceRepository + 's> ListScreen<'b, 's, R> {
    pub fn new(store: &'s PlaceStore<R>, bus: &'b SyncBus<'s>) -> Self {
        Self {
            store,
            bus,
            cache: Rc::new(RefCell::new(PlaceListCache::new())),
            load_failed: Rc::new(Cell::new(false)),
            subscription: None,
        }
    }

    /// Subscribes to invalidation events and loads the list.
    ///
    /// The screen stays active even when the initial load fails; the next
    /// invalidation retries.
    pub fn activate(&mut self) -> Result<(), StoreError> {
        if self.subscription.is_none() {
            let store = self.store;
            let cache = Rc::clone(&self.cache);
            let load_failed = Rc::clone(&self.load_failed);
            let id = self.bus.subscribe(move |event| match event {
                SyncEvent::PlaceCreated(place_id) => {
                    debug!("event=list_invalidate module=screen place_id={place_id}");
                    refresh_shared(store, &cache, &load_failed);
                }
            });
            self.subscription = Some(id);
        }
        self.refresh()
    }

    /// Stops receiving invalidation events. Returns whether it was active.
    pub fn deactivate(&mut self) -> bool {
        match self.subscription.take() {
            Some(id) => self.bus.unsubscribe(id),
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    /// Reloads the projection from the store.
    pub fn refresh(&self) -> Result<(), StoreError> {
        let result = self.cache.borrow_mut().refresh(self.store);
        self.load_failed.set(result.is_err());
        result
    }

    /// Whether the last load failed, so rows may be outdated.
    pub fn load_failed(&self) -> bool {
        self.load_failed.get()
    }

    /// Resolves a tapped row into the place to open.
    pub fn select(&self, index: usize) -> Option<DetailTarget> {
        self.cache
            .borrow()
            .entry_at(index)
            .map(|entry| DetailTarget::Existing(entry.id))
    }

    /// Target for the "add place" action.
    pub fn add(&self) -> DetailTarget {
        DetailTarget::New
    }

    /// Deletes the row's place, then drops the row.
    pub fn delete_row(&self, index: usize) -> Result<PlaceListEntry, CacheError> {
        self.cache.borrow_mut().delete_at(index, self.store)
    }

    pub fn rows(&self) -> Vec<PlaceListEntry> {
        self.cache.borrow().entries().to_vec()
    }

    pub fn row_count(&self) -> usize {
        self.cache.borrow().len()
    }
}

impl<R: PlaceRepository> Drop for ListScreen<'_, '_, R> {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.bus.unsubscribe(id);
        }
    }
}

fn refresh_shared<R: PlaceRepository>(
    store: &PlaceStore<R>,
    cache: &RefCell<PlaceListCache>,
    load_failed: &Cell<bool>,
) {
    let Ok(mut cache) = cache.try_borrow_mut() else {
        warn!("event=list_refresh module=screen status=skipped reason=cache_busy");
        load_failed.set(true);
        return;
    };
    match cache.refresh(store) {
        Ok(()) => load_failed.set(false),
        Err(err) => {
            warn!("event=list_refresh module=screen status=error error={err}");
            load_failed.set(true);
        }
    }
}
