//! In-process publish/subscribe channel for place invalidation events.
//!
//! # Responsibility
//! - Register and remove handlers with explicit subscription ids.
//! - Deliver each published event synchronously to every live handler.
//!
//! # Invariants
//! - No replay: a handler only sees events published after it subscribed.
//! - A handler removed mid-dispatch is not invoked for the rest of it.
//! - Publishing from inside a handler is refused.
//!
//! Single-threaded by construction (`Rc`/`RefCell`); the bus is `!Send`.

use crate::model::place::PlaceId;
use log::{debug, warn};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;

/// Invalidation events carried by the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncEvent {
    /// A place was persisted; projections should refresh.
    PlaceCreated(PlaceId),
}

impl SyncEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlaceCreated(_) => "place_created",
        }
    }
}

/// Handle returned by `subscribe`, needed to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl Display for SubscriptionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Bus errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncError {
    /// `publish` was called while another publish was dispatching.
    NestedPublish(SyncEvent),
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NestedPublish(event) => {
                write!(f, "refusing nested publish of `{}`", event.as_str())
            }
        }
    }
}

impl Error for SyncError {}

type Handler<'h> = Rc<dyn Fn(&SyncEvent) + 'h>;

struct BusState<'h> {
    next_id: u64,
    handlers: BTreeMap<SubscriptionId, Handler<'h>>,
    dispatching: bool,
}

/// Publish/subscribe channel for place invalidation.
///
/// `'h` bounds what handlers may borrow (typically the store they re-query).
pub struct SyncBus<'h> {
    state: RefCell<BusState<'h>>,
}

impl<'h> SyncBus<'h> {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(BusState {
                next_id: 1,
                handlers: BTreeMap::new(),
                dispatching: false,
            }),
        }
    }

    /// Registers `handler` for every future publish until unsubscribed.
    pub fn subscribe(&self, handler: impl Fn(&SyncEvent) + 'h) -> SubscriptionId {
        let mut state = self.state.borrow_mut();
        let id = SubscriptionId(state.next_id);
        state.next_id += 1;
        state.handlers.insert(id, Rc::new(handler));
        debug!("event=bus_subscribe module=sync status=ok subscription={id}");
        id
    }

    /// Removes a subscription. Returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.state.borrow_mut().handlers.remove(&id).is_some();
        debug!("event=bus_unsubscribe module=sync status=ok subscription={id} removed={removed}");
        removed
    }

    /// Delivers `event` to every live handler before returning.
    ///
    /// Returns how many handlers were invoked.
    pub fn publish(&self, event: SyncEvent) -> Result<usize, SyncError> {
        let snapshot: Vec<(SubscriptionId, Handler<'h>)> = {
            let mut state = self.state.borrow_mut();
            if state.dispatching {
                warn!(
                    "event=bus_publish module=sync status=rejected kind={} reason=nested",
                    event.as_str()
                );
                return Err(SyncError::NestedPublish(event));
            }
            state.dispatching = true;
            state
                .handlers
                .iter()
                .map(|(id, handler)| (*id, Rc::clone(handler)))
                .collect()
        };
        let _reset = DispatchReset(&self.state);

        let mut delivered = 0;
        for (id, handler) in snapshot {
            if !self.is_subscribed(id) {
                continue;
            }
            handler(&event);
            delivered += 1;
        }

        debug!(
            "event=bus_publish module=sync status=ok kind={} delivered={delivered}",
            event.as_str()
        );
        Ok(delivered)
    }

    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.state.borrow().handlers.contains_key(&id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.borrow().handlers.len()
    }
}

impl Default for SyncBus<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for SyncBus<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("SyncBus")
            .field("subscribers", &state.handlers.len())
            .field("dispatching", &state.dispatching)
            .finish()
    }
}

/// Clears the dispatching flag even if a handler panics.
struct DispatchReset<'a, 'h>(&'a RefCell<BusState<'h>>);

impl Drop for DispatchReset<'_, '_> {
    fn drop(&mut self) {
        self.0.borrow_mut().dispatching = false;
    }
}
