//! Snapshot feed: how the navigation store hands state to a view.
//!
//! The store owns the feed and is its only writer. A view either polls
//! [`NavigationStore::version`](crate::NavigationStore::version) and redraws
//! when it moves, or registers a listener with
//! [`NavigationStore::subscribe`](crate::NavigationStore::subscribe).
//!
//! Publishing a snapshot equal to the current one changes nothing: no
//! version bump and no listener call. Listeners run in registration order
//! and are removed as soon as their [`Subscription`] is dropped.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace_span;

use crate::store::Snapshot;

type Listener = Rc<dyn Fn(&Snapshot)>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

pub(crate) struct SnapshotFeed {
    current: Snapshot,
    version: u64,
    listeners: Rc<RefCell<Listeners>>,
}

impl fmt::Debug for SnapshotFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotFeed")
            .field("version", &self.version)
            .field("phase", &self.current.phase)
            .field("listeners", &self.listeners.borrow().entries.len())
            .finish()
    }
}

impl SnapshotFeed {
    pub(crate) fn new() -> Self {
        Self {
            current: Snapshot::default(),
            version: 0,
            listeners: Rc::default(),
        }
    }

    pub(crate) fn current(&self) -> &Snapshot {
        &self.current
    }

    pub(crate) fn version(&self) -> u64 {
        self.version
    }

    /// Replace the current snapshot. Returns `false` if `next` is identical.
    pub(crate) fn publish(&mut self, next: Snapshot) -> bool {
        if next == self.current {
            return false;
        }
        self.current = next;
        self.version += 1;

        // Listeners may subscribe or unsubscribe while running.
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .entries
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        if !listeners.is_empty() {
            let _span = trace_span!(
                "snapshot.publish",
                version = self.version,
                listeners = listeners.len()
            )
            .entered();
            for listener in &listeners {
                listener(&self.current);
            }
        }
        true
    }

    pub(crate) fn subscribe(&self, listener: impl Fn(&Snapshot) + 'static) -> Subscription {
        let mut listeners = self.listeners.borrow_mut();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, Rc::new(listener)));
        Subscription {
            id,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    #[cfg(test)]
    fn listener_count(&self) -> usize {
        self.listeners.borrow().entries.len()
    }
}

/// Keeps a snapshot listener registered; dropping it unregisters.
#[derive(Debug)]
#[must_use = "the listener is removed when the subscription is dropped"]
pub struct Subscription {
    id: u64,
    listeners: Weak<RefCell<Listeners>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners
                .borrow_mut()
                .entries
                .retain(|(id, _)| *id != self.id);
        }
    }
}
