//! Structural change notifications between adapters and the list.
//!
//! A wrapped [`Adapter`](crate::adapter::Adapter) announces every change to
//! its rows through a [`ChangeNotifier`]. The footer adapter registers a
//! [`ForwardingObserver`] there, which re-emits each [`DataChange`] as-is on
//! the footer adapter's own notifier. The list listens on that one through a
//! [`ChangeQueue`] and applies the changes to its row cache before the next
//! layout.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// One structural change to a range of rows.
///
/// Indices never need an offset when forwarded: the footer is always the
/// last row, so changes among data rows cannot land on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataChange {
    /// Everything may have changed; drop all bound rows.
    Reset,
    /// `count` rows starting at `start` changed content. A payload asks for
    /// a partial rebind instead of a full one.
    RangeChanged {
        start: usize,
        count: usize,
        payload: Option<String>,
    },
    /// `count` rows were inserted at `start`.
    RangeInserted { start: usize, count: usize },
    /// `count` rows were removed at `start`.
    RangeRemoved { start: usize, count: usize },
    /// `count` rows moved from `from` to `to`.
    RangeMoved { from: usize, to: usize, count: usize },
}

/// Receives [`DataChange`]s from a [`ChangeNotifier`].
pub trait DataObserver: Send {
    fn on_changed(&mut self, change: &DataChange);
}

impl<F> DataObserver for F
where
    F: FnMut(&DataChange) + Send,
{
    fn on_changed(&mut self, change: &DataChange) {
        self(change)
    }
}

/// Handle returned by [`ChangeNotifier::register`], used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// The change-notification channel of an adapter.
#[derive(Default)]
pub struct ChangeNotifier {
    observers: Vec<(ObserverId, Box<dyn DataObserver>)>,
    next_id: u64,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe an observer. It receives every change from now on.
    pub fn register(&mut self, observer: impl DataObserver + 'static) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove a previously registered observer. Returns whether it was found.
    pub fn unregister(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(oid, _)| *oid != id);
        self.observers.len() != before
    }

    pub fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    /// Deliver `change` to every observer, in registration order.
    pub fn notify(&mut self, change: DataChange) {
        for (_, observer) in &mut self.observers {
            observer.on_changed(&change);
        }
    }

    pub fn notify_reset(&mut self) {
        self.notify(DataChange::Reset);
    }

    pub fn notify_changed(&mut self, start: usize, count: usize) {
        self.notify(DataChange::RangeChanged {
            start,
            count,
            payload: None,
        });
    }

    pub fn notify_changed_with_payload(
        &mut self,
        start: usize,
        count: usize,
        payload: impl Into<String>,
    ) {
        self.notify(DataChange::RangeChanged {
            start,
            count,
            payload: Some(payload.into()),
        });
    }

    pub fn notify_inserted(&mut self, start: usize, count: usize) {
        self.notify(DataChange::RangeInserted { start, count });
    }

    pub fn notify_removed(&mut self, start: usize, count: usize) {
        self.notify(DataChange::RangeRemoved { start, count });
    }

    pub fn notify_moved(&mut self, from: usize, to: usize, count: usize) {
        self.notify(DataChange::RangeMoved { from, to, count });
    }
}

/// A notifier shared between its owner and the observers that feed it.
pub type SharedNotifier = Arc<Mutex<ChangeNotifier>>;

/// Relays every change it observes to another notifier, unchanged.
pub struct ForwardingObserver {
    target: SharedNotifier,
}

impl ForwardingObserver {
    pub fn new(target: SharedNotifier) -> Self {
        Self { target }
    }
}

impl DataObserver for ForwardingObserver {
    fn on_changed(&mut self, change: &DataChange) {
        self.target
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .notify(change.clone());
    }
}

/// An observer that buffers changes until someone drains them.
#[derive(Clone, Default)]
pub struct ChangeQueue {
    pending: Arc<Mutex<VecDeque<DataChange>>>,
}

impl ChangeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all buffered changes in arrival order.
    pub fn drain(&self) -> Vec<DataChange> {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .drain(..)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_empty()
    }
}

impl DataObserver for ChangeQueue {
    fn on_changed(&mut self, change: &DataChange) {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(change.clone());
    }
}
