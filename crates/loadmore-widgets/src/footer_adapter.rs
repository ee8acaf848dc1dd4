//! Wraps an [`Adapter`] and appends the footer row.

use std::sync::{Arc, Mutex};

use crate::adapter::Adapter;
use crate::footer::{FooterRenderState, FooterRow};
use crate::notify::{
    ChangeNotifier, DataChange, DataObserver, ForwardingObserver, ObserverId, SharedNotifier,
};
use crate::state::{FooterPolicy, LoadMoreState};

/// Kind of a row in the augmented list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// A data row with the wrapped adapter's view type.
    Data(u32),
    Footer,
}

/// A created row: either a wrapped-adapter view or the footer.
pub enum RowSlot<V> {
    Data(V),
    Footer(FooterRow),
}

impl<V> RowSlot<V> {
    pub fn is_footer(&self) -> bool {
        matches!(self, RowSlot::Footer(_))
    }
}

/// The wrapped adapter plus one trailing footer row.
///
/// Row counts and the footer position are recomputed from the wrapped
/// adapter on every call, so they stay right while changes are in flight.
pub struct FooterAdapter<A: Adapter> {
    inner: A,
    policy: FooterPolicy,
    notifier: SharedNotifier,
    forwarder: ObserverId,
}

impl<A: Adapter> FooterAdapter<A> {
    /// Wrap `inner`, subscribing a forwarder to its notifier.
    pub fn new(mut inner: A, policy: FooterPolicy) -> Self {
        let notifier: SharedNotifier = Arc::new(Mutex::new(ChangeNotifier::new()));
        let forwarder = inner
            .notifier_mut()
            .register(ForwardingObserver::new(notifier.clone()));
        Self {
            inner,
            policy,
            notifier,
            forwarder,
        }
    }

    /// Unwrap, detaching the forwarder from the inner adapter.
    pub fn into_inner(mut self) -> A {
        self.inner.notifier_mut().unregister(self.forwarder);
        self.inner
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut A {
        &mut self.inner
    }

    pub fn policy(&self) -> FooterPolicy {
        self.policy
    }

    pub(crate) fn set_policy(&mut self, policy: FooterPolicy) {
        self.policy = policy;
    }

    pub fn shows_footer(&self, state: &LoadMoreState) -> bool {
        self.policy.shows_footer(state.has_more())
    }

    pub fn row_count(&self, state: &LoadMoreState) -> usize {
        self.inner.item_count() + usize::from(self.shows_footer(state))
    }

    /// Index of the footer row, if one is shown.
    pub fn footer_index(&self, state: &LoadMoreState) -> Option<usize> {
        self.shows_footer(state).then(|| self.inner.item_count())
    }

    pub fn row_kind(&self, index: usize, state: &LoadMoreState) -> RowKind {
        if self.footer_index(state) == Some(index) {
            RowKind::Footer
        } else {
            RowKind::Data(self.inner.item_view_type(index))
        }
    }

    pub fn create_row(&self, kind: RowKind, state: &LoadMoreState) -> RowSlot<A::View> {
        match kind {
            RowKind::Footer => RowSlot::Footer(FooterRow::new(FooterRenderState::derive(state))),
            RowKind::Data(view_type) => RowSlot::Data(self.inner.create_view(view_type)),
        }
    }

    /// Bind `slot` to row `index`. Data rows pass the index through untouched.
    pub fn bind_row(
        &self,
        slot: &mut RowSlot<A::View>,
        index: usize,
        state: &LoadMoreState,
        payload: Option<&str>,
    ) {
        match slot {
            RowSlot::Footer(footer) => footer.bind(FooterRenderState::derive(state)),
            RowSlot::Data(view) => match payload {
                Some(p) => self.inner.bind_view_with_payload(view, index, p),
                None => self.inner.bind_view(view, index),
            },
        }
    }

    /// Observe changes of the augmented rows (forwarded data changes and
    /// footer refreshes).
    pub fn register_observer(&self, observer: impl DataObserver + 'static) -> ObserverId {
        self.notifier
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .register(observer)
    }

    pub(crate) fn notify(&self, change: DataChange) {
        self.notifier
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .notify(change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::ChangeQueue;
    use crate::vec_adapter::VecAdapter;

    fn rows(n: usize) -> VecAdapter<String> {
        VecAdapter::new((0..n).map(|i| format!("Item {i}")).collect())
    }

    fn exhausted() -> LoadMoreState {
        let mut state = LoadMoreState::default();
        state.finish_loading(false);
        state
    }

    #[test]
    fn strict_policy_counts_footer_only_while_more() {
        let adapter = FooterAdapter::new(rows(20), FooterPolicy::WhileHasMore);
        assert_eq!(adapter.row_count(&LoadMoreState::default()), 21);
        assert_eq!(adapter.row_count(&exhausted()), 20);
        assert_eq!(adapter.footer_index(&exhausted()), None);
    }

    #[test]
    fn lenient_policy_always_counts_footer() {
        let adapter = FooterAdapter::new(rows(20), FooterPolicy::Always);
        assert_eq!(adapter.row_count(&LoadMoreState::default()), 21);
        assert_eq!(adapter.row_count(&exhausted()), 21);
        assert_eq!(adapter.footer_index(&exhausted()), Some(20));
    }

    #[test]
    fn footer_is_last_row_and_tracks_count() {
        let state = LoadMoreState::default();
        let mut adapter = FooterAdapter::new(rows(2), FooterPolicy::WhileHasMore);
        assert_eq!(adapter.row_kind(1, &state), RowKind::Data(0));
        assert_eq!(adapter.row_kind(2, &state), RowKind::Footer);

        adapter.inner_mut().push("Item 2".to_string());
        assert_eq!(adapter.row_kind(2, &state), RowKind::Data(0));
        assert_eq!(adapter.row_kind(3, &state), RowKind::Footer);
    }

    #[test]
    fn bind_dispatches_on_slot() {
        let state = LoadMoreState::default();
        let adapter = FooterAdapter::new(rows(3), FooterPolicy::WhileHasMore);

        let mut data = adapter.create_row(RowKind::Data(0), &state);
        adapter.bind_row(&mut data, 1, &state, None);
        match &data {
            RowSlot::Data(view) => assert_eq!(view.lines()[0].to_string(), "Item 1"),
            RowSlot::Footer(_) => panic!("expected a data row"),
        }

        let mut footer = adapter.create_row(RowKind::Footer, &state);
        assert!(footer.is_footer());
        adapter.bind_row(&mut footer, 3, &exhausted(), None);
        match footer {
            RowSlot::Footer(row) => assert!(!row.state().spinner),
            RowSlot::Data(_) => panic!("expected the footer"),
        }
    }

    #[test]
    fn inner_changes_reach_augmented_observers() {
        let mut adapter = FooterAdapter::new(rows(20), FooterPolicy::WhileHasMore);
        let queue = ChangeQueue::new();
        adapter.register_observer(queue.clone());

        adapter
            .inner_mut()
            .extend((20..30).map(|i| format!("Item {i}")));
        assert_eq!(
            queue.drain(),
            vec![DataChange::RangeInserted { start: 20, count: 10 }]
        );
    }

    #[test]
    fn into_inner_detaches_forwarder() {
        let adapter = FooterAdapter::new(rows(1), FooterPolicy::WhileHasMore);
        let queue = ChangeQueue::new();
        adapter.register_observer(queue.clone());

        let mut inner = adapter.into_inner();
        inner.push("late".to_string());
        assert!(queue.is_empty());
        assert!(!inner.notifier_mut().has_observers());
    }
}
