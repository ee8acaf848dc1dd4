//! A ready-made adapter over a `Vec` of [`Item`]s.

use crate::adapter::{Adapter, TextRow};
use crate::item::{DefaultDelegate, Item, ItemDelegate};
use crate::notify::ChangeNotifier;

/// Owns its items and announces every mutation on its notifier.
///
/// ```ignore
/// let mut posts = VecAdapter::new(first_page);
/// posts.extend(next_page); // RangeInserted at the old length
/// ```
pub struct VecAdapter<I: Item> {
    items: Vec<I>,
    delegate: Box<dyn ItemDelegate<I>>,
    notifier: ChangeNotifier,
}

impl<I: Item> VecAdapter<I> {
    pub fn new(items: Vec<I>) -> Self {
        Self {
            items,
            delegate: Box::new(DefaultDelegate),
            notifier: ChangeNotifier::new(),
        }
    }

    pub fn with_delegate(mut self, delegate: impl ItemDelegate<I> + 'static) -> Self {
        self.delegate = Box::new(delegate);
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&I> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[I] {
        &self.items
    }

    pub fn push(&mut self, item: I) {
        self.items.push(item);
        self.notifier.notify_inserted(self.items.len() - 1, 1);
    }

    /// Append a batch. Nothing is announced for an empty batch.
    pub fn extend(&mut self, items: impl IntoIterator<Item = I>) {
        let start = self.items.len();
        self.items.extend(items);
        let count = self.items.len() - start;
        if count > 0 {
            self.notifier.notify_inserted(start, count);
        }
    }

    /// Insert at `index`, clamped to the length.
    pub fn insert(&mut self, index: usize, item: I) {
        let index = index.min(self.items.len());
        self.items.insert(index, item);
        self.notifier.notify_inserted(index, 1);
    }

    pub fn remove(&mut self, index: usize) -> Option<I> {
        if index >= self.items.len() {
            return None;
        }
        let item = self.items.remove(index);
        self.notifier.notify_removed(index, 1);
        Some(item)
    }

    /// Replace the item at `index`, returning the old one.
    pub fn set(&mut self, index: usize, item: I) -> Option<I> {
        let slot = self.items.get_mut(index)?;
        let old = std::mem::replace(slot, item);
        self.notifier.notify_changed(index, 1);
        Some(old)
    }

    /// Replace the item at `index` and request a partial rebind.
    pub fn set_with_payload(&mut self, index: usize, item: I, payload: impl Into<String>) -> Option<I> {
        let slot = self.items.get_mut(index)?;
        let old = std::mem::replace(slot, item);
        self.notifier.notify_changed_with_payload(index, 1, payload);
        Some(old)
    }

    /// Move one item so that it ends up at `to`. Returns false when either
    /// index is out of bounds.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        let len = self.items.len();
        if from >= len || to >= len {
            return false;
        }
        if from != to {
            let item = self.items.remove(from);
            self.items.insert(to, item);
            self.notifier.notify_moved(from, to, 1);
        }
        true
    }

    pub fn clear(&mut self) {
        let count = self.items.len();
        self.items.clear();
        if count > 0 {
            self.notifier.notify_removed(0, count);
        }
    }

    /// Swap in a whole new data set.
    pub fn replace_all(&mut self, items: Vec<I>) {
        self.items = items;
        self.notifier.notify_reset();
    }
}

impl<I: Item> Adapter for VecAdapter<I> {
    type View = TextRow;

    fn item_count(&self) -> usize {
        self.items.len()
    }

    fn create_view(&self, _view_type: u32) -> TextRow {
        TextRow::default()
    }

    fn bind_view(&self, view: &mut TextRow, index: usize) {
        match self.items.get(index) {
            Some(item) => view.set_lines(self.delegate.render(item, index)),
            None => {
                log::warn!("bind past the end of the data: index {index}, len {}", self.items.len());
                view.set_lines(Vec::new());
            }
        }
    }

    fn notifier_mut(&mut self) -> &mut ChangeNotifier {
        &mut self.notifier
    }
}

#[cfg(test)]
mod tests {
    use ratatui::text::Line;

    use super::*;
    use crate::notify::{ChangeQueue, DataChange};

    fn observed(items: Vec<&'static str>) -> (VecAdapter<&'static str>, ChangeQueue) {
        let mut adapter = VecAdapter::new(items);
        let queue = ChangeQueue::new();
        adapter.notifier_mut().register(queue.clone());
        (adapter, queue)
    }

    #[test]
    fn mutations_announce_matching_changes() {
        let (mut adapter, queue) = observed(vec!["a", "b", "c"]);

        adapter.push("d");
        adapter.extend(["e", "f"]);
        adapter.extend(std::iter::empty());
        adapter.insert(99, "g");
        adapter.remove(0);
        adapter.set(1, "C");
        adapter.set_with_payload(1, "C!", "title");
        adapter.move_item(0, 2);
        adapter.move_item(1, 1);
        adapter.replace_all(vec!["x"]);
        adapter.clear();

        assert_eq!(
            queue.drain(),
            vec![
                DataChange::RangeInserted { start: 3, count: 1 },
                DataChange::RangeInserted { start: 4, count: 2 },
                DataChange::RangeInserted { start: 6, count: 1 },
                DataChange::RangeRemoved { start: 0, count: 1 },
                DataChange::RangeChanged {
                    start: 1,
                    count: 1,
                    payload: None
                },
                DataChange::RangeChanged {
                    start: 1,
                    count: 1,
                    payload: Some("title".into())
                },
                DataChange::RangeMoved {
                    from: 0,
                    to: 2,
                    count: 1
                },
                DataChange::Reset,
                DataChange::RangeRemoved { start: 0, count: 1 },
            ]
        );
        assert!(adapter.is_empty());
    }

    #[test]
    fn out_of_range_edits_are_silent() {
        let (mut adapter, queue) = observed(vec!["a"]);
        assert_eq!(adapter.remove(3), None);
        assert_eq!(adapter.set(3, "z"), None);
        assert!(!adapter.move_item(0, 5));
        assert!(queue.is_empty());
    }

    #[test]
    fn move_item_reorders() {
        let mut adapter = VecAdapter::new(vec!["a", "b", "c", "d"]);
        adapter.move_item(0, 3);
        assert_eq!(adapter.items(), &["b", "c", "d", "a"]);
        adapter.move_item(3, 1);
        assert_eq!(adapter.items(), &["b", "a", "c", "d"]);
    }

    #[test]
    fn binds_through_delegate() {
        let adapter = VecAdapter::new(vec!["Item 0".to_string(), "Item 1".to_string()])
            .with_delegate(|item: &String, index: usize| {
                vec![Line::raw(format!("#{index} {item}"))]
            });
        let mut view = adapter.create_view(0);
        adapter.bind_view(&mut view, 1);
        assert_eq!(view.lines()[0].to_string(), "#1 Item 1");
    }
}
