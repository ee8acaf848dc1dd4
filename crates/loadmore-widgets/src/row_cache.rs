//! Bound rows kept between renders, kept in step with [`DataChange`]s.

use std::ops::Range;

use crate::adapter::Adapter;
use crate::footer_adapter::{FooterAdapter, RowKind, RowSlot};
use crate::notify::DataChange;
use crate::state::LoadMoreState;

enum Freshness {
    Bound,
    Stale,
    /// Bound, but partial rebinds are pending.
    Payloads(Vec<String>),
}

struct CachedRow<V> {
    kind: RowKind,
    slot: RowSlot<V>,
    freshness: Freshness,
}

/// Row views indexed by augmented position. `None` means never bound or
/// dropped; such rows are created on demand.
pub(crate) struct RowCache<V> {
    rows: Vec<Option<CachedRow<V>>>,
}

impl<V> Default for RowCache<V> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<V> RowCache<V> {
    pub(crate) fn clear(&mut self) {
        self.rows.clear();
    }

    /// Drop everything at or past `len`.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.rows.truncate(len);
    }

    /// Drop every bound row outside `window`.
    pub(crate) fn retain_window(&mut self, window: Range<usize>) {
        self.rows.truncate(window.end);
        for row in self.rows.iter_mut().take(window.start) {
            *row = None;
        }
    }

    pub(crate) fn apply(&mut self, change: &DataChange) {
        match change {
            DataChange::Reset => self.rows.clear(),
            DataChange::RangeChanged {
                start,
                count,
                payload,
            } => {
                let end = (start + count).min(self.rows.len());
                for row in self.rows[(*start).min(end)..end].iter_mut().flatten() {
                    let previous = std::mem::replace(&mut row.freshness, Freshness::Stale);
                    row.freshness = match (previous, payload) {
                        (Freshness::Stale, _) | (_, None) => Freshness::Stale,
                        (Freshness::Bound, Some(p)) => Freshness::Payloads(vec![p.clone()]),
                        (Freshness::Payloads(mut pending), Some(p)) => {
                            pending.push(p.clone());
                            Freshness::Payloads(pending)
                        }
                    };
                }
            }
            DataChange::RangeInserted { start, count } => {
                if *start <= self.rows.len() {
                    self.rows
                        .splice(*start..*start, std::iter::repeat_with(|| None).take(*count));
                }
            }
            DataChange::RangeRemoved { start, count } => {
                let end = (start + count).min(self.rows.len());
                if *start < end {
                    self.rows.drain(*start..end);
                }
            }
            DataChange::RangeMoved { from, to, count } => {
                let needed = from.max(to) + count;
                if self.rows.len() < needed {
                    self.rows.resize_with(needed, || None);
                }
                let block: Vec<_> = self.rows.drain(*from..from + count).collect();
                self.rows.splice(*to..*to, block);
            }
        }
    }

    /// The row at `index`, created and bound as needed.
    ///
    /// A cached row is reused only while its kind still matches what the
    /// adapter reports for `index`.
    pub(crate) fn get_or_bind<A>(
        &mut self,
        index: usize,
        adapter: &FooterAdapter<A>,
        state: &LoadMoreState,
    ) -> &RowSlot<V>
    where
        A: Adapter<View = V>,
    {
        if self.rows.len() <= index {
            self.rows.resize_with(index + 1, || None);
        }
        let kind = adapter.row_kind(index, state);
        let entry = &mut self.rows[index];
        if !matches!(entry, Some(row) if row.kind == kind) {
            *entry = None;
        }
        let row = entry.get_or_insert_with(|| {
            let mut slot = adapter.create_row(kind, state);
            adapter.bind_row(&mut slot, index, state, None);
            CachedRow {
                kind,
                slot,
                freshness: Freshness::Bound,
            }
        });
        match std::mem::replace(&mut row.freshness, Freshness::Bound) {
            Freshness::Bound => {}
            Freshness::Stale => adapter.bind_row(&mut row.slot, index, state, None),
            Freshness::Payloads(pending) => {
                for payload in &pending {
                    adapter.bind_row(&mut row.slot, index, state, Some(payload));
                }
            }
        }
        &row.slot
    }

    #[cfg(test)]
    pub(crate) fn is_cached(&self, index: usize) -> bool {
        matches!(self.rows.get(index), Some(Some(_)))
    }

    #[cfg(test)]
    pub(crate) fn cached_count(&self) -> usize {
        self.rows.iter().flatten().count()
    }
}
