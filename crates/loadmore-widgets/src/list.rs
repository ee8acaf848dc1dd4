//! A scrollable list that asks for more rows when its footer comes into view.
//!
//! [`LoadMoreList`] wraps an [`Adapter`] in a [`FooterAdapter`], renders
//! its rows top-down and watches every scroll. In [`LoadMode::Auto`] a
//! scroll that leaves the footer visible starts a request; in
//! [`LoadMode::Manual`] the user activates the footer instead. Either way
//! the host is told through its listener, fetches data, appends it to the
//! adapter and calls [`LoadMoreList::notify_load_finished`].
//!
//! ```ignore
//! let mut feed = LoadMoreList::new().with_adapter(VecAdapter::new(first_page));
//! feed.notify_on_load_more();
//!
//! // in the parent's update:
//! Msg::Feed(list::Message::LoadMore(_)) => Command::perform(fetch(page), Msg::Loaded),
//! Msg::Loaded(rows) => {
//!     let more = !rows.is_empty();
//!     if let Some(adapter) = self.feed.adapter_mut() { adapter.extend(rows); }
//!     self.feed.notify_load_finished(more).ok();
//!     Command::none()
//! }
//! ```

use std::cell::{Cell, RefCell};

use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use loadmore_core::{subscribe, Command, Component, Every, Subscription};
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::Frame;

use crate::adapter::{Adapter, RowView};
use crate::footer::{render_footer, FooterRenderState, FooterStyle};
use crate::footer_adapter::{FooterAdapter, RowSlot};
use crate::keymap::{ListAction, LoadMoreKeyBindings};
use crate::notify::{ChangeQueue, DataChange, DataObserver, ObserverId};
use crate::row_cache::RowCache;
use crate::state::{
    FooterPolicy, LoadMode, LoadMoreConfig, LoadMoreError, LoadMoreState, LoadPhase,
};

const SPINNER_SUBSCRIPTION: &str = "loadmore-footer-spinner";

/// Told when the list wants the next page.
pub trait LoadMoreListener: Send {
    /// `last_data_index` is the last data row at the time of the request,
    /// `None` when the list had no data rows.
    fn on_load_more(&mut self, last_data_index: Option<usize>);
}

impl<F> LoadMoreListener for F
where
    F: FnMut(Option<usize>) + Send,
{
    fn on_load_more(&mut self, last_data_index: Option<usize>) {
        self(last_data_index)
    }
}

enum Listener {
    Callback(Box<dyn LoadMoreListener>),
    /// Reply with [`Message::LoadMore`] instead of calling anything.
    Message,
}

/// Messages for the load-more list.
#[derive(Debug, Clone)]
pub enum Message {
    /// A key press, handled only while focused.
    KeyPress(KeyEvent),
    /// Wheel scrolls and clicks on rows.
    Mouse(MouseEvent),
    /// The host scrolled the list by `dy` rows; positive is toward the end.
    Scrolled(i32),
    /// The terminal was resized. Re-checks the footer without scrolling.
    /// Also worth sending once at startup, after the first frame.
    Resized,
    /// Activate the footer as if it had been clicked.
    TapFooter,
    /// The cursor moved to this row. Sent back in, it moves the cursor.
    Select(usize),
    /// A data row was confirmed with the activate key.
    Confirm(usize),
    /// Emitted after [`LoadMoreList::notify_on_load_more`] when a request
    /// fires. Carries the same index a callback listener would get.
    LoadMore(Option<usize>),
    /// Advances the footer spinner.
    SpinnerTick,
}

/// Row styling.
#[derive(Debug, Clone)]
pub struct ListStyle {
    pub normal: Style,
    pub selected: Style,
    /// Drawn left of the selected data row. Its width is reserved on every row.
    pub highlight_symbol: String,
}

impl Default for ListStyle {
    fn default() -> Self {
        Self {
            normal: Style::default(),
            selected: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            highlight_symbol: "▸ ".to_string(),
        }
    }
}

/// A list with a trailing load-more footer.
///
/// Layout state lives in cells because the adapter may change between
/// updates and rendering; queued changes are applied before every layout.
pub struct LoadMoreList<A: Adapter> {
    adapter: Option<FooterAdapter<A>>,
    state: LoadMoreState,
    footer_policy: FooterPolicy,
    listener: Option<Listener>,
    warned_no_listener: bool,
    changes: ChangeQueue,
    rows: RefCell<RowCache<A::View>>,
    cursor: Cell<usize>,
    offset: Cell<usize>,
    viewport_height: Cell<u16>,
    area: Cell<Rect>,
    row_areas: RefCell<Vec<(usize, Rect)>>,
    /// Rows or the render area changed since the last footer check.
    needs_check: Cell<bool>,
    focus: bool,
    block: Option<Block<'static>>,
    style: ListStyle,
    footer_style: FooterStyle,
    key_bindings: LoadMoreKeyBindings,
    spinner_frame: usize,
}

impl<A: Adapter> Default for LoadMoreList<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Adapter> LoadMoreList<A> {
    /// An empty list in auto mode. Nothing renders until an adapter is set.
    pub fn new() -> Self {
        let config = LoadMoreConfig::default();
        Self {
            adapter: None,
            state: LoadMoreState::new(config.load_mode),
            footer_policy: config.footer_policy,
            listener: None,
            warned_no_listener: false,
            changes: ChangeQueue::new(),
            rows: RefCell::new(RowCache::default()),
            cursor: Cell::new(0),
            offset: Cell::new(0),
            // Until the first render.
            viewport_height: Cell::new(10),
            area: Cell::new(Rect::default()),
            row_areas: RefCell::new(Vec::new()),
            needs_check: Cell::new(false),
            focus: false,
            block: None,
            style: ListStyle::default(),
            footer_style: FooterStyle::default(),
            key_bindings: LoadMoreKeyBindings::default(),
            spinner_frame: 0,
        }
    }

    pub fn with_config(mut self, config: LoadMoreConfig) -> Self {
        self.set_load_mode(config.load_mode);
        self.set_footer_policy(config.footer_policy);
        self
    }

    pub fn with_adapter(mut self, adapter: A) -> Self {
        self.set_adapter(adapter);
        self
    }

    pub fn with_block(mut self, block: Block<'static>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn with_style(mut self, style: ListStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_footer_style(mut self, style: FooterStyle) -> Self {
        self.footer_style = style;
        self
    }

    pub fn with_key_bindings(mut self, bindings: LoadMoreKeyBindings) -> Self {
        self.key_bindings = bindings;
        self
    }

    pub fn key_bindings(&self) -> &LoadMoreKeyBindings {
        &self.key_bindings
    }

    pub fn focus(&mut self) {
        self.focus = true;
    }

    pub fn blur(&mut self) {
        self.focus = false;
    }

    /// Wrap `adapter` and start listening to it. Returns the previous
    /// adapter, detached. Bound rows and the cursor start over; the load
    /// state is kept.
    pub fn set_adapter(&mut self, adapter: A) -> Option<A> {
        let previous = self.adapter.take().map(FooterAdapter::into_inner);
        let wrapped = FooterAdapter::new(adapter, self.footer_policy);
        wrapped.register_observer(self.changes.clone());
        self.changes.drain();
        self.rows.get_mut().clear();
        self.row_areas.get_mut().clear();
        // The next render lays the new rows out from scratch.
        self.area.set(Rect::default());
        self.cursor.set(0);
        self.offset.set(0);
        log::debug!(
            "adapter set with {} rows",
            wrapped.row_count(&self.state)
        );
        self.adapter = Some(wrapped);
        previous
    }

    pub fn adapter(&self) -> Option<&A> {
        self.adapter.as_ref().map(FooterAdapter::inner)
    }

    /// Mutable access for appending rows. The adapter announces its own
    /// changes; the list picks them up before the next layout.
    pub fn adapter_mut(&mut self) -> Option<&mut A> {
        self.adapter.as_mut().map(FooterAdapter::inner_mut)
    }

    /// Observe the rows as the list sees them: the wrapped adapter's
    /// changes plus footer refreshes. `None` without an adapter.
    pub fn register_row_observer(
        &self,
        observer: impl DataObserver + 'static,
    ) -> Option<ObserverId> {
        self.adapter
            .as_ref()
            .map(|adapter| adapter.register_observer(observer))
    }

    pub fn set_listener(&mut self, listener: impl LoadMoreListener + 'static) {
        self.listener = Some(Listener::Callback(Box::new(listener)));
        self.warned_no_listener = false;
    }

    /// Report requests as [`Message::LoadMore`] from `update`.
    pub fn notify_on_load_more(&mut self) {
        self.listener = Some(Listener::Message);
        self.warned_no_listener = false;
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    pub fn has_listener(&self) -> bool {
        self.listener.is_some()
    }

    /// Called by the host when a requested load completed. Clears the
    /// loading latch and refreshes only the footer row.
    pub fn notify_load_finished(&mut self, has_more: bool) -> Result<(), LoadMoreError> {
        if self.adapter.is_none() {
            return Err(LoadMoreError::NoAdapter);
        }
        let had_footer = self.shows_footer();
        self.state.finish_loading(has_more);
        log::debug!("load finished, has_more = {has_more}");
        self.refresh_footer(had_footer);
        Ok(())
    }

    /// Turn load-more on or off. Re-enabling after exhaustion brings the
    /// footer back.
    pub fn set_load_more_enabled(&mut self, enabled: bool) {
        let had_footer = self.shows_footer();
        self.state.set_has_more(enabled);
        self.refresh_footer(had_footer);
    }

    pub fn set_load_mode(&mut self, mode: LoadMode) {
        let had_footer = self.shows_footer();
        self.state.set_load_mode(mode);
        self.refresh_footer(had_footer);
    }

    pub fn set_footer_policy(&mut self, policy: FooterPolicy) {
        let had_footer = self.shows_footer();
        self.footer_policy = policy;
        if let Some(adapter) = self.adapter.as_mut() {
            adapter.set_policy(policy);
        }
        self.refresh_footer(had_footer);
    }

    /// Force the loading latch, e.g. when the host starts a load on its own.
    pub fn set_loading_in_progress(&mut self, loading: bool) {
        let had_footer = self.shows_footer();
        self.state.set_loading(loading);
        self.refresh_footer(had_footer);
    }

    pub fn load_state(&self) -> &LoadMoreState {
        &self.state
    }

    pub fn phase(&self) -> LoadPhase {
        self.state.phase()
    }

    pub fn footer_policy(&self) -> FooterPolicy {
        self.footer_policy
    }

    /// Data rows plus the footer, if shown.
    pub fn row_count(&self) -> usize {
        self.adapter
            .as_ref()
            .map_or(0, |adapter| adapter.row_count(&self.state))
    }

    pub fn item_count(&self) -> usize {
        self.adapter
            .as_ref()
            .map_or(0, |adapter| adapter.inner().item_count())
    }

    pub fn footer_index(&self) -> Option<usize> {
        self.adapter
            .as_ref()
            .and_then(|adapter| adapter.footer_index(&self.state))
    }

    /// Last row at least partly inside the viewport of the last render.
    pub fn last_visible_index(&self) -> Option<usize> {
        self.sync();
        self.last_visible_from(self.offset.get())
    }

    /// Index of the first row drawn.
    pub fn offset(&self) -> usize {
        self.sync();
        self.offset.get()
    }

    /// The row under the cursor. May be the footer.
    pub fn selected(&self) -> Option<usize> {
        self.sync();
        (self.row_count() > 0).then(|| self.cursor.get())
    }

    fn shows_footer(&self) -> bool {
        self.adapter
            .as_ref()
            .is_some_and(|adapter| adapter.shows_footer(&self.state))
    }

    /// Announce how the footer row changed since `had_footer` was sampled.
    /// The footer sits at the current item count, which already accounts
    /// for rows the host appended before finishing.
    fn refresh_footer(&self, had_footer: bool) {
        let Some(adapter) = self.adapter.as_ref() else {
            return;
        };
        let start = adapter.inner().item_count();
        let change = match (had_footer, adapter.shows_footer(&self.state)) {
            (true, true) => DataChange::RangeChanged {
                start,
                count: 1,
                payload: None,
            },
            (true, false) => DataChange::RangeRemoved { start, count: 1 },
            (false, true) => DataChange::RangeInserted { start, count: 1 },
            (false, false) => return,
        };
        log::debug!("footer refresh: {change:?}");
        adapter.notify(change);
    }

    /// Apply queued changes to bound rows and the cursor.
    fn sync(&self) {
        let changes = self.changes.drain();
        if changes.is_empty() {
            return;
        }
        {
            let mut rows = self.rows.borrow_mut();
            for change in &changes {
                rows.apply(change);
                self.cursor.set(shift_position(self.cursor.get(), change));
                self.offset.set(shift_position(self.offset.get(), change));
            }
            rows.truncate(self.row_count());
        }
        self.needs_check.set(true);
        let last = self.row_count().saturating_sub(1);
        self.cursor.set(self.cursor.get().min(last));
        self.offset.set(self.offset.get().min(self.cursor.get()));
    }

    fn row_height(&self, adapter: &FooterAdapter<A>, index: usize) -> usize {
        let mut rows = self.rows.borrow_mut();
        match rows.get_or_bind(index, adapter, &self.state) {
            RowSlot::Data(view) => view.height().max(1) as usize,
            RowSlot::Footer(_) => 1,
        }
    }

    fn last_visible_from(&self, offset: usize) -> Option<usize> {
        let adapter = self.adapter.as_ref()?;
        let row_count = adapter.row_count(&self.state);
        if offset >= row_count {
            return row_count.checked_sub(1);
        }
        let height = (self.viewport_height.get() as usize).max(1);
        let mut used = 0;
        let mut index = offset;
        loop {
            used += self.row_height(adapter, index);
            if used >= height || index + 1 == row_count {
                return Some(index);
            }
            index += 1;
        }
    }

    /// Largest offset that still fills the viewport.
    fn max_offset(&self, adapter: &FooterAdapter<A>) -> usize {
        let row_count = adapter.row_count(&self.state);
        let height = (self.viewport_height.get() as usize).max(1);
        let mut used = 0;
        let mut index = row_count;
        while index > 0 {
            let h = self.row_height(adapter, index - 1);
            if used + h > height {
                break;
            }
            used += h;
            index -= 1;
        }
        index.min(row_count.saturating_sub(1))
    }

    fn ensure_cursor_visible(&self) {
        let Some(adapter) = self.adapter.as_ref() else {
            return;
        };
        let cursor = self.cursor.get();
        if cursor < self.offset.get() {
            self.offset.set(cursor);
            return;
        }
        let height = (self.viewport_height.get() as usize).max(1);
        while self.offset.get() < cursor {
            let used: usize = (self.offset.get()..=cursor)
                .map(|i| self.row_height(adapter, i))
                .sum();
            if used <= height {
                break;
            }
            self.offset.set(self.offset.get() + 1);
        }
    }

    /// Drop bound rows more than a screen away from the viewport.
    fn evict_far_rows(&self) {
        let offset = self.offset.get();
        let Some(last) = self.last_visible_from(offset) else {
            return;
        };
        let margin = (self.viewport_height.get() as usize).max(1);
        self.rows
            .borrow_mut()
            .retain_window(offset.saturating_sub(margin)..last + 1 + margin);
    }

    fn page_rows(&self) -> usize {
        let offset = self.offset.get();
        self.last_visible_from(offset)
            .map_or(1, |last| last + 1 - offset)
            .max(1)
    }

    /// The load-more check run after every scroll.
    fn on_scrolled(&mut self, dy: i32) -> Command<Message> {
        if dy < 0 || !self.state.can_trigger() || self.state.load_mode() != LoadMode::Auto {
            return Command::none();
        }
        let Some(last_visible) = self.last_visible_from(self.offset.get()) else {
            return Command::none();
        };
        if last_visible + 1 != self.row_count() || !self.listener_ready() {
            return Command::none();
        }
        self.trigger(last_visible)
    }

    fn tap_footer(&mut self) -> Command<Message> {
        if self.state.load_mode() != LoadMode::Manual || !self.state.can_trigger() {
            return Command::none();
        }
        let Some(footer) = self.footer_index() else {
            return Command::none();
        };
        if !self.listener_ready() {
            return Command::none();
        }
        self.trigger(footer)
    }

    fn listener_ready(&mut self) -> bool {
        if self.listener.is_some() {
            return true;
        }
        if !self.warned_no_listener {
            log::warn!("footer reached but no load-more listener is set; ignoring");
            self.warned_no_listener = true;
        }
        false
    }

    /// Latch loading and tell the listener. `position` is the footer row.
    fn trigger(&mut self, position: usize) -> Command<Message> {
        let had_footer = self.shows_footer();
        self.state.begin_loading(position);
        self.refresh_footer(had_footer);
        let last_data_index = position.checked_sub(1);
        log::debug!("load more requested at row {position}");
        match self.listener.as_mut() {
            Some(Listener::Callback(listener)) => {
                listener.on_load_more(last_data_index);
                Command::none()
            }
            Some(Listener::Message) => Command::message(Message::LoadMore(last_data_index)),
            None => Command::none(),
        }
    }

    fn navigate(&mut self, action: ListAction) -> Command<Message> {
        let row_count = self.row_count();
        if row_count == 0 {
            return Command::none();
        }
        let last = row_count - 1;
        let cursor = self.cursor.get();
        let target = match action {
            ListAction::Up => cursor.saturating_sub(1),
            ListAction::Down => (cursor + 1).min(last),
            ListAction::PageUp => cursor.saturating_sub(self.page_rows()),
            ListAction::PageDown => (cursor + self.page_rows()).min(last),
            ListAction::First => 0,
            ListAction::Last => last,
            ListAction::Activate => return self.activate(),
        };
        let before = self.offset.get();
        self.cursor.set(target);
        self.ensure_cursor_visible();
        let dy = self.offset.get() as i32 - before as i32;
        let load = self.on_scrolled(dy);
        Command::batch([Command::message(Message::Select(target)), load])
    }

    fn activate(&mut self) -> Command<Message> {
        let cursor = self.cursor.get();
        if Some(cursor) == self.footer_index() {
            self.tap_footer()
        } else if cursor < self.item_count() {
            Command::message(Message::Confirm(cursor))
        } else {
            Command::none()
        }
    }

    /// Move the viewport by `dy` rows and keep the cursor on screen.
    fn scroll_by(&mut self, dy: i32) -> Command<Message> {
        let Some(adapter) = self.adapter.as_ref() else {
            return Command::none();
        };
        let max = self.max_offset(adapter);
        let offset = self.offset.get();
        let target = if dy < 0 {
            offset.saturating_sub(dy.unsigned_abs() as usize)
        } else {
            (offset + dy as usize).min(max)
        };
        self.offset.set(target);
        if self.cursor.get() < target {
            self.cursor.set(target);
        } else if let Some(last) = self.last_visible_from(target) {
            if self.cursor.get() > last {
                self.cursor.set(last);
            }
        }
        self.on_scrolled(dy)
    }

    fn on_mouse(&mut self, mouse: MouseEvent) -> Command<Message> {
        let pos = Position::new(mouse.column, mouse.row);
        let area = self.area.get();
        let inside = area.is_empty() || area.contains(pos);
        match mouse.kind {
            MouseEventKind::ScrollDown if inside => self.scroll_by(1),
            MouseEventKind::ScrollUp if inside => self.scroll_by(-1),
            MouseEventKind::Down(MouseButton::Left) => {
                let hit = self
                    .row_areas
                    .borrow()
                    .iter()
                    .find(|(_, rect)| rect.contains(pos))
                    .map(|(index, _)| *index);
                let Some(index) = hit else {
                    return Command::none();
                };
                self.cursor.set(index);
                let select = Command::message(Message::Select(index));
                if Some(index) == self.footer_index() {
                    Command::batch([select, self.tap_footer()])
                } else {
                    select
                }
            }
            _ => Command::none(),
        }
    }

    fn handle(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) if self.focus => match self.key_bindings.action(&key) {
                Some(action) => self.navigate(action),
                None => Command::none(),
            },
            Message::Mouse(mouse) => self.on_mouse(mouse),
            Message::Scrolled(dy) => self.scroll_by(dy),
            Message::Resized => self.on_scrolled(0),
            Message::TapFooter => self.tap_footer(),
            Message::Select(index) => {
                if index >= self.row_count() {
                    return Command::none();
                }
                let before = self.offset.get();
                self.cursor.set(index);
                self.ensure_cursor_visible();
                self.on_scrolled(self.offset.get() as i32 - before as i32)
            }
            Message::SpinnerTick => {
                self.spinner_frame = self.spinner_frame.wrapping_add(1);
                Command::none()
            }
            _ => Command::none(),
        }
    }

    /// The footer shows a spinner and the current layout reaches it.
    fn footer_spinning(&self) -> bool {
        let Some(footer) = self.footer_index() else {
            return false;
        };
        FooterRenderState::derive(&self.state).spinner
            && self.last_visible_index().is_some_and(|last| last >= footer)
    }
}

/// Where a row at `pos` ends up after `change`.
fn shift_position(pos: usize, change: &DataChange) -> usize {
    match *change {
        DataChange::RangeInserted { start, count } if start < pos => pos + count,
        DataChange::RangeRemoved { start, count } if pos >= start + count => pos - count,
        DataChange::RangeRemoved { start, .. } if pos >= start => start,
        DataChange::RangeMoved { from, to, count } => {
            if (from..from + count).contains(&pos) {
                to + (pos - from)
            } else {
                let rest = if pos >= from + count { pos - count } else { pos };
                if rest >= to {
                    rest + count
                } else {
                    rest
                }
            }
        }
        _ => pos,
    }
}

impl<A: Adapter> Component for LoadMoreList<A> {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        self.sync();
        let recheck = self.needs_check.replace(false);
        let cmd = self.handle(msg);
        let cmd = if recheck {
            // Rows or the viewport moved without a scroll event.
            Command::batch([cmd, self.on_scrolled(0)])
        } else {
            cmd
        };
        self.evict_far_rows();
        cmd
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let inner = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                frame.render_widget(block.clone(), area);
                inner
            }
            None => area,
        };
        if self.area.replace(inner) != inner {
            self.needs_check.set(true);
        }
        self.sync();

        let mut areas = self.row_areas.borrow_mut();
        areas.clear();
        if inner.width == 0 || inner.height == 0 {
            return;
        }
        self.viewport_height.set(inner.height);
        let Some(adapter) = self.adapter.as_ref() else {
            return;
        };

        let symbol = self.style.highlight_symbol.as_str();
        let symbol_width = (Span::raw(symbol).width() as u16).min(inner.width);
        let row_count = adapter.row_count(&self.state);
        let mut rows = self.rows.borrow_mut();
        let mut y = inner.y;
        let mut index = self.offset.get();

        while index < row_count && y < inner.bottom() {
            let slot = rows.get_or_bind(index, adapter, &self.state);
            let selected = index == self.cursor.get();
            let height = match slot {
                RowSlot::Data(view) => view.height().max(1),
                RowSlot::Footer(_) => 1,
            }
            .min(inner.bottom() - y);
            let row_area = Rect::new(inner.x, y, inner.width, height);

            match slot {
                RowSlot::Data(view) => {
                    let row_style = if selected {
                        self.style.selected
                    } else {
                        self.style.normal
                    };
                    frame.buffer_mut().set_style(row_area, row_style);
                    if selected && symbol_width > 0 {
                        frame.buffer_mut().set_stringn(
                            inner.x,
                            y,
                            symbol,
                            symbol_width as usize,
                            self.style.selected,
                        );
                    }
                    let content = Rect::new(
                        inner.x + symbol_width,
                        y,
                        inner.width - symbol_width,
                        height,
                    );
                    view.render(frame, content, selected);
                }
                RowSlot::Footer(footer) => {
                    if selected {
                        frame.buffer_mut().set_style(row_area, self.style.selected);
                    }
                    render_footer(frame, row_area, footer, &self.footer_style, self.spinner_frame);
                }
            }

            areas.push((index, row_area));
            y += height;
            index += 1;
        }
    }

    fn subscriptions(&self) -> Vec<Subscription<Message>> {
        if !self.footer_spinning() {
            return vec![];
        }
        vec![
            subscribe(Every::new(self.footer_style.interval, SPINNER_SUBSCRIPTION))
                .map(|_| Message::SpinnerTick),
        ]
    }

    fn focused(&self) -> bool {
        self.focus
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use crossterm::event::{KeyCode, KeyModifiers};
    use loadmore_core::testing::{buffer_to_string, TestProgram};
    use loadmore_core::Model;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;
    use crate::vec_adapter::VecAdapter;

    type Feed = LoadMoreList<VecAdapter<String>>;

    fn page(range: std::ops::Range<usize>) -> Vec<String> {
        range.map(|i| format!("Item {i}")).collect()
    }

    fn feed(rows: usize) -> Feed {
        let mut list = LoadMoreList::new().with_adapter(VecAdapter::new(page(0..rows)));
        list.focus();
        list
    }

    fn recorded(list: &mut Feed) -> Arc<Mutex<Vec<Option<usize>>>> {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = calls.clone();
        list.set_listener(move |index: Option<usize>| sink.lock().unwrap().push(index));
        calls
    }

    fn key(list: &mut Feed, code: KeyCode) -> Command<Message> {
        list.update(Message::KeyPress(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn render(list: &Feed, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| list.view(frame, frame.area())).unwrap();
        buffer_to_string(terminal.backend().buffer())
    }

    #[test]
    fn reaching_the_footer_requests_once() {
        let mut list = feed(20);
        let calls = recorded(&mut list);
        assert_eq!(list.row_count(), 21);

        key(&mut list, KeyCode::End);
        assert_eq!(*calls.lock().unwrap(), vec![Some(19)]);
        assert!(list.load_state().is_loading_more());
        assert_eq!(list.load_state().last_trigger_position(), Some(20));

        // More scrolling while the request is out changes nothing.
        list.update(Message::Scrolled(1));
        key(&mut list, KeyCode::Down);
        list.update(Message::Resized);
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn scrolling_short_of_the_footer_does_not_request() {
        let mut list = feed(20);
        let calls = recorded(&mut list);
        for _ in 0..5 {
            key(&mut list, KeyCode::Down);
        }
        list.update(Message::Scrolled(3));
        assert!(calls.lock().unwrap().is_empty());
        assert_eq!(list.phase(), LoadPhase::Idle);
    }

    #[test]
    fn upward_scroll_never_requests() {
        let mut list = feed(5);
        let calls = recorded(&mut list);
        // All five rows and the footer fit in the viewport.
        list.update(Message::Scrolled(-1));
        assert!(calls.lock().unwrap().is_empty());

        list.update(Message::Scrolled(0));
        assert_eq!(*calls.lock().unwrap(), vec![Some(4)]);
    }

    #[test]
    fn finished_page_moves_footer_past_new_rows() {
        let mut list = feed(20);
        let calls = recorded(&mut list);
        key(&mut list, KeyCode::End);
        assert_eq!(calls.lock().unwrap().len(), 1);

        let seen = ChangeQueue::new();
        list.register_row_observer(seen.clone());
        list.adapter_mut().unwrap().extend(page(20..30));
        list.notify_load_finished(true).unwrap();

        assert_eq!(list.row_count(), 31);
        assert_eq!(list.footer_index(), Some(30));
        assert_eq!(list.phase(), LoadPhase::Idle);
        assert_eq!(
            seen.drain(),
            vec![
                DataChange::RangeInserted { start: 20, count: 10 },
                DataChange::RangeChanged {
                    start: 30,
                    count: 1,
                    payload: None
                },
            ]
        );
        // The cursor stays on row 20, now the first new item.
        assert_eq!(list.selected(), Some(20));
    }

    #[test]
    fn exhausted_list_drops_footer() {
        let mut list = feed(20);
        recorded(&mut list);
        key(&mut list, KeyCode::End);

        let seen = ChangeQueue::new();
        list.register_row_observer(seen.clone());
        list.notify_load_finished(false).unwrap();

        assert_eq!(list.row_count(), 20);
        assert_eq!(list.footer_index(), None);
        assert_eq!(list.phase(), LoadPhase::Exhausted);
        assert_eq!(
            seen.drain(),
            vec![DataChange::RangeRemoved { start: 20, count: 1 }]
        );
        assert_eq!(list.selected(), Some(19));

        // Nothing fires once exhausted.
        list.update(Message::Scrolled(1));
        assert!(!list.load_state().is_loading_more());
    }

    #[test]
    fn always_policy_keeps_a_no_more_footer() {
        let mut list = feed(3).with_config(LoadMoreConfig {
            load_mode: LoadMode::Auto,
            footer_policy: FooterPolicy::Always,
        });
        recorded(&mut list);
        list.update(Message::Resized);
        assert!(list.load_state().is_loading_more());

        let seen = ChangeQueue::new();
        list.register_row_observer(seen.clone());
        list.notify_load_finished(false).unwrap();
        assert_eq!(list.row_count(), 4);
        assert_eq!(
            seen.drain(),
            vec![DataChange::RangeChanged {
                start: 3,
                count: 1,
                payload: None
            }]
        );
        assert!(render(&list, 30, 6).contains("No more data"));
    }

    #[test]
    fn reenabling_brings_the_footer_back() {
        let mut list = feed(3);
        list.set_load_more_enabled(false);
        assert_eq!(list.row_count(), 3);

        let seen = ChangeQueue::new();
        list.register_row_observer(seen.clone());
        list.set_load_more_enabled(true);
        assert_eq!(list.row_count(), 4);
        assert_eq!(list.phase(), LoadPhase::Idle);
        assert_eq!(
            seen.drain(),
            vec![DataChange::RangeInserted { start: 3, count: 1 }]
        );
    }

    #[test]
    fn manual_mode_waits_for_a_tap() {
        let mut list = feed(5).with_config(LoadMoreConfig {
            load_mode: LoadMode::Manual,
            footer_policy: FooterPolicy::WhileHasMore,
        });
        let calls = recorded(&mut list);

        list.update(Message::Scrolled(0));
        key(&mut list, KeyCode::End);
        assert!(calls.lock().unwrap().is_empty());
        assert!(render(&list, 40, 8).contains("Press Enter to load more"));

        key(&mut list, KeyCode::Enter);
        key(&mut list, KeyCode::Enter);
        list.update(Message::TapFooter);
        assert_eq!(*calls.lock().unwrap(), vec![Some(4)]);

        let screen = render(&list, 40, 8);
        assert!(screen.contains("Loading..."));
        assert!(!screen.contains("Press Enter"));
    }

    #[test]
    fn clicking_the_footer_taps_it() {
        let mut list = feed(5).with_config(LoadMoreConfig {
            load_mode: LoadMode::Manual,
            footer_policy: FooterPolicy::WhileHasMore,
        });
        let calls = recorded(&mut list);
        render(&list, 40, 8);

        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 10,
            row: 5,
            modifiers: KeyModifiers::NONE,
        };
        list.update(Message::Mouse(click));
        assert_eq!(*calls.lock().unwrap(), vec![Some(4)]);
        assert_eq!(list.selected(), Some(5));
    }

    #[test]
    fn enter_on_a_data_row_confirms() {
        let mut list = feed(5);
        key(&mut list, KeyCode::Down);
        let cmd = key(&mut list, KeyCode::Enter);
        assert!(matches!(cmd.into_message(), Some(Message::Confirm(1))));
    }

    #[test]
    fn missing_listener_is_a_no_op() {
        let mut list = feed(5);
        list.update(Message::Resized);
        key(&mut list, KeyCode::End);
        assert_eq!(list.phase(), LoadPhase::Idle);
        assert_eq!(list.load_state().last_trigger_position(), None);
    }

    #[test]
    fn message_listener_replies_with_load_more() {
        let mut list = feed(5);
        list.notify_on_load_more();
        let cmd = list.update(Message::Resized);
        assert!(matches!(cmd.into_message(), Some(Message::LoadMore(Some(4)))));
        assert!(list.load_state().is_loading_more());
    }

    #[test]
    fn empty_adapter_reports_no_data_index() {
        let mut list = feed(0);
        let calls = recorded(&mut list);
        list.update(Message::Resized);
        assert_eq!(*calls.lock().unwrap(), vec![None]);
    }

    #[test]
    fn finishing_without_adapter_fails() {
        let mut list: Feed = LoadMoreList::new();
        assert_eq!(list.notify_load_finished(true), Err(LoadMoreError::NoAdapter));
        assert_eq!(list.row_count(), 0);
        assert_eq!(list.selected(), None);
    }

    #[test]
    fn loading_override_blocks_requests() {
        let mut list = feed(5);
        let calls = recorded(&mut list);
        list.set_loading_in_progress(true);
        list.update(Message::Resized);
        assert!(calls.lock().unwrap().is_empty());

        list.set_loading_in_progress(false);
        list.update(Message::Resized);
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn cursor_follows_inserts_above_it() {
        let mut list = feed(10);
        list.update(Message::Select(3));
        list.adapter_mut().unwrap().insert(0, "Item -1".to_string());
        assert_eq!(list.selected(), Some(4));

        list.adapter_mut().unwrap().move_item(4, 0);
        assert_eq!(list.selected(), Some(0));
    }

    #[test]
    fn renders_rows_and_spinner_footer() {
        let list = feed(3);
        let screen = render(&list, 30, 6);
        let lines: Vec<&str> = screen.lines().collect();
        assert!(lines[0].starts_with("▸ Item 0"));
        assert!(lines[1].starts_with("  Item 1"));
        assert!(lines[3].contains("Loading..."));
        assert_eq!(list.last_visible_index(), Some(3));
    }

    #[test]
    fn changed_rows_are_redrawn() {
        let mut list = feed(3);
        render(&list, 30, 6);
        list.adapter_mut().unwrap().set(1, "Edited".to_string());
        assert!(render(&list, 30, 6).contains("Edited"));
    }

    #[test]
    fn spinner_ticks_only_while_footer_spins_on_screen() {
        let mut list = feed(3);
        render(&list, 30, 6);
        assert_eq!(list.subscriptions().len(), 1);

        list.set_load_more_enabled(false);
        render(&list, 30, 6);
        assert!(list.subscriptions().is_empty());

        // Footer below the fold.
        let list = feed(40);
        render(&list, 30, 6);
        assert!(list.subscriptions().is_empty());
    }

    #[test]
    fn wheel_scrolls_and_reaches_footer() {
        let mut list = feed(12);
        let calls = recorded(&mut list);
        render(&list, 30, 10);
        let wheel = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 1,
            row: 1,
            modifiers: KeyModifiers::NONE,
        };
        list.update(Message::Mouse(wheel));
        list.update(Message::Mouse(wheel));
        assert!(calls.lock().unwrap().is_empty());
        list.update(Message::Mouse(wheel));
        assert_eq!(list.offset(), 3);
        assert_eq!(*calls.lock().unwrap(), vec![Some(11)]);
    }

    #[test]
    fn selecting_the_footer_requests() {
        let mut list = feed(30);
        let calls = recorded(&mut list);
        list.update(Message::Select(30));
        assert_eq!(list.offset(), 21);
        assert_eq!(*calls.lock().unwrap(), vec![Some(29)]);
    }

    #[test]
    fn first_layout_with_visible_footer_requests() {
        let mut list = feed(3);
        let calls = recorded(&mut list);
        // The footer fits the default viewport, so ticks are already due.
        assert_eq!(list.subscriptions().len(), 1);

        assert!(render(&list, 30, 10).contains("Loading..."));
        list.update(Message::SpinnerTick);
        assert_eq!(*calls.lock().unwrap(), vec![Some(2)]);
        assert_eq!(list.phase(), LoadPhase::Loading);
    }

    #[test]
    fn short_page_leaves_footer_visible_and_requests_again() {
        let mut list = feed(3);
        let calls = recorded(&mut list);
        render(&list, 30, 10);
        list.update(Message::Resized);
        assert_eq!(*calls.lock().unwrap(), vec![Some(2)]);

        list.adapter_mut().unwrap().extend(page(3..5));
        list.notify_load_finished(true).unwrap();
        render(&list, 30, 10);
        list.update(Message::SpinnerTick);
        assert_eq!(*calls.lock().unwrap(), vec![Some(2), Some(4)]);
    }

    #[test]
    fn growing_viewport_rechecks_the_footer() {
        let mut list = feed(8);
        let calls = recorded(&mut list);
        render(&list, 30, 5);
        list.update(Message::SpinnerTick);
        assert!(calls.lock().unwrap().is_empty());

        render(&list, 30, 12);
        list.update(Message::SpinnerTick);
        assert_eq!(*calls.lock().unwrap(), vec![Some(7)]);
    }

    #[test]
    fn far_rows_are_released() {
        let mut list = feed(200);
        render(&list, 30, 10);
        for _ in 0..20 {
            key(&mut list, KeyCode::PageDown);
            render(&list, 30, 10);
        }
        assert!(list.offset() > 100);
        list.update(Message::SpinnerTick);
        assert!(list.rows.borrow().cached_count() <= 30);
        assert!(!list.rows.borrow().is_cached(0));
    }

    const HOST_PAGE: usize = 20;

    struct Host {
        feed: Feed,
        pages: usize,
    }

    #[derive(Debug)]
    enum HostMsg {
        Feed(Message),
        Loaded(Vec<String>),
    }

    impl Model for Host {
        type Message = HostMsg;
        type Flags = usize;

        fn init(pages: usize) -> (Self, Command<HostMsg>) {
            let mut feed = feed(HOST_PAGE);
            feed.notify_on_load_more();
            (Host { feed, pages }, Command::none())
        }

        fn update(&mut self, msg: HostMsg) -> Command<HostMsg> {
            match msg {
                HostMsg::Feed(Message::LoadMore(_)) => {
                    let start = self.feed.item_count();
                    Command::message(HostMsg::Loaded(page(start..start + HOST_PAGE)))
                }
                HostMsg::Feed(msg) => self.feed.update(msg).map(HostMsg::Feed),
                HostMsg::Loaded(rows) => {
                    self.feed.adapter_mut().unwrap().extend(rows);
                    let has_more = self.feed.item_count() < self.pages * HOST_PAGE;
                    self.feed.notify_load_finished(has_more).unwrap();
                    Command::none()
                }
            }
        }

        fn view(&self, frame: &mut Frame) {
            self.feed.view(frame, frame.area());
        }
    }

    fn press_end() -> HostMsg {
        HostMsg::Feed(Message::KeyPress(KeyEvent::new(
            KeyCode::End,
            KeyModifiers::NONE,
        )))
    }

    #[test]
    fn host_pages_through_to_the_end() {
        let mut prog = TestProgram::<Host>::new(3);
        prog.send(press_end());
        prog.drain_messages();

        let feed = &prog.model().feed;
        assert_eq!(feed.item_count(), 40);
        assert_eq!(feed.footer_index(), Some(40));
        assert_eq!(feed.phase(), LoadPhase::Idle);
        assert_eq!(feed.selected(), Some(20));
        assert!(prog.render_string(30, 12).contains("▸ Item 20"));

        prog.send(press_end());
        prog.drain_messages();
        let feed = &prog.model().feed;
        assert_eq!(feed.item_count(), 60);
        assert_eq!(feed.phase(), LoadPhase::Exhausted);
        assert_eq!(feed.row_count(), 60);
        assert!(!prog.render_string(30, 12).contains("Loading..."));
    }
}
