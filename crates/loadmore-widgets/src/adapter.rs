//! The row-provider contract wrapped by the load-more list.

use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::notify::ChangeNotifier;

/// A bound, renderable row produced by an [`Adapter`].
pub trait RowView: Send {
    /// Height in terminal lines. Rows are laid out top to bottom.
    fn height(&self) -> u16 {
        1
    }

    /// Draw the row into `area`. Selection highlighting is applied by the
    /// list on top of whatever is drawn here.
    fn render(&self, frame: &mut Frame, area: Rect, selected: bool);
}

/// Provides the data rows of a list.
///
/// The list never mutates an adapter's data. It asks for counts, creates
/// views per view type, binds them to indices and listens on
/// [`notifier_mut`](Adapter::notifier_mut) for structural changes. Adapters
/// must announce every change they make there; rows that change silently
/// keep showing stale content.
///
/// # Example
///
/// ```ignore
/// struct Names { names: Vec<String>, notifier: ChangeNotifier }
///
/// impl Adapter for Names {
///     type View = TextRow;
///     fn item_count(&self) -> usize { self.names.len() }
///     fn create_view(&self, _view_type: u32) -> TextRow { TextRow::default() }
///     fn bind_view(&self, view: &mut TextRow, index: usize) {
///         view.set_lines(vec![Line::raw(self.names[index].clone())]);
///     }
///     fn notifier_mut(&mut self) -> &mut ChangeNotifier { &mut self.notifier }
/// }
/// ```
pub trait Adapter: Send + 'static {
    /// The view type this adapter creates and binds.
    type View: RowView;

    /// Number of data rows.
    fn item_count(&self) -> usize;

    /// View type of the row at `index`. Rows only reuse views of the same type.
    fn item_view_type(&self, _index: usize) -> u32 {
        0
    }

    /// Create an unbound view for `view_type`.
    fn create_view(&self, view_type: u32) -> Self::View;

    /// Fill `view` with the content of row `index`.
    fn bind_view(&self, view: &mut Self::View, index: usize);

    /// Partial rebind after a change carrying a payload. Defaults to a full bind.
    fn bind_view_with_payload(&self, view: &mut Self::View, index: usize, _payload: &str) {
        self.bind_view(view, index);
    }

    /// The channel this adapter announces its changes on.
    fn notifier_mut(&mut self) -> &mut ChangeNotifier;
}

/// A plain multi-line text row.
#[derive(Debug, Clone, Default)]
pub struct TextRow {
    lines: Vec<Line<'static>>,
}

impl TextRow {
    pub fn new(lines: Vec<Line<'static>>) -> Self {
        Self { lines }
    }

    pub fn set_lines(&mut self, lines: Vec<Line<'static>>) {
        self.lines = lines;
    }

    pub fn lines(&self) -> &[Line<'static>] {
        &self.lines
    }
}

impl RowView for TextRow {
    fn height(&self) -> u16 {
        self.lines.len().clamp(1, u16::MAX as usize) as u16
    }

    fn render(&self, frame: &mut Frame, area: Rect, _selected: bool) {
        frame.render_widget(Paragraph::new(self.lines.clone()), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_row_still_takes_a_line() {
        assert_eq!(TextRow::default().height(), 1);
    }

    #[test]
    fn text_row_height_follows_lines() {
        let row = TextRow::new(vec![Line::raw("Item 1"), Line::raw("details")]);
        assert_eq!(row.height(), 2);
        assert_eq!(row.lines().len(), 2);
    }
}
