//! Item and delegate traits used by [`VecAdapter`](crate::vec_adapter::VecAdapter).

use ratatui::style::{Color, Style};
use ratatui::text::Line;

/// Types that can be shown as a row of a [`VecAdapter`](crate::vec_adapter::VecAdapter).
///
/// ```ignore
/// struct Post { title: String, author: String }
///
/// impl list::Item for Post {
///     fn label(&self) -> &str { &self.title }
///     fn description(&self) -> Option<&str> { Some(&self.author) }
/// }
/// ```
pub trait Item: Send + 'static {
    /// Main text of the row.
    fn label(&self) -> &str;

    /// Optional second line, dimmed by the default delegate.
    fn description(&self) -> Option<&str> {
        None
    }
}

impl Item for String {
    fn label(&self) -> &str {
        self
    }
}

impl Item for &'static str {
    fn label(&self) -> &str {
        self
    }
}

/// Turns an item into the lines of its row.
///
/// Runs at bind time, so the output is cached until the adapter reports
/// the row as changed.
pub trait ItemDelegate<I: Item>: Send {
    fn render(&self, item: &I, index: usize) -> Vec<Line<'static>>;
}

impl<I, F> ItemDelegate<I> for F
where
    I: Item,
    F: Fn(&I, usize) -> Vec<Line<'static>> + Send,
{
    fn render(&self, item: &I, index: usize) -> Vec<Line<'static>> {
        self(item, index)
    }
}

/// Label on the first line, description dimmed on the second when present.
pub struct DefaultDelegate;

impl<I: Item> ItemDelegate<I> for DefaultDelegate {
    fn render(&self, item: &I, _index: usize) -> Vec<Line<'static>> {
        let mut lines = vec![Line::raw(item.label().to_string())];
        if let Some(desc) = item.description() {
            lines.push(Line::styled(
                desc.to_string(),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines
    }
}
