use crossterm::event::{KeyEvent, MouseEvent};

/// Terminal events produced by the runtime's event loop.
///
/// Delivered through the [`terminal_events`](crate::subscriptions::terminal_events)
/// subscription. Lists care mostly about keys (cursor navigation, footer
/// activation) and mouse events (wheel scrolling, clicks).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    /// A keyboard event.
    Key(KeyEvent),
    /// A mouse event.
    Mouse(MouseEvent),
    /// Terminal resized to (columns, rows).
    Resize(u16, u16),
    /// Bracketed paste content.
    Paste(String),
    /// Focus gained or lost.
    Focus(bool),
}

impl From<crossterm::event::Event> for TerminalEvent {
    fn from(event: crossterm::event::Event) -> Self {
        use crossterm::event::Event;
        match event {
            Event::Key(k) => TerminalEvent::Key(k),
            Event::Mouse(m) => TerminalEvent::Mouse(m),
            Event::Resize(w, h) => TerminalEvent::Resize(w, h),
            Event::Paste(s) => TerminalEvent::Paste(s),
            Event::FocusGained => TerminalEvent::Focus(true),
            Event::FocusLost => TerminalEvent::Focus(false),
        }
    }
}
