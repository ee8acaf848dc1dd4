//! Key bindings of the load-more list.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// One key with the modifiers it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyPress {
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub const fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    /// Extra modifiers on the event are tolerated, so `G` matches with or
    /// without Shift reported.
    fn matches(&self, event: &KeyEvent) -> bool {
        self.code == event.code && event.modifiers.contains(self.modifiers)
    }

    fn label(&self) -> String {
        let key = match self.code {
            KeyCode::Up => "↑".to_string(),
            KeyCode::Down => "↓".to_string(),
            KeyCode::PageUp => "PgUp".to_string(),
            KeyCode::PageDown => "PgDn".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            other => format!("{other:?}"),
        };
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{key}")
        } else {
            key
        }
    }
}

/// A named action bound to any of several keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    keys: Vec<KeyPress>,
    pub description: String,
}

impl KeyBinding {
    pub fn new(keys: impl IntoIterator<Item = KeyPress>, description: impl Into<String>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            description: description.into(),
        }
    }

    /// A binding no key triggers.
    pub fn unbound(description: impl Into<String>) -> Self {
        Self::new(Vec::new(), description)
    }

    pub fn keys(&self) -> &[KeyPress] {
        &self.keys
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.keys.iter().any(|k| k.matches(event))
    }

    /// Keys joined with `/`, e.g. `↓/j`.
    pub fn key_label(&self) -> String {
        self.keys
            .iter()
            .map(KeyPress::label)
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// What a key press asks the list to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAction {
    Up,
    Down,
    PageUp,
    PageDown,
    First,
    Last,
    /// Confirm the selected row, or tap the footer when it is selected.
    Activate,
}

/// Keys of a [`LoadMoreList`](crate::list::LoadMoreList).
///
/// ```ignore
/// let mut keys = LoadMoreKeyBindings::default();
/// keys.activate = KeyBinding::new([KeyPress::plain(KeyCode::Char(' '))], "load");
/// ```
#[derive(Debug, Clone)]
pub struct LoadMoreKeyBindings {
    /// Default: Up, k
    pub up: KeyBinding,
    /// Default: Down, j
    pub down: KeyBinding,
    /// Default: PageUp, Ctrl+U
    pub page_up: KeyBinding,
    /// Default: PageDown, Ctrl+D
    pub page_down: KeyBinding,
    /// Default: Home, g
    pub first: KeyBinding,
    /// Default: End, G
    pub last: KeyBinding,
    /// Default: Enter
    pub activate: KeyBinding,
}

impl Default for LoadMoreKeyBindings {
    fn default() -> Self {
        use KeyCode::*;
        Self {
            up: KeyBinding::new([KeyPress::plain(Up), KeyPress::plain(Char('k'))], "up"),
            down: KeyBinding::new([KeyPress::plain(Down), KeyPress::plain(Char('j'))], "down"),
            page_up: KeyBinding::new(
                [KeyPress::plain(PageUp), KeyPress::ctrl(Char('u'))],
                "page up",
            ),
            page_down: KeyBinding::new(
                [KeyPress::plain(PageDown), KeyPress::ctrl(Char('d'))],
                "page down",
            ),
            first: KeyBinding::new([KeyPress::plain(Home), KeyPress::plain(Char('g'))], "top"),
            last: KeyBinding::new([KeyPress::plain(End), KeyPress::plain(Char('G'))], "bottom"),
            activate: KeyBinding::new([KeyPress::plain(Enter)], "open / load more"),
        }
    }
}

impl LoadMoreKeyBindings {
    /// Resolve a key event. Earlier bindings win when keys overlap.
    pub fn action(&self, event: &KeyEvent) -> Option<ListAction> {
        [
            (&self.up, ListAction::Up),
            (&self.down, ListAction::Down),
            (&self.page_up, ListAction::PageUp),
            (&self.page_down, ListAction::PageDown),
            (&self.first, ListAction::First),
            (&self.last, ListAction::Last),
            (&self.activate, ListAction::Activate),
        ]
        .into_iter()
        .find(|(binding, _)| binding.matches(event))
        .map(|(_, action)| action)
    }

    /// `key description` pairs for a help line.
    pub fn help(&self) -> Vec<(String, &str)> {
        [
            &self.up,
            &self.down,
            &self.page_down,
            &self.last,
            &self.activate,
        ]
        .into_iter()
        .filter(|b| !b.keys.is_empty())
        .map(|b| (b.key_label(), b.description.as_str()))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn defaults_resolve_navigation() {
        let keys = LoadMoreKeyBindings::default();
        assert_eq!(keys.action(&key(KeyCode::Down)), Some(ListAction::Down));
        assert_eq!(keys.action(&key(KeyCode::Char('k'))), Some(ListAction::Up));
        assert_eq!(keys.action(&key(KeyCode::Enter)), Some(ListAction::Activate));
        assert_eq!(keys.action(&key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn shifted_capital_still_matches() {
        let keys = LoadMoreKeyBindings::default();
        let shifted = KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT);
        assert_eq!(keys.action(&shifted), Some(ListAction::Last));
    }

    #[test]
    fn ctrl_bindings_need_ctrl() {
        let keys = LoadMoreKeyBindings::default();
        assert_eq!(keys.action(&key(KeyCode::Char('d'))), None);
        let ctrl_d = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL);
        assert_eq!(keys.action(&ctrl_d), Some(ListAction::PageDown));
    }

    #[test]
    fn unbound_never_matches() {
        let mut keys = LoadMoreKeyBindings::default();
        keys.activate = KeyBinding::unbound("load more");
        assert_eq!(keys.action(&key(KeyCode::Enter)), None);
        assert!(keys.help().iter().all(|(_, desc)| *desc != "load more"));
    }

    #[test]
    fn labels_join_keys() {
        let keys = LoadMoreKeyBindings::default();
        assert_eq!(keys.down.key_label(), "↓/j");
        assert_eq!(keys.page_up.key_label(), "PgUp/Ctrl+u");
    }
}
