//! The synthetic footer row: what it shows and how it is drawn.

use std::time::Duration;

use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::state::{LoadMode, LoadMoreState};

/// Built-in spinner frame sets for the loading footer.
pub mod frames {
    /// Braille dots.
    pub const DOTS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    /// ASCII line: |, /, -, \.
    pub const LINE: &[&str] = &["|", "/", "-", "\\"];
    /// Growing ellipsis.
    pub const ELLIPSIS: &[&str] = &["   ", ".  ", ".. ", "..."];
}

/// Text hint shown in the footer instead of, or next to, the spinner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterHint {
    /// Nothing left to load.
    NoMore,
    /// Manual mode, idle: activate to load.
    TapToLoad,
}

/// What the footer shows. Derived from [`LoadMoreState`], never stored
/// anywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FooterRenderState {
    pub spinner: bool,
    pub hint: Option<FooterHint>,
    /// Whether activating the footer starts a request.
    pub tappable: bool,
}

impl FooterRenderState {
    pub fn derive(state: &LoadMoreState) -> Self {
        if !state.has_more() {
            return Self {
                spinner: false,
                hint: Some(FooterHint::NoMore),
                tappable: false,
            };
        }
        match state.load_mode() {
            LoadMode::Auto => Self {
                spinner: true,
                hint: None,
                tappable: false,
            },
            LoadMode::Manual if state.is_loading_more() => Self {
                spinner: true,
                hint: None,
                tappable: false,
            },
            LoadMode::Manual => Self {
                spinner: false,
                hint: Some(FooterHint::TapToLoad),
                tappable: true,
            },
        }
    }
}

/// Footer row as bound by the footer adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FooterRow {
    state: FooterRenderState,
}

impl FooterRow {
    pub fn new(state: FooterRenderState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> FooterRenderState {
        self.state
    }

    pub(crate) fn bind(&mut self, state: FooterRenderState) {
        self.state = state;
    }
}

/// Appearance of the footer.
#[derive(Debug, Clone)]
pub struct FooterStyle {
    pub frames: &'static [&'static str],
    /// Time between spinner frames.
    pub interval: Duration,
    pub spinner: Style,
    pub loading_text: String,
    pub no_more_text: String,
    pub tap_text: String,
    pub hint: Style,
    pub tap: Style,
}

impl Default for FooterStyle {
    fn default() -> Self {
        Self {
            frames: frames::DOTS,
            interval: Duration::from_millis(100),
            spinner: Style::default().fg(Color::Cyan),
            loading_text: "Loading...".to_string(),
            no_more_text: "No more data".to_string(),
            tap_text: "Press Enter to load more".to_string(),
            hint: Style::default().fg(Color::DarkGray),
            tap: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        }
    }
}

/// Draw a footer row centred in `area`.
pub(crate) fn render_footer(
    frame: &mut Frame,
    area: Rect,
    row: &FooterRow,
    style: &FooterStyle,
    frame_index: usize,
) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let state = row.state();
    let mut spans = Vec::new();
    if state.spinner && !style.frames.is_empty() {
        let glyph = style.frames[frame_index % style.frames.len()];
        spans.push(Span::styled(glyph, style.spinner));
        if !style.loading_text.is_empty() {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(style.loading_text.as_str(), style.spinner));
        }
    }
    match state.hint {
        Some(FooterHint::NoMore) => spans.push(Span::styled(style.no_more_text.as_str(), style.hint)),
        Some(FooterHint::TapToLoad) => spans.push(Span::styled(style.tap_text.as_str(), style.tap)),
        None => {}
    }

    let line = Line::from(spans);
    let text_width = line.width();
    // Left-align when the text does not fit, so its start stays visible.
    let alignment = if text_width > area.width as usize {
        Alignment::Left
    } else {
        Alignment::Center
    };
    frame.render_widget(Paragraph::new(line).alignment(alignment), area);
}
