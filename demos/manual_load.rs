//! # Manual Load Example
//!
//! The footer waits for the user instead of loading on its own:
//! - `LoadMode::Manual` shows "Press Enter to load more" on the footer
//! - Enter on the footer, or a click on it, starts the request
//! - `FooterPolicy::Always` keeps a "No more data" footer once exhausted
//!
//! `m` switches between manual and auto loading (the window title follows),
//! `r` re-enables loading after the last page.
//!
//! Run with: `cargo run --example manual_load`

use std::time::Duration;

use loadmore::crossterm::event::{KeyCode, KeyModifiers};
use loadmore::ratatui::layout::{Constraint, Layout};
use loadmore::ratatui::style::{Color, Style};
use loadmore::ratatui::text::{Line, Span};
use loadmore::ratatui::widgets::{Block, Borders, Paragraph};
use loadmore::ratatui::Frame;
use loadmore::widgets::footer::{frames, FooterStyle};
use loadmore::widgets::list::{self, LoadMoreList};
use loadmore::widgets::{FooterPolicy, LoadMode, LoadMoreConfig, LoadPhase, VecAdapter};
use loadmore::{
    terminal_events, Command, Component, Model, ProgramOptions, Subscription, TerminalEvent,
};

const PAGE_SIZE: usize = 15;
const PAGES: usize = 3;

struct ManualLoad {
    feed: LoadMoreList<VecAdapter<String>>,
    page: usize,
}

#[derive(Debug)]
enum Msg {
    Feed(list::Message),
    PageLoaded(Vec<String>),
    ToggleMode,
    Restart,
    Quit,
}

fn rows(page: usize) -> Vec<String> {
    (page * PAGE_SIZE..(page + 1) * PAGE_SIZE)
        .map(|i| format!("Entry {i}"))
        .collect()
}

async fn fetch_page(page: usize) -> Vec<String> {
    loadmore::tokio::time::sleep(Duration::from_millis(700)).await;
    rows(page)
}

impl Model for ManualLoad {
    type Message = Msg;
    type Flags = ();

    fn init(_: ()) -> (Self, Command<Msg>) {
        let mut feed = LoadMoreList::new()
            .with_config(LoadMoreConfig {
                load_mode: LoadMode::Manual,
                footer_policy: FooterPolicy::Always,
            })
            .with_adapter(VecAdapter::new(rows(0)))
            .with_footer_style(FooterStyle {
                frames: frames::LINE,
                ..FooterStyle::default()
            })
            .with_block(Block::default().borders(Borders::ALL).title(" ManualLoad "));
        feed.notify_on_load_more();
        feed.focus();
        (
            ManualLoad { feed, page: 0 },
            Command::message(Msg::Feed(list::Message::Resized)),
        )
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::Feed(list::Message::LoadMore(_)) => {
                self.page += 1;
                Command::perform(fetch_page(self.page), Msg::PageLoaded)
            }
            Msg::Feed(m) => self.feed.update(m).map(Msg::Feed),
            Msg::PageLoaded(page) => {
                if let Some(adapter) = self.feed.adapter_mut() {
                    adapter.extend(page);
                }
                if let Err(err) = self.feed.notify_load_finished(self.page + 1 < PAGES) {
                    log::error!("{err}");
                }
                Command::none()
            }
            Msg::ToggleMode => {
                let mode = match self.feed.load_state().load_mode() {
                    LoadMode::Auto => LoadMode::Manual,
                    LoadMode::Manual => LoadMode::Auto,
                };
                self.feed.set_load_mode(mode);
                Command::batch([
                    Command::set_title(format!("ManualLoad [{mode:?}]")),
                    // Auto mode should not wait for the next scroll.
                    self.feed.update(list::Message::Resized).map(Msg::Feed),
                ])
            }
            Msg::Restart => {
                if self.feed.phase() == LoadPhase::Exhausted {
                    self.page = 0;
                    if let Some(adapter) = self.feed.adapter_mut() {
                        adapter.replace_all(rows(0));
                    }
                    self.feed.set_load_more_enabled(true);
                }
                Command::none()
            }
            Msg::Quit => Command::quit(),
        }
    }

    fn view(&self, frame: &mut Frame) {
        let [body, help] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());

        self.feed.view(frame, body);

        let key = Style::default().fg(Color::Cyan);
        let mode = format!("{:?}", self.feed.load_state().load_mode());
        let line = Line::from(vec![
            Span::styled(format!("[{mode}] "), Style::default().fg(Color::Yellow)),
            Span::styled("Enter", key),
            Span::raw(" load  "),
            Span::styled("m", key),
            Span::raw(" mode  "),
            Span::styled("r", key),
            Span::raw(" restart  "),
            Span::styled("q", key),
            Span::raw(" quit"),
        ]);
        frame.render_widget(Paragraph::new(line), help);
    }

    fn subscriptions(&self) -> Vec<Subscription<Msg>> {
        let mut subs = vec![terminal_events(|ev| match ev {
            TerminalEvent::Key(key) => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => Some(Msg::Quit),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(Msg::Quit)
                }
                KeyCode::Char('m') => Some(Msg::ToggleMode),
                KeyCode::Char('r') => Some(Msg::Restart),
                _ => Some(Msg::Feed(list::Message::KeyPress(key))),
            },
            TerminalEvent::Mouse(mouse) => Some(Msg::Feed(list::Message::Mouse(mouse))),
            TerminalEvent::Resize(..) => Some(Msg::Feed(list::Message::Resized)),
            _ => None,
        })];
        subs.extend(
            self.feed
                .subscriptions()
                .into_iter()
                .map(|sub| sub.map(Msg::Feed)),
        );
        subs
    }
}

#[loadmore::tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = ProgramOptions {
        mouse_capture: true,
        title: Some("ManualLoad".to_string()),
        ..ProgramOptions::default()
    };
    loadmore::run_with::<ManualLoad>((), options).await?;
    Ok(())
}
