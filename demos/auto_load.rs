//! # Auto Load Example
//!
//! An infinite feed that fetches the next page as soon as the footer
//! scrolls into view:
//! - `notify_on_load_more` turns requests into `list::Message::LoadMore`
//! - the simulated fetch is a `Command::tick` that fires after a delay
//! - the result is appended and `notify_load_finished` closes the request
//!
//! Four pages of twenty rows exist; after that the footer goes away.
//! Set `LOADMORE_LOG=/tmp/loadmore.log` to capture debug logs.
//!
//! Run with: `cargo run --example auto_load`

use std::path::PathBuf;
use std::time::Duration;

use loadmore::crossterm::event::{KeyCode, KeyModifiers};
use loadmore::ratatui::layout::{Alignment, Constraint, Layout};
use loadmore::ratatui::style::{Color, Style};
use loadmore::ratatui::text::{Line, Span};
use loadmore::ratatui::widgets::{Block, Borders, Paragraph};
use loadmore::ratatui::Frame;
use loadmore::widgets::list::{self, LoadMoreList};
use loadmore::widgets::VecAdapter;
use loadmore::{
    terminal_events, Command, Component, Model, ProgramOptions, Subscription, TerminalEvent,
};

const PAGE_SIZE: usize = 20;
const PAGES: usize = 4;

struct AutoLoad {
    feed: LoadMoreList<VecAdapter<String>>,
    page: usize,
    status: String,
}

#[derive(Debug)]
enum Msg {
    Feed(list::Message),
    PageLoaded(Vec<String>),
    Quit,
}

fn rows(page: usize) -> Vec<String> {
    (page * PAGE_SIZE..(page + 1) * PAGE_SIZE)
        .map(|i| format!("Item {i}"))
        .collect()
}

/// Pretend to be a slow server.
fn fetch_page(page: usize) -> Command<Msg> {
    Command::tick(Duration::from_millis(1200), move |_| {
        Msg::PageLoaded(rows(page))
    })
}

impl Model for AutoLoad {
    type Message = Msg;
    type Flags = ();

    fn init(_: ()) -> (Self, Command<Msg>) {
        let mut feed = LoadMoreList::new()
            .with_adapter(VecAdapter::new(rows(0)))
            .with_block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        feed.notify_on_load_more();
        feed.focus();
        (
            AutoLoad {
                feed,
                page: 0,
                status: "Scroll down to load more".to_string(),
            },
            // Check the footer once the first frame is laid out.
            Command::message(Msg::Feed(list::Message::Resized)),
        )
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::Feed(list::Message::LoadMore(last)) => {
                self.page += 1;
                log::info!("page {} requested after row {last:?}", self.page);
                self.status = format!("Loading page {}...", self.page + 1);
                fetch_page(self.page)
            }
            Msg::Feed(list::Message::Confirm(index)) => {
                self.status = format!("Opened Item {index}");
                Command::none()
            }
            Msg::Feed(m) => self.feed.update(m).map(Msg::Feed),
            Msg::PageLoaded(page) => {
                if let Some(adapter) = self.feed.adapter_mut() {
                    adapter.extend(page);
                    if let Some(last) = adapter.items().last() {
                        self.status = format!("Loaded up to {last}");
                    }
                }
                let has_more = self.page + 1 < PAGES;
                if let Err(err) = self.feed.notify_load_finished(has_more) {
                    log::error!("{err}");
                }
                if !has_more {
                    self.status = "No more data".to_string();
                }
                Command::none()
            }
            Msg::Quit => Command::quit(),
        }
    }

    fn view(&self, frame: &mut Frame) {
        let [header, body, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(
            Paragraph::new("AutoLoad")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Cyan)),
            header,
        );

        self.feed.view(frame, body);

        let mut spans = vec![Span::styled(
            format!("{}  ", self.status),
            Style::default().fg(Color::Green),
        )];
        for (keys, what) in self.feed.key_bindings().help() {
            spans.push(Span::styled(keys, Style::default().fg(Color::Cyan)));
            spans.push(Span::raw(format!(" {what}  ")));
        }
        spans.push(Span::styled("q", Style::default().fg(Color::Cyan)));
        spans.push(Span::raw(" quit"));
        frame.render_widget(Paragraph::new(Line::from(spans)), footer);
    }

    fn subscriptions(&self) -> Vec<Subscription<Msg>> {
        let mut subs = vec![terminal_events(|ev| match ev {
            TerminalEvent::Key(key) => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => Some(Msg::Quit),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(Msg::Quit)
                }
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
        title: Some("AutoLoad".to_string()),
        log_file: std::env::var_os("LOADMORE_LOG").map(PathBuf::from),
        ..ProgramOptions::default()
    };
    loadmore::run_with::<AutoLoad>((), options).await?;
    Ok(())
}
