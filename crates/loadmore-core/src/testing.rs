use crate::command::{Command, CommandInner};
use crate::model::Model;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::Terminal;

/// A headless harness that drives a [`Model`] without a real terminal.
///
/// Synchronous commands ([`Command::message`]) are queued and flushed with
/// [`drain_messages`](TestProgram::drain_messages). Async and terminal
/// commands are ignored, which is exactly what widget tests want: a
/// load-more request shows up as a message, while the page fetch it would
/// start never runs.
///
/// ```rust,ignore
/// let mut prog = TestProgram::<Feed>::new(20);
/// prog.send(Msg::List(list::Message::Scrolled(5)));
/// prog.drain_messages();
/// assert!(prog.render_string(30, 10).contains("Loading..."));
/// ```
pub struct TestProgram<M: Model> {
    model: M,
    pending_messages: Vec<M::Message>,
}

impl<M: Model> TestProgram<M> {
    /// Call [`Model::init`] and queue its synchronous messages.
    pub fn new(flags: M::Flags) -> Self {
        let (model, init_cmd) = M::init(flags);
        let mut program = Self {
            model,
            pending_messages: Vec::new(),
        };
        program.collect_sync_messages(init_cmd);
        program
    }

    /// Run a single update cycle.
    pub fn send(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.collect_sync_messages(cmd);
    }

    /// Process queued messages until no new ones are produced.
    pub fn drain_messages(&mut self) {
        while !self.pending_messages.is_empty() {
            let messages: Vec<_> = self.pending_messages.drain(..).collect();
            for msg in messages {
                let cmd = self.model.update(msg);
                self.collect_sync_messages(cmd);
            }
        }
    }

    /// Number of queued, not yet processed messages.
    pub fn pending(&self) -> usize {
        self.pending_messages.len()
    }

    /// Shared access to the model for assertions.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutable access for arranging state outside the message flow.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Render to a ratatui [`Buffer`] of the given size.
    pub fn render(&self, width: u16, height: u16) -> Buffer {
        let backend = ratatui::backend::TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).expect("test backend is infallible");
        terminal
            .draw(|frame| self.model.view(frame))
            .expect("test backend is infallible");
        terminal.backend().buffer().clone()
    }

    /// Render and return the screen as newline-separated rows.
    pub fn render_string(&self, width: u16, height: u16) -> String {
        buffer_to_string(&self.render(width, height))
    }

    fn collect_sync_messages(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::Message(msg) => self.pending_messages.push(msg),
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.collect_sync_messages(cmd);
                }
            }
            CommandInner::None
            | CommandInner::Quit
            | CommandInner::Future(_)
            | CommandInner::Terminal(_) => {}
        }
    }
}

/// Flatten a buffer into newline-separated rows, trailing spaces kept.
pub fn buffer_to_string(buf: &Buffer) -> String {
    let area: Rect = buf.area;
    let mut output = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            output.push_str(buf[(x, y)].symbol());
        }
        if y + 1 < area.bottom() {
            output.push('\n');
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::widgets::Paragraph;

    struct Pager {
        pages: Vec<u32>,
    }

    #[derive(Debug)]
    enum PagerMsg {
        Request(u32),
        Loaded(u32),
    }

    impl Model for Pager {
        type Message = PagerMsg;
        type Flags = u32;

        fn init(first: u32) -> (Self, Command<PagerMsg>) {
            (Pager { pages: vec![] }, Command::message(PagerMsg::Loaded(first)))
        }

        fn update(&mut self, msg: PagerMsg) -> Command<PagerMsg> {
            match msg {
                PagerMsg::Request(n) => Command::message(PagerMsg::Loaded(n)),
                PagerMsg::Loaded(n) => {
                    self.pages.push(n);
                    Command::none()
                }
            }
        }

        fn view(&self, frame: &mut ratatui::Frame) {
            frame.render_widget(Paragraph::new(format!("pages: {:?}", self.pages)), frame.area());
        }
    }

    #[test]
    fn init_messages_are_queued_until_drained() {
        let mut prog = TestProgram::<Pager>::new(0);
        assert_eq!(prog.pending(), 1);
        assert!(prog.model().pages.is_empty());
        prog.drain_messages();
        assert_eq!(prog.model().pages, vec![0]);
    }

    #[test]
    fn chained_messages_run_to_completion() {
        let mut prog = TestProgram::<Pager>::new(0);
        prog.send(PagerMsg::Request(1));
        prog.drain_messages();
        assert_eq!(prog.model().pages, vec![0, 1]);
    }

    #[test]
    fn render_string_shows_model() {
        let mut prog = TestProgram::<Pager>::new(4);
        prog.drain_messages();
        let screen = prog.render_string(20, 2);
        assert!(screen.starts_with("pages: [4]"));
        assert_eq!(screen.lines().count(), 2);
    }
}
