use crate::command::{Command, CommandInner, TerminalCommand};
use crate::model::Model;
use crate::subscription::SubscriptionManager;
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use log::LevelFilter;
use ratatui::{backend::CrosstermBackend, Terminal};
use simplelog::{Config, WriteLogger};
use std::fs::File;
use std::io::{self, stdout, Stdout};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Errors that can occur while initializing or running a [`Program`].
#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    /// An I/O error from terminal setup, rendering, teardown or the log file.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// A global logger was already installed by someone else.
    #[error("logger already installed: {0}")]
    Logger(#[from] log::SetLoggerError),
}

/// Configuration options for a [`Program`].
///
/// Override only what you need with struct update syntax:
///
/// ```rust,ignore
/// let opts = ProgramOptions {
///     mouse_capture: true,
///     title: Some("auto load".into()),
///     log_file: Some("loadmore.log".into()),
///     ..ProgramOptions::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ProgramOptions {
    /// Target frames per second (default: 60, clamped to 1..=120).
    pub fps: u32,
    /// Start in the alternate screen (default: true).
    pub alt_screen: bool,
    /// Capture mouse wheel and clicks (default: false).
    pub mouse_capture: bool,
    /// Terminal title.
    pub title: Option<String>,
    /// Restore the terminal from a panic hook (default: true).
    pub catch_panics: bool,
    /// Quit on Ctrl+C delivered as a signal (default: true).
    pub handle_signals: bool,
    /// Append `log` records to this file (see [`init_file_logger`]).
    pub log_file: Option<PathBuf>,
    /// Maximum level written to `log_file` (default: `Debug`).
    pub log_level: LevelFilter,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            fps: 60,
            alt_screen: true,
            mouse_capture: false,
            title: None,
            catch_panics: true,
            handle_signals: true,
            log_file: None,
            log_level: LevelFilter::Debug,
        }
    }
}

/// The program runtime: terminal setup, event loop and [`Model`] lifecycle.
///
/// ```rust,ignore
/// #[tokio::main]
/// async fn main() -> Result<(), ProgramError> {
///     let feed = Program::<Feed>::new(())?.run().await?;
///     Ok(())
/// }
/// ```
pub struct Program<M: Model> {
    model: M,
    terminal: Terminal<CrosstermBackend<Stdout>>,
    msg_tx: mpsc::UnboundedSender<M::Message>,
    msg_rx: mpsc::UnboundedReceiver<M::Message>,
    subscriptions: SubscriptionManager<M::Message>,
    options: ProgramOptions,
    needs_redraw: bool,
    should_quit: bool,
}

impl<M: Model> Program<M> {
    /// Create a program with default options.
    pub fn new(flags: M::Flags) -> Result<Self, ProgramError> {
        Self::with_options(flags, ProgramOptions::default())
    }

    /// Create a program with custom options.
    ///
    /// Must be called from within a tokio runtime: the initial command and
    /// subscriptions are spawned right away.
    pub fn with_options(flags: M::Flags, options: ProgramOptions) -> Result<Self, ProgramError> {
        if let Some(ref path) = options.log_file {
            init_file_logger(path, options.log_level)?;
        }

        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let (model, init_cmd) = M::init(flags);
        let terminal = init_terminal(&options)?;

        let mut program = Self {
            model,
            terminal,
            subscriptions: SubscriptionManager::new(msg_tx.clone()),
            msg_tx,
            msg_rx,
            options,
            needs_redraw: true,
            should_quit: false,
        };
        log::debug!("program initialized");

        program.execute_command(init_cmd);
        let subs = program.model.subscriptions();
        program.subscriptions.reconcile(subs);
        Ok(program)
    }

    /// Run until quit, then restore the terminal and return the final model.
    pub async fn run(mut self) -> Result<M, ProgramError> {
        let result = self.event_loop().await;
        log::debug!("shutting down");
        self.subscriptions.shutdown();
        restore_terminal(self.options.alt_screen)?;
        result.map(|()| self.model)
    }

    async fn event_loop(&mut self) -> Result<(), ProgramError> {
        self.render()?;

        let fps = self.options.fps.clamp(1, 120);
        let mut frame_interval = tokio::time::interval(Duration::from_secs_f64(1.0 / fps as f64));
        frame_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let handle_signals = self.options.handle_signals;

        loop {
            if self.should_quit {
                return Ok(());
            }

            tokio::select! {
                biased;

                _ = tokio::signal::ctrl_c(), if handle_signals => {
                    log::debug!("received ctrl+c signal");
                    return Ok(());
                }

                Some(msg) = self.msg_rx.recv() => {
                    self.process_message(msg);
                    // Drain whatever is already queued before the next frame.
                    while let Ok(msg) = self.msg_rx.try_recv() {
                        self.process_message(msg);
                        if self.should_quit {
                            break;
                        }
                    }
                }

                _ = frame_interval.tick() => {
                    if self.needs_redraw {
                        self.render()?;
                        self.needs_redraw = false;
                    }
                }
            }
        }
    }

    fn process_message(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.execute_command(cmd);
        let subs = self.model.subscriptions();
        self.subscriptions.reconcile(subs);
        self.needs_redraw = true;
    }

    fn execute_command(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Message(msg) => {
                let _ = self.msg_tx.send(msg);
            }
            CommandInner::Quit => self.should_quit = true,
            CommandInner::Future(fut) => {
                let tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    let _ = tx.send(fut.await);
                });
            }
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.execute_command(cmd);
                }
            }
            CommandInner::Terminal(tcmd) => {
                if let Err(err) = execute_terminal_command(tcmd) {
                    log::warn!("terminal command failed: {err}");
                }
            }
        }
    }

    fn render(&mut self) -> Result<(), ProgramError> {
        self.terminal.draw(|frame| self.model.view(frame))?;
        Ok(())
    }
}

fn execute_terminal_command(cmd: TerminalCommand) -> io::Result<()> {
    let mut out = stdout();
    match cmd {
        TerminalCommand::SetTitle(title) => execute!(out, SetTitle(title)),
    }
}

fn init_terminal(options: &ProgramOptions) -> Result<Terminal<CrosstermBackend<Stdout>>, ProgramError> {
    if options.catch_panics {
        use std::sync::Once;
        static HOOK_INSTALLED: Once = Once::new();
        let alt_screen = options.alt_screen;
        HOOK_INSTALLED.call_once(|| {
            let original_hook = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                let _ = restore_terminal(alt_screen);
                original_hook(info);
            }));
        });
    }

    enable_raw_mode()?;
    let mut out = stdout();
    if options.alt_screen {
        execute!(out, EnterAlternateScreen)?;
    }
    if options.mouse_capture {
        execute!(out, EnableMouseCapture)?;
    }
    if let Some(ref title) = options.title {
        execute!(out, SetTitle(title))?;
    }
    execute!(out, cursor::Hide)?;

    Ok(Terminal::new(CrosstermBackend::new(out))?)
}

fn restore_terminal(alt_screen: bool) -> io::Result<()> {
    // Best effort: keep restoring even when one step fails.
    let raw = disable_raw_mode();
    let mut out = stdout();
    execute!(out, DisableMouseCapture).ok();
    execute!(out, cursor::Show).ok();
    if alt_screen {
        execute!(out, LeaveAlternateScreen).ok();
    }
    raw
}

/// Open a log file in append mode.
pub fn log_to_file(path: impl AsRef<Path>) -> io::Result<File> {
    std::fs::OpenOptions::new().create(true).append(true).open(path)
}

/// Install a `simplelog` [`WriteLogger`] appending to `path` as the global
/// `log` backend.
///
/// A TUI owns stdout, so `log` output from widgets (load-more triggers,
/// footer refreshes, missing listeners) has to go somewhere else.
pub fn init_file_logger(path: impl AsRef<Path>, level: LevelFilter) -> Result<(), ProgramError> {
    WriteLogger::init(level, Config::default(), log_to_file(path)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Log;

    #[test]
    fn default_options() {
        let opts = ProgramOptions::default();
        assert_eq!(opts.fps, 60);
        assert!(opts.alt_screen);
        assert!(!opts.mouse_capture);
        assert!(opts.log_file.is_none());
    }

    #[test]
    fn file_logger_respects_level() {
        let path = std::env::temp_dir().join(format!("loadmore-log-{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let logger = WriteLogger::new(
            LevelFilter::Info,
            Config::default(),
            log_to_file(&path).unwrap(),
        );

        logger.log(
            &log::Record::builder()
                .level(log::Level::Warn)
                .target("loadmore")
                .args(format_args!("no load-more listener registered"))
                .build(),
        );
        logger.log(
            &log::Record::builder()
                .level(log::Level::Debug)
                .target("loadmore")
                .args(format_args!("footer refreshed"))
                .build(),
        );
        logger.flush();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("no load-more listener registered"));
        assert!(!written.contains("footer refreshed"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn log_file_appends() {
        let path =
            std::env::temp_dir().join(format!("loadmore-append-{}.log", std::process::id()));
        std::fs::write(&path, "first\n").unwrap();
        {
            use std::io::Write;
            let mut file = log_to_file(&path).unwrap();
            writeln!(file, "second").unwrap();
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
        let _ = std::fs::remove_file(&path);
    }
}
