use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A side effect returned from [`Model::update`](crate::Model::update) or
/// [`Component::update`](crate::Component::update).
///
/// Commands are how a list asks the outside world for something: an
/// immediate follow-up message, an async page fetch, a terminal tweak, or
/// program exit.
///
/// # Examples
///
/// ```rust,ignore
/// // Nothing to do:
/// let cmd = Command::none();
///
/// // Fetch the next page and hand the rows back to update:
/// let cmd = Command::perform(fetch_page(page), Msg::PageLoaded);
///
/// // Quit the program:
/// let cmd = Command::quit();
/// ```
pub struct Command<Msg: Send + 'static> {
    pub(crate) inner: CommandInner<Msg>,
}

pub(crate) enum CommandInner<Msg: Send + 'static> {
    None,
    Message(Msg),
    Quit,
    Future(BoxFuture<'static, Msg>),
    Batch(Vec<Command<Msg>>),
    Terminal(TerminalCommand),
}

/// Terminal management commands executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCommand {
    /// Set the terminal window title.
    SetTitle(String),
}

impl<Msg: Send + 'static> Command<Msg> {
    /// No-op command.
    pub fn none() -> Self {
        Command {
            inner: CommandInner::None,
        }
    }

    /// Deliver a message on the next turn of the event loop.
    pub fn message(msg: Msg) -> Self {
        Command {
            inner: CommandInner::Message(msg),
        }
    }

    /// Quit the program.
    pub fn quit() -> Self {
        Command {
            inner: CommandInner::Quit,
        }
    }

    /// Run an async future on the runtime and map its output to a message.
    pub fn perform<F, T>(future: F, map: impl FnOnce(T) -> Msg + Send + 'static) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Command {
            inner: CommandInner::Future(Box::pin(async move { map(future.await) })),
        }
    }

    /// One-shot timer: fires once after `duration`.
    pub fn tick(duration: Duration, map: impl FnOnce(Instant) -> Msg + Send + 'static) -> Self {
        Command {
            inner: CommandInner::Future(Box::pin(async move {
                tokio::time::sleep(duration).await;
                map(Instant::now())
            })),
        }
    }

    /// Run several commands concurrently.
    pub fn batch(cmds: impl IntoIterator<Item = Command<Msg>>) -> Self {
        let mut cmds: Vec<_> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Command::none(),
            1 => cmds.pop().unwrap_or_else(Command::none),
            _ => Command {
                inner: CommandInner::Batch(cmds),
            },
        }
    }

    /// Terminal management command.
    pub fn terminal(cmd: TerminalCommand) -> Self {
        Command {
            inner: CommandInner::Terminal(cmd),
        }
    }

    /// Set the terminal window title.
    pub fn set_title(title: impl Into<String>) -> Self {
        Command::terminal(TerminalCommand::SetTitle(title.into()))
    }

    /// Transform the message type (for component composition).
    pub fn map<NewMsg: Send + 'static>(
        self,
        f: impl Fn(Msg) -> NewMsg + Send + Sync + 'static,
    ) -> Command<NewMsg> {
        self.map_with(Arc::new(f))
    }

    fn map_with<NewMsg: Send + 'static>(
        self,
        f: Arc<dyn Fn(Msg) -> NewMsg + Send + Sync>,
    ) -> Command<NewMsg> {
        match self.inner {
            CommandInner::None => Command::none(),
            CommandInner::Message(msg) => Command::message(f(msg)),
            CommandInner::Quit => Command::quit(),
            CommandInner::Future(fut) => Command {
                inner: CommandInner::Future(Box::pin(async move { f(fut.await) })),
            },
            CommandInner::Batch(cmds) => Command {
                inner: CommandInner::Batch(
                    cmds.into_iter().map(|cmd| cmd.map_with(f.clone())).collect(),
                ),
            },
            CommandInner::Terminal(tcmd) => Command::terminal(tcmd),
        }
    }

    // --- Inspection (handy in widget tests) ---

    /// Returns `true` if this is a no-op command.
    pub fn is_none(&self) -> bool {
        matches!(self.inner, CommandInner::None)
    }

    /// If this command is an immediate message, return it.
    pub fn into_message(self) -> Option<Msg> {
        match self.inner {
            CommandInner::Message(msg) => Some(msg),
            _ => None,
        }
    }

    /// If this command is a batch, return the inner commands.
    pub fn into_batch(self) -> Option<Vec<Command<Msg>>> {
        match self.inner {
            CommandInner::Batch(cmds) => Some(cmds),
            _ => None,
        }
    }
}
