//! Runtime for the **loadmore** list widgets.
//!
//! `loadmore-core` is a small [Elm Architecture] runtime on top of
//! [`ratatui`] and [`crossterm`]: applications are an **init -> update ->
//! view** cycle, and side effects such as fetching the next page of rows are
//! returned as [`Command`]s instead of being run inline.
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Model`] | Top-level application trait (init / update / view) |
//! | [`Component`] | Reusable sub-model that renders into a [`ratatui::layout::Rect`] |
//! | [`Command`] | Side effect executed by the runtime |
//! | [`Subscription`] | Long-lived event source (terminal events, timers) |
//! | [`Program`] | Drives a [`Model`] on a real terminal |
//! | [`TestProgram`](testing::TestProgram) | Headless harness for tests |
//!
//! [Elm Architecture]: https://guide.elm-lang.org/architecture/

pub mod command;
pub mod component;
pub mod event;
pub mod model;
pub mod runtime;
pub mod subscription;
pub mod subscriptions;
pub mod testing;

pub use command::{Command, TerminalCommand};
pub use component::Component;
pub use event::TerminalEvent;
pub use model::Model;
pub use runtime::{init_file_logger, log_to_file, Program, ProgramError, ProgramOptions};
pub use subscription::{subscribe, Subscription, SubscriptionId, SubscriptionSource};
pub use subscriptions::{terminal_events, Every};

/// Run a model with default options.
pub async fn run<M: Model>(flags: M::Flags) -> Result<M, ProgramError> {
    Program::<M>::new(flags)?.run().await
}

/// Run a model with custom options.
pub async fn run_with<M: Model>(
    flags: M::Flags,
    options: ProgramOptions,
) -> Result<M, ProgramError> {
    Program::<M>::with_options(flags, options)?.run().await
}
