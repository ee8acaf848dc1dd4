//! Built-in subscription sources: terminal events and a repeating timer.

mod terminal;
mod timer;

pub use terminal::*;
pub use timer::*;
