//! **loadmore**: infinite-scroll lists for [`ratatui`] applications.
//!
//! Umbrella crate over the runtime and the widgets:
//!
//! ```toml
//! [dependencies]
//! loadmore = "0.1"
//! ```
//!
//! * Everything public in [`loadmore_core`] is available at the crate root
//!   ([`Model`], [`Component`], [`Command`], [`Program`], [`run_with`], ...).
//! * [`widgets`] re-exports [`loadmore_widgets`], home of
//!   [`LoadMoreList`](widgets::LoadMoreList).
//! * [`ratatui`], [`crossterm`] and [`tokio`] are re-exported for
//!   downstream crates.
//!
//! # Quick start
//!
//! ```ignore
//! use loadmore::widgets::{list, LoadMoreList, VecAdapter};
//! use loadmore::{Command, Component, Model};
//!
//! struct Feed { list: LoadMoreList<VecAdapter<String>>, page: usize }
//!
//! enum Msg { List(list::Message), Loaded(Vec<String>) }
//!
//! impl Model for Feed {
//!     type Message = Msg;
//!     type Flags = ();
//!
//!     fn init(_: ()) -> (Self, Command<Msg>) {
//!         let mut list = LoadMoreList::new().with_adapter(VecAdapter::new(Vec::new()));
//!         list.notify_on_load_more();
//!         (Feed { list, page: 0 }, Command::none())
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Command<Msg> {
//!         match msg {
//!             Msg::List(list::Message::LoadMore(_)) => {
//!                 self.page += 1;
//!                 Command::perform(fetch(self.page), Msg::Loaded)
//!             }
//!             Msg::List(m) => self.list.update(m).map(Msg::List),
//!             Msg::Loaded(rows) => {
//!                 let more = !rows.is_empty();
//!                 if let Some(adapter) = self.list.adapter_mut() {
//!                     adapter.extend(rows);
//!                 }
//!                 self.list.notify_load_finished(more).ok();
//!                 Command::none()
//!             }
//!         }
//!     }
//!
//!     fn view(&self, frame: &mut ratatui::Frame) {
//!         self.list.view(frame, frame.area());
//!     }
//! }
//! ```

pub use loadmore_core::*;
pub mod widgets {
    pub use loadmore_widgets::*;
}

pub use crossterm;
pub use ratatui;
pub use tokio;
