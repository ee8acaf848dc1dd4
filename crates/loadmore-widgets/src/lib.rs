//! The load-more list for the **loadmore** runtime.
//!
//! [`LoadMoreList`](list::LoadMoreList) implements
//! [`loadmore_core::Component`]. It decorates any [`Adapter`](adapter::Adapter)
//! with a trailing footer row, watches scrolling and asks the host for the
//! next page once the footer shows up.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`list`] | The `LoadMoreList` component, its messages and listener |
//! | [`adapter`] | `Adapter` and `RowView` traits, `TextRow` |
//! | [`vec_adapter`] | `VecAdapter`, an adapter over a `Vec` of items |
//! | [`item`] | `Item` and `ItemDelegate` used by `VecAdapter` |
//! | [`notify`] | `DataChange` notifications, observers and forwarding |
//! | [`footer_adapter`] | `FooterAdapter`, the adapter plus its footer row |
//! | [`footer`] | Footer render state, styling and spinner frames |
//! | [`state`] | Load state machine, `LoadMode`, `FooterPolicy`, errors |
//! | [`keymap`] | Key bindings |

pub mod adapter;
pub mod footer;
pub mod footer_adapter;
pub mod item;
pub mod keymap;
pub mod list;
pub mod notify;
mod row_cache;
pub mod state;
pub mod vec_adapter;

pub use adapter::{Adapter, RowView, TextRow};
pub use list::{LoadMoreList, LoadMoreListener};
pub use state::{FooterPolicy, LoadMode, LoadMoreConfig, LoadMoreError, LoadPhase};
pub use vec_adapter::VecAdapter;
