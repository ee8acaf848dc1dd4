use crate::command::Command;
use crate::subscription::Subscription;
use ratatui::{layout::Rect, Frame};

/// A reusable sub-model that renders into a given [`Rect`] area.
///
/// `Component` mirrors [`Model`](crate::Model) except that
/// [`view`](Component::view) receives the area to draw into, so a parent
/// decides where each child goes.
///
/// # Composition pattern
///
/// Wrap the child's message type in a parent variant and lift commands with
/// [`Command::map`]:
///
/// ```rust,ignore
/// enum AppMsg { Feed(list::Message) }
///
/// fn update(&mut self, msg: AppMsg) -> Command<AppMsg> {
///     match msg {
///         AppMsg::Feed(m) => self.feed.update(m).map(AppMsg::Feed),
///     }
/// }
/// ```
pub trait Component: Send + 'static {
    /// The component's internal message type.
    type Message: Send + 'static;

    /// Process a message, mutate state, and return a [`Command`] for side effects.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render into `area`. Implementations must stay inside the rectangle.
    fn view(&self, frame: &mut Frame, area: Rect);

    /// Active subscriptions. The parent collects and maps these.
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }

    /// Whether this component currently has focus.
    fn focused(&self) -> bool {
        false
    }
}
