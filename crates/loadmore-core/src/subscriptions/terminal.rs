use crate::event::TerminalEvent;
use crate::subscription::{Subscription, SubscriptionId};
use crossterm::event::EventStream;
use futures::StreamExt;
use std::sync::Arc;

/// Marker type giving terminal events a stable subscription identity.
pub struct TerminalEvents;

/// Subscribe to terminal events, mapping each through `map`.
///
/// Return `None` from `map` to drop an event.
///
/// ```rust,ignore
/// fn subscriptions(&self) -> Vec<Subscription<Msg>> {
///     vec![terminal_events(|event| match event {
///         TerminalEvent::Key(key) => Some(Msg::List(list::Message::KeyPress(key))),
///         TerminalEvent::Mouse(m) => Some(Msg::List(list::Message::Mouse(m))),
///         _ => None,
///     })]
/// }
/// ```
pub fn terminal_events<Msg: Send + 'static>(
    map: impl Fn(TerminalEvent) -> Option<Msg> + Send + Sync + 'static,
) -> Subscription<Msg> {
    let map = Arc::new(map);
    // The EventStream is created inside the task: building it eagerly on
    // every subscriptions() call would poke crossterm's global reader.
    Subscription {
        id: SubscriptionId::of::<TerminalEvents>(),
        spawn: Box::new(move |tx| {
            let handle = tokio::spawn(async move {
                let mut events = EventStream::new();
                while let Some(result) = events.next().await {
                    let Ok(event) = result else { continue };
                    if let Some(msg) = map(TerminalEvent::from(event)) {
                        if tx.send(msg).is_err() {
                            break;
                        }
                    }
                }
            });
            handle.abort_handle()
        }),
    }
}
