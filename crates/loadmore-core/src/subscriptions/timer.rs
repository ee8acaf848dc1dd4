use crate::subscription::{SubscriptionId, SubscriptionSource};
use futures::stream::BoxStream;
use futures::StreamExt;
use std::time::{Duration, Instant};

/// A repeating timer emitting the current [`Instant`] on every tick.
///
/// The `id` keeps several timers apart, e.g. two lists each animating
/// their own footer spinner.
pub struct Every {
    /// The interval between ticks.
    pub interval: Duration,
    /// Key distinguishing this timer from others.
    pub id: &'static str,
}

impl Every {
    /// Create a new repeating timer.
    pub fn new(interval: Duration, id: &'static str) -> Self {
        Self { interval, id }
    }
}

impl SubscriptionSource for Every {
    type Output = Instant;

    fn id(&self) -> SubscriptionId {
        SubscriptionId::with_str::<Self>(self.id)
    }

    fn stream(self) -> BoxStream<'static, Instant> {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        Box::pin(tokio_stream::wrappers::IntervalStream::new(interval).map(|t| t.into_std()))
    }
}
