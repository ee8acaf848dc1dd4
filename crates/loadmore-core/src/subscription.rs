use futures::stream::BoxStream;
use futures::StreamExt;
use std::any::TypeId;
use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// A long-lived event source managed by the runtime.
///
/// Subscriptions are re-declared after every update; the runtime diffs them
/// by [`SubscriptionId`], starting new ones and aborting vanished ones. A
/// footer spinner, for instance, only ticks while a loading footer is shown.
pub struct Subscription<Msg: Send + 'static> {
    pub(crate) id: SubscriptionId,
    pub(crate) spawn: Box<dyn FnOnce(mpsc::UnboundedSender<Msg>) -> AbortHandle + Send>,
}

/// Identity used to diff subscriptions between update cycles.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId {
    type_id: TypeId,
    discriminant: u64,
}

impl SubscriptionId {
    /// Singleton id for a source type.
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            discriminant: 0,
        }
    }

    /// Id for a source type plus a string key.
    pub fn with_str<T: 'static>(s: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        s.hash(&mut hasher);
        Self {
            type_id: TypeId::of::<T>(),
            discriminant: hasher.finish(),
        }
    }
}

/// Types that produce a stream of values for a [`Subscription`].
pub trait SubscriptionSource: Send + 'static {
    /// The type of values this source emits.
    type Output: Send + 'static;

    /// Unique ID for this subscription instance.
    fn id(&self) -> SubscriptionId;

    /// Create the stream. Called once when the subscription starts.
    fn stream(self) -> BoxStream<'static, Self::Output>;
}

/// Create a [`Subscription`] from a [`SubscriptionSource`].
pub fn subscribe<S: SubscriptionSource>(source: S) -> Subscription<S::Output> {
    let id = source.id();
    Subscription::spawn_stream(id, move || source.stream())
}

impl<Msg: Send + 'static> Subscription<Msg> {
    /// Create from a ready-made stream and id.
    pub fn from_stream(id: SubscriptionId, stream: BoxStream<'static, Msg>) -> Self {
        Self::spawn_stream(id, move || stream)
    }

    fn spawn_stream(
        id: SubscriptionId,
        make: impl FnOnce() -> BoxStream<'static, Msg> + Send + 'static,
    ) -> Self {
        Subscription {
            id,
            spawn: Box::new(move |tx| {
                let handle = tokio::spawn(async move {
                    let mut stream = make();
                    while let Some(msg) = stream.next().await {
                        if tx.send(msg).is_err() {
                            break;
                        }
                    }
                });
                handle.abort_handle()
            }),
        }
    }

    /// The identity used when diffing.
    pub fn id(&self) -> &SubscriptionId {
        &self.id
    }

    /// Transform the message type (for component composition).
    pub fn map<NewMsg: Send + 'static>(
        self,
        f: impl Fn(Msg) -> NewMsg + Send + Sync + 'static,
    ) -> Subscription<NewMsg> {
        let f = Arc::new(f);
        Subscription {
            id: self.id,
            spawn: Box::new(move |new_tx: mpsc::UnboundedSender<NewMsg>| {
                let (inner_tx, mut inner_rx) = mpsc::unbounded_channel::<Msg>();
                let abort = (self.spawn)(inner_tx);
                // Ends on its own once the source is aborted and inner_tx drops.
                tokio::spawn(async move {
                    while let Some(msg) = inner_rx.recv().await {
                        if new_tx.send(f(msg)).is_err() {
                            break;
                        }
                    }
                });
                abort
            }),
        }
    }
}

/// Tracks running subscriptions and reconciles them after each update.
pub(crate) struct SubscriptionManager<Msg: Send + 'static> {
    active: HashMap<SubscriptionId, AbortHandle>,
    msg_tx: mpsc::UnboundedSender<Msg>,
}

impl<Msg: Send + 'static> SubscriptionManager<Msg> {
    pub fn new(msg_tx: mpsc::UnboundedSender<Msg>) -> Self {
        Self {
            active: HashMap::new(),
            msg_tx,
        }
    }

    /// Start new subscriptions, stop removed ones, keep unchanged ones.
    pub fn reconcile(&mut self, subs: Vec<Subscription<Msg>>) {
        let mut wanted: HashMap<SubscriptionId, Subscription<Msg>> =
            subs.into_iter().map(|s| (s.id.clone(), s)).collect();

        self.active.retain(|id, handle| {
            let keep = wanted.contains_key(id);
            if !keep {
                handle.abort();
            }
            keep
        });

        for (id, sub) in wanted.drain() {
            if !self.active.contains_key(&id) {
                let handle = (sub.spawn)(self.msg_tx.clone());
                self.active.insert(id, handle);
            }
        }
    }

    /// Abort everything.
    pub fn shutdown(&mut self) {
        for (_, handle) in self.active.drain() {
            handle.abort();
        }
    }

    #[cfg(test)]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(id: SubscriptionId) -> Subscription<u32> {
        Subscription::from_stream(id, Box::pin(futures::stream::pending()))
    }

    #[test]
    fn ids_compare_by_type_and_key() {
        assert_eq!(SubscriptionId::of::<String>(), SubscriptionId::of::<String>());
        assert_ne!(SubscriptionId::of::<String>(), SubscriptionId::of::<u8>());
        assert_eq!(
            SubscriptionId::with_str::<String>("footer-spinner"),
            SubscriptionId::with_str::<String>("footer-spinner")
        );
        assert_ne!(
            SubscriptionId::with_str::<String>("a"),
            SubscriptionId::with_str::<String>("b")
        );
    }

    #[tokio::test]
    async fn reconcile_starts_keeps_and_stops() {
        let (tx, _rx) = mpsc::unbounded_channel::<u32>();
        let mut manager = SubscriptionManager::new(tx);
        let id = SubscriptionId::with_str::<String>("spinner");

        manager.reconcile(vec![pending(id.clone())]);
        assert_eq!(manager.active_count(), 1);

        manager.reconcile(vec![pending(id)]);
        assert_eq!(manager.active_count(), 1);

        manager.reconcile(vec![]);
        assert_eq!(manager.active_count(), 0);
    }

    #[tokio::test]
    async fn mapped_subscription_forwards_values() {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let mut manager = SubscriptionManager::new(tx);
        let sub = Subscription::from_stream(
            SubscriptionId::of::<u32>(),
            Box::pin(futures::stream::iter(vec![1u32, 2])),
        )
        .map(|n| format!("tick {n}"));

        manager.reconcile(vec![sub]);
        assert_eq!(rx.recv().await.as_deref(), Some("tick 1"));
        assert_eq!(rx.recv().await.as_deref(), Some("tick 2"));
        manager.shutdown();
        assert_eq!(manager.active_count(), 0);
    }
}
