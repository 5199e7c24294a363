use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use tokio::sync::RwLock;
use tokio::sync::mpsc::{self, error::TryRecvError, error::TrySendError};

/// Fresh contents of a subscribed resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceUpdate {
    /// Serialized resource URI.
    pub uri: String,
    /// Resource contents as fetched.
    pub contents: Value,
}

/// Receiving end of one subscription.
///
/// The channel buffers a single update. Updates arriving while it is full are
/// dropped, so a slow consumer sees the oldest unread update first.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    uri: String,
    receiver: mpsc::Receiver<ResourceUpdate>,
}

impl Subscription {
    /// Returns the id to pass to [`SubscriptionHub::unsubscribe`].
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the subscribed URI.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Waits for the next update; `None` once unsubscribed.
    pub async fn recv(&mut self) -> Option<ResourceUpdate> {
        self.receiver.recv().await
    }

    /// Returns a buffered update without waiting.
    pub fn try_recv(&mut self) -> Result<ResourceUpdate, TryRecvError> {
        self.receiver.try_recv()
    }
}

#[derive(Debug)]
struct Listener {
    id: u64,
    sender: mpsc::Sender<ResourceUpdate>,
}

/// Registry of resource subscriptions and their channels.
#[derive(Debug, Default)]
pub struct SubscriptionHub {
    listeners: RwLock<HashMap<String, Vec<Listener>>>,
    next_id: AtomicU64,
}

impl SubscriptionHub {
    /// Creates an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new listener for `uri`.
    pub async fn subscribe(&self, uri: impl Into<String>) -> Subscription {
        let uri = uri.into();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::channel(1);

        self.listeners
            .write()
            .await
            .entry(uri.clone())
            .or_default()
            .push(Listener { id, sender });
        tracing::debug!(uri = %uri, subscription_id = id, "resource subscribed");

        Subscription { id, uri, receiver }
    }

    /// Removes the listener and closes its channel.
    ///
    /// Returns false when nothing matched; repeating the call is harmless.
    pub async fn unsubscribe(&self, uri: &str, subscription_id: u64) -> bool {
        let mut listeners = self.listeners.write().await;
        let Some(registered) = listeners.get_mut(uri) else {
            return false;
        };

        let before = registered.len();
        registered.retain(|listener| listener.id != subscription_id);
        let removed = registered.len() != before;
        if registered.is_empty() {
            listeners.remove(uri);
        }

        if removed {
            tracing::debug!(uri = %uri, subscription_id, "resource unsubscribed");
        }
        removed
    }

    /// Offers `contents` to every listener of `uri` without waiting.
    ///
    /// Listeners whose receiver was dropped are removed. Returns how many
    /// listeners accepted the update.
    pub async fn notify(&self, uri: &str, contents: &Value) -> usize {
        let mut delivered = 0;
        let mut closed = Vec::new();
        {
            let listeners = self.listeners.read().await;
            let Some(registered) = listeners.get(uri) else {
                return 0;
            };

            for listener in registered {
            let update = ResourceUpdate {
                uri: uri.to_owned(),
                contents: contents.clone(),
            };
                match listener.sender.try_send(update) {
                    Ok(()) => delivered += 1,
                    Err(TrySendError::Full(_)) => {
                        tracing::debug!(
                            uri = %uri,
                            subscription_id = listener.id,
                            "listener buffer full, update dropped"
                        );
                    }
                    Err(TrySendError::Closed(_)) => closed.push(listener.id),
                }
            }
        }

        if !closed.is_empty() {
            let mut listeners = self.listeners.write().await;
            if let Some(registered) = listeners.get_mut(uri) {
                registered.retain(|listener| !closed.contains(&listener.id));
                if registered.is_empty() {
                    listeners.remove(uri);
                }
            }
            tracing::debug!(uri = %uri, pruned = closed.len(), "dropped listeners removed");
        }

        delivered
    }

    /// Returns every URI with at least one live listener, sorted.
    ///
    /// Listeners whose receiver was dropped are removed first, so a URI
    /// nobody reads anymore stops being polled.
    pub async fn subscribed_uris(&self) -> Vec<String> {
        let mut listeners = self.listeners.write().await;
        listeners.retain(|_, registered| {
            registered.retain(|listener| !listener.sender.is_closed());
            !registered.is_empty()
        });

        let mut uris = listeners.keys().cloned().collect::<Vec<_>>();
        uris.sort();
        uris
    }

    /// Returns the number of live listeners registered for `uri`.
    pub async fn subscriber_count(&self, uri: &str) -> usize {
        self.listeners.read().await.get(uri).map_or(0, |registered| {
            registered
                .iter()
                .filter(|listener| !listener.sender.is_closed())
                .count()
        })
    }
}
