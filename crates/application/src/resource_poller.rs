use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use orgadmin_core::ClientResult;
use orgadmin_domain::ResourceUri;
use serde_json::Value;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::subscription_hub::SubscriptionHub;

/// Port for loading the current contents of a resource.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Fetches the resource addressed by `uri`.
    async fn fetch_resource(&self, uri: &ResourceUri) -> ClientResult<Value>;
}

/// Outcome counts of one polling pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    /// URIs fetched and pushed to the hub.
    pub refreshed: usize,
    /// URIs that could not be parsed or fetched.
    pub failed: usize,
}

/// Periodically refreshes every subscribed resource and notifies listeners.
pub struct ResourcePoller {
    hub: Arc<SubscriptionHub>,
    fetcher: Arc<dyn ResourceFetcher>,
    interval: Duration,
}

impl ResourcePoller {
    /// Refresh period used when none is configured.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

    /// Creates a poller using [`ResourcePoller::DEFAULT_INTERVAL`].
    #[must_use]
    pub fn new(hub: Arc<SubscriptionHub>, fetcher: Arc<dyn ResourceFetcher>) -> Self {
        Self {
            hub,
            fetcher,
            interval: Self::DEFAULT_INTERVAL,
        }
    }

    /// Overrides the refresh period.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Returns the refresh period.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Refreshes every subscribed URI concurrently.
    ///
    /// A failing URI is logged and skipped; the rest of the pass continues.
    pub async fn poll_once(&self) -> PollSummary {
        let uris = self.hub.subscribed_uris().await;
        let outcomes = join_all(uris.iter().map(|uri| self.refresh(uri))).await;

        let refreshed = outcomes.iter().filter(|refreshed| **refreshed).count();
        PollSummary {
            refreshed,
            failed: outcomes.len() - refreshed,
        }
    }

    async fn refresh(&self, raw_uri: &str) -> bool {
        let uri = match ResourceUri::parse(raw_uri) {
            Ok(uri) => uri,
            Err(error) => {
                warn!(uri = %raw_uri, error = %error, "skipping unparseable subscription");
                return false;
            }
        };

        match self.fetcher.fetch_resource(&uri).await {
            Ok(contents) => {
                let delivered = self.hub.notify(raw_uri, &contents).await;
                debug!(uri = %raw_uri, delivered, "resource refreshed");
                true
            }
            Err(error) => {
                warn!(uri = %raw_uri, error = %error, "failed to refresh subscribed resource");
                false
            }
        }
    }

    /// Polls on every tick until `shutdown` resolves.
    pub async fn run_until<S>(self, shutdown: S)
    where
        S: Future<Output = ()> + Send,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!(
            interval_seconds = self.interval.as_secs_f64(),
            "resource poller started"
        );

        loop {
            tokio::select! {
                () = &mut shutdown => break,
                _ = ticker.tick() => {
                    let summary = self.poll_once().await;
                    if summary.refreshed + summary.failed > 0 {
                        debug!(
                            refreshed = summary.refreshed,
                            failed = summary.failed,
                            "resource poll finished"
                        );
                    }
                }
            }
        }

        info!("resource poller stopped");
    }

    /// Runs [`ResourcePoller::run_until`] on a background task.
    pub fn spawn<S>(self, shutdown: S) -> JoinHandle<()>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(self.run_until(shutdown))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use orgadmin_core::{ClientError, ClientResult};
    use orgadmin_domain::ResourceUri;
    use serde_json::{Value, json};
    use tokio::sync::{Mutex, oneshot};

    use super::{PollSummary, ResourceFetcher, ResourcePoller};
    use crate::subscription_hub::SubscriptionHub;

    #[derive(Default)]
    struct FakeFetcher {
        failing: Vec<String>,
        fetched: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ResourceFetcher for FakeFetcher {
        async fn fetch_resource(&self, uri: &ResourceUri) -> ClientResult<Value> {
            let raw = uri.serialize();
            self.fetched.lock().await.push(raw.clone());
            if self.failing.contains(&raw) {
                return Err(ClientError::Http {
                    status: 503,
                    body: "unavailable".to_owned(),
                });
            }

            Ok(json!({"uri": raw}))
        }
    }

    #[tokio::test]
    async fn failure_on_one_uri_does_not_stop_others() {
        let hub = Arc::new(SubscriptionHub::new());
        let fetcher = Arc::new(FakeFetcher {
            failing: vec!["orgadmin://project/broken".to_owned()],
            ..FakeFetcher::default()
        });
        let mut healthy = hub.subscribe("orgadmin://project/proj_1").await;
        let mut broken = hub.subscribe("orgadmin://project/broken").await;
        let mut members = hub.subscribe("orgadmin://current-members").await;

        let poller = ResourcePoller::new(hub.clone(), fetcher.clone());
        let summary = poller.poll_once().await;

        assert_eq!(
            summary,
            PollSummary {
                refreshed: 2,
                failed: 1
            }
        );
        assert!(healthy.try_recv().is_ok());
        assert!(members.try_recv().is_ok());
        assert!(broken.try_recv().is_err());
        assert_eq!(fetcher.fetched.lock().await.len(), 3);
    }

    #[tokio::test]
    async fn unparseable_subscription_counts_as_failure() {
        let hub = Arc::new(SubscriptionHub::new());
        let fetcher = Arc::new(FakeFetcher::default());
        let _subscription = hub.subscribe("https://example.com/not-a-resource").await;

        let summary = ResourcePoller::new(hub, fetcher.clone()).poll_once().await;

        assert_eq!(summary.failed, 1);
        assert!(fetcher.fetched.lock().await.is_empty());
    }

    #[tokio::test]
    async fn no_subscriptions_means_no_fetches() {
        let hub = Arc::new(SubscriptionHub::new());
        let fetcher = Arc::new(FakeFetcher::default());

        let summary = ResourcePoller::new(hub, fetcher.clone()).poll_once().await;

        assert_eq!(summary, PollSummary::default());
        assert!(fetcher.fetched.lock().await.is_empty());
    }

    #[tokio::test]
    async fn background_poller_delivers_until_shutdown() {
        let hub = Arc::new(SubscriptionHub::new());
        let fetcher = Arc::new(FakeFetcher::default());
        let mut subscription = hub.subscribe("orgadmin://member/user_1").await;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = ResourcePoller::new(hub, fetcher)
            .with_interval(Duration::from_millis(10))
            .spawn(async move {
                let _ = shutdown_rx.await;
            });

        let update = tokio::time::timeout(Duration::from_secs(5), subscription.recv()).await;
        assert!(matches!(
            update,
            Ok(Some(ref update)) if update.contents == json!({"uri": "orgadmin://member/user_1"})
        ));

        let _ = shutdown_tx.send(());
        let stopped = tokio::time::timeout(Duration::from_secs(5), handle).await;
        assert!(matches!(stopped, Ok(Ok(()))));
    }

    #[test]
    fn default_interval_is_thirty_seconds() {
        let hub = Arc::new(SubscriptionHub::new());
        let poller = ResourcePoller::new(hub, Arc::new(FakeFetcher::default()));
        assert_eq!(poller.interval(), Duration::from_secs(30));

        let poller = poller.with_interval(Duration::from_secs(5));
        assert_eq!(poller.interval(), Duration::from_secs(5));
    }
}
