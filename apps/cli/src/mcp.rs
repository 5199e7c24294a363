//! MCP resource server on stdio.
//!
//! Clients read `orgadmin://` resources and subscribe to them; subscribed
//! resources are refreshed by the poller and announced with
//! `notifications/resources/updated`.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use orgadmin_application::{ResourceFetcher, ResourcePoller, Subscription, SubscriptionHub};
use orgadmin_core::{ClientError, ClientResult};
use orgadmin_domain::{ResourceType, ResourceUri};
use rmcp::model::{
    AnnotateAble, Implementation, ListResourcesResult, PaginatedRequestParams, RawResource,
    ReadResourceRequestParams, ReadResourceResult, Resource, ResourceContents,
    ResourceUpdatedNotificationParam, ServerCapabilities, ServerInfo, SubscribeRequestParams,
    UnsubscribeRequestParams,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, ServerHandler, ServiceExt};
use tokio::sync::{Mutex, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const JSON_MIME_TYPE: &str = "application/json";

/// Serves until the client disconnects, then stops the poller.
pub async fn serve(fetcher: Arc<dyn ResourceFetcher>, poll_interval: Duration) -> ClientResult<()> {
    let hub = Arc::new(SubscriptionHub::new());
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let poller = ResourcePoller::new(Arc::clone(&hub), Arc::clone(&fetcher))
        .with_interval(poll_interval)
        .spawn(async move {
            let _ = shutdown_rx.await;
        });

    let server = ResourceServer::new(hub, fetcher);
    info!("mcp server listening on stdio");
    let outcome = match server.clone().serve(rmcp::transport::stdio()).await {
        Ok(running) => running.waiting().await.map(|_| ()).map_err(|error| {
            ClientError::Internal(format!("mcp service task failed: {error}"))
        }),
        Err(error) => Err(ClientError::Transport(format!(
            "mcp initialization failed: {error}"
        ))),
    };

    server.close().await;
    let _ = shutdown_tx.send(());
    if let Err(error) = poller.await {
        warn!(error = %error, "resource poller task failed");
    }
    info!("mcp server stopped");

    outcome
}

/// Bridges MCP resource requests to the fetcher and the subscription hub.
///
/// Each subscribed URI owns one hub listener and one forwarder task; the
/// forwarder turns hub updates into client notifications.
#[derive(Clone)]
pub struct ResourceServer {
    hub: Arc<SubscriptionHub>,
    fetcher: Arc<dyn ResourceFetcher>,
    forwarders: Arc<Mutex<HashMap<String, (u64, JoinHandle<()>)>>>,
}

impl ResourceServer {
    pub fn new(hub: Arc<SubscriptionHub>, fetcher: Arc<dyn ResourceFetcher>) -> Self {
        Self {
            hub,
            fetcher,
            forwarders: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Fetches `raw_uri` and returns it as JSON text contents.
    pub async fn read(&self, raw_uri: &str) -> Result<ReadResourceResult, ErrorData> {
        let uri = parse_uri(raw_uri)?;
        let fetched = self
            .fetcher
            .fetch_resource(&uri)
            .await
            .map_err(|error| request_error(&error, "read resource"))?;

        let mut contents = ResourceContents::text(fetched.to_string(), uri.serialize());
        if let ResourceContents::TextResourceContents { mime_type, .. } = &mut contents {
            *mime_type = Some(JSON_MIME_TYPE.to_owned());
        }

        Ok(ReadResourceResult {
            contents: vec![contents],
        })
    }

    /// Registers `raw_uri` with the hub and calls `announce` for each update.
    ///
    /// Subscribing twice to one URI keeps the first forwarder. The forwarder
    /// stops once `announce` reports the client is gone.
    pub async fn subscribe_with<F, Fut>(&self, raw_uri: &str, announce: F) -> Result<(), ErrorData>
    where
        F: Fn(String) -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        let uri = parse_uri(raw_uri)?.serialize();
        let mut forwarders = self.forwarders.lock().await;
        if forwarders.contains_key(&uri) {
            return Ok(());
        }

        let subscription = self.hub.subscribe(uri.clone()).await;
        let id = subscription.id();
        let forwarder = tokio::spawn(forward_updates(subscription, announce));
        forwarders.insert(uri, (id, forwarder));

        Ok(())
    }

    /// Drops the subscription for `raw_uri`, if any.
    pub async fn unsubscribe_uri(&self, raw_uri: &str) -> Result<(), ErrorData> {
        let uri = parse_uri(raw_uri)?.serialize();
        let removed = self.forwarders.lock().await.remove(&uri);
        if let Some((id, forwarder)) = removed {
            self.hub.unsubscribe(&uri, id).await;
            let _ = forwarder.await;
        }

        Ok(())
    }

    /// Drops every subscription and waits for its forwarder to finish.
    pub async fn close(&self) {
        let drained = self
            .forwarders
            .lock()
            .await
            .drain()
            .collect::<Vec<_>>();
        for (uri, (id, forwarder)) in drained {
            self.hub.unsubscribe(&uri, id).await;
            let _ = forwarder.await;
        }
    }
}

impl ServerHandler for ResourceServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_resources()
                .enable_resources_subscribe()
                .build(),
            server_info: Implementation {
                name: "orgadmin".to_owned(),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                ..Implementation::default()
            },
            instructions: Some(
                "Read orgadmin:// resources; subscribe to get notified when they change."
                    .to_owned(),
            ),
            ..ServerInfo::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, ErrorData> {
        Ok(ListResourcesResult::with_all_items(listed_resources()))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, ErrorData> {
        self.read(&request.uri).await
    }

    async fn subscribe(
        &self,
        request: SubscribeRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<(), ErrorData> {
        let peer = context.peer;
        self.subscribe_with(&request.uri, move |uri| {
            let peer = peer.clone();
            async move {
                match peer
                    .notify_resource_updated(ResourceUpdatedNotificationParam { uri })
                    .await
                {
                    Ok(()) => true,
                    Err(error) => {
                        debug!(error = %error, "client unreachable, stopping updates");
                        false
                    }
                }
            }
        })
        .await
    }

    async fn unsubscribe(
        &self,
        request: UnsubscribeRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<(), ErrorData> {
        self.unsubscribe_uri(&request.uri).await
    }
}

async fn forward_updates<F, Fut>(mut subscription: Subscription, announce: F)
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = bool>,
{
    while let Some(update) = subscription.recv().await {
        if !announce(update.uri).await {
            break;
        }
    }
}

fn parse_uri(raw: &str) -> Result<ResourceUri, ErrorData> {
    ResourceUri::parse(raw).map_err(|error| ErrorData::invalid_params(error.to_string(), None))
}

fn request_error(error: &ClientError, operation: &str) -> ErrorData {
    match error {
        ClientError::InvalidUriScheme(_)
        | ClientError::UnknownResourceType(_)
        | ClientError::InvalidResourcePath(_) => {
            ErrorData::invalid_params(error.context(operation), None)
        }
        _ => ErrorData::internal_error(error.context(operation), None),
    }
}

fn listed_resources() -> Vec<Resource> {
    [
        (ResourceType::ActiveProjects, "Projects that are not archived"),
        (ResourceType::CurrentMembers, "Members of the organization"),
        (ResourceType::UsageDashboard, "Daily completion usage for the last 7 days"),
    ]
    .into_iter()
    .map(|(resource_type, description)| {
        let mut resource = RawResource::new(
            ResourceUri::of_type(resource_type).serialize(),
            resource_type.as_str(),
        );
        resource.description = Some(description.to_owned());
        resource.mime_type = Some(JSON_MIME_TYPE.to_owned());
        resource.no_annotation()
    })
    .collect()
}
