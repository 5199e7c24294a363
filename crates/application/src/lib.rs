//! Application services and ports.

#![forbid(unsafe_code)]

mod admin_service;
mod pagination;
mod request_executor;
mod resource_fetcher;
mod resource_poller;
mod subscription_hub;
mod transport_ports;

pub use admin_service::AdminService;
pub use pagination::{PageQuery, decode_item, fetch_page, paginate_all};
pub use request_executor::RequestExecutor;
pub use resource_fetcher::{AdminResourceFetcher, USAGE_DASHBOARD_WINDOW};
pub use resource_poller::{PollSummary, ResourceFetcher, ResourcePoller};
pub use subscription_hub::{ResourceUpdate, Subscription, SubscriptionHub};
pub use transport_ports::{HttpMethod, Transport, TransportRequest, TransportResponse};
