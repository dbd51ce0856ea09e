pub mod config;
pub mod errors;
pub mod forward;
pub mod metrics_defs;
mod proxy_service;
pub mod target;

pub use proxy_service::ProxyService;

use crate::errors::ProxyError;
use discovery::InstanceFetcher;
use shared::admin_service::AdminService;
use shared::http::run_http_service;
use std::sync::Arc;

/// Serve the metrics proxy and its admin listener until one of them
/// fails. Each inbound request fetches its own membership snapshot from
/// `fetcher`; nothing is cached across requests.
pub async fn run(
    config: config::Config,
    fetcher: Arc<dyn InstanceFetcher>,
) -> Result<(), ProxyError> {
    tracing::info!(
        host = %config.listener.host,
        port = config.listener.port,
        "serving metrics proxy"
    );

    let proxy_task = run_http_service(
        &config.listener.host,
        config.listener.port,
        ProxyService::new(fetcher),
    );
    // Resolution is stateless, so readiness is just liveness here
    let admin_task = run_http_service(
        &config.admin_listener.host,
        config.admin_listener.port,
        AdminService::new(|| true),
    );

    tokio::try_join!(proxy_task, admin_task)?;
    Ok(())
}
