use crate::errors::ProxyError;
use crate::forward::{self, ForwardClient};
use crate::metrics_defs;
use crate::target::derive_target;
use discovery::{Instance, InstanceFetcher};
use http_body_util::BodyExt;
use http_body_util::combinators::BoxBody;
use hyper::body::{Bytes, Incoming};
use hyper::service::Service as HyperService;
use hyper::{Method, Request, Response, StatusCode};
use shared::http::make_boxed_error_response;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// The resolution pipeline behind `GET /metrics/{identifier}`: fetch a
/// fresh membership snapshot, match by name, derive the scrape target
/// from metadata, forward, and mirror the upstream response. Holds no
/// state across requests beyond the shared outbound client.
pub struct ProxyService {
    fetcher: Arc<dyn InstanceFetcher>,
    client: ForwardClient,
}

impl ProxyService {
    pub fn new(fetcher: Arc<dyn InstanceFetcher>) -> Self {
        Self {
            fetcher,
            client: forward::new_client(),
        }
    }
}

impl HyperService<Request<Incoming>> for ProxyService {
    type Response = Response<BoxBody<Bytes, ProxyError>>;
    type Error = ProxyError;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let fetcher = self.fetcher.clone();
        let client = self.client.clone();

        Box::pin(async move {
            if req.method() != Method::GET {
                return Ok(make_boxed_error_response(StatusCode::NOT_FOUND));
            }
            let Some(identifier) = extract_identifier(req.uri().path()) else {
                return Ok(make_boxed_error_response(StatusCode::NOT_FOUND));
            };

            shared::counter!(metrics_defs::REQUESTS).increment(1);

            match resolve(fetcher.as_ref(), &client, identifier).await {
                Ok(res) => Ok(res),
                Err(err) => {
                    if matches!(err, ProxyError::Fetch(_)) {
                        shared::counter!(metrics_defs::FETCH_FAILURES).increment(1);
                    } else {
                        shared::counter!(metrics_defs::FORWARD_FAILURES).increment(1);
                    }
                    tracing::error!(identifier, error = %err, "resolution failed");
                    Ok(make_boxed_error_response(StatusCode::INTERNAL_SERVER_ERROR))
                }
            }
        })
    }
}

/// The route is `/metrics/{identifier}` with exactly one segment after
/// the prefix; anything else is a routing miss.
fn extract_identifier(path: &str) -> Option<&str> {
    let identifier = path.strip_prefix("/metrics/")?;
    if identifier.is_empty() || identifier.contains('/') {
        return None;
    }
    Some(identifier)
}

/// First instance whose name is byte-equal to the identifier. The
/// snapshot may hold duplicate names; the first one in snapshot order
/// wins and duplicates are never disambiguated.
fn match_instance<'a>(identifier: &str, snapshot: &'a [Instance]) -> Option<&'a Instance> {
    snapshot.iter().find(|instance| instance.name == identifier)
}

async fn resolve(
    fetcher: &dyn InstanceFetcher,
    client: &ForwardClient,
    identifier: &str,
) -> Result<Response<BoxBody<Bytes, ProxyError>>, ProxyError> {
    // One fresh snapshot per request; a failed fetch short-circuits
    // before any matching happens.
    let snapshot = fetcher.fetch().await?;

    let Some(instance) = match_instance(identifier, &snapshot) else {
        // Expected steady state, not an error
        shared::counter!(metrics_defs::NOT_FOUND).increment(1);
        tracing::debug!(identifier, "no instance matched");
        return Ok(make_boxed_error_response(StatusCode::NOT_FOUND));
    };

    let target = derive_target(instance);
    tracing::debug!(identifier, target = %target, "forwarding scrape");
    let upstream = forward::forward(client, &target).await?;

    // Mirror the status and stream the body through without collecting
    // it; a client disconnect drops the body and with it the upstream
    // connection.
    let (parts, body) = upstream.into_parts();
    let mut res = Response::new(body.map_err(ProxyError::Hyper).boxed());
    *res.status_mut() = parts.status;
    Ok(res)
}
