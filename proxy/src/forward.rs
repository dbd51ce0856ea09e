use crate::errors::ProxyError;
use crate::target::Target;
use http_body_util::Empty;
use hyper::body::{Bytes, Incoming};
use hyper::{Method, Request, Response};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;

pub type ForwardClient = Client<HttpConnector, Empty<Bytes>>;

pub fn new_client() -> ForwardClient {
    let conn = HttpConnector::new();
    Client::builder(TokioExecutor::new()).build(conn)
}

/// Issue the single outbound GET for a resolved target.
///
/// The response body is returned un-collected so the caller can stream
/// it onward; dropping it releases the upstream connection. No headers
/// beyond hyper's defaults, no retries, no extra timeout.
pub async fn forward(
    client: &ForwardClient,
    target: &Target,
) -> Result<Response<Incoming>, ProxyError> {
    let uri = target.uri()?;

    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Empty::new())?;

    client
        .request(request)
        .await
        .map_err(|e| ProxyError::ForwardFailed(target.to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_refused_connection_is_a_forward_failure() {
        // Bind then drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = new_client();
        let target = Target {
            host: format!("127.0.0.1:{port}"),
            path: "/metrics".into(),
        };

        let err = forward(&client, &target).await.unwrap_err();
        assert!(matches!(err, ProxyError::ForwardFailed(_, _)));
    }

    #[tokio::test]
    async fn test_empty_address_fails_before_the_request_is_issued() {
        let client = new_client();
        let target = Target {
            host: "".into(),
            path: "".into(),
        };

        let err = forward(&client, &target).await.unwrap_err();
        assert!(matches!(err, ProxyError::InvalidTarget(_)));
    }
}
