use crate::http::{empty_body, make_boxed_error_response};
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::service::Service;
use hyper::{Request, Response, StatusCode};
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;

/// Plain health/readiness listener, served on its own port next to the
/// main service.
pub struct AdminService<F, E> {
    is_ready: F,
    _error: PhantomData<E>,
}

impl<F, E> AdminService<F, E>
where
    F: Fn() -> bool,
{
    pub fn new(is_ready: F) -> Self {
        Self {
            is_ready,
            _error: PhantomData,
        }
    }
}

impl<F, E> Service<Request<Incoming>> for AdminService<F, E>
where
    F: Fn() -> bool + Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    type Response = Response<BoxBody<Bytes, E>>;
    type Error = E;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<Incoming>) -> Self::Future {
        let is_ready = (self.is_ready)();

        Box::pin(async move {
            let ok_body = || Full::new(Bytes::from("ok\n")).map_err(|never| match never {}).boxed();

            let res = match req.uri().path() {
                "/health" => Response::new(ok_body()),
                "/ready" => match is_ready {
                    true => Response::new(ok_body()),
                    false => make_boxed_error_response(StatusCode::SERVICE_UNAVAILABLE),
                },
                _ => {
                    let mut res = Response::new(empty_body());
                    *res.status_mut() = StatusCode::NOT_FOUND;
                    res
                }
            };
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    async fn call_admin(path: &str, ready: bool) -> StatusCode {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let service: AdminService<_, io::Error> = AdminService::new(move || ready);
        tokio::spawn(async move {
            let _ = crate::http::run_http_listener(listener, service).await;
        });

        let res = reqwest::get(format!("http://127.0.0.1:{port}{path}"))
            .await
            .unwrap();
        StatusCode::from_u16(res.status().as_u16()).unwrap()
    }

    #[tokio::test]
    async fn test_health_always_ok() {
        assert_eq!(call_admin("/health", false).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_reflects_probe() {
        assert_eq!(call_admin("/ready", true).await, StatusCode::OK);
        assert_eq!(
            call_admin("/ready", false).await,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        assert_eq!(call_admin("/nope", true).await, StatusCode::NOT_FOUND);
    }
}
