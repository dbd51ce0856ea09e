use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Empty};
use hyper::body::{Bytes, Incoming};
use hyper::service::Service;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioExecutor;
use hyper_util::rt::TokioIo;
use hyper_util::rt::TokioTimer;
use hyper_util::server::conn::auto::Builder;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};

/// Inbound connections that stall before sending headers are dropped
/// after this long.
pub const HEADER_READ_TIMEOUT: Duration = Duration::from_secs(15);

/// Hard ceiling on one inbound connection. Bounds clients that stop
/// reading mid-body, which hyper's own timeouts never cover.
pub const CONNECTION_DEADLINE: Duration = Duration::from_secs(60);

/// An empty response body boxed to the caller's error type.
pub fn empty_body<E: 'static>() -> BoxBody<Bytes, E> {
    Empty::<Bytes>::new().map_err(|never| match never {}).boxed()
}

pub fn make_boxed_error_response<E: 'static>(status: StatusCode) -> Response<BoxBody<Bytes, E>> {
    let mut res = Response::new(empty_body());
    *res.status_mut() = status;
    res
}

/// Bind `host:port` and serve `service` on it forever.
pub async fn run_http_service<S, E>(host: &str, port: u16, service: S) -> Result<(), E>
where
    S: Service<Request<Incoming>, Response = Response<BoxBody<Bytes, E>>, Error = E>
        + Send
        + Sync
        + 'static,
    S::Future: Send + 'static,
    E: From<std::io::Error> + std::error::Error + Send + Sync + 'static,
{
    let listener = TcpListener::bind(format!("{host}:{port}")).await?;
    run_http_listener(listener, service).await
}

/// Serve `service` on an already-bound listener. Split out so tests can
/// bind an ephemeral port first and read it back.
pub async fn run_http_listener<S, E>(listener: TcpListener, service: S) -> Result<(), E>
where
    S: Service<Request<Incoming>, Response = Response<BoxBody<Bytes, E>>, Error = E>
        + Send
        + Sync
        + 'static,
    S::Future: Send + 'static,
    E: From<std::io::Error> + std::error::Error + Send + Sync + 'static,
{
    let service_arc = Arc::new(service);

    loop {
        let (stream, _peer_addr) = listener.accept().await?;
        let _ = stream.set_nodelay(true);
        let io = TokioIo::new(stream);
        let svc = service_arc.clone();

        // Hand the connection to hyper; auto-detect h1/h2 on this socket
        tokio::spawn(serve_connection_with_deadline(io, svc, CONNECTION_DEADLINE));
    }
}

async fn serve_connection_with_deadline<S, E>(
    io: TokioIo<TcpStream>,
    service: Arc<S>,
    deadline: Duration,
) where
    S: Service<Request<Incoming>, Response = Response<BoxBody<Bytes, E>>, Error = E>
        + Send
        + Sync
        + 'static,
    S::Future: Send + 'static,
    E: From<std::io::Error> + std::error::Error + Send + Sync + 'static,
{
    let mut builder = Builder::new(TokioExecutor::new());
    builder
        .http1()
        .timer(TokioTimer::new())
        .header_read_timeout(HEADER_READ_TIMEOUT);

    // Dropping the connection future on deadline closes the socket
    let _ = tokio::time::timeout(deadline, builder.serve_connection(io, service)).await;
}
