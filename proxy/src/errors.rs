use std::io;

#[derive(thiserror::Error, Debug)]
pub enum ProxyError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("membership fetch failed: {0}")]
    Fetch(#[from] discovery::FetchError),
    #[error("derived target is not a valid URI: {0}")]
    InvalidTarget(#[from] http::Error),
    #[error("forward request to {0} failed: {1}")]
    ForwardFailed(String, String),
    #[error("hyper error: {0}")]
    Hyper(#[from] hyper::Error),
}
