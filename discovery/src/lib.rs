pub mod kubernetes;
pub mod testutils;

use async_trait::async_trait;
use indexmap::IndexMap;

/// One running workload replica, as seen in a single membership snapshot.
///
/// `name` is only unique within the snapshot it came from; nothing
/// enforces uniqueness across time. `metadata` keeps insertion order so
/// that marker scans over it are deterministic.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    pub name: String,
    pub address: String,
    pub metadata: IndexMap<String, String>,
}

impl Instance {
    pub fn new<N, A>(name: N, address: A, metadata: IndexMap<String, String>) -> Self
    where
        N: Into<String>,
        A: Into<String>,
    {
        Instance {
            name: name.into(),
            address: address.into(),
            metadata,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("kubernetes api error: {0}")]
    Kube(#[from] kube::Error),
    #[error("membership source unavailable: {0}")]
    Unavailable(String),
}

/// The "list current instances" capability.
///
/// Each call returns a fresh snapshot of cluster membership; callers
/// never cache the result across requests. Production uses the pod
/// lister in [`kubernetes`], tests use the fetchers in [`testutils`].
#[async_trait]
pub trait InstanceFetcher: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Instance>, FetchError>;
}
