//! In-memory fetchers for tests in this workspace.

use crate::{FetchError, Instance, InstanceFetcher};
use async_trait::async_trait;

/// Returns the same fixed snapshot on every call.
pub struct StaticFetcher {
    instances: Vec<Instance>,
}

impl StaticFetcher {
    pub fn new(instances: Vec<Instance>) -> Self {
        Self { instances }
    }
}

#[async_trait]
impl InstanceFetcher for StaticFetcher {
    async fn fetch(&self) -> Result<Vec<Instance>, FetchError> {
        Ok(self.instances.clone())
    }
}

/// Fails every call, for exercising the fetch-failure path.
pub struct FailingFetcher;

#[async_trait]
impl InstanceFetcher for FailingFetcher {
    async fn fetch(&self) -> Result<Vec<Instance>, FetchError> {
        Err(FetchError::Unavailable("injected failure".to_string()))
    }
}
