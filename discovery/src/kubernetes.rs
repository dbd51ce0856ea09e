//! Kubernetes-backed membership source.
//!
//! Lists pods in one namespace and maps each to an [`Instance`]: the pod
//! name becomes the instance name, the pod IP the address, and the pod
//! annotations the metadata mapping.

use crate::{FetchError, Instance, InstanceFetcher};
use async_trait::async_trait;
use indexmap::IndexMap;
use k8s_openapi::api::core::v1::Pod;
use kube::api::{Api, ListParams};

pub struct PodFetcher {
    pods: Api<Pod>,
}

impl PodFetcher {
    pub fn new(client: kube::Client, namespace: &str) -> Self {
        Self {
            pods: Api::namespaced(client, namespace),
        }
    }
}

#[async_trait]
impl InstanceFetcher for PodFetcher {
    async fn fetch(&self) -> Result<Vec<Instance>, FetchError> {
        let pod_list = self.pods.list(&ListParams::default()).await?;
        tracing::debug!(pods = pod_list.items.len(), "listed pods");

        Ok(pod_list.into_iter().filter_map(pod_to_instance).collect())
    }
}

/// Pods without a name are skipped; a missing pod IP (pod still
/// pending) maps to an empty address and fails later, at forward time.
fn pod_to_instance(pod: Pod) -> Option<Instance> {
    let name = pod.metadata.name?;
    let address = pod
        .status
        .and_then(|status| status.pod_ip)
        .unwrap_or_default();
    // BTreeMap from k8s-openapi; key order carries over deterministically
    let metadata: IndexMap<String, String> = pod
        .metadata
        .annotations
        .unwrap_or_default()
        .into_iter()
        .collect();

    Some(Instance {
        name,
        address,
        metadata,
    })
}
