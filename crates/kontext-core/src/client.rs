use std::future::Future;
use std::time::Duration;

use k8s_openapi::api::core::v1::Namespace;
use kube::api::{ApiResource, DynamicObject, GroupVersionKind, ListParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Api, Client, Config};

use crate::context::ContextConfig;
use crate::document::ConfigDocument;
use crate::error::{Error, Result};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// A resource kind served by an extension API group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceRef {
    pub group: &'static str,
    pub version: &'static str,
    pub kind: &'static str,
    pub plural: &'static str,
}

impl ResourceRef {
    pub fn api_version(&self) -> String {
        format!("{}/{}", self.group, self.version)
    }
}

/// The live cluster calls kontext makes. Every call authenticates with a
/// bearer token against `server` and never touches the kubeconfig on disk.
#[allow(async_fn_in_trait)]
pub trait ClusterApi {
    /// Fails with [`Error::Reachability`] on any transport, auth or timeout failure.
    async fn check_access(&self, server: &str, token: &str) -> Result<()>;

    /// `Ok(false)` when the group version or the resource is not served.
    async fn serves_resource(&self, server: &str, token: &str, resource: &ResourceRef) -> Result<bool>;

    async fn list_names(&self, server: &str, token: &str, resource: &ResourceRef) -> Result<Vec<String>>;
}

#[derive(Debug, Clone)]
pub struct KubeClusterApi {
    timeout: Duration,
    insecure_skip_tls_verify: bool,
}

impl Default for KubeClusterApi {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, true)
    }
}

impl KubeClusterApi {
    pub fn new(timeout: Duration, insecure_skip_tls_verify: bool) -> Self {
        Self { timeout, insecure_skip_tls_verify }
    }

    /// Builds a client from a throwaway single-context kubeconfig so the same
    /// TLS and auth handling applies as for a context on disk.
    async fn connect(&self, server: &str, token: &str) -> Result<Client, String> {
        let endpoint = ContextConfig::new("kontext-probe", server, token);
        let yaml = ConfigDocument::single(&endpoint, self.insecure_skip_tls_verify)
            .to_yaml()
            .map_err(|e| e.to_string())?;
        let kubeconfig = Kubeconfig::from_yaml(&yaml).map_err(|e| e.to_string())?;
        let mut config =
            Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default()).await.map_err(|e| e.to_string())?;
        config.connect_timeout = Some(self.timeout);
        config.read_timeout = Some(self.timeout);
        Client::try_from(config).map_err(|e| e.to_string())
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, String>
    where
        F: Future<Output = Result<T, String>>,
    {
        tokio::time::timeout(self.timeout, call).await.map_err(|_| format!("timed out after {:?}", self.timeout))?
    }
}

impl ClusterApi for KubeClusterApi {
    async fn check_access(&self, server: &str, token: &str) -> Result<()> {
        self.bounded(async {
            let client = self.connect(server, token).await?;
            let namespaces: Api<Namespace> = Api::all(client);
            namespaces.list(&ListParams::default().limit(1)).await.map(|_| ()).map_err(|e| e.to_string())
        })
        .await
        .map_err(|msg| Error::unreachable(server, msg))
    }

    async fn serves_resource(&self, server: &str, token: &str, resource: &ResourceRef) -> Result<bool> {
        let api_version = resource.api_version();
        self.bounded(async {
            let client = self.connect(server, token).await?;
            match client.list_api_group_resources(&api_version).await {
                Ok(list) => Ok(list.resources.iter().any(|r| r.name == resource.plural)),
                Err(kube::Error::Api(status)) if status.code == 404 => Ok(false),
                Err(e) => Err(e.to_string()),
            }
        })
        .await
        .map_err(|msg| Error::discovery(format!("failed to discover {api_version} resources: {msg}")))
    }

    async fn list_names(&self, server: &str, token: &str, resource: &ResourceRef) -> Result<Vec<String>> {
        self.bounded(async {
            let client = self.connect(server, token).await?;
            let gvk = GroupVersionKind::gvk(resource.group, resource.version, resource.kind);
            let api_resource = ApiResource::from_gvk_with_plural(&gvk, resource.plural);
            let api: Api<DynamicObject> = Api::all_with(client, &api_resource);
            let list = api.list(&ListParams::default()).await.map_err(|e| e.to_string())?;
            Ok(list.items.into_iter().filter_map(|obj| obj.metadata.name).collect())
        })
        .await
        .map_err(|msg| Error::discovery(format!("failed to list {}.{}: {msg}", resource.plural, resource.group)))
    }
}

#[cfg(test)]
pub(crate) mod fake;
