use std::fmt;

use url::Url;

use crate::client::{ClusterApi, ResourceRef};
use crate::context::ContextConfig;
use crate::error::{Error, Result};

/// Name of the administrative cluster in Alauda/TKEStack; it is the parent
/// itself, not a selectable sub-cluster.
const GLOBAL_CLUSTER: &str = "global";

const TKESTACK_CLUSTERS: ResourceRef =
    ResourceRef { group: "platform.tkestack.io", version: "v1", kind: "Cluster", plural: "clusters" };

/// Which kind of management platform to ask for sub-clusters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanType {
    Alauda,
    Unsupported(String),
}

impl From<&str> for ScanType {
    fn from(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "alauda" => Self::Alauda,
            _ => Self::Unsupported(value.to_string()),
        }
    }
}

impl fmt::Display for ScanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alauda => write!(f, "alauda"),
            Self::Unsupported(other) => write!(f, "{other}"),
        }
    }
}

/// Derives one context per sub-cluster managed behind `parent`. Errors abort
/// the whole scan; an unsupported scan type yields nothing.
pub async fn discover<A: ClusterApi>(parent: &ContextConfig, scan: &ScanType, api: &A) -> Result<Vec<ContextConfig>> {
    match scan {
        ScanType::Alauda => scan_alauda(parent, api).await,
        ScanType::Unsupported(other) => {
            tracing::warn!("Skipped sub-cluster scan: unsupported cluster type {other:?}");
            Ok(Vec::new())
        }
    }
}

async fn scan_alauda<A: ClusterApi>(parent: &ContextConfig, api: &A) -> Result<Vec<ContextConfig>> {
    // Fail on servers we could not rewrite before talking to the cluster.
    parent_url(&parent.server)?;

    if !api.serves_resource(&parent.server, &parent.token, &TKESTACK_CLUSTERS).await? {
        tracing::info!("No {}.{} resources on {}", TKESTACK_CLUSTERS.plural, TKESTACK_CLUSTERS.group, parent.server);
        return Ok(Vec::new());
    }

    let names = api.list_names(&parent.server, &parent.token, &TKESTACK_CLUSTERS).await?;
    let mut configs = Vec::new();
    for cluster in names {
        if cluster.eq_ignore_ascii_case(GLOBAL_CLUSTER) {
            continue;
        }
        let server = sibling_server(&parent.server, &cluster)?;
        configs.push(ContextConfig::new(format!("{}-{cluster}", parent.name), server, parent.token.clone()));
    }
    tracing::debug!("Discovered {} sub-clusters behind {}", configs.len(), parent.name);
    Ok(configs)
}

/// Replaces the last path segment of `server` with `cluster`, keeping scheme,
/// host and port.
fn sibling_server(server: &str, cluster: &str) -> Result<String> {
    Ok(replace_last_segment(parent_url(server)?, cluster))
}

/// Parses a parent server URL for rewriting. A server without a scheme is
/// treated as https. A trailing slash is ignored, and the remaining path must
/// end in a non-empty segment.
fn parent_url(server: &str) -> Result<Url> {
    let with_scheme = if server.contains("://") { server.to_string() } else { format!("https://{server}") };
    let mut url =
        Url::parse(&with_scheme).map_err(|e| Error::discovery(format!("invalid server URL {server:?}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::discovery(format!("unsupported scheme in server URL {server:?}")));
    }

    let mut segments: Vec<String> = url.path_segments().map(|s| s.map(str::to_string).collect()).unwrap_or_default();
    if segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }
    if segments.last().map_or(true, |s| s.is_empty()) {
        return Err(Error::discovery(format!(
            "server URL {server:?} has no path segment to replace with a sub-cluster name"
        )));
    }
    url.set_path(&segments.join("/"));
    Ok(url)
}

fn replace_last_segment(mut url: Url, cluster: &str) -> String {
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop().push(cluster);
    }
    url.to_string()
}
