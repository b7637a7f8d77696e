use std::collections::BTreeSet;
use std::fmt;

use crate::client::ClusterApi;
use crate::document::ConfigDocument;

/// Clusters and credentials no context points at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Orphans {
    pub clusters: Vec<String>,
    pub credentials: Vec<String>,
}

impl Orphans {
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty() && self.credentials.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    MissingCluster(String),
    MissingCredential(String),
    Unreachable(String),
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCluster(name) => write!(f, "cluster {name:?} is missing"),
            Self::MissingCredential(name) => write!(f, "user {name:?} is missing"),
            Self::Unreachable(msg) => write!(f, "unreachable: {msg}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidContext {
    pub name: String,
    pub reason: InvalidReason,
}

/// Cluster and credential names referenced by at least one context.
pub fn references(doc: &ConfigDocument) -> (BTreeSet<&str>, BTreeSet<&str>) {
    let clusters = doc.contexts.values().map(|ctx| ctx.cluster.as_str()).collect();
    let credentials = doc.contexts.values().map(|ctx| ctx.user.as_str()).collect();
    (clusters, credentials)
}

pub fn find_orphans(doc: &ConfigDocument) -> Orphans {
    let (used_clusters, used_credentials) = references(doc);
    let mut orphans = Orphans {
        clusters: doc.clusters.keys().filter(|name| !used_clusters.contains(name.as_str())).cloned().collect(),
        credentials: doc
            .credentials
            .keys()
            .filter(|name| !used_credentials.contains(name.as_str()))
            .cloned()
            .collect(),
    };
    orphans.clusters.sort();
    orphans.credentials.sort();
    orphans
}

/// Deletes every orphan from `doc` and returns the removed names, sorted.
pub fn remove_orphans(doc: &mut ConfigDocument) -> Orphans {
    let orphans = find_orphans(doc);
    for name in &orphans.clusters {
        doc.clusters.remove(name);
    }
    for name in &orphans.credentials {
        doc.credentials.remove(name);
    }
    orphans
}

/// Contexts whose cluster or credential reference does not resolve.
pub fn broken_contexts(doc: &ConfigDocument) -> Vec<InvalidContext> {
    doc.contexts
        .iter()
        .filter_map(|(name, ctx)| {
            let reason = if !doc.clusters.contains_key(&ctx.cluster) {
                InvalidReason::MissingCluster(ctx.cluster.clone())
            } else if !doc.credentials.contains_key(&ctx.user) {
                InvalidReason::MissingCredential(ctx.user.clone())
            } else {
                return None;
            };
            Some(InvalidContext { name: name.clone(), reason })
        })
        .collect()
}

/// Broken contexts plus, when `api` is given, contexts whose cluster rejects
/// their credential or cannot be reached. Probes run one at a time.
pub async fn find_invalid_contexts<A: ClusterApi>(doc: &ConfigDocument, api: Option<&A>) -> Vec<InvalidContext> {
    let mut invalid = broken_contexts(doc);
    let Some(api) = api else {
        return invalid;
    };

    for (name, ctx) in &doc.contexts {
        if invalid.iter().any(|i| &i.name == name) {
            continue;
        }
        let (Some(cluster), Some(credential)) = (doc.clusters.get(&ctx.cluster), doc.credentials.get(&ctx.user))
        else {
            continue;
        };
        if let Err(e) = api.check_access(&cluster.server, credential.token()).await {
            tracing::debug!("Context {name} failed validation: {e}");
            invalid.push(InvalidContext { name: name.clone(), reason: InvalidReason::Unreachable(e.to_string()) });
        }
    }

    invalid.sort_by(|a, b| a.name.cmp(&b.name));
    invalid
}
