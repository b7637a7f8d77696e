use super::ContextManager;
use crate::client::ClusterApi;
use crate::document::ConfigDocument;
use crate::error::Result;
use crate::integrity::find_orphans;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextEntry {
    pub name: String,
    pub cluster: String,
    /// `None` when the referenced cluster is missing.
    pub server: Option<String>,
    pub credential: String,
    pub credential_present: bool,
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanCluster {
    pub name: String,
    pub server: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub current_context: String,
    pub contexts: Vec<ContextEntry>,
    pub orphan_clusters: Vec<OrphanCluster>,
    pub orphan_credentials: Vec<String>,
}

impl Listing {
    pub fn from_document(doc: &ConfigDocument) -> Self {
        let mut contexts: Vec<ContextEntry> = doc
            .contexts
            .iter()
            .map(|(name, ctx)| ContextEntry {
                name: name.clone(),
                cluster: ctx.cluster.clone(),
                server: doc.clusters.get(&ctx.cluster).map(|c| c.server.clone()),
                credential: ctx.user.clone(),
                credential_present: doc.credentials.contains_key(&ctx.user),
                current: *name == doc.current_context,
            })
            .collect();
        contexts.sort_by(|a, b| a.name.cmp(&b.name));

        let orphans = find_orphans(doc);
        let orphan_clusters = orphans
            .clusters
            .into_iter()
            .map(|name| {
                let server = doc.clusters.get(&name).map(|c| c.server.clone()).unwrap_or_default();
                OrphanCluster { name, server }
            })
            .collect();

        Self {
            current_context: doc.current_context.clone(),
            contexts,
            orphan_clusters,
            orphan_credentials: orphans.credentials,
        }
    }

    pub fn has_orphans(&self) -> bool {
        !self.orphan_clusters.is_empty() || !self.orphan_credentials.is_empty()
    }
}

impl<A: ClusterApi> ContextManager<A> {
    /// Read-only view of contexts and unreferenced clusters and users.
    pub fn list(&self) -> Result<Listing> {
        Ok(Listing::from_document(&self.store.load()?))
    }
}
