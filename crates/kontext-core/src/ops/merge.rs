use std::path::Path;

use super::{ContextManager, FailedContext, MergeReport};
use crate::client::ClusterApi;
use crate::context::ContextConfig;
use crate::discovery::{discover, ScanType};
use crate::error::{Error, Result};
use crate::store::KubeconfigStore;

impl<A: ClusterApi> ContextManager<A> {
    /// Imports the token-based contexts of the kubeconfig at `path` as
    /// `<prefix>-<name>`, where the prefix defaults to the file stem. Aborts
    /// before creating anything if an imported name is already a context.
    pub async fn merge(&self, path: &Path, prefix: Option<&str>, scan: Option<&ScanType>) -> Result<MergeReport> {
        if path.as_os_str().is_empty() {
            return Err(Error::validation("kubeconfig file path cannot be empty"));
        }
        let prefix = match prefix.filter(|p| !p.is_empty()) {
            Some(prefix) => prefix.to_string(),
            None => default_prefix(path)?,
        };

        let current = self.store.load()?;
        let external = KubeconfigStore::read(path)?;

        let mut report = MergeReport::default();
        let mut imports = Vec::new();
        for (name, ctx) in &external.contexts {
            let cluster = external.clusters.get(&ctx.cluster);
            let credential = external.credentials.get(&ctx.user);
            let (Some(cluster), Some(credential)) = (cluster, credential) else {
                tracing::warn!(
                    "Skipped context {name}: missing resources (cluster: {}, user: {})",
                    cluster.is_some(),
                    credential.is_some()
                );
                report.skipped_unresolved.push(name.clone());
                continue;
            };
            if credential.is_certificate_based() {
                report.skipped_certificate.push(name.clone());
                continue;
            }
            imports.push(ContextConfig::new(format!("{prefix}-{name}"), cluster.server.clone(), credential.token()));
        }
        if !report.skipped_certificate.is_empty() {
            tracing::warn!(
                "Skipped {} certificate-based contexts: {}",
                report.skipped_certificate.len(),
                report.skipped_certificate.join(", ")
            );
        }

        let conflicts: Vec<&str> = imports
            .iter()
            .filter(|c| current.contexts.contains_key(&c.name))
            .map(|c| c.name.as_str())
            .collect();
        if !conflicts.is_empty() {
            return Err(Error::conflict(format!(
                "contexts already exist: {}; use --name to choose another prefix (e.g. --name=prod)",
                conflicts.join(", ")
            )));
        }

        for config in imports {
            let mut batch = vec![config];
            if let Some(scan) = scan {
                match discover(&batch[0], scan, &self.api).await {
                    Ok(found) => batch.extend(found),
                    Err(e) => {
                        tracing::warn!("Failed to scan sub-clusters for {}: {e}", batch[0].name);
                        let name = batch.swap_remove(0).name;
                        report.batch.failed.push(FailedContext { name, reason: e.to_string() });
                        continue;
                    }
                }
            }
            self.create_batch(batch, &mut report.batch);
        }
        Ok(report)
    }
}

fn default_prefix(path: &Path) -> Result<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| Error::validation(format!("cannot derive a name prefix from {}", path.display())))
}
