use super::{CleanReport, CleanupReport, ContextManager};
use crate::client::ClusterApi;
use crate::context::ContextPattern;
use crate::document::ConfigDocument;
use crate::error::{Error, Result};
use crate::integrity::{find_invalid_contexts, remove_orphans};

impl<A: ClusterApi> ContextManager<A> {
    /// Deletes the contexts matching `pattern` (`name` or `prefix*`) together
    /// with the clusters and users nothing references any more.
    pub fn delete(&self, pattern: &str) -> Result<CleanupReport> {
        let pattern = ContextPattern::parse(pattern)?;
        let doc = self.store.load()?;

        let matched: Vec<String> = doc.contexts.keys().filter(|name| pattern.matches(name)).cloned().collect();
        if matched.is_empty() {
            return Err(match &pattern {
                ContextPattern::Exact(name) => Error::NotFound(format!("context {name:?} does not exist")),
                ContextPattern::Prefix(_) => Error::NotFound(format!("no contexts found matching pattern \"{pattern}\"")),
            });
        }

        let reset_current = matched.contains(&doc.current_context);
        self.apply_removal(doc, matched, reset_current)
    }

    /// Removes contexts with dangling references and, when `probe` is set,
    /// contexts whose cluster does not accept their token. Writes only when
    /// something changed.
    pub async fn clean(&self, probe: bool) -> Result<CleanReport> {
        let doc = self.store.load()?;
        let invalid = find_invalid_contexts(&doc, probe.then_some(&self.api)).await;
        let names: Vec<String> = invalid.iter().map(|i| i.name.clone()).collect();

        let reset_current = doc.has_current_context()
            && (!doc.contexts.contains_key(&doc.current_context) || names.contains(&doc.current_context));
        let cleanup = self.apply_removal(doc, names, reset_current)?;
        if !cleanup.persisted {
            tracing::info!("No invalid or orphaned resources found; kubeconfig is healthy");
        }
        Ok(CleanReport { invalid, cleanup })
    }

    /// Removes `contexts`, optionally clears the current context, drops
    /// orphans, then backs up the previous state and saves once if anything
    /// changed.
    fn apply_removal(&self, doc: ConfigDocument, contexts: Vec<String>, reset_current: bool) -> Result<CleanupReport> {
        let mut updated = doc.clone();
        for name in &contexts {
            updated.contexts.remove(name);
            tracing::info!("Removed context {name}");
        }
        if reset_current {
            updated.current_context.clear();
            tracing::info!("Cleared current context setting");
        }
        let removed = remove_orphans(&mut updated);

        let persisted = !contexts.is_empty() || reset_current || !removed.is_empty();
        let mut backup = None;
        if persisted {
            backup = self.backup_before_change(&doc);
            self.store.save(&updated)?;
        }
        Ok(CleanupReport { removed_contexts: contexts, current_reset: reset_current, removed, backup, persisted })
    }
}
