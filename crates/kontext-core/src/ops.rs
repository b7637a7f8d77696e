mod add;
mod list;
mod merge;
mod remove;

use std::path::PathBuf;

use crate::client::ClusterApi;
use crate::context::ContextConfig;
use crate::document::ConfigDocument;
use crate::error::Result;
use crate::integrity::{InvalidContext, Orphans};
use crate::store::KubeconfigStore;

pub use list::{ContextEntry, Listing, OrphanCluster};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedContext {
    pub name: String,
    pub reason: String,
}

/// Outcome of creating a batch of contexts one by one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub added: Vec<ContextConfig>,
    pub failed: Vec<FailedContext>,
}

impl BatchReport {
    /// Every creation selects its context, so the last one added stays current.
    pub fn current_context(&self) -> Option<&str> {
        self.added.last().map(|c| c.name.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub batch: BatchReport,
    pub skipped_certificate: Vec<String>,
    pub skipped_unresolved: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed_contexts: Vec<String>,
    pub current_reset: bool,
    pub removed: Orphans,
    pub backup: Option<PathBuf>,
    pub persisted: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    pub invalid: Vec<InvalidContext>,
    pub cleanup: CleanupReport,
}

impl CleanReport {
    pub fn is_healthy(&self) -> bool {
        !self.cleanup.persisted
    }
}

/// Runs the user-facing operations against one kubeconfig file and one
/// cluster API.
pub struct ContextManager<A> {
    store: KubeconfigStore,
    api: A,
    insecure_skip_tls_verify: bool,
}

impl<A: ClusterApi> ContextManager<A> {
    pub fn new(store: KubeconfigStore, api: A) -> Self {
        Self { store, api, insecure_skip_tls_verify: true }
    }

    /// TLS setting written into clusters created from now on.
    pub fn insecure_skip_tls_verify(mut self, insecure: bool) -> Self {
        self.insecure_skip_tls_verify = insecure;
        self
    }

    pub fn store(&self) -> &KubeconfigStore {
        &self.store
    }

    /// Loads the kubeconfig afresh, adds cluster, user and context named
    /// `config.name`, makes it current and saves. The name must be unused as a
    /// cluster, user and context. Each call is a full load-save cycle, so in a
    /// batch the last context created successfully ends up current.
    pub fn create_context(&self, config: &ContextConfig) -> Result<()> {
        config.validate()?;
        let mut doc = self.store.load()?;
        doc.check_name_available(&config.name)?;
        doc.insert_context(config, self.insecure_skip_tls_verify);
        self.store.save(&doc)
    }

    fn create_batch(&self, batch: Vec<ContextConfig>, report: &mut BatchReport) {
        for config in batch {
            match self.create_context(&config) {
                Ok(()) => {
                    tracing::info!("Added context {} ({})", config.name, config.server);
                    report.added.push(config);
                }
                Err(e) => {
                    tracing::warn!("Failed to add context {}: {e}", config.name);
                    report.failed.push(FailedContext { name: config.name, reason: e.to_string() });
                }
            }
        }
    }

    /// Backups never block the write that follows them.
    fn backup_before_change(&self, doc: &ConfigDocument) -> Option<PathBuf> {
        match self.store.backup(doc) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!("Failed to create backup of {}: {e}", self.store.path().display());
                None
            }
        }
    }
}
