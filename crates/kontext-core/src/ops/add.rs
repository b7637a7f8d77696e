use super::{BatchReport, ContextManager};
use crate::client::ClusterApi;
use crate::context::ContextConfig;
use crate::discovery::{discover, ScanType};
use crate::error::Result;

impl<A: ClusterApi> ContextManager<A> {
    /// Adds `config` after checking the name is free and the cluster accepts
    /// the token, then any sub-clusters found by `scan`. Failures of single
    /// sub-contexts are reported, not raised.
    pub async fn add(&self, config: ContextConfig, scan: Option<&ScanType>) -> Result<BatchReport> {
        config.validate()?;
        self.store.load()?.check_name_available(&config.name)?;
        self.api.check_access(&config.server, &config.token).await?;

        let mut batch = vec![config];
        if let Some(scan) = scan {
            let found = discover(&batch[0], scan, &self.api).await?;
            if found.is_empty() {
                tracing::info!("No sub-clusters found for type {scan}");
            }
            batch.extend(found);
        }

        let mut report = BatchReport::default();
        self.create_batch(batch, &mut report);
        Ok(report)
    }
}
