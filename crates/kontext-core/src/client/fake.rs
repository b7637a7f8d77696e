use std::cell::RefCell;
use std::collections::HashSet;

use super::{ClusterApi, ResourceRef};
use crate::error::{Error, Result};

/// In-memory stand-in for a set of live clusters.
#[derive(Debug, Default)]
pub(crate) struct FakeClusterApi {
    unreachable: HashSet<String>,
    sub_clusters: Option<Vec<String>>,
    discovery_error: Option<String>,
    pub checked: RefCell<Vec<String>>,
    pub scanned: RefCell<Vec<String>>,
}

impl FakeClusterApi {
    /// Every server answers; no cluster serves the sub-cluster resource.
    pub fn reachable() -> Self {
        Self::default()
    }

    pub fn with_unreachable(mut self, server: &str) -> Self {
        self.unreachable.insert(server.to_string());
        self
    }

    pub fn with_sub_clusters(mut self, names: &[&str]) -> Self {
        self.sub_clusters = Some(names.iter().map(|n| n.to_string()).collect());
        self
    }

    pub fn with_discovery_error(mut self, msg: &str) -> Self {
        self.discovery_error = Some(msg.to_string());
        self
    }
}

impl ClusterApi for FakeClusterApi {
    async fn check_access(&self, server: &str, _token: &str) -> Result<()> {
        self.checked.borrow_mut().push(server.to_string());
        if self.unreachable.contains(server) {
            return Err(Error::unreachable(server, "connection refused"));
        }
        Ok(())
    }

    async fn serves_resource(&self, server: &str, _token: &str, _resource: &ResourceRef) -> Result<bool> {
        self.scanned.borrow_mut().push(server.to_string());
        if let Some(msg) = &self.discovery_error {
            return Err(Error::discovery(msg.clone()));
        }
        Ok(self.sub_clusters.is_some())
    }

    async fn list_names(&self, _server: &str, _token: &str, _resource: &ResourceRef) -> Result<Vec<String>> {
        Ok(self.sub_clusters.clone().unwrap_or_default())
    }
}
