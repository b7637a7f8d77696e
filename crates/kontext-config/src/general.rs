use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneralConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kubeconfig: Option<PathBuf>,
    #[serde(alias = "backup-retention")]
    pub backup_retention: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { kubeconfig: None, backup_retention: 5 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClusterConfig {
    #[serde(alias = "timeout-secs")]
    pub timeout_secs: u64,
    #[serde(alias = "insecure-skip-tls-verify")]
    pub insecure_skip_tls_verify: bool,
}

impl ClusterConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self { timeout_secs: 5, insecure_skip_tls_verify: true }
    }
}
