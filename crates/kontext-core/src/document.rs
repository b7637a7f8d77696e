use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::context::ContextConfig;
use crate::error::{Error, Result};

/// Fields of a kubeconfig entry that kontext does not interpret. They are kept
/// verbatim so a load/save cycle never drops data.
pub type Extra = BTreeMap<String, Value>;

const API_VERSION: &str = "v1";
const KIND: &str = "Config";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Cluster {
    #[serde(default)]
    pub server: String,
    #[serde(rename = "insecure-skip-tls-verify", default, skip_serializing_if = "is_false")]
    pub insecure_skip_tls_verify: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Credential {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(rename = "client-certificate-data", default, skip_serializing_if = "Option::is_none")]
    pub client_certificate_data: Option<String>,
    #[serde(rename = "client-certificate", default, skip_serializing_if = "Option::is_none")]
    pub client_certificate: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Credential {
    pub fn bearer(token: &str) -> Self {
        Self { token: Some(token.to_string()), ..Default::default() }
    }

    pub fn is_certificate_based(&self) -> bool {
        self.client_certificate_data.is_some() || self.client_certificate.is_some()
    }

    pub fn token(&self) -> &str {
        self.token.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Context {
    #[serde(default)]
    pub cluster: String,
    #[serde(default)]
    pub user: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Context {
    pub fn new(cluster: &str, user: &str) -> Self {
        Self { cluster: cluster.to_string(), user: user.to_string(), extra: Extra::new() }
    }
}

/// In-memory kubeconfig with every named list turned into a map keyed by name.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    pub clusters: BTreeMap<String, Cluster>,
    pub credentials: BTreeMap<String, Credential>,
    pub contexts: BTreeMap<String, Context>,
    /// Empty when no context is selected.
    pub current_context: String,
    api_version: String,
    kind: String,
    extra: Extra,
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self {
            clusters: BTreeMap::new(),
            credentials: BTreeMap::new(),
            contexts: BTreeMap::new(),
            current_context: String::new(),
            api_version: API_VERSION.into(),
            kind: KIND.into(),
            extra: Extra::new(),
        }
    }
}

impl ConfigDocument {
    /// Parses kubeconfig YAML. `path` is only used for error messages.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value = serde_yaml::from_str(text).map_err(|e| Error::parse(path, e))?;
        if value.is_null() {
            return Err(Error::Integrity(format!("{} holds a null document", path.display())));
        }
        let raw: RawKubeconfig = serde_yaml::from_value(value).map_err(|e| Error::parse(path, e))?;
        Ok(Self::from(raw))
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&RawKubeconfig::from(self))
    }

    /// Document holding exactly one context built from `config`.
    pub fn single(config: &ContextConfig, insecure_skip_tls_verify: bool) -> Self {
        let mut doc = Self::default();
        doc.insert_context(config, insecure_skip_tls_verify);
        doc
    }

    /// A name must be unique across clusters, credentials and contexts at once.
    pub fn check_name_available(&self, name: &str) -> Result<()> {
        if self.clusters.contains_key(name) {
            return Err(Error::conflict(format!("cluster named {name:?} already exists")));
        }
        if self.credentials.contains_key(name) {
            return Err(Error::conflict(format!("user named {name:?} already exists")));
        }
        if self.contexts.contains_key(name) {
            return Err(Error::conflict(format!("context named {name:?} already exists")));
        }
        Ok(())
    }

    /// Adds cluster, credential and context under `config.name` and makes it
    /// the current context.
    pub fn insert_context(&mut self, config: &ContextConfig, insecure_skip_tls_verify: bool) {
        let name = config.name.clone();
        self.clusters.insert(
            name.clone(),
            Cluster { server: config.server.clone(), insecure_skip_tls_verify, extra: Extra::new() },
        );
        self.credentials.insert(name.clone(), Credential::bearer(&config.token));
        self.contexts.insert(name.clone(), Context::new(&name, &name));
        self.current_context = name;
    }

    pub fn has_current_context(&self) -> bool {
        !self.current_context.is_empty()
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Deserialize, Serialize)]
struct NamedCluster {
    name: String,
    #[serde(default)]
    cluster: Cluster,
}

#[derive(Debug, Deserialize, Serialize)]
struct NamedCredential {
    name: String,
    #[serde(default)]
    user: Credential,
}

#[derive(Debug, Deserialize, Serialize)]
struct NamedContext {
    name: String,
    #[serde(default)]
    context: Context,
}

/// The on-disk layout as written by kubectl.
#[derive(Debug, Deserialize, Serialize)]
struct RawKubeconfig {
    #[serde(rename = "apiVersion", default, skip_serializing_if = "Option::is_none")]
    api_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default)]
    clusters: Option<Vec<NamedCluster>>,
    #[serde(default)]
    contexts: Option<Vec<NamedContext>>,
    #[serde(rename = "current-context", default)]
    current_context: Option<String>,
    #[serde(default)]
    users: Option<Vec<NamedCredential>>,
    #[serde(flatten)]
    extra: Extra,
}

fn insert_named<T>(map: &mut BTreeMap<String, T>, kind: &str, name: String, value: T) {
    if map.insert(name.clone(), value).is_some() {
        tracing::warn!("Duplicate {kind} entry {name:?} in kubeconfig; keeping the last one");
    }
}

impl From<RawKubeconfig> for ConfigDocument {
    fn from(raw: RawKubeconfig) -> Self {
        let mut doc = Self {
            current_context: raw.current_context.unwrap_or_default(),
            api_version: raw.api_version.unwrap_or_else(|| API_VERSION.into()),
            kind: raw.kind.unwrap_or_else(|| KIND.into()),
            extra: raw.extra,
            ..Default::default()
        };
        for entry in raw.clusters.unwrap_or_default() {
            insert_named(&mut doc.clusters, "cluster", entry.name, entry.cluster);
        }
        for entry in raw.users.unwrap_or_default() {
            insert_named(&mut doc.credentials, "user", entry.name, entry.user);
        }
        for entry in raw.contexts.unwrap_or_default() {
            insert_named(&mut doc.contexts, "context", entry.name, entry.context);
        }
        doc
    }
}

impl From<&ConfigDocument> for RawKubeconfig {
    fn from(doc: &ConfigDocument) -> Self {
        Self {
            api_version: Some(doc.api_version.clone()),
            kind: Some(doc.kind.clone()),
            clusters: Some(
                doc.clusters
                    .iter()
                    .map(|(name, cluster)| NamedCluster { name: name.clone(), cluster: cluster.clone() })
                    .collect(),
            ),
            contexts: Some(
                doc.contexts
                    .iter()
                    .map(|(name, context)| NamedContext { name: name.clone(), context: context.clone() })
                    .collect(),
            ),
            current_context: Some(doc.current_context.clone()),
            users: Some(
                doc.credentials
                    .iter()
                    .map(|(name, user)| NamedCredential { name: name.clone(), user: user.clone() })
                    .collect(),
            ),
            extra: doc.extra.clone(),
        }
    }
}

#[cfg(test)]
mod tests;
