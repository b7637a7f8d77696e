mod backup;

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::document::ConfigDocument;
use crate::error::{Error, Result};

pub const DEFAULT_BACKUP_RETENTION: usize = 5;

/// The kubeconfig file on disk. Every mutation goes through a full
/// load, modify and atomic replace cycle.
#[derive(Debug, Clone)]
pub struct KubeconfigStore {
    path: PathBuf,
    backup_retention: usize,
}

impl KubeconfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), backup_retention: DEFAULT_BACKUP_RETENTION }
    }

    pub fn with_backup_retention(mut self, retention: usize) -> Self {
        self.backup_retention = retention.max(1);
        self
    }

    /// Uses `explicit` when given, otherwise the kubectl lookup rules.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Ok(Self::new(path));
        }
        default_kubeconfig_path(std::env::var_os("KUBECONFIG"), dirs::home_dir())
            .map(Self::new)
            .ok_or_else(|| Error::NotFound("default kubeconfig path (set KUBECONFIG or HOME)".into()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the kubeconfig, or an empty document when the file does not exist yet.
    pub fn load(&self) -> Result<ConfigDocument> {
        match fs::read_to_string(&self.path) {
            Ok(text) => ConfigDocument::parse(&text, &self.path),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!("Kubeconfig not found at {}, starting from an empty config", self.path.display());
                Ok(ConfigDocument::default())
            }
            Err(e) => Err(Error::io(&self.path, e)),
        }
    }

    /// Reads a kubeconfig that must exist, e.g. a file being merged in.
    pub fn read(path: &Path) -> Result<ConfigDocument> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        ConfigDocument::parse(&text, path)
    }

    pub fn save(&self, doc: &ConfigDocument) -> Result<()> {
        let yaml = doc.to_yaml().map_err(|e| Error::io(&self.path, io::Error::other(e)))?;
        write_atomic(&self.path, |file| file.write_all(yaml.as_bytes()))?;
        tracing::debug!("Saved kubeconfig to {}", self.path.display());
        Ok(())
    }
}

/// Writes into a temp file next to `path` and renames it over `path`. On any
/// failure the target keeps its previous content and the temp file is removed.
pub fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let dir = parent_dir(path);
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;

    let mut tmp =
        tempfile::Builder::new().prefix(".kontext-").suffix(".tmp").tempfile_in(dir).map_err(|e| Error::io(dir, e))?;
    write(tmp.as_file_mut()).map_err(|e| Error::io(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| Error::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| Error::io(path, e.error))?;
    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// First existing entry of `KUBECONFIG`, else its first entry, else `~/.kube/config`.
pub fn default_kubeconfig_path(kubeconfig_env: Option<OsString>, home: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(paths) = kubeconfig_env {
        let candidates: Vec<PathBuf> = std::env::split_paths(&paths).filter(|p| !p.as_os_str().is_empty()).collect();
        if let Some(existing) = candidates.iter().find(|p| p.exists()) {
            return Some(existing.clone());
        }
        if let Some(first) = candidates.into_iter().next() {
            return Some(first);
        }
    }
    home.map(|home| home.join(".kube").join("config"))
}
