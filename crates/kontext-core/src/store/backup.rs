use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use jiff::civil::DateTime;

use super::{parent_dir, write_atomic, KubeconfigStore};
use crate::document::ConfigDocument;
use crate::error::{Error, Result};

const BACKUP_MARKER: &str = ".backup-";
const STAMP_FORMAT: &str = "%Y%m%d-%H%M%S";
/// Length of a rendered `STAMP_FORMAT`.
const STAMP_LEN: usize = 15;

impl KubeconfigStore {
    /// Writes `doc` to `<path>.backup-<YYYYMMDD-HHMMSS>` and prunes old backups.
    pub fn backup(&self, doc: &ConfigDocument) -> Result<PathBuf> {
        self.backup_at(doc, jiff::Zoned::now().datetime())
    }

    pub(crate) fn backup_at(&self, doc: &ConfigDocument, at: DateTime) -> Result<PathBuf> {
        let backup_path = self.next_backup_path(at)?;
        let yaml = doc.to_yaml().map_err(|e| Error::io(&backup_path, io::Error::other(e)))?;
        write_atomic(&backup_path, |file| file.write_all(yaml.as_bytes()))?;
        tracing::info!("Created backup {}", backup_path.display());

        if let Err(e) = self.prune_backups() {
            tracing::warn!("Failed to clean old backups: {e}");
        }
        Ok(backup_path)
    }

    /// Existing backups of this kubeconfig, oldest first.
    pub fn backups(&self) -> Result<Vec<PathBuf>> {
        Ok(self.keyed_backups()?.into_iter().map(|(_, path)| path).collect())
    }

    fn keyed_backups(&self) -> Result<Vec<(BackupKey, PathBuf)>> {
        let dir = parent_dir(&self.path);
        let prefix = self.backup_prefix();
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::io(dir, e)),
        };

        let mut backups = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(dir, e))?;
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(suffix) = name.strip_prefix(&prefix).filter(|_| is_file) {
                backups.push((BackupKey::parse(suffix), entry.path()));
            }
        }
        backups.sort();
        Ok(backups)
    }

    fn prune_backups(&self) -> Result<()> {
        let backups = self.backups()?;
        let excess = backups.len().saturating_sub(self.backup_retention);
        for old in &backups[..excess] {
            fs::remove_file(old).map_err(|e| Error::io(old, e))?;
            tracing::info!("Removed old backup {}", old.display());
        }
        Ok(())
    }

    fn backup_prefix(&self) -> String {
        let base = self.path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        format!("{base}{BACKUP_MARKER}")
    }

    /// `<path>.backup-<stamp>` for the first backup in a second, then
    /// `-1`, `-2`, ... numbered past the highest one still on disk.
    fn next_backup_path(&self, at: DateTime) -> Result<PathBuf> {
        let stamp = at.strftime(STAMP_FORMAT).to_string();
        let latest =
            self.keyed_backups()?.into_iter().filter(|(key, _)| key.stamp == stamp).map(|(key, _)| key.counter).max();

        let mut name = self.path.as_os_str().to_os_string();
        name.push(BACKUP_MARKER);
        name.push(&stamp);
        if let Some(counter) = latest {
            name.push(format!("-{}", counter + 1));
        }
        Ok(PathBuf::from(name))
    }
}

/// Orders backups by timestamp, then by same-second counter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct BackupKey {
    stamp: String,
    counter: u32,
}

impl BackupKey {
    fn parse(suffix: &str) -> Self {
        match suffix.get(STAMP_LEN..).and_then(|rest| rest.strip_prefix('-')).and_then(|n| n.parse().ok()) {
            Some(counter) => Self { stamp: suffix[..STAMP_LEN].to_string(), counter },
            None => Self { stamp: suffix.to_string(), counter: 0 },
        }
    }
}
