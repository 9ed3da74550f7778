use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    errors::{LedgerError, Result},
    ledger::Ledger,
    utils::{ensure_dir, PathResolver},
};

use super::StorageBackend;

const SNAPSHOT_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

pub const EXPORT_FORMAT_VERSION: u32 = 1;

/// File-backed snapshot store: one pretty-printed JSON document per ledger,
/// plus timestamped backups with bounded retention. All writes go through a
/// temp file and a rename so a crash never leaves a half-written document.
#[derive(Clone)]
pub struct JsonStorage {
    ledgers_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let app_root = PathResolver::resolve_base(root);
        ensure_dir(&app_root)?;
        let ledgers_dir = PathResolver::ledger_dir_in(&app_root);
        let backups_dir = PathResolver::backup_dir_in(&app_root);
        ensure_dir(&ledgers_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            ledgers_dir,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, None)
    }

    pub fn ledger_path(&self, name: &str) -> PathBuf {
        self.ledgers_dir
            .join(format!("{}.{}", canonical_name(name), SNAPSHOT_EXTENSION))
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    pub fn backup_path(&self, name: &str, backup_name: &str) -> PathBuf {
        self.backup_dir(name).join(backup_name)
    }

    fn prune_backups(&self, name: &str) -> Result<()> {
        let backups = self.list_backups(name)?;
        if backups.len() <= self.retention {
            return Ok(());
        }
        for entry in backups.iter().skip(self.retention) {
            let _ = fs::remove_file(self.backup_path(name, entry));
        }
        Ok(())
    }
}

impl StorageBackend for JsonStorage {
    fn save(&self, ledger: &Ledger, name: &str) -> Result<PathBuf> {
        let path = self.ledger_path(name);
        let json = serde_json::to_string_pretty(ledger)?;
        write_atomic(&path, &json)?;
        tracing::debug!(name, path = %path.display(), "saved ledger snapshot");
        Ok(path)
    }

    fn load(&self, name: &str) -> Result<Ledger> {
        let path = self.ledger_path(name);
        if !path.exists() {
            return Err(LedgerError::Storage(format!(
                "ledger `{}` not found at {}",
                name,
                path.display()
            )));
        }
        let data = fs::read_to_string(&path)?;
        let ledger: Ledger = serde_json::from_str(&data)?;
        Ok(ledger)
    }

    fn exists(&self, name: &str) -> bool {
        self.ledger_path(name).exists()
    }

    fn list_ledgers(&self) -> Result<Vec<String>> {
        if !self.ledgers_dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.ledgers_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(SNAPSHOT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn export(&self, ledger: &Ledger, path: &Path) -> Result<()> {
        let snapshot = ExportSnapshot::new(ledger.clone());
        let json = serde_json::to_string_pretty(&snapshot)?;
        write_atomic(path, &json)?;
        Ok(())
    }

    /// Parses an export file fully before returning it, so a corrupt file
    /// is rejected without the caller's state ever changing.
    fn import(&self, path: &Path) -> Result<ExportSnapshot> {
        if !path.exists() {
            return Err(LedgerError::Storage(format!(
                "export file `{}` not found",
                path.display()
            )));
        }
        let data = fs::read_to_string(path)?;
        let snapshot: ExportSnapshot = serde_json::from_str(&data)?;
        if snapshot.format_version > EXPORT_FORMAT_VERSION {
            return Err(LedgerError::Storage(format!(
                "export `{}` uses format v{}, newer than supported v{}",
                path.display(),
                snapshot.format_version,
                EXPORT_FORMAT_VERSION
            )));
        }
        Ok(snapshot)
    }

    fn backup(&self, ledger: &Ledger, name: &str, note: Option<&str>) -> Result<PathBuf> {
        let dir = self.backup_dir(name);
        ensure_dir(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut file_stem = format!("{}_{}", canonical_name(name), timestamp);
        if let Some(label) = sanitize_backup_note(note) {
            file_stem.push('_');
            file_stem.push_str(&label);
        }
        let path = dir.join(format!("{}.{}", file_stem, SNAPSHOT_EXTENSION));
        let json = serde_json::to_string_pretty(ledger)?;
        write_atomic(&path, &json)?;
        self.prune_backups(name)?;
        Ok(path)
    }

    fn list_backups(&self, name: &str) -> Result<Vec<String>> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(SNAPSHOT_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(file_name.to_string());
            }
        }
        // Timestamped names sort lexicographically; newest first.
        entries.sort_by(|a, b| b.cmp(a));
        Ok(entries)
    }
}

/// Envelope written by `export` and consumed by `import`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSnapshot {
    pub format_version: u32,
    pub exported_at: DateTime<Utc>,
    pub ledger: Ledger,
}

impl ExportSnapshot {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            format_version: EXPORT_FORMAT_VERSION,
            exported_at: Utc::now(),
            ledger,
        }
    }
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "ledger".into()
    } else {
        sanitized
    }
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if ch.is_whitespace() || matches!(ch, '-' | '.') {
            if !sanitized.is_empty() && !last_dash {
                sanitized.push('-');
                last_dash = true;
            }
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage =
            JsonStorage::new(Some(temp.path().to_path_buf()), Some(3)).expect("json storage");
        (storage, temp)
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (storage, _guard) = storage_with_temp_dir();
        let ledger = Ledger::new();
        storage.save(&ledger, "corner shop").expect("save ledger");
        let loaded = storage.load("corner shop").expect("load ledger");
        assert!(loaded.products.is_empty());
        assert!(storage.exists("corner shop"));
    }

    #[test]
    fn canonical_names_keep_files_predictable() {
        let (storage, _guard) = storage_with_temp_dir();
        let path = storage.ledger_path("Corner Shop!");
        assert!(path.ends_with("corner_shop_.json"));
    }

    #[test]
    fn export_envelope_carries_version_and_timestamp() {
        let (storage, guard) = storage_with_temp_dir();
        let target = guard.path().join("dump.json");
        storage.export(&Ledger::new(), &target).expect("export");

        let raw = fs::read_to_string(&target).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["formatVersion"], EXPORT_FORMAT_VERSION);
        assert!(doc.get("exportedAt").is_some());

        let snapshot = storage.import(&target).expect("import");
        assert_eq!(snapshot.format_version, EXPORT_FORMAT_VERSION);
    }

    #[test]
    fn import_rejects_newer_format_versions() {
        let (storage, guard) = storage_with_temp_dir();
        let target = guard.path().join("future.json");
        let mut snapshot = ExportSnapshot::new(Ledger::new());
        snapshot.format_version = EXPORT_FORMAT_VERSION + 1;
        fs::write(&target, serde_json::to_string(&snapshot).unwrap()).unwrap();

        let err = storage.import(&target).expect_err("future format");
        assert!(matches!(err, LedgerError::Storage(_)));
    }

    #[test]
    fn backups_are_timestamped_and_pruned() {
        let (storage, _guard) = storage_with_temp_dir();
        let ledger = Ledger::new();
        for note in ["first", "second", "third", "fourth"] {
            storage.backup(&ledger, "shop", Some(note)).expect("backup");
        }
        let backups = storage.list_backups("shop").expect("list backups");
        assert!(
            backups.len() <= 3,
            "retention of 3 exceeded: {}",
            backups.len()
        );
        assert!(backups.iter().all(|name| name.starts_with("shop_")));
    }
}
