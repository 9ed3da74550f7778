//! Persistence backends. The entire contract is one JSON document per
//! ledger; everything else in the crate works on the in-memory state.

pub mod json_backend;

use std::path::{Path, PathBuf};

use crate::errors::Result;
use crate::ledger::Ledger;

pub use json_backend::{ExportSnapshot, JsonStorage, EXPORT_FORMAT_VERSION};

/// Abstracts the snapshot store so the manager and tests can swap it out.
pub trait StorageBackend: Send + Sync {
    fn save(&self, ledger: &Ledger, name: &str) -> Result<PathBuf>;
    fn load(&self, name: &str) -> Result<Ledger>;
    fn exists(&self, name: &str) -> bool;
    fn list_ledgers(&self) -> Result<Vec<String>>;
    fn export(&self, ledger: &Ledger, path: &Path) -> Result<()>;
    fn import(&self, path: &Path) -> Result<ExportSnapshot>;
    fn backup(&self, ledger: &Ledger, name: &str, note: Option<&str>) -> Result<PathBuf>;
    fn list_backups(&self, name: &str) -> Result<Vec<String>>;
}
