use std::path::{Path, PathBuf};

use crate::errors::{LedgerError, Result};
use crate::ledger::{Ledger, CURRENT_SCHEMA_VERSION};
use crate::storage::StorageBackend;

/// Facade that owns the live ledger state and coordinates persistence.
/// The single root context: components receive `&mut Ledger` from here and
/// never touch storage themselves.
pub struct LedgerManager {
    current: Option<Ledger>,
    current_name: Option<String>,
    storage: Box<dyn StorageBackend>,
}

impl LedgerManager {
    pub fn new(storage: Box<dyn StorageBackend>) -> Self {
        Self {
            current: None,
            current_name: None,
            storage,
        }
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    pub fn current(&self) -> Result<&Ledger> {
        self.current.as_ref().ok_or(LedgerError::LedgerNotLoaded)
    }

    pub fn current_mut(&mut self) -> Result<&mut Ledger> {
        self.current.as_mut().ok_or(LedgerError::LedgerNotLoaded)
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current_name.as_deref()
    }

    pub fn set_current(&mut self, ledger: Ledger, name: Option<String>) {
        self.current = Some(ledger);
        self.current_name = name;
    }

    /// Loads the named ledger from storage, replacing the live state only
    /// after the document parsed completely.
    pub fn load(&mut self, name: &str) -> Result<()> {
        let ledger = self.storage.load(name)?;
        Self::ensure_schema_support(ledger.schema_version)?;
        self.current = Some(ledger);
        self.current_name = Some(name.to_string());
        Ok(())
    }

    /// Loads the named ledger, or starts a fresh one if nothing was saved
    /// under that name yet.
    pub fn load_or_create(&mut self, name: &str) -> Result<()> {
        if self.storage.exists(name) {
            self.load(name)
        } else {
            self.set_current(Ledger::new(), Some(name.to_string()));
            Ok(())
        }
    }

    pub fn save(&mut self) -> Result<PathBuf> {
        let name = self
            .current_name
            .clone()
            .ok_or_else(|| LedgerError::Storage("current ledger is unnamed".into()))?;
        let ledger = self.current()?.clone();
        self.storage.save(&ledger, &name)
    }

    pub fn save_as(&mut self, name: &str) -> Result<PathBuf> {
        let ledger = self.current()?.clone();
        let path = self.storage.save(&ledger, name)?;
        self.current_name = Some(name.to_string());
        Ok(path)
    }

    /// Serializes the live state to one JSON document.
    pub fn dump_snapshot(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.current()?)?)
    }

    /// Replaces the live state wholesale with a parsed snapshot. The value
    /// is staged into a full `Ledger` first; a malformed document leaves
    /// the current state untouched.
    pub fn load_snapshot(&mut self, doc: serde_json::Value) -> Result<()> {
        let staged: Ledger = serde_json::from_value(doc)?;
        Self::ensure_schema_support(staged.schema_version)?;
        self.current = Some(staged);
        Ok(())
    }

    pub fn export(&self, path: &Path) -> Result<()> {
        self.storage.export(self.current()?, path)
    }

    /// Imports an export file, replacing the live state. Confirmation is
    /// the host's job; by the time this runs the decision is made.
    pub fn import(&mut self, path: &Path) -> Result<()> {
        let snapshot = self.storage.import(path)?;
        Self::ensure_schema_support(snapshot.ledger.schema_version)?;
        self.current = Some(snapshot.ledger);
        Ok(())
    }

    fn ensure_schema_support(schema_version: u8) -> Result<()> {
        if schema_version > CURRENT_SCHEMA_VERSION {
            return Err(LedgerError::Storage(format!(
                "ledger schema v{} is newer than supported v{}",
                schema_version, CURRENT_SCHEMA_VERSION
            )));
        }
        Ok(())
    }
}
