use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;

use once_cell::sync::Lazy;

static TRACING_INIT: Once = Once::new();

static DEFAULT_BASE: Lazy<PathBuf> = Lazy::new(|| {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stockbook")
});

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("stockbook=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
    });
}

/// Creates the directory (and parents) if missing.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Resolves the application directories under the platform data dir, with
/// an override hook so tests and hosts can relocate everything.
pub struct PathResolver;

impl PathResolver {
    pub fn resolve_base(root: Option<PathBuf>) -> PathBuf {
        root.unwrap_or_else(|| DEFAULT_BASE.clone())
    }

    pub fn ledger_dir_in(base: &Path) -> PathBuf {
        base.join("ledgers")
    }

    pub fn backup_dir_in(base: &Path) -> PathBuf {
        base.join("backups")
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        base.join("config.json")
    }
}
