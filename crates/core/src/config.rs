//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. The intent is to avoid reading process-wide environment variables
//! during request handling, which can lead to inconsistent behaviour in multi-threaded runtimes
//! and test harnesses.

use crate::constants::DEFAULT_PATIENT_DB_PATH;
use crate::store::{InMemoryPatientStore, PatientStore, SqlitePatientStore};
use crate::{PatientError, PatientResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where patient records are kept.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process-local store, lost on restart.
    Memory,
    /// SQLite database file at the given path.
    Sqlite(PathBuf),
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    store_backend: StoreBackend,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::InvalidInput` if a SQLite backend is given an empty path.
    pub fn new(store_backend: StoreBackend) -> PatientResult<Self> {
        if let StoreBackend::Sqlite(path) = &store_backend {
            if path.as_os_str().is_empty() {
                return Err(PatientError::InvalidInput(
                    "patient database path cannot be empty".into(),
                ));
            }
        }

        Ok(Self { store_backend })
    }

    pub fn store_backend(&self) -> &StoreBackend {
        &self.store_backend
    }
}

/// Parse the store backend from optional `PATIENT_STORE` / `PATIENT_DB_PATH` values.
///
/// Empty or whitespace values fall back to the defaults (`sqlite` at
/// [`DEFAULT_PATIENT_DB_PATH`]). The kind is matched case-insensitively.
pub fn store_backend_from_env_values(
    kind: Option<String>,
    db_path: Option<String>,
) -> PatientResult<StoreBackend> {
    fn non_blank(value: Option<String>) -> Option<String> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    let kind = non_blank(kind).unwrap_or_else(|| "sqlite".into());
    match kind.to_ascii_lowercase().as_str() {
        "memory" => Ok(StoreBackend::Memory),
        "sqlite" => {
            let path = non_blank(db_path).unwrap_or_else(|| DEFAULT_PATIENT_DB_PATH.into());
            Ok(StoreBackend::Sqlite(PathBuf::from(path)))
        }
        other => Err(PatientError::InvalidInput(format!(
            "unknown patient store '{other}' (expected 'sqlite' or 'memory')"
        ))),
    }
}

/// Open the store described by `cfg`.
///
/// For SQLite the parent directory of the database file is created when missing.
pub fn open_store(cfg: &CoreConfig) -> PatientResult<Arc<dyn PatientStore>> {
    match cfg.store_backend() {
        StoreBackend::Memory => {
            tracing::info!("using in-memory patient store");
            Ok(Arc::new(InMemoryPatientStore::new()))
        }
        StoreBackend::Sqlite(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                ensure_dir(parent)?;
            }
            tracing::info!("using SQLite patient store at {}", path.display());
            Ok(Arc::new(SqlitePatientStore::open(path)?))
        }
    }
}

fn ensure_dir(dir: &Path) -> PatientResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| {
        PatientError::InvalidInput(format!(
            "failed to create patient data directory {}: {e}",
            dir.display()
        ))
    })
}
