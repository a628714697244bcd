//! Patient storage.
//!
//! [`PatientStore`] is the only seam between the patient service and persistence.
//! Implementations must make [`PatientStore::save`] and [`PatientStore::update`]
//! enforce email uniqueness in the same atomic step as the write; the service relies on that to close the
//! check-then-act window of find-or-create and update.

mod memory;
mod sqlite;

pub use memory::InMemoryPatientStore;
pub use sqlite::SqlitePatientStore;

use crate::patient::Patient;
use uuid::Uuid;

/// Storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A different record already holds this email.
    #[error("email already in use: {0}")]
    DuplicateEmail(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("patient store lock poisoned")]
    Poisoned,

    #[error("stored patient record is corrupt: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Capability set every patient store provides.
pub trait PatientStore: Send + Sync {
    /// All records in insertion order.
    fn find_all(&self) -> StoreResult<Vec<Patient>>;

    fn find_by_email(&self, email: &str) -> StoreResult<Option<Patient>>;

    fn exists_by_email(&self, email: &str) -> StoreResult<bool>;

    /// Whether a record other than `id` holds `email`.
    fn exists_by_email_excluding(&self, email: &str, id: Uuid) -> StoreResult<bool>;

    fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Patient>>;

    /// Inserts `patient`, or replaces the record with the same id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateEmail`] if another record holds the email.
    fn save(&self, patient: &Patient) -> StoreResult<Patient>;

    /// Replaces the record with `patient.id` but never inserts one.
    ///
    /// Returns `Ok(None)` when no record has that id, e.g. because it was deleted
    /// after the caller read it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateEmail`] if another record holds the email.
    fn update(&self, patient: &Patient) -> StoreResult<Option<Patient>>;

    /// Removes the record with `id`. Returns `false` if there was none.
    fn delete_by_id(&self, id: Uuid) -> StoreResult<bool>;
}
