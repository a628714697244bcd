//! Patient service.
//!
//! Business rules for the patient registry: find-or-create by email, update with
//! email uniqueness, delete and list. Contains **only** data operations; payload
//! decoding and HTTP status mapping belong in `api-rest`.

use crate::constants::CREATE_MAX_ATTEMPTS;
use crate::error::{PatientError, PatientResult};
use crate::patient::{Creation, NewPatient, Patient, PatientChanges};
use crate::store::{PatientStore, StoreError};
use std::sync::Arc;
use uuid::Uuid;

/// Pure patient data operations - no API concerns
#[derive(Clone)]
pub struct PatientService {
    store: Arc<dyn PatientStore>,
}

impl PatientService {
    /// Creates a new instance of PatientService over `store`.
    pub fn new(store: Arc<dyn PatientStore>) -> Self {
        Self { store }
    }

    /// Whether any patient holds `email`.
    pub fn patient_exists(&self, email: &str) -> PatientResult<bool> {
        Ok(self.store.exists_by_email(email.trim())?)
    }

    /// Lists all patients in store order.
    pub fn list_patients(&self) -> PatientResult<Vec<Patient>> {
        Ok(self.store.find_all()?)
    }

    /// Returns the patient holding the candidate's email, or persists the candidate.
    ///
    /// An existing record is returned unchanged; the candidate's other fields are
    /// discarded. If a concurrent request inserts the same email between the lookup
    /// and the insert, the store rejects our insert and the winner's record is
    /// returned as [`Creation::Existing`].
    ///
    /// # Errors
    ///
    /// Returns `PatientError::EmailConflict` if the email keeps changing hands for
    /// [`CREATE_MAX_ATTEMPTS`] rounds, or `PatientError::Store` on storage failure.
    pub fn create_patient(&self, new: NewPatient) -> PatientResult<Creation> {
        let email = new.email.as_str().to_string();

        for _attempt in 0..CREATE_MAX_ATTEMPTS {
            if let Some(existing) = self.store.find_by_email(&email)? {
                return Ok(Creation::Existing(existing));
            }

            let candidate = Patient::register(new.clone());
            match self.store.save(&candidate) {
                Ok(saved) => {
                    tracing::info!(patient_id = %saved.id, "patient created");
                    return Ok(Creation::Created(saved));
                }
                Err(StoreError::DuplicateEmail(_)) => {
                    tracing::debug!("lost create race for {email}; re-reading winner");
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(PatientError::EmailConflict(email))
    }

    /// Overwrites name, email, address and date of birth of patient `id`.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::NotFound` for an unknown id, including one deleted
    /// while this update was in flight, and `PatientError::EmailConflict` if another
    /// patient holds the new email.
    pub fn update_patient(&self, id: Uuid, changes: PatientChanges) -> PatientResult<Patient> {
        let existing = self
            .store
            .find_by_id(id)?
            .ok_or(PatientError::NotFound(id))?;

        let email = changes.email.as_str().to_string();
        if self.store.exists_by_email_excluding(&email, id)? {
            return Err(PatientError::EmailConflict(email));
        }

        match self.store.update(&existing.apply(changes)) {
            Ok(Some(updated)) => {
                tracing::info!(patient_id = %id, "patient updated");
                Ok(updated)
            }
            Ok(None) => {
                tracing::debug!(patient_id = %id, "patient deleted before update landed");
                Err(PatientError::NotFound(id))
            }
            Err(StoreError::DuplicateEmail(_)) => Err(PatientError::EmailConflict(email)),
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes patient `id`. Deleting an unknown id is a no-op.
    ///
    /// Returns whether a record was removed.
    pub fn delete_patient(&self, id: Uuid) -> PatientResult<bool> {
        let removed = self.store.delete_by_id(id)?;
        if removed {
            tracing::info!(patient_id = %id, "patient deleted");
        } else {
            tracing::debug!(patient_id = %id, "delete of unknown patient ignored");
        }
        Ok(removed)
    }
}
