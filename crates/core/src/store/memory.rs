//! Process-local patient store.

use super::{PatientStore, StoreError, StoreResult};
use crate::patient::Patient;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    next_seq: u64,
    /// id -> (insertion sequence, record)
    records: HashMap<Uuid, (u64, Patient)>,
    /// email -> id of the record holding it
    by_email: HashMap<String, Uuid>,
}

/// In-memory [`PatientStore`].
///
/// Records and the email index live behind one lock, so the uniqueness check in
/// `save`/`update` and the write that follows cannot interleave with another writer.
#[derive(Default)]
pub struct InMemoryPatientStore {
    inner: RwLock<Inner>,
}

impl Inner {
    /// Inserts or replaces `patient`; the caller holds the write lock.
    fn put(&mut self, patient: &Patient) -> StoreResult<()> {
        let email = patient.email.as_str();

        if let Some(holder) = self.by_email.get(email) {
            if *holder != patient.id {
                return Err(StoreError::DuplicateEmail(email.to_string()));
            }
        }

        let previous = self
            .records
            .get(&patient.id)
            .map(|(seq, old)| (*seq, old.email.as_str().to_string()));

        let seq = match previous {
            Some((seq, old_email)) => {
                self.by_email.remove(&old_email);
                seq
            }
            None => {
                self.next_seq += 1;
                self.next_seq
            }
        };

        self.by_email.insert(email.to_string(), patient.id);
        self.records.insert(patient.id, (seq, patient.clone()));
        Ok(())
    }
}

impl InMemoryPatientStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Inner>> {
        self.inner.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Inner>> {
        self.inner.write().map_err(|_| StoreError::Poisoned)
    }
}

impl PatientStore for InMemoryPatientStore {
    fn find_all(&self) -> StoreResult<Vec<Patient>> {
        let inner = self.read()?;
        let mut rows: Vec<&(u64, Patient)> = inner.records.values().collect();
        rows.sort_by_key(|(seq, _)| *seq);
        Ok(rows.into_iter().map(|(_, p)| p.clone()).collect())
    }

    fn find_by_email(&self, email: &str) -> StoreResult<Option<Patient>> {
        let inner = self.read()?;
        Ok(inner
            .by_email
            .get(email)
            .and_then(|id| inner.records.get(id))
            .map(|(_, p)| p.clone()))
    }

    fn exists_by_email(&self, email: &str) -> StoreResult<bool> {
        Ok(self.read()?.by_email.contains_key(email))
    }

    fn exists_by_email_excluding(&self, email: &str, id: Uuid) -> StoreResult<bool> {
        Ok(self
            .read()?
            .by_email
            .get(email)
            .is_some_and(|holder| *holder != id))
    }

    fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Patient>> {
        Ok(self.read()?.records.get(&id).map(|(_, p)| p.clone()))
    }

    fn save(&self, patient: &Patient) -> StoreResult<Patient> {
        let mut inner = self.write()?;
        inner.put(patient)?;
        Ok(patient.clone())
    }

    fn update(&self, patient: &Patient) -> StoreResult<Option<Patient>> {
        let mut inner = self.write()?;
        if !inner.records.contains_key(&patient.id) {
            return Ok(None);
        }
        inner.put(patient)?;
        Ok(Some(patient.clone()))
    }

    fn delete_by_id(&self, id: Uuid) -> StoreResult<bool> {
        let mut inner = self.write()?;
        match inner.records.remove(&id) {
            Some((_, removed)) => {
                inner.by_email.remove(removed.email.as_str());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::contract;
    use std::sync::Arc;

    #[test]
    fn save_and_find() {
        contract::save_and_find(&InMemoryPatientStore::new());
    }

    #[test]
    fn find_all_keeps_insertion_order() {
        contract::find_all_keeps_insertion_order(&InMemoryPatientStore::new());
    }

    #[test]
    fn save_rejects_duplicate_email() {
        contract::save_rejects_duplicate_email(&InMemoryPatientStore::new());
    }

    #[test]
    fn save_replaces_by_id() {
        contract::save_replaces_by_id(&InMemoryPatientStore::new());
    }

    #[test]
    fn update_never_inserts() {
        contract::update_never_inserts(&InMemoryPatientStore::new());
    }

    #[test]
    fn exists_by_email_excluding() {
        contract::exists_by_email_excluding(&InMemoryPatientStore::new());
    }

    #[test]
    fn delete_is_idempotent() {
        contract::delete_is_idempotent(&InMemoryPatientStore::new());
    }

    #[test]
    fn concurrent_saves_keep_one_email_holder() {
        contract::concurrent_saves_keep_one_email_holder(Arc::new(InMemoryPatientStore::new()));
    }
}
