//! SQLite-backed patient store.
//!
//! Email uniqueness is a `UNIQUE` constraint on the `patients` table, so a
//! losing concurrent writer gets a constraint violation instead of a duplicate row.

use super::{PatientStore, StoreError, StoreResult};
use crate::constants::DATE_FORMAT;
use crate::patient::Patient;
use chrono::NaiveDate;
use medlink_types::{EmailAddress, NonEmptyText};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Database schema for the patient store.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS patients (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    address TEXT NOT NULL,
    date_of_birth TEXT NOT NULL,
    registered_date TEXT NOT NULL
);
"#;

const SELECT_COLUMNS: &str =
    "SELECT id, name, email, address, date_of_birth, registered_date FROM patients";

/// [`PatientStore`] over a single SQLite connection.
pub struct SqlitePatientStore {
    conn: Mutex<Connection>,
}

impl SqlitePatientStore {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Self::initialize(Connection::open(path)?)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    fn query_one(&self, filter: &str, value: &str) -> StoreResult<Option<Patient>> {
        let conn = self.conn()?;
        let raw = conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE {filter} = ?1"),
                [value],
                RawPatient::from_row,
            )
            .optional()?;
        raw.map(RawPatient::into_patient).transpose()
    }
}

/// Row as stored, before the text columns are re-validated.
struct RawPatient {
    id: String,
    name: String,
    email: String,
    address: String,
    date_of_birth: String,
    registered_date: String,
}

impl RawPatient {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            address: row.get(3)?,
            date_of_birth: row.get(4)?,
            registered_date: row.get(5)?,
        })
    }

    fn into_patient(self) -> StoreResult<Patient> {
        let corrupt = |what: &str| StoreError::Corrupt(format!("{what} of patient {}", self.id));

        Ok(Patient {
            id: Uuid::parse_str(&self.id).map_err(|_| corrupt("id"))?,
            name: NonEmptyText::new(&self.name).map_err(|_| corrupt("name"))?,
            email: EmailAddress::parse(&self.email).map_err(|_| corrupt("email"))?,
            address: NonEmptyText::new(&self.address).map_err(|_| corrupt("address"))?,
            date_of_birth: NaiveDate::parse_from_str(&self.date_of_birth, DATE_FORMAT)
                .map_err(|_| corrupt("date_of_birth"))?,
            registered_date: NaiveDate::parse_from_str(&self.registered_date, DATE_FORMAT)
                .map_err(|_| corrupt("registered_date"))?,
        })
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

impl PatientStore for SqlitePatientStore {
    fn find_all(&self) -> StoreResult<Vec<Patient>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY rowid"))?;
        let raws = stmt
            .query_map([], RawPatient::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        raws.into_iter().map(RawPatient::into_patient).collect()
    }

    fn find_by_email(&self, email: &str) -> StoreResult<Option<Patient>> {
        self.query_one("email", email)
    }

    fn exists_by_email(&self, email: &str) -> StoreResult<bool> {
        let conn = self.conn()?;
        let exists = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM patients WHERE email = ?1)",
            [email],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn exists_by_email_excluding(&self, email: &str, id: Uuid) -> StoreResult<bool> {
        let conn = self.conn()?;
        let exists = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM patients WHERE email = ?1 AND id <> ?2)",
            params![email, id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Patient>> {
        self.query_one("id", &id.to_string())
    }

    fn save(&self, patient: &Patient) -> StoreResult<Patient> {
        let conn = self.conn()?;
        let result = conn.execute(
            r#"
            INSERT INTO patients (id, name, email, address, date_of_birth, registered_date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                email = excluded.email,
                address = excluded.address,
                date_of_birth = excluded.date_of_birth
            "#,
            params![
                patient.id.to_string(),
                patient.name.as_str(),
                patient.email.as_str(),
                patient.address.as_str(),
                patient.date_of_birth.format(DATE_FORMAT).to_string(),
                patient.registered_date.format(DATE_FORMAT).to_string(),
            ],
        );

        match result {
            Ok(_) => Ok(patient.clone()),
            Err(e) if is_unique_violation(&e) => {
                Err(StoreError::DuplicateEmail(patient.email.as_str().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn update(&self, patient: &Patient) -> StoreResult<Option<Patient>> {
        let conn = self.conn()?;
        let result = conn.execute(
            r#"
            UPDATE patients
            SET name = ?2, email = ?3, address = ?4, date_of_birth = ?5
            WHERE id = ?1
            "#,
            params![
                patient.id.to_string(),
                patient.name.as_str(),
                patient.email.as_str(),
                patient.address.as_str(),
                patient.date_of_birth.format(DATE_FORMAT).to_string(),
            ],
        );

        match result {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(patient.clone())),
            Err(e) if is_unique_violation(&e) => {
                Err(StoreError::DuplicateEmail(patient.email.as_str().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn delete_by_id(&self, id: Uuid) -> StoreResult<bool> {
        let conn = self.conn()?;
        let removed = conn.execute("DELETE FROM patients WHERE id = ?1", [id.to_string()])?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::contract;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn store() -> SqlitePatientStore {
        SqlitePatientStore::open_in_memory().expect("in-memory database should open")
    }

    #[test]
    fn schema_initialized() {
        let store = store();
        let conn = store.conn().unwrap();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"patients".to_string()));
    }

    #[test]
    fn save_and_find() {
        contract::save_and_find(&store());
    }

    #[test]
    fn find_all_keeps_insertion_order() {
        contract::find_all_keeps_insertion_order(&store());
    }

    #[test]
    fn save_rejects_duplicate_email() {
        contract::save_rejects_duplicate_email(&store());
    }

    #[test]
    fn save_replaces_by_id() {
        contract::save_replaces_by_id(&store());
    }

    #[test]
    fn update_never_inserts() {
        contract::update_never_inserts(&store());
    }

    #[test]
    fn exists_by_email_excluding() {
        contract::exists_by_email_excluding(&store());
    }

    #[test]
    fn delete_is_idempotent() {
        contract::delete_is_idempotent(&store());
    }

    #[test]
    fn concurrent_saves_keep_one_email_holder() {
        contract::concurrent_saves_keep_one_email_holder(Arc::new(store()));
    }

    #[test]
    fn records_survive_reopen() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("patients.db");

        let saved = {
            let store = SqlitePatientStore::open(&path).unwrap();
            store
                .save(&contract::patient("Hana", "hana@example.com"))
                .unwrap()
        };

        let reopened = SqlitePatientStore::open(&path).unwrap();
        assert_eq!(reopened.find_all().unwrap(), vec![saved]);
    }

    #[test]
    fn corrupt_rows_are_reported() {
        let store = store();
        store
            .conn()
            .unwrap()
            .execute(
                "INSERT INTO patients VALUES ('not-a-uuid', 'X', 'x@example.com', 'Addr', '2000-01-01', '2024-01-01')",
                [],
            )
            .unwrap();

        let err = store.find_all().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }
}
