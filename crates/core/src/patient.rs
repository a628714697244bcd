//! Patient entity and the validated inputs that produce or change it.

use chrono::NaiveDate;
use medlink_types::{EmailAddress, NonEmptyText};
use uuid::Uuid;

/// A persisted patient record.
///
/// `id` and `registered_date` are fixed at creation; the remaining fields can
/// only change through [`Patient::apply`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Patient {
    pub id: Uuid,
    pub name: NonEmptyText,
    pub email: EmailAddress,
    pub address: NonEmptyText,
    pub date_of_birth: NaiveDate,
    pub registered_date: NaiveDate,
}

impl Patient {
    /// Builds a record for a new patient, allocating a fresh identifier.
    pub fn register(new: NewPatient) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            address: new.address,
            date_of_birth: new.date_of_birth,
            registered_date: new.registered_date,
        }
    }

    /// Returns a copy with the mutable fields overwritten by `changes`.
    pub fn apply(&self, changes: PatientChanges) -> Self {
        Self {
            id: self.id,
            name: changes.name,
            email: changes.email,
            address: changes.address,
            date_of_birth: changes.date_of_birth,
            registered_date: self.registered_date,
        }
    }
}

/// A validated candidate record, not yet persisted and without an identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewPatient {
    pub name: NonEmptyText,
    pub email: EmailAddress,
    pub address: NonEmptyText,
    pub date_of_birth: NaiveDate,
    pub registered_date: NaiveDate,
}

/// Validated replacement values for the mutable fields of a patient.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatientChanges {
    pub name: NonEmptyText,
    pub email: EmailAddress,
    pub address: NonEmptyText,
    pub date_of_birth: NaiveDate,
}

/// Raw, unvalidated patient fields as received from a caller.
///
/// Dates are ISO `YYYY-MM-DD` strings. Missing fields are `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatientPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<String>,
    pub registered_date: Option<String>,
}

/// Result of a find-or-create request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Creation {
    /// No patient held the email; this record was inserted.
    Created(Patient),
    /// A patient already held the email; it is returned unchanged.
    Existing(Patient),
}

impl Creation {
    pub fn patient(&self) -> &Patient {
        match self {
            Creation::Created(p) | Creation::Existing(p) => p,
        }
    }

    pub fn into_patient(self) -> Patient {
        match self {
            Creation::Created(p) | Creation::Existing(p) => p,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Creation::Created(_))
    }
}
