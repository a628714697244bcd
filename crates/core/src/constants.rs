//! Constants used throughout the MedLink core crate.
//!
//! Field limits, storage defaults and wire field names live here so that
//! validation, storage and the API layers agree on them.

/// Default SQLite database file when no explicit path is configured.
pub const DEFAULT_PATIENT_DB_PATH: &str = "patient_data/patients.db";

/// Maximum length of a patient name, in characters.
pub const NAME_MAX_CHARS: usize = 100;

/// Maximum length of a patient email address, in characters.
pub const EMAIL_MAX_CHARS: usize = 50;

/// Maximum length of a patient address, in characters.
pub const ADDRESS_MAX_CHARS: usize = 200;

/// Attempts made by find-or-create before giving up on a contended email.
pub const CREATE_MAX_ATTEMPTS: usize = 5;

/// Wire names of the patient payload fields, as reported in validation errors.
pub const FIELD_NAME: &str = "name";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_ADDRESS: &str = "address";
pub const FIELD_DATE_OF_BIRTH: &str = "dateOfBirth";
pub const FIELD_REGISTERED_DATE: &str = "registeredDate";

/// ISO calendar date format used for `dateOfBirth` and `registeredDate`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
