//! Input validation utilities.
//!
//! Patient payloads are checked here before any domain logic runs. Every field is
//! checked independently and each failing field contributes exactly one
//! [`FieldError`], so callers can report all problems in a single response.

use crate::constants::{
    ADDRESS_MAX_CHARS, DATE_FORMAT, EMAIL_MAX_CHARS, FIELD_ADDRESS, FIELD_DATE_OF_BIRTH,
    FIELD_EMAIL, FIELD_NAME, FIELD_REGISTERED_DATE, NAME_MAX_CHARS,
};
use crate::patient::{NewPatient, PatientChanges, PatientPayload};
use chrono::NaiveDate;
use medlink_types::{EmailAddress, NonEmptyText, TextError};

/// A single rejected field and the reason it was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All field errors found in one payload. Never empty when returned as an error.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Message recorded for `field`, if that field failed.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Validates a payload for find-or-create. `registeredDate` is required.
///
/// # Errors
///
/// Returns every failing field as [`ValidationErrors`].
pub fn validate_new_patient(payload: &PatientPayload) -> Result<NewPatient, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let common = check_common(payload, &mut errors);
    let registered_date = check_date(
        payload.registered_date.as_deref(),
        FIELD_REGISTERED_DATE,
        "Registered Date",
        &mut errors,
    );

    match (common, registered_date) {
        (Some(c), Some(registered_date)) if errors.is_empty() => Ok(NewPatient {
            name: c.name,
            email: c.email,
            address: c.address,
            date_of_birth: c.date_of_birth,
            registered_date,
        }),
        _ => Err(errors),
    }
}

/// Validates a payload for update. `registeredDate` is ignored.
///
/// # Errors
///
/// Returns every failing field as [`ValidationErrors`].
pub fn validate_patient_changes(
    payload: &PatientPayload,
) -> Result<PatientChanges, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    match check_common(payload, &mut errors) {
        Some(changes) if errors.is_empty() => Ok(changes),
        _ => Err(errors),
    }
}

fn check_common(payload: &PatientPayload, errors: &mut ValidationErrors) -> Option<PatientChanges> {
    let name = check_text(
        payload.name.as_deref(),
        FIELD_NAME,
        "Name",
        NAME_MAX_CHARS,
        errors,
    );
    let email = check_email(payload.email.as_deref(), errors);
    let address = check_text(
        payload.address.as_deref(),
        FIELD_ADDRESS,
        "Address",
        ADDRESS_MAX_CHARS,
        errors,
    );
    let date_of_birth = check_date(
        payload.date_of_birth.as_deref(),
        FIELD_DATE_OF_BIRTH,
        "Date of Birth",
        errors,
    );

    Some(PatientChanges {
        name: name?,
        email: email?,
        address: address?,
        date_of_birth: date_of_birth?,
    })
}

fn check_text(
    value: Option<&str>,
    field: &'static str,
    label: &str,
    max: usize,
    errors: &mut ValidationErrors,
) -> Option<NonEmptyText> {
    match NonEmptyText::bounded(value.unwrap_or_default(), max) {
        Ok(text) => Some(text),
        Err(TextError::TooLong { max }) => {
            errors.push(field, format!("{label} can have at most {max} characters"));
            None
        }
        Err(_) => {
            errors.push(field, format!("{label} is mandatory"));
            None
        }
    }
}

fn check_email(value: Option<&str>, errors: &mut ValidationErrors) -> Option<EmailAddress> {
    let raw = value.unwrap_or_default().trim();
    if raw.is_empty() {
        errors.push(FIELD_EMAIL, "Email is mandatory");
        return None;
    }
    if raw.chars().count() > EMAIL_MAX_CHARS {
        errors.push(
            FIELD_EMAIL,
            format!("Email can have at most {EMAIL_MAX_CHARS} characters"),
        );
        return None;
    }
    match EmailAddress::parse(raw) {
        Ok(email) => Some(email),
        Err(_) => {
            errors.push(FIELD_EMAIL, "Email should be valid");
            None
        }
    }
}

fn check_date(
    value: Option<&str>,
    field: &'static str,
    label: &str,
    errors: &mut ValidationErrors,
) -> Option<NaiveDate> {
    let raw = value.unwrap_or_default().trim();
    if raw.is_empty() {
        errors.push(field, format!("{label} is mandatory"));
        return None;
    }
    let parsed = is_iso_date_shape(raw)
        .then(|| NaiveDate::parse_from_str(raw, DATE_FORMAT).ok())
        .flatten();
    if parsed.is_none() {
        errors.push(field, format!("{label} must be a valid date (YYYY-MM-DD)"));
    }
    parsed
}

/// Exactly `YYYY-MM-DD`, zero-padded, no sign.
fn is_iso_date_shape(raw: &str) -> bool {
    raw.len() == 10
        && raw.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_payload() -> PatientPayload {
        PatientPayload {
            name: Some("João Pereira".into()),
            email: Some("joao@example.com".into()),
            address: Some("Av. Central, 100".into()),
            date_of_birth: Some("1985-03-12".into()),
            registered_date: Some("2024-02-01".into()),
        }
    }

    #[test]
    fn accepts_valid_payload_for_create() {
        let new = validate_new_patient(&valid_payload()).expect("payload should validate");
        assert_eq!(new.name.as_str(), "João Pereira");
        assert_eq!(new.email.as_str(), "joao@example.com");
        assert_eq!(new.registered_date.to_string(), "2024-02-01");
    }

    #[test]
    fn reports_every_missing_field() {
        let errors = validate_new_patient(&PatientPayload::default()).unwrap_err();

        assert_eq!(errors.errors().len(), 5);
        assert_eq!(errors.message_for(FIELD_NAME), Some("Name is mandatory"));
        assert_eq!(errors.message_for(FIELD_EMAIL), Some("Email is mandatory"));
        assert_eq!(
            errors.message_for(FIELD_ADDRESS),
            Some("Address is mandatory")
        );
        assert_eq!(
            errors.message_for(FIELD_DATE_OF_BIRTH),
            Some("Date of Birth is mandatory")
        );
        assert_eq!(
            errors.message_for(FIELD_REGISTERED_DATE),
            Some("Registered Date is mandatory")
        );
    }

    #[test]
    fn blank_strings_count_as_missing() {
        let payload = PatientPayload {
            name: Some("   ".into()),
            ..valid_payload()
        };
        let errors = validate_new_patient(&payload).unwrap_err();
        assert_eq!(errors.errors().len(), 1);
        assert_eq!(errors.message_for(FIELD_NAME), Some("Name is mandatory"));
    }

    #[test]
    fn enforces_length_limits() {
        let payload = PatientPayload {
            name: Some("n".repeat(101)),
            email: Some(format!("{}@example.com", "e".repeat(40))),
            address: Some("a".repeat(201)),
            ..valid_payload()
        };
        let errors = validate_new_patient(&payload).unwrap_err();

        assert_eq!(
            errors.message_for(FIELD_NAME),
            Some("Name can have at most 100 characters")
        );
        assert_eq!(
            errors.message_for(FIELD_EMAIL),
            Some("Email can have at most 50 characters")
        );
        assert_eq!(
            errors.message_for(FIELD_ADDRESS),
            Some("Address can have at most 200 characters")
        );
    }

    #[test]
    fn limits_are_inclusive() {
        let payload = PatientPayload {
            name: Some("n".repeat(100)),
            address: Some("a".repeat(200)),
            ..valid_payload()
        };
        assert!(validate_new_patient(&payload).is_ok());
    }

    #[test]
    fn rejects_malformed_email() {
        let payload = PatientPayload {
            email: Some("not-an-email".into()),
            ..valid_payload()
        };
        let errors = validate_new_patient(&payload).unwrap_err();
        assert_eq!(
            errors.message_for(FIELD_EMAIL),
            Some("Email should be valid")
        );
    }

    #[test]
    fn rejects_non_iso_dates() {
        let payload = PatientPayload {
            date_of_birth: Some("12/03/1985".into()),
            registered_date: Some("2024-02-30".into()),
            ..valid_payload()
        };
        let errors = validate_new_patient(&payload).unwrap_err();
        assert_eq!(
            errors.message_for(FIELD_DATE_OF_BIRTH),
            Some("Date of Birth must be a valid date (YYYY-MM-DD)")
        );
        assert_eq!(
            errors.message_for(FIELD_REGISTERED_DATE),
            Some("Registered Date must be a valid date (YYYY-MM-DD)")
        );

        for raw in ["1990-5-1", "+1990-05-01", "1990-05-1", "90-05-01", "1990/05/01", "1990-05-01T00:00"] {
            let payload = PatientPayload {
                date_of_birth: Some(raw.into()),
                ..valid_payload()
            };
            let errors = validate_new_patient(&payload).unwrap_err();
            assert_eq!(
                errors.message_for(FIELD_DATE_OF_BIRTH),
                Some("Date of Birth must be a valid date (YYYY-MM-DD)"),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn accepts_padded_iso_dates_with_surrounding_whitespace() {
        let payload = PatientPayload {
            date_of_birth: Some(" 1990-05-01 ".into()),
            ..valid_payload()
        };
        let new = validate_new_patient(&payload).expect("padded date should validate");
        assert_eq!(new.date_of_birth, NaiveDate::from_ymd_opt(1990, 5, 1).unwrap());
    }

    #[test]
    fn update_ignores_registered_date() {
        let payload = PatientPayload {
            registered_date: None,
            ..valid_payload()
        };
        let changes = validate_patient_changes(&payload).expect("update should validate");
        assert_eq!(changes.address.as_str(), "Av. Central, 100");

        let garbage = PatientPayload {
            registered_date: Some("garbage".into()),
            ..valid_payload()
        };
        assert!(validate_patient_changes(&garbage).is_ok());
    }

    #[test]
    fn display_joins_field_messages() {
        let payload = PatientPayload {
            name: None,
            ..valid_payload()
        };
        let errors = validate_patient_changes(&payload).unwrap_err();
        assert_eq!(errors.to_string(), "name: Name is mandatory");
    }
}
