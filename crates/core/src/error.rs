use crate::store::StoreError;
use crate::validation::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("Patient with id {0} not found.")]
    NotFound(uuid::Uuid),
    #[error("Patient with email {0} already exists.")]
    EmailConflict(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("patient store error: {0}")]
    Store(#[from] StoreError),
}

impl From<ValidationErrors> for PatientError {
    fn from(errors: ValidationErrors) -> Self {
        PatientError::Validation(errors)
    }
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;
