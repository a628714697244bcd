//! # MedLink Core
//!
//! Core business logic for the MedLink patient registry.
//!
//! This crate contains pure data operations:
//! - Patient entity and payload validation
//! - Find-or-create, update, delete and listing via [`PatientService`]
//! - The [`store::PatientStore`] seam with in-memory and SQLite implementations
//!
//! **No API concerns**: HTTP/gRPC servers, status codes and wire DTOs belong in `api-rest`,
//! `api-grpc`, or `api-shared`.

pub mod config;
pub mod constants;
pub mod error;
pub mod patient;
pub mod service;
pub mod store;
pub mod validation;

pub use config::{open_store, store_backend_from_env_values, CoreConfig, StoreBackend};
pub use constants::DEFAULT_PATIENT_DB_PATH;
pub use error::{PatientError, PatientResult};
pub use medlink_types::{EmailAddress, NonEmptyText, TextError};
pub use patient::{Creation, NewPatient, Patient, PatientChanges, PatientPayload};
pub use service::PatientService;
pub use validation::{validate_new_patient, validate_patient_changes, FieldError, ValidationErrors};
