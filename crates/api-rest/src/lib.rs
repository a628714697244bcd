//! # API REST
//!
//! REST API implementation for the MedLink patient registry.
//!
//! Handles:
//! - HTTP endpoints with axum under `/api/v1/patients`
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON DTOs, status-code mapping, CORS)
//!
//! Business rules live in `medlink-core`; this crate only decodes, validates and maps.

#![warn(rust_2018_idioms)]

pub mod dto;
pub mod error;
pub mod routes;

pub use error::ApiError;
pub use routes::{router, ApiDoc, AppState};
