//! JSON request and response bodies.

use medlink_core::constants::DATE_FORMAT;
use medlink_core::{Patient, PatientPayload};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Patient payload accepted by create and update.
///
/// Every field is optional on the wire so that missing fields are reported by
/// validation rather than rejected by the JSON decoder.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientRequest {
    #[schema(example = "Ana Souza")]
    pub name: Option<String>,
    #[schema(example = "ana.souza@example.com")]
    pub email: Option<String>,
    #[schema(example = "Rua das Flores, 123")]
    pub address: Option<String>,
    #[schema(example = "1990-05-01")]
    pub date_of_birth: Option<String>,
    /// Required on create, ignored on update.
    #[schema(example = "2024-01-15")]
    pub registered_date: Option<String>,
}

impl From<PatientRequest> for PatientPayload {
    fn from(req: PatientRequest) -> Self {
        PatientPayload {
            name: req.name,
            email: req.email,
            address: req.address,
            date_of_birth: req.date_of_birth,
            registered_date: req.registered_date,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub address: String,
    #[schema(example = "1990-05-01")]
    pub date_of_birth: String,
    #[schema(example = "2024-01-15")]
    pub registered_date: String,
}

impl From<&Patient> for PatientResponse {
    fn from(patient: &Patient) -> Self {
        PatientResponse {
            id: patient.id.to_string(),
            name: patient.name.to_string(),
            email: patient.email.to_string(),
            address: patient.address.to_string(),
            date_of_birth: patient.date_of_birth.format(DATE_FORMAT).to_string(),
            registered_date: patient.registered_date.format(DATE_FORMAT).to_string(),
        }
    }
}

/// Single-message error body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageBody {
    pub message: String,
}
