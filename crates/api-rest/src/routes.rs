//! Router and handlers for the patient REST API.

use axum::{
    extract::{rejection::JsonRejection, Path as AxumPath, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use crate::dto::{MessageBody, PatientRequest, PatientResponse};
use crate::error::ApiError;
use api_shared::{pb, HealthService};
use medlink_core::{
    validate_new_patient, validate_patient_changes, PatientResult, PatientService,
};

/// Application state for the REST API server
///
/// Shared by all request handlers; holds the `PatientService` used for data operations.
#[derive(Clone)]
pub struct AppState {
    pub patient_service: PatientService,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, list_patients, create_patient, update_patient, delete_patient),
    components(schemas(pb::HealthRes, PatientRequest, PatientResponse, MessageBody))
)]
pub struct ApiDoc;

/// Builds the REST router, including Swagger UI and a permissive CORS layer.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/patients", get(list_patients))
        .route("/api/v1/patients/", get(list_patients))
        .route("/api/v1/patients/create", post(create_patient))
        .route("/api/v1/patients/update/:id", put(update_patient))
        .route("/api/v1/patients/delete/:id", delete(delete_patient))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn parse_patient_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|e| {
        tracing::warn!("Invalid patient id {:?}: {}", raw, e);
        ApiError::BadRequest(format!("Invalid patient id: {raw}"))
    })
}

/// Runs a patient service call on the blocking pool; the stores take locks and do file I/O.
async fn with_service<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    F: FnOnce(PatientService) -> PatientResult<T> + Send + 'static,
    T: Send + 'static,
{
    let service = state.patient_service.clone();
    let result = tokio::task::spawn_blocking(move || op(service))
        .await
        .map_err(|e| {
            tracing::error!("Patient service task failed: {}", e);
            ApiError::Internal
        })?;
    Ok(result?)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = pb::HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<pb::HealthRes> {
    Json(HealthService::check_health("patient REST API"))
}

#[utoipa::path(
    get,
    path = "/api/v1/patients",
    responses(
        (status = 200, description = "List of patients", body = [PatientResponse]),
        (status = 500, description = "Internal server error", body = MessageBody)
    )
)]
/// List all patients in store order.
#[axum::debug_handler]
async fn list_patients(
    State(state): State<AppState>,
) -> Result<Json<Vec<PatientResponse>>, ApiError> {
    let patients = with_service(&state, |service| service.list_patients()).await?;
    Ok(Json(patients.iter().map(PatientResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/patients/create",
    request_body = PatientRequest,
    responses(
        (status = 201, description = "Patient created", body = PatientResponse),
        (status = 200, description = "Patient with this email already existed", body = PatientResponse),
        (status = 400, description = "Invalid payload; body maps field names to messages"),
        (status = 500, description = "Internal server error", body = MessageBody)
    )
)]
/// Create a patient idempotently by email.
///
/// Returns `201 Created` when a new record was inserted and `200 OK` with the
/// untouched existing record when the email was already registered.
#[axum::debug_handler]
async fn create_patient(
    State(state): State<AppState>,
    payload: Result<Json<PatientRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PatientResponse>), ApiError> {
    let Json(req) = payload?;
    let new = validate_new_patient(&req.into())?;

    let creation = with_service(&state, move |service| service.create_patient(new)).await?;
    let status = if creation.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(PatientResponse::from(creation.patient()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/patients/update/{id}",
    params(("id" = String, Path, description = "Patient UUID")),
    request_body = PatientRequest,
    responses(
        (status = 200, description = "Patient updated", body = PatientResponse),
        (status = 400, description = "Invalid payload or id, or email already used by another patient"),
        (status = 404, description = "Patient not found", body = MessageBody),
        (status = 500, description = "Internal server error", body = MessageBody)
    )
)]
/// Update name, email, address and date of birth of an existing patient.
#[axum::debug_handler]
async fn update_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    payload: Result<Json<PatientRequest>, JsonRejection>,
) -> Result<Json<PatientResponse>, ApiError> {
    let id = parse_patient_id(&id)?;
    let Json(req) = payload?;
    let changes = validate_patient_changes(&req.into())?;

    let updated =
        with_service(&state, move |service| service.update_patient(id, changes)).await?;
    Ok(Json(PatientResponse::from(&updated)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/patients/delete/{id}",
    params(("id" = String, Path, description = "Patient UUID")),
    responses(
        (status = 204, description = "Patient deleted, or did not exist"),
        (status = 400, description = "Malformed id", body = MessageBody),
        (status = 500, description = "Internal server error", body = MessageBody)
    )
)]
/// Delete a patient. Unknown ids are accepted silently.
#[axum::debug_handler]
async fn delete_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_patient_id(&id)?;
    with_service(&state, move |service| service.delete_patient(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
