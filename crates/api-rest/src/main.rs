//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the patient REST API server on its own.
//!
//! ## Intended use
//! Useful for development and debugging when you only want the REST server (with
//! OpenAPI/Swagger UI). The workspace's main `medlink-run` binary runs both gRPC and REST
//! concurrently.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use medlink_core::{open_store, store_backend_from_env_values, CoreConfig, PatientService};

/// Main entry point for the MedLink REST API server
///
/// # Environment Variables
/// - `MEDLINK_REST_ADDR`: Server address (default: "0.0.0.0:8080")
/// - `PATIENT_STORE`: `sqlite` (default) or `memory`
/// - `PATIENT_DB_PATH`: SQLite database file (default: "patient_data/patients.db")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the store configuration is invalid or the store cannot be opened,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("medlink=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("MEDLINK_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());

    let store_backend = store_backend_from_env_values(
        std::env::var("PATIENT_STORE").ok(),
        std::env::var("PATIENT_DB_PATH").ok(),
    )?;
    let cfg = CoreConfig::new(store_backend)?;
    let store = open_store(&cfg)?;

    let app = router(AppState {
        patient_service: PatientService::new(store),
    });

    tracing::info!("-- Starting MedLink patient REST API on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
