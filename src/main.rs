use std::net::SocketAddr;
use tonic::transport::Server;
use tonic_reflection::server::Builder;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_grpc::billing_server;
use api_rest::{AppState, router};
use api_shared::{ApiKeyInterceptor, FILE_DESCRIPTOR_SET};
use medlink_core::{CoreConfig, PatientService, open_store, store_backend_from_env_values};

/// Main entry point for the MedLink application
///
/// Starts both servers concurrently:
/// - billing gRPC server on port 9001 (configurable via MEDLINK_GRPC_ADDR)
/// - patient REST server on port 8080 (configurable via MEDLINK_REST_ADDR)
///
/// # Environment Variables
/// - `MEDLINK_GRPC_ADDR`: gRPC server address (default: "0.0.0.0:9001")
/// - `MEDLINK_REST_ADDR`: REST server address (default: "0.0.0.0:8080")
/// - `PATIENT_STORE`: `sqlite` (default) or `memory`
/// - `PATIENT_DB_PATH`: SQLite database file (default: "patient_data/patients.db")
/// - `API_KEY`: API key required on gRPC calls (open when unset)
/// - `MEDLINK_ENABLE_REFLECTION`: `true` to enable gRPC reflection
///
/// # Returns
/// * `Ok(())` - If servers start and run successfully
/// * `Err(anyhow::Error)` - If configuration, server startup or runtime fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medlink=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("api_grpc=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let grpc_addr: SocketAddr = std::env::var("MEDLINK_GRPC_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:9001".into())
        .parse()?;
    let rest_addr = std::env::var("MEDLINK_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());

    let store_backend = store_backend_from_env_values(
        std::env::var("PATIENT_STORE").ok(),
        std::env::var("PATIENT_DB_PATH").ok(),
    )?;
    let cfg = CoreConfig::new(store_backend)?;
    let patient_service = PatientService::new(open_store(&cfg)?);

    let auth = ApiKeyInterceptor::new(std::env::var("API_KEY").ok());
    if !auth.is_enforced() {
        tracing::warn!("API_KEY not set; billing gRPC accepts unauthenticated calls");
    }

    tracing::info!("++ Starting MedLink billing gRPC on {}", grpc_addr);
    tracing::info!("++ Starting MedLink patient REST on {}", rest_addr);

    let rest_app = router(AppState { patient_service });
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    let rest_server = tokio::spawn(async move { axum::serve(listener, rest_app).await });

    let mut grpc_router = Server::builder().add_service(billing_server(auth));
    if std::env::var("MEDLINK_ENABLE_REFLECTION").unwrap_or_else(|_| "false".to_string()) == "true"
    {
        let reflection_service = Builder::configure()
            .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
            .build_v1()?;
        grpc_router = grpc_router.add_service(reflection_service);
        tracing::info!("gRPC server reflection enabled");
    }
    let grpc_server = grpc_router.serve(grpc_addr);

    // Run both
    let (rest_result, grpc_result) = tokio::join!(rest_server, grpc_server);
    rest_result??;
    grpc_result?;

    Ok(())
}
