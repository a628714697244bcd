//! Standalone billing gRPC server binary.
//!
//! The workspace's main `medlink-run` binary runs gRPC and REST concurrently; this one
//! serves only the billing stub.

use std::net::SocketAddr;
use tonic::transport::Server;
use tonic_reflection::server::Builder;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_grpc::billing_server;
use api_shared::{ApiKeyInterceptor, FILE_DESCRIPTOR_SET};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_grpc=info".parse()?)
                .add_directive("medlink=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr: SocketAddr = std::env::var("MEDLINK_GRPC_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:9001".into())
        .parse()?;

    let auth = ApiKeyInterceptor::new(std::env::var("API_KEY").ok());
    if !auth.is_enforced() {
        tracing::warn!("API_KEY not set; billing gRPC accepts unauthenticated calls");
    }

    tracing::info!("-- Starting MedLink billing gRPC on {}", addr);

    let mut server_builder = Server::builder().add_service(billing_server(auth));

    if std::env::var("MEDLINK_ENABLE_REFLECTION").unwrap_or_else(|_| "false".to_string()) == "true"
    {
        let reflection_service = Builder::configure()
            .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
            .build_v1()?;
        server_builder = server_builder.add_service(reflection_service);
        tracing::info!("gRPC server reflection enabled");
    } else {
        tracing::info!("gRPC server reflection disabled");
    }

    server_builder.serve(addr).await?;

    Ok(())
}
