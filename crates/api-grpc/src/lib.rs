//! # API gRPC
//!
//! gRPC server implementation for the MedLink billing stub.
//!
//! Handles:
//! - gRPC service setup and API-key authentication
//! - Service implementations using `medlink-billing`
//! - gRPC-specific concerns (interceptors, reflection, tonic integration)
//!
//! Uses `api-shared` for generated types and utilities.

#![warn(rust_2018_idioms)]

pub use service::{billing_server, pb, BillingGrpcService};

pub mod service;
