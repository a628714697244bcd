// Re-export the proto module from the shared `api-shared` crate so callers
// can reference `api_grpc::pb`.
pub use api_shared::pb;

use api_shared::pb::billing_service_server::{BillingService, BillingServiceServer};
use api_shared::pb::{BillingRequest, BillingResponse, HealthRes};
use api_shared::{ApiKeyInterceptor, HealthService};
use medlink_billing::{AccountRequest, BillingAccountService};
use tonic::service::interceptor::InterceptedService;
use tonic::{Request, Response, Status};

#[derive(Default, Clone)]
pub struct BillingGrpcService {
    accounts: BillingAccountService,
}

#[tonic::async_trait]
impl BillingService for BillingGrpcService {
    async fn health(&self, _req: Request<()>) -> Result<Response<HealthRes>, Status> {
        Ok(Response::new(HealthService::check_health("billing gRPC")))
    }

    async fn create_billing_account(
        &self,
        req: Request<BillingRequest>,
    ) -> Result<Response<BillingResponse>, Status> {
        let req = req.into_inner();
        let account = self.accounts.create_account(&AccountRequest {
            patient_id: req.patient_id,
            name: req.name,
            email: req.email,
        });

        Ok(Response::new(BillingResponse {
            account_id: account.account_id,
            status: account.status.to_string(),
        }))
    }
}

/// Wraps the billing service with the API-key interceptor.
pub fn billing_server(
    auth: ApiKeyInterceptor,
) -> InterceptedService<BillingServiceServer<BillingGrpcService>, ApiKeyInterceptor> {
    BillingServiceServer::with_interceptor(BillingGrpcService::default(), auth)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_billing_account_returns_active_account() {
        let service = BillingGrpcService::default();
        let res = service
            .create_billing_account(Request::new(BillingRequest {
                patient_id: "3fa85f64-5717-4562-b3fc-2c963f66afa6".into(),
                name: "Ana".into(),
                email: "ana@example.com".into(),
            }))
            .await
            .expect("create_billing_account should succeed")
            .into_inner();

        assert_eq!(res.status, "ACTIVE");
        assert!(res.account_id.starts_with("acc-"));
    }

    #[tokio::test]
    async fn empty_request_is_accepted() {
        let service = BillingGrpcService::default();
        let res = service
            .create_billing_account(Request::new(BillingRequest::default()))
            .await;
        assert!(res.is_ok());
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let service = BillingGrpcService::default();
        let res = service.health(Request::new(())).await.unwrap().into_inner();
        assert!(res.ok);
    }
}
