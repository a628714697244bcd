use crate::pb::HealthRes;

/// Simple health service that can be used by both gRPC and REST APIs
///
/// This service provides a standardised way to check the health status of a MedLink
/// server. `service` names the process answering, e.g. "patient REST API".
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    pub fn check_health(service: &str) -> HealthRes {
        HealthRes {
            ok: true,
            message: format!("MedLink {service} is alive"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_ok_with_service_name() {
        let res = HealthService::check_health("billing gRPC");
        assert!(res.ok);
        assert_eq!(res.message, "MedLink billing gRPC is alive");
    }
}
