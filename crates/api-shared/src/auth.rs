use std::sync::Arc;
use tonic::service::Interceptor;
use tonic::{Request, Status};

/// Metadata key carrying the API key on gRPC calls.
pub const API_KEY_HEADER: &str = "x-api-key";

/// gRPC interceptor checking the `x-api-key` metadata against a key fixed at startup.
///
/// With no expected key every call is let through.
#[derive(Clone, Debug, Default)]
pub struct ApiKeyInterceptor {
    expected: Option<Arc<str>>,
}

impl ApiKeyInterceptor {
    /// Blank keys are treated as "no key configured".
    pub fn new(expected: Option<String>) -> Self {
        let expected = expected
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .map(Arc::from);
        Self { expected }
    }

    pub fn is_enforced(&self) -> bool {
        self.expected.is_some()
    }

    /// Validates the provided API key.
    ///
    /// Returns `Ok(())` if no key is configured or the key matches.
    #[allow(clippy::result_large_err)]
    pub fn validate_api_key(&self, provided_key: Option<&str>) -> Result<(), Status> {
        let Some(expected) = self.expected.as_deref() else {
            return Ok(());
        };

        match provided_key {
            None => Err(Status::unauthenticated("Missing x-api-key header")),
            Some(key) if key == expected => Ok(()),
            Some(_) => Err(Status::unauthenticated("Invalid API key")),
        }
    }
}

impl Interceptor for ApiKeyInterceptor {
    fn call(&mut self, req: Request<()>) -> Result<Request<()>, Status> {
        let provided = req
            .metadata()
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok());
        self.validate_api_key(provided)?;
        Ok(req)
    }
}
