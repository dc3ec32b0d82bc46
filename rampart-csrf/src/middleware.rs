use crate::{config::CsrfConfig, engine::CsrfEngine, error::Result};
use async_trait::async_trait;
use rampart_core::{Error, HttpRequest, HttpResponse, Middleware, Next};
use tracing::error;

/// Body of the response sent for a rejected request
pub const REJECTION_BODY: &str = "csrf validation error";

/// CSRF protection middleware
///
/// Excluded paths pass straight through. Every other request leaves with a
/// secret cookie (when new) and a fresh token; requests whose token fails
/// verification are answered with `403 Forbidden` without reaching the
/// handler.
#[derive(Clone, Debug)]
pub struct CsrfMiddleware {
    engine: CsrfEngine,
}

impl CsrfMiddleware {
    /// Create new CSRF middleware backed by the OS random source
    pub fn new(config: CsrfConfig) -> Result<Self> {
        Ok(Self::from_engine(CsrfEngine::new(config)?))
    }

    pub fn from_engine(engine: CsrfEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &CsrfEngine {
        &self.engine
    }

    /// Check if request needs CSRF verification
    pub fn needs_protection(&self, request: &HttpRequest) -> bool {
        self.engine
            .policy()
            .should_verify(&request.method, &request.path)
    }
}

#[async_trait]
impl Middleware for CsrfMiddleware {
    async fn handle(&self, req: HttpRequest, next: Next) -> std::result::Result<HttpResponse, Error> {
        if self.engine.policy().is_excluded(&req.path) {
            return next(req).await;
        }

        let protection = self.engine.protect(&req).map_err(|e| {
            error!(error = %e, path = %req.path, "csrf engine failure");
            Error::from(e)
        })?;

        if protection.is_rejected() {
            let response = HttpResponse::forbidden().with_body(REJECTION_BODY);
            return Ok(self.engine.apply(response, &protection));
        }

        let response = next(req).await?;
        Ok(self.engine.apply(response, &protection))
    }
}
