//! Per-request secret lifecycle, verification and token issuance.

use crate::codec;
use crate::config::{CsrfConfig, TokenTransport};
use crate::error::{CsrfError, Rejection, Result};
use crate::extract::submitted_token;
use crate::policy::RequestPolicy;
use crate::random::{OsRandom, SecureRandom, generate};
use crate::token::{TokenBinder, TokenVerifier};
use rampart_config::Validate;
use rampart_core::{HttpRequest, HttpResponse, decode_cookie_value};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// The secret a request is served under.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionSecret {
    bytes: Vec<u8>,
    minted: bool,
}

impl SessionSecret {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// True when the secret was created for this request and the client
    /// needs a new secret cookie.
    pub fn is_minted(&self) -> bool {
        self.minted
    }

    pub fn encoded(&self) -> String {
        codec::encode(&self.bytes)
    }
}

impl std::fmt::Debug for SessionSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSecret")
            .field("len", &self.bytes.len())
            .field("minted", &self.minted)
            .finish()
    }
}

/// Outcome of the verification step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// Method or path not subject to verification
    Skipped,
    Passed,
    Failed(Rejection),
}

impl Verification {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Verification::Failed(_))
    }
}

/// Everything the engine decided for one request.
#[derive(Debug, Clone)]
pub struct Protection {
    verification: Verification,
    secret: SessionSecret,
    token: String,
}

impl Protection {
    pub fn verification(&self) -> Verification {
        self.verification
    }

    pub fn is_rejected(&self) -> bool {
        self.verification.is_rejected()
    }

    /// `Err(VerificationFailed)` if the submitted token was rejected.
    pub fn check(&self) -> Result<()> {
        match self.verification {
            Verification::Failed(rejection) => Err(CsrfError::VerificationFailed(rejection)),
            Verification::Skipped | Verification::Passed => Ok(()),
        }
    }

    pub fn secret(&self) -> &SessionSecret {
        &self.secret
    }

    /// Encoded token issued for the response
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Stateless double-submit-cookie engine.
///
/// Cheap to clone; all request handling is independent and may run
/// concurrently.
#[derive(Clone)]
pub struct CsrfEngine {
    config: Arc<CsrfConfig>,
    policy: RequestPolicy,
    binder: TokenBinder,
    verifier: TokenVerifier,
    random: Arc<dyn SecureRandom>,
}

impl CsrfEngine {
    /// Engine backed by the operating system CSPRNG.
    pub fn new(config: CsrfConfig) -> Result<Self> {
        Self::with_random(config, Arc::new(OsRandom))
    }

    /// Engine with an injected random source.
    ///
    /// Fails if the configuration is invalid or the source cannot produce
    /// bytes, so a broken CSPRNG stops startup instead of the first request.
    pub fn with_random(config: CsrfConfig, random: Arc<dyn SecureRandom>) -> Result<Self> {
        config.validate()?;

        let mut probe = [0u8; 1];
        random.fill(&mut probe)?;

        let binder = TokenBinder::new(config.algorithm, config.salt_byte_length, random.clone());
        let verifier = binder.verifier();
        let transport = if config.token_transport.is_cookie() {
            "cookie"
        } else {
            "header"
        };

        debug!(
            algorithm = %config.algorithm,
            secret_byte_length = config.secret_byte_length,
            salt_byte_length = config.salt_byte_length,
            transport,
            "csrf engine ready"
        );

        Ok(Self {
            policy: config.policy(),
            config: Arc::new(config),
            binder,
            verifier,
            random,
        })
    }

    pub fn config(&self) -> &CsrfConfig {
        &self.config
    }

    pub fn policy(&self) -> &RequestPolicy {
        &self.policy
    }

    /// Fresh random session secret
    pub fn create_secret(&self) -> Result<Vec<u8>> {
        generate(self.random.as_ref(), self.config.secret_byte_length)
    }

    /// Decode the secret cookie, minting a new secret if it is absent or
    /// does not decode.
    pub fn resolve_secret(&self, cookie_value: Option<&str>) -> Result<SessionSecret> {
        if let Some(value) = cookie_value {
            match codec::decode(value) {
                Ok(bytes) if !bytes.is_empty() => {
                    return Ok(SessionSecret {
                        bytes,
                        minted: false,
                    });
                }
                Ok(_) => {
                    debug!("empty secret cookie, minting a new secret");
                }
                Err(e) => {
                    debug!(error = %e, "malformed secret cookie, minting a new secret");
                }
            }
        }

        Ok(SessionSecret {
            bytes: self.create_secret()?,
            minted: true,
        })
    }

    /// Raw token bound to `secret`
    pub fn create_token(&self, secret: &[u8]) -> Result<Vec<u8>> {
        self.binder.bind(secret)
    }

    pub fn verify_token(&self, token: &[u8], secret: &[u8]) -> bool {
        self.verifier.verify(token, secret)
    }

    /// Verify the text a client submitted against `secret`.
    pub fn verify_submitted(&self, submitted: Option<&str>, secret: &[u8]) -> Verification {
        let Some(text) = submitted else {
            return Verification::Failed(Rejection::Missing);
        };

        let text = if self.config.token_transport.is_cookie() {
            decode_cookie_value(text)
        } else {
            text.to_string()
        };

        match codec::decode(&text) {
            Ok(token) if self.verify_token(&token, secret) => Verification::Passed,
            Ok(_) => Verification::Failed(Rejection::Mismatch),
            Err(_) => Verification::Failed(Rejection::Malformed),
        }
    }

    /// Run the engine for one request.
    ///
    /// The secret is resolved first, the submitted token (if required) is
    /// verified against it, and only then is a fresh token bound. The token
    /// is issued whatever the verification outcome.
    pub fn protect(&self, request: &HttpRequest) -> Result<Protection> {
        let cookie = request.cookie(&self.config.cookie.name);
        let mut secret = self.resolve_secret(cookie.as_deref())?;

        let verification = if self.policy.should_verify(&request.method, &request.path) {
            let submitted =
                submitted_token(request, &self.config.token_header, &self.config.token_field);
            self.verify_submitted(submitted.as_deref(), secret.as_bytes())
        } else {
            trace!(method = %request.method, path = %request.path, "csrf verification skipped");
            Verification::Skipped
        };

        if let Verification::Failed(rejection) = verification {
            warn!(
                method = %request.method,
                path = %request.path,
                reason = %rejection,
                new_session = secret.is_minted(),
                "csrf verification failed"
            );

            if self.config.rotate_secret_on_failure && !secret.is_minted() {
                debug!("rotating csrf secret after failed verification");
                secret = SessionSecret {
                    bytes: self.create_secret()?,
                    minted: true,
                };
            }
        }

        let token = codec::encode(&self.create_token(secret.as_bytes())?);

        Ok(Protection {
            verification,
            secret,
            token,
        })
    }

    /// Attach the secret cookie (when new) and the fresh token to `response`.
    pub fn apply(&self, response: HttpResponse, protection: &Protection) -> HttpResponse {
        let mut response = response;

        if protection.secret.is_minted() {
            response = response.with_cookie(
                self.config
                    .cookie
                    .to_set_cookie(protection.secret.encoded()),
            );
        }

        match self.config.token_transport {
            TokenTransport::Header { ref name } => {
                response.with_header(name.clone(), protection.token.clone())
            }
            // Client script must be able to read the token cookie
            TokenTransport::Cookie(ref options) => response.with_cookie(
                options
                    .to_set_cookie(protection.token.clone())
                    .http_only(false),
            ),
        }
    }
}

impl std::fmt::Debug for CsrfEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsrfEngine")
            .field("config", &self.config)
            .field("binder", &self.binder)
            .finish_non_exhaustive()
    }
}
