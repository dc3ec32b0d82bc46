use rampart_config::ConfigError;
use thiserror::Error;

/// Why a submitted token did not verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No token in the header, body or query string
    Missing,
    /// Token text is not valid encoded bytes
    Malformed,
    /// Well-formed token whose digest does not match the session secret
    Mismatch,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::Missing => "missing",
            Rejection::Malformed => "malformed",
            Rejection::Mismatch => "mismatch",
        }
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum CsrfError {
    #[error("Malformed encoding: {0}")]
    MalformedEncoding(String),

    #[error("CSRF verification failed ({0} token)")]
    VerificationFailed(Rejection),

    #[error("Secure random source unavailable: {0}")]
    SecureRandomUnavailable(String),

    #[error("Invalid CSRF configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<base64::DecodeError> for CsrfError {
    fn from(err: base64::DecodeError) -> Self {
        CsrfError::MalformedEncoding(err.to_string())
    }
}

impl From<CsrfError> for rampart_core::Error {
    fn from(err: CsrfError) -> Self {
        match err {
            CsrfError::VerificationFailed(_) | CsrfError::MalformedEncoding(_) => {
                rampart_core::Error::Forbidden("csrf validation error".to_string())
            }
            other => rampart_core::Error::Internal(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, CsrfError>;
