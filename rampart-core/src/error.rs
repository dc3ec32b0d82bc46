// Error types for Rampart request handling

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed request: {0}")]
    BadRequest(String),

    #[error("request body does not deserialize: {0}")]
    Deserialization(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("response body does not serialize: {0}")]
    Serialization(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// HTTP status this error is answered with
    pub fn status_code(&self) -> u16 {
        match self {
            Error::BadRequest(_) | Error::Deserialization(_) => 400,
            Error::Forbidden(_) => 403,
            Error::Serialization(_) | Error::Internal(_) | Error::Io(_) => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// Text safe to send to the client.
    ///
    /// Client errors carry their detail; server errors are reduced to a
    /// generic message so internals stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Error::BadRequest(detail)
            | Error::Deserialization(detail)
            | Error::Forbidden(detail) => detail.clone(),
            Error::Serialization(_) | Error::Internal(_) | Error::Io(_) => {
                "internal server error".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::Forbidden("x".into()).status_code(), 403);
        assert_eq!(Error::BadRequest("x".into()).status_code(), 400);
        assert_eq!(Error::Internal("x".into()).status_code(), 500);
        let io = std::io::Error::other("disk");
        assert_eq!(Error::from(io).status_code(), 500);
    }

    #[test]
    fn test_error_classes() {
        assert!(Error::Forbidden("x".into()).is_client_error());
        assert!(!Error::Forbidden("x".into()).is_server_error());
        assert!(Error::Internal("x".into()).is_server_error());
    }

    #[test]
    fn test_public_message_hides_internals() {
        assert_eq!(
            Error::Forbidden("csrf validation error".into()).public_message(),
            "csrf validation error"
        );
        assert_eq!(
            Error::Internal("getrandom: EAGAIN".into()).public_message(),
            "internal server error"
        );
    }
}
