//! # Rampart CSRF Protection
//!
//! Stateless Cross-Site Request Forgery protection using the double-submit
//! cookie pattern.
//!
//! Each client holds a random secret in an `HttpOnly` cookie. Every response
//! carries a fresh token, `salt ‖ HMAC(secret, salt)`, in a header or a
//! script-readable cookie. State-changing requests must echo a token back in
//! a header, form field, JSON field or query parameter; it is checked by
//! recomputing the HMAC and comparing in constant time. Nothing is stored
//! server-side.
//!
//! ## Quick Start
//!
//! ```rust
//! use rampart_csrf::{CsrfConfig, CsrfMiddleware};
//!
//! let config = CsrfConfig::default()
//!     .with_salt_byte_length(12)
//!     .with_exclude_path_prefixes(vec!["/_next/".to_string()]);
//!
//! let csrf = CsrfMiddleware::new(config).unwrap();
//! ```
//!
//! ## Using the engine directly
//!
//! ```rust
//! use rampart_core::{HttpRequest, HttpResponse};
//! use rampart_csrf::{CsrfConfig, CsrfEngine, Verification};
//!
//! let engine = CsrfEngine::new(CsrfConfig::default()).unwrap();
//!
//! // First visit: a secret is minted and a token issued
//! let protection = engine.protect(&HttpRequest::new("GET", "/form")).unwrap();
//! assert_eq!(protection.verification(), Verification::Skipped);
//! let response = engine.apply(HttpResponse::ok(), &protection);
//! let secret = response.cookie("_csrfSecret").unwrap().value.clone();
//!
//! // Form submission echoes the token
//! let post = HttpRequest::new("POST", "/form")
//!     .with_cookie("_csrfSecret", &secret)
//!     .with_header("X-CSRF-Token", protection.token());
//! assert!(engine.protect(&post).unwrap().check().is_ok());
//! ```
//!
//! ## Tokens
//!
//! ```rust
//! use rampart_csrf::{codec, KeyedHash, TokenVerifier};
//!
//! let secret = [0x42u8; 18];
//! let token = KeyedHash::HmacSha256.bind(&secret, &[0xAA, 0xBB]);
//! let verifier = TokenVerifier::new(KeyedHash::HmacSha256, 2);
//!
//! assert!(verifier.verify(&token, &secret));
//! assert!(!verifier.verify(&token, &[0u8; 18]));
//! assert_eq!(codec::decode(&codec::encode(&token)).unwrap(), token);
//! ```

pub mod codec;
pub mod config;
pub mod ct;
pub mod engine;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod policy;
pub mod random;
pub mod token;

pub use config::{CookieOptions, CsrfConfig, TokenTransport};
pub use ct::constant_time_eq;
pub use engine::{CsrfEngine, Protection, SessionSecret, Verification};
pub use error::{CsrfError, Rejection, Result};
pub use middleware::CsrfMiddleware;
pub use policy::RequestPolicy;
pub use random::{OsRandom, SecureRandom};
pub use token::{KeyedHash, TokenBinder, TokenVerifier};
