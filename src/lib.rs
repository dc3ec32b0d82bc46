// Rampart - stateless CSRF protection for Rust HTTP services
//
// This library bundles the double-submit-cookie engine together with the
// HTTP model and middleware chain it plugs into.

// Re-export core functionality
pub use rampart_core::*;

// Re-export the CSRF engine
pub use rampart_csrf;
pub use rampart_csrf::{
    CookieOptions, CsrfConfig, CsrfEngine, CsrfError, CsrfMiddleware, KeyedHash, Protection,
    Rejection, TokenTransport, Verification,
};

// Re-export optional crates
#[cfg(feature = "config")]
pub use rampart_config;

/// Prelude for common imports
pub mod prelude {
    pub use rampart_core::{
        Error, HttpRequest, HttpResponse, Middleware, MiddlewareChain, Next, SameSite, handler,
    };
    pub use rampart_csrf::{
        CsrfConfig, CsrfEngine, CsrfMiddleware, KeyedHash, TokenTransport, Verification,
    };

    #[cfg(feature = "config")]
    pub use rampart_config::ConfigManager;
}
