// Core library for Rampart
// Request/response model, cookies, errors, middleware and logging setup

pub mod cookie;
pub mod error;
pub mod http;
pub mod logging;
pub mod middleware;

pub use cookie::{SameSite, SetCookie, decode_cookie_value, parse_cookie_header};
pub use error::*;
pub use http::*;
pub use middleware::*;
