use crate::error::Result;
use crate::policy::RequestPolicy;
use crate::token::KeyedHash;
use rampart_config::{ConfigManager, ConfigValidator, Validate};
use rampart_core::{SameSite, SetCookie};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// Default name of the secret cookie
pub const DEFAULT_COOKIE_NAME: &str = "_csrfSecret";

/// Default header carrying tokens in both directions
pub const DEFAULT_TOKEN_HEADER: &str = "X-CSRF-Token";

/// Default form/JSON/query field carrying a submitted token
pub const DEFAULT_TOKEN_FIELD: &str = "csrf_token";

/// Attributes of a cookie set by the middleware
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieOptions {
    pub name: String,
    pub path: String,
    pub domain: Option<String>,
    /// Lifetime in seconds; `None` ties the secret to the browser session
    pub max_age: Option<i64>,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
}

impl CookieOptions {
    /// Build the `Set-Cookie` for `value` with these attributes.
    pub fn to_set_cookie(&self, value: impl Into<String>) -> SetCookie {
        let mut cookie = SetCookie::new(self.name.clone(), value)
            .path(self.path.clone())
            .secure(self.secure)
            .http_only(self.http_only)
            .same_site(self.same_site);

        if let Some(ref domain) = self.domain {
            cookie = cookie.domain(domain.clone());
        }
        if let Some(max_age) = self.max_age {
            cookie = cookie.max_age(max_age);
        }

        cookie
    }
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            name: DEFAULT_COOKIE_NAME.to_string(),
            path: "/".to_string(),
            domain: None,
            max_age: None,
            secure: true,
            http_only: true,
            same_site: SameSite::Strict,
        }
    }
}

/// How the fresh token reaches the client on every response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum TokenTransport {
    /// Response header with the encoded token
    Header { name: String },
    /// Script-readable cookie with the encoded token
    Cookie(CookieOptions),
}

impl TokenTransport {
    pub fn header(name: impl Into<String>) -> Self {
        TokenTransport::Header { name: name.into() }
    }

    /// Token cookie named `name` sharing the secret cookie's attributes,
    /// except that it is never `HttpOnly`.
    pub fn cookie(name: impl Into<String>, attributes: &CookieOptions) -> Self {
        TokenTransport::Cookie(CookieOptions {
            name: name.into(),
            http_only: false,
            ..attributes.clone()
        })
    }

    pub fn name(&self) -> &str {
        match self {
            TokenTransport::Header { name } => name,
            TokenTransport::Cookie(options) => &options.name,
        }
    }

    pub fn is_cookie(&self) -> bool {
        matches!(self, TokenTransport::Cookie(_))
    }
}

impl Default for TokenTransport {
    fn default() -> Self {
        TokenTransport::header(DEFAULT_TOKEN_HEADER)
    }
}

/// CSRF protection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsrfConfig {
    /// Length of a newly minted session secret
    pub secret_byte_length: usize,

    /// Length of the salt embedded in every token
    pub salt_byte_length: usize,

    /// Keyed hash binding tokens to the secret
    pub algorithm: KeyedHash,

    /// Secret cookie attributes
    pub cookie: CookieOptions,

    /// Where the fresh token is sent on responses
    pub token_transport: TokenTransport,

    /// Request header read for a submitted token
    pub token_header: String,

    /// Form/JSON/query field read for a submitted token
    pub token_field: String,

    /// Methods that are never verified
    #[serde(deserialize_with = "one_or_many")]
    pub ignore_methods: Vec<String>,

    /// Path prefixes bypassing protection entirely
    #[serde(deserialize_with = "one_or_many")]
    pub exclude_path_prefixes: Vec<String>,

    /// Mint a new secret when verification fails
    pub rotate_secret_on_failure: bool,
}

impl CsrfConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from `PREFIX_*` environment variables over the defaults.
    ///
    /// Nested cookie attributes use a double underscore, e.g.
    /// `RAMPART_CSRF_COOKIE__DOMAIN=example.com`.
    pub fn from_env(prefix: &str) -> Result<Self> {
        let manager = Self::defaults_manager(ConfigManager::with_prefix(prefix))?;
        manager.load_env()?;
        Ok(manager.load_validated()?)
    }

    /// Load from a TOML, JSON or `.env` file over the defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let manager = Self::defaults_manager(ConfigManager::new())?;
        manager.load_file(path)?;
        Ok(manager.load_validated()?)
    }

    /// Deserialize and validate whatever `manager` holds.
    pub fn from_manager(manager: &ConfigManager) -> Result<Self> {
        Ok(manager.load_validated()?)
    }

    fn defaults_manager(manager: ConfigManager) -> Result<ConfigManager> {
        // Seeding the defaults lets partial nested tables merge leaf by leaf
        manager.set("cookie", CookieOptions::default())?;
        Ok(manager)
    }

    /// Method/path policy derived from this configuration
    pub fn policy(&self) -> RequestPolicy {
        RequestPolicy::new(self.ignore_methods.clone(), self.exclude_path_prefixes.clone())
    }

    pub fn with_secret_byte_length(mut self, length: usize) -> Self {
        self.secret_byte_length = length;
        self
    }

    pub fn with_salt_byte_length(mut self, length: usize) -> Self {
        self.salt_byte_length = length;
        self
    }

    pub fn with_algorithm(mut self, algorithm: KeyedHash) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie.name = name.into();
        self
    }

    pub fn with_cookie_path(mut self, path: impl Into<String>) -> Self {
        self.cookie.path = path.into();
        self
    }

    pub fn with_cookie_domain(mut self, domain: impl Into<String>) -> Self {
        self.cookie.domain = Some(domain.into());
        self
    }

    pub fn with_cookie_max_age(mut self, seconds: i64) -> Self {
        self.cookie.max_age = Some(seconds);
        self
    }

    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie.secure = secure;
        self
    }

    pub fn with_cookie_http_only(mut self, http_only: bool) -> Self {
        self.cookie.http_only = http_only;
        self
    }

    pub fn with_cookie_same_site(mut self, same_site: SameSite) -> Self {
        self.cookie.same_site = same_site;
        self
    }

    pub fn with_token_transport(mut self, transport: TokenTransport) -> Self {
        self.token_transport = transport;
        self
    }

    /// Send tokens in a cookie named `name`, using the current secret
    /// cookie attributes.
    pub fn with_token_cookie(mut self, name: impl Into<String>) -> Self {
        self.token_transport = TokenTransport::cookie(name, &self.cookie);
        self
    }

    pub fn with_token_header(mut self, name: impl Into<String>) -> Self {
        self.token_header = name.into();
        self
    }

    pub fn with_token_field(mut self, name: impl Into<String>) -> Self {
        self.token_field = name.into();
        self
    }

    pub fn with_ignore_methods(mut self, methods: Vec<String>) -> Self {
        self.ignore_methods = methods;
        self
    }

    pub fn with_exclude_path_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.exclude_path_prefixes = prefixes;
        self
    }

    pub fn with_rotate_secret_on_failure(mut self, rotate: bool) -> Self {
        self.rotate_secret_on_failure = rotate;
        self
    }
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            secret_byte_length: 18,
            salt_byte_length: 8,
            algorithm: KeyedHash::default(),
            cookie: CookieOptions::default(),
            token_transport: TokenTransport::default(),
            token_header: DEFAULT_TOKEN_HEADER.to_string(),
            token_field: DEFAULT_TOKEN_FIELD.to_string(),
            ignore_methods: vec!["GET".to_string(), "HEAD".to_string(), "OPTIONS".to_string()],
            exclude_path_prefixes: Vec::new(),
            rotate_secret_on_failure: false,
        }
    }
}

/// Accept a bare string where a list is expected.
///
/// A single-entry list loaded from the environment arrives as a plain
/// string, e.g. `PREFIX_IGNORE_METHODS=GET`.
fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(item) => vec![item],
        OneOrMany::Many(items) => items,
    })
}

impl Validate for CsrfConfig {
    fn validate(&self) -> rampart_config::Result<()> {
        ConfigValidator::at_least(self.secret_byte_length, 1, "secret_byte_length")?;
        ConfigValidator::at_least(self.salt_byte_length, 1, "salt_byte_length")?;
        ConfigValidator::not_empty(&self.cookie.name, "cookie.name")?;
        ConfigValidator::not_empty(self.token_transport.name(), "token_transport.name")?;
        ConfigValidator::not_empty(&self.token_header, "token_header")?;
        ConfigValidator::not_empty(&self.token_field, "token_field")?;

        if let TokenTransport::Cookie(ref options) = self.token_transport {
            ConfigValidator::distinct(
                &self.cookie.name,
                &options.name,
                "cookie.name",
                "token_transport.name",
            )?;
            ConfigValidator::require(
                options.same_site != SameSite::None || options.secure,
                "token_transport.secure",
                "SameSite=None cookies must be secure",
            )?;
        }

        ConfigValidator::require(
            self.cookie.same_site != SameSite::None || self.cookie.secure,
            "cookie.secure",
            "SameSite=None cookies must be secure",
        )
    }
}
