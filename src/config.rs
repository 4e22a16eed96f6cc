//! Session configuration: cookie name, expiry, and the signing secret.
//!
//! The secret is mandatory. There is deliberately no built-in fallback value:
//! constructing a config without a secret (or with an empty one) is an error,
//! so a misconfigured deployment fails at startup instead of silently signing
//! cookies with a known key.

use std::env;
use std::fmt;

use cookie::{Cookie, SameSite};
use thiserror::Error;
use time::Duration;

use crate::signing::sign;

/// Name of the session cookie.
pub const DEFAULT_COOKIE_NAME: &str = "iconnect.sid";

/// Default session lifetime: 7 days.
pub const DEFAULT_TTL: Duration = Duration::days(7);

/// Environment variable holding the HMAC secret.
pub const SESSION_SECRET_VAR: &str = "SESSION_SECRET";

/// Configuration errors raised at construction time.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `SESSION_SECRET` is not set in the environment.
    #[error("{SESSION_SECRET_VAR} is not set")]
    MissingSecret,

    /// The provided secret is empty.
    #[error("session secret must not be empty")]
    EmptySecret,
}

/// Session cookie configuration.
///
/// Built either from an explicit secret or from the `SESSION_SECRET`
/// environment variable, with builder-style methods for the rest:
///
/// ```no_run
/// use iconnect_session::SessionConfig;
///
/// # fn example() -> Result<(), iconnect_session::ConfigError> {
/// let _config = SessionConfig::from_env()?.with_secure(true);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SessionConfig {
    secret: Vec<u8>,
    /// Cookie name; defaults to `iconnect.sid`.
    pub cookie_name: String,
    /// Session lifetime; defaults to 7 days and doubles as the cookie
    /// `Max-Age`.
    pub ttl: Duration,
    /// Whether to mark the cookie `Secure`. Off by default so local
    /// development over plain HTTP works; turn on in production.
    pub secure: bool,
}

impl SessionConfig {
    /// Creates a config from an explicit secret.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptySecret`] if the secret is empty.
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        Ok(Self {
            secret,
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            ttl: DEFAULT_TTL,
            secure: false,
        })
    }

    /// Creates a config from the `SESSION_SECRET` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSecret`] when the variable is unset and
    /// [`ConfigError::EmptySecret`] when it is set but empty. Startup should
    /// propagate either; running without a real secret is a deployment
    /// misconfiguration.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = env::var(SESSION_SECRET_VAR).map_err(|_| ConfigError::MissingSecret)?;
        Self::new(secret.into_bytes())
    }

    /// Sets a custom cookie name.
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    /// Sets a custom session lifetime.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Marks the cookie `Secure` (HTTPS only).
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// The HMAC secret.
    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    /// Builds the session cookie for `sid`: signed value, `HttpOnly`,
    /// `SameSite=Lax`, `Path=/`, `Max-Age` equal to the ttl, and `Secure`
    /// when configured.
    pub fn session_cookie(&self, sid: &str) -> Cookie<'static> {
        let mut cookie = Cookie::build((self.cookie_name.clone(), sign(sid, &self.secret)))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(self.ttl)
            .build();
        if self.secure {
            cookie.set_secure(true);
        }
        cookie
    }

    /// Builds a removal cookie that clears the session cookie on the client.
    pub fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build((self.cookie_name.clone(), ""))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(Duration::ZERO)
            .build()
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"<redacted>")
            .field("cookie_name", &self.cookie_name)
            .field("ttl", &self.ttl)
            .field("secure", &self.secure)
            .finish()
    }
}
