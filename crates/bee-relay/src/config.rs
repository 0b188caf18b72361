use std::fmt;
use std::time::Duration;

use crate::env::ReadEnv;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_UPSTREAM_BASE_URL: &str = "https://api.getbee.io";
const DEFAULT_LOGIN_URL: &str = "https://auth.getbee.io/loginV2";
const DEFAULT_BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;
const BEARER_PREFIX: &str = "Bearer ";

/// Service credentials, loaded once at startup and read by every handler.
#[derive(Clone)]
pub struct Credential {
    client_id: String,
    client_secret: String,
    bearer: Option<String>,
}

impl Credential {
    /// `api_token` may be raw or already carry the `Bearer ` scheme. A blank
    /// token leaves the export routes disabled.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        api_token: Option<&str>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            bearer: api_token.and_then(normalize_bearer),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Full `Authorization` header value, if a token is configured.
    pub fn bearer(&self) -> Option<&str> {
        self.bearer.as_deref()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("bearer", &self.bearer.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn normalize_bearer(raw: &str) -> Option<String> {
    let token = raw.trim();
    if token.is_empty() {
        return None;
    }
    let has_scheme = token
        .get(..BEARER_PREFIX.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(BEARER_PREFIX));
    if has_scheme {
        Some(token.to_string())
    } else {
        Some(format!("{BEARER_PREFIX}{token}"))
    }
}

/// Configuration for the relay.
///
/// Resolved from environment variables:
/// - `BEE_CLIENT_ID` / `BEE_CLIENT_SECRET`: Auth Bridge credentials (default: empty)
/// - `CS_API_TOKEN`: bearer token for the export API, raw or `Bearer `-prefixed
/// - `PORT`: HTTP listening port (default: 3001)
/// - `RELAY_UPSTREAM_BASE_URL`: export API base (default: `https://api.getbee.io`)
/// - `RELAY_LOGIN_URL`: login endpoint (default: `https://auth.getbee.io/loginV2`)
/// - `RELAY_BODY_LIMIT_BYTES`: inbound body ceiling (default: 10 MiB)
/// - `RELAY_UPSTREAM_TIMEOUT_SECS`: outbound timeout (default: none)
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub credential: Credential,
    pub port: u16,
    pub upstream_base_url: String,
    pub login_url: String,
    pub body_limit: usize,
    pub upstream_timeout: Option<Duration>,
}

impl RelayConfig {
    pub fn new(credential: Credential) -> Self {
        Self {
            credential,
            port: DEFAULT_PORT,
            upstream_base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            login_url: DEFAULT_LOGIN_URL.to_string(),
            body_limit: DEFAULT_BODY_LIMIT_BYTES,
            upstream_timeout: None,
        }
    }

    /// Missing values never fail here; an absent token is reported when an
    /// export route is called.
    pub fn from_env<E: ReadEnv>(env: &E) -> Self {
        let credential = Credential::new(
            env.var("BEE_CLIENT_ID").unwrap_or_default(),
            env.var("BEE_CLIENT_SECRET").unwrap_or_default(),
            env.var("CS_API_TOKEN").ok().as_deref(),
        );

        Self {
            credential,
            port: env
                .var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            upstream_base_url: env
                .var("RELAY_UPSTREAM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_UPSTREAM_BASE_URL.to_string()),
            login_url: env
                .var("RELAY_LOGIN_URL")
                .unwrap_or_else(|_| DEFAULT_LOGIN_URL.to_string()),
            body_limit: env
                .var("RELAY_BODY_LIMIT_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_BODY_LIMIT_BYTES),
            upstream_timeout: env
                .var("RELAY_UPSTREAM_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs: &u64| *secs > 0)
                .map(Duration::from_secs),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_upstream_base_url(mut self, url: impl Into<String>) -> Self {
        self.upstream_base_url = url.into();
        self
    }

    pub fn with_login_url(mut self, url: impl Into<String>) -> Self {
        self.login_url = url.into();
        self
    }

    pub fn with_body_limit(mut self, bytes: usize) -> Self {
        self.body_limit = bytes;
        self
    }

    pub fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = Some(timeout);
        self
    }
}
