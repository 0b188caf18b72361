//! # bee-relay
//!
//! Relay between the browser-based Beefree editor and the Content Services
//! export API.
//!
//! ## How it works
//!
//! 1. The editor calls `POST /proxy/bee-auth`; the relay logs in against the
//!    Beefree login endpoint with `BEE_CLIENT_ID`/`BEE_CLIENT_SECRET` and
//!    returns the session token payload unchanged.
//! 2. Export requests (`POST /v1/message/{plain-text,html,pdf,image}`) are
//!    forwarded to the matching upstream endpoint with
//!    `Authorization: <CS_API_TOKEN>` attached.
//! 3. Upstream bodies come back byte-for-byte; image exports are returned as
//!    `image/png`. Any failure becomes a 500 with a JSON error envelope.
//!
//! Nothing is cached, retried or persisted.
//!
//! ## Configuration (env vars)
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `BEE_CLIENT_ID` | `""` | Client id for the auth bridge |
//! | `BEE_CLIENT_SECRET` | `""` | Client secret for the auth bridge |
//! | `CS_API_TOKEN` | — | Export API token, raw or `Bearer `-prefixed |
//! | `PORT` | `3001` | HTTP listening port |
//! | `RELAY_UPSTREAM_BASE_URL` | `https://api.getbee.io` | Export API base URL |
//! | `RELAY_LOGIN_URL` | `https://auth.getbee.io/loginV2` | Login endpoint |
//! | `RELAY_BODY_LIMIT_BYTES` | `10485760` | Inbound body ceiling |
//! | `RELAY_UPSTREAM_TIMEOUT_SECS` | — | Outbound timeout (none by default) |

pub mod auth;
pub mod body;
pub mod config;
pub mod env;
pub mod error;
pub mod export;
pub mod relay;
pub mod server;
pub mod upstream;

pub use config::{Credential, RelayConfig};
pub use error::RelayError;
pub use export::{ExportKind, ResponseMode};
pub use server::{AppState, router, serve};
