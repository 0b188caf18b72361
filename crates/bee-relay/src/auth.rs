//! Auth bridge: exchanges a user id for an editor session token using the
//! configured client id/secret.

use axum::body::Body;
use axum::http::HeaderValue;
use axum::http::header::CONTENT_TYPE;
use axum::response::Response;
use reqwest::Client;
use serde::Serialize;
use tracing::instrument;

use crate::body::InboundBody;
use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::upstream;

pub const DEFAULT_UID: &str = "demo-user";

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    uid: &'a str,
}

/// `uid` from a `{ "uid": "..." }` body; anything else yields [`DEFAULT_UID`].
pub fn uid_from(body: &InboundBody) -> String {
    body.as_object()
        .and_then(|map| map.get("uid")?.as_str().map(str::to_owned))
        .filter(|uid| !uid.is_empty())
        .unwrap_or_else(|| DEFAULT_UID.to_string())
}

/// Log in against the configured login endpoint and return its JSON body
/// unchanged.
#[instrument(name = "relay.authenticate", skip_all, fields(uid = tracing::field::Empty))]
pub async fn authenticate(
    client: &Client,
    config: &RelayConfig,
    body: InboundBody,
) -> Result<Response, RelayError> {
    let uid = uid_from(&body);
    tracing::Span::current().record("uid", uid.as_str());

    let login = LoginRequest {
        client_id: config.credential.client_id(),
        client_secret: config.credential.client_secret(),
        uid: &uid,
    };
    let payload = serde_json::to_string(&login).map_err(|e| {
        RelayError::Auth(upstream::UpstreamFailure {
            details: serde_json::Value::String(e.to_string()),
        })
    })?;

    let reply = upstream::post(client, &config.login_url, payload, None)
        .await
        .map_err(RelayError::Auth)?;

    tracing::info!("Session token issued");

    let mut resp = Response::new(Body::from(reply.body));
    resp.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(resp)
}
