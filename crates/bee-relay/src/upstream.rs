//! The single outbound POST both the relay and the auth bridge make, plus
//! the capture of upstream failure details.

use axum::http::HeaderValue;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use serde_json::Value;

/// A successful (2xx) upstream response.
#[derive(Debug)]
pub struct UpstreamReply {
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// What went wrong upstream, shaped for the `details` field of an error
/// envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamFailure {
    pub details: Value,
}

impl UpstreamFailure {
    /// The upstream answered with a non-success status.
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let details = if body.is_empty() {
            Value::String(format!(
                "Request failed with status code {}",
                status.as_u16()
            ))
        } else {
            serde_json::from_slice(body)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
        };
        Self { details }
    }

    /// The call never produced a usable response.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        Self {
            details: Value::String(err.to_string()),
        }
    }
}

/// POST `payload` as `application/json` to `url`, with `authorization` as the
/// `Authorization` header when given. Any non-2xx status is a failure.
pub async fn post(
    client: &Client,
    url: &str,
    payload: String,
    authorization: Option<&str>,
) -> Result<UpstreamReply, UpstreamFailure> {
    let mut builder = client
        .post(url)
        .header(CONTENT_TYPE, "application/json")
        .body(payload);
    if let Some(auth) = authorization {
        builder = builder.header(AUTHORIZATION, auth);
    }

    let resp = builder
        .send()
        .await
        .map_err(|e| UpstreamFailure::from_transport(&e))?;

    let status = resp.status();
    let content_type = resp.headers().get(CONTENT_TYPE).cloned();
    let body = resp
        .bytes()
        .await
        .map_err(|e| UpstreamFailure::from_transport(&e))?;

    if !status.is_success() {
        tracing::debug!(url, status = status.as_u16(), "Upstream returned an error status");
        return Err(UpstreamFailure::from_response(status, &body));
    }

    Ok(UpstreamReply { content_type, body })
}
