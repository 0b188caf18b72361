//! Inbound request bodies, resolved once from the request's content type.

use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde_json::{Map, Value};

use crate::error::RelayError;

/// A request body as the editor sent it: raw text/markup, or parsed JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundBody {
    RawText(String),
    Structured(Value),
}

impl InboundBody {
    /// Body used when the caller sent nothing.
    pub fn empty() -> Self {
        Self::Structured(Value::Object(Map::new()))
    }

    /// Decide the variant from the media type (parameters already stripped).
    pub fn from_parts(media_type: Option<&str>, bytes: &[u8]) -> Result<Self, RelayError> {
        match media_type {
            Some(mt) if is_json(mt) => {
                if bytes.iter().all(u8::is_ascii_whitespace) {
                    return Ok(Self::empty());
                }
                serde_json::from_slice(bytes)
                    .map(Self::Structured)
                    .map_err(|e| RelayError::MalformedJson(e.to_string()))
            }
            Some(mt) if is_text(mt) => Ok(Self::RawText(utf8(bytes)?)),
            _ if bytes.is_empty() => Ok(Self::empty()),
            _ => Ok(Self::RawText(utf8(bytes)?)),
        }
    }

    /// Canonical serialized form sent upstream: text verbatim, JSON compact.
    pub fn into_payload(self) -> String {
        match self {
            Self::RawText(text) => text,
            Self::Structured(value) => value.to_string(),
        }
    }

    /// The body as a JSON object, when it is one (also when it arrived as
    /// text containing a JSON object).
    pub fn as_object(&self) -> Option<Map<String, Value>> {
        match self {
            Self::Structured(Value::Object(map)) => Some(map.clone()),
            Self::Structured(_) => None,
            Self::RawText(text) => match serde_json::from_str(text) {
                Ok(Value::Object(map)) => Some(map),
                _ => None,
            },
        }
    }
}

fn is_json(media_type: &str) -> bool {
    media_type == "application/json" || media_type.ends_with("+json")
}

fn is_text(media_type: &str) -> bool {
    media_type.starts_with("text/")
        || media_type == "application/xml"
        || media_type == "application/xhtml+xml"
}

fn utf8(bytes: &[u8]) -> Result<String, RelayError> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|_| RelayError::UnsupportedBody)
}

impl<S> FromRequest<S> for InboundBody
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let media_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_ascii_lowercase());

        // Honours `DefaultBodyLimit`; oversize bodies are rejected with 413.
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        Self::from_parts(media_type.as_deref(), &bytes).map_err(IntoResponse::into_response)
    }
}
