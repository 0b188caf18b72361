//! Errors the relay handlers can produce, and the one place they become
//! HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use crate::upstream::UpstreamFailure;

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("token not configured")]
    TokenNotConfigured,

    #[error("Error exporting from {endpoint}")]
    Export {
        endpoint: String,
        failure: UpstreamFailure,
    },

    #[error("Failed to authenticate")]
    Auth(UpstreamFailure),

    #[error("invalid JSON body: {0}")]
    MalformedJson(String),

    #[error("unsupported request body")]
    UnsupportedBody,
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::TokenNotConfigured | Self::Export { .. } | Self::Auth(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::MalformedJson(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedBody => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }

    fn envelope(&self) -> Value {
        match self {
            Self::TokenNotConfigured => json!({ "error": "token not configured" }),
            Self::Export { failure, .. } => json!({
                "message": self.to_string(),
                "details": failure.details,
            }),
            Self::Auth(failure) => json!({
                "error": self.to_string(),
                "details": failure.details,
            }),
            Self::MalformedJson(details) => json!({
                "error": "invalid JSON body",
                "details": details,
            }),
            Self::UnsupportedBody => json!({ "error": self.to_string() }),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Export { failure, .. } | Self::Auth(failure) => {
                tracing::error!(error = %self, details = %failure.details, "Upstream call failed");
            }
            Self::TokenNotConfigured => tracing::error!(error = %self, "Relay misconfigured"),
            _ => tracing::warn!(error = %self, "Rejected inbound request"),
        }

        (status, Json(self.envelope())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(resp: Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn token_not_configured_maps_to_500() {
        let resp = RelayError::TokenNotConfigured.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await, json!({"error": "token not configured"}));
    }

    #[tokio::test]
    async fn export_failure_names_endpoint_and_details() {
        let err = RelayError::Export {
            endpoint: "https://api.getbee.io/v1/message/pdf".to_string(),
            failure: UpstreamFailure {
                details: json!({"code": 401}),
            },
        };
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(resp).await,
            json!({
                "message": "Error exporting from https://api.getbee.io/v1/message/pdf",
                "details": {"code": 401},
            })
        );
    }

    #[tokio::test]
    async fn auth_failure_envelope() {
        let resp = RelayError::Auth(UpstreamFailure {
            details: json!("invalid client"),
        })
        .into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(resp).await,
            json!({"error": "Failed to authenticate", "details": "invalid client"})
        );
    }

    #[test]
    fn client_side_body_problems_are_4xx() {
        assert_eq!(
            RelayError::MalformedJson("eof".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RelayError::UnsupportedBody.status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
    }
}
