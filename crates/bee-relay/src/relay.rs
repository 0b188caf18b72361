//! Forwarding relay: attach the bearer credential, POST to the export API,
//! hand the upstream body back untouched.

use axum::body::Body;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::HeaderValue;
use axum::response::Response;
use reqwest::Client;
use tracing::instrument;

use crate::body::InboundBody;
use crate::config::Credential;
use crate::error::RelayError;
use crate::export::{ExportKind, ResponseMode};
use crate::server::AppState;
use crate::upstream;

/// Forward `body` to `endpoint` with the configured bearer credential.
///
/// Fails without any outbound call when no token is configured. Upstream
/// failures are never retried.
#[instrument(name = "relay.forward", skip(client, credential, body))]
pub async fn forward(
    client: &Client,
    credential: &Credential,
    endpoint: &str,
    body: InboundBody,
    mode: ResponseMode,
) -> Result<Response, RelayError> {
    let bearer = credential.bearer().ok_or(RelayError::TokenNotConfigured)?;

    let reply = upstream::post(client, endpoint, body.into_payload(), Some(bearer))
        .await
        .map_err(|failure| RelayError::Export {
            endpoint: endpoint.to_string(),
            failure,
        })?;

    tracing::debug!(bytes = reply.body.len(), "Upstream export succeeded");

    let mut resp = Response::new(Body::from(reply.body));
    let headers = resp.headers_mut();
    match mode {
        ResponseMode::Binary => {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("image/png"));
            headers.insert(CONTENT_DISPOSITION, HeaderValue::from_static("inline"));
        }
        ResponseMode::Structured => {
            if let Some(content_type) = reply.content_type {
                headers.insert(CONTENT_TYPE, content_type);
            }
        }
    }

    Ok(resp)
}

/// Relay one export request of the given kind.
pub async fn export(
    state: &AppState,
    kind: ExportKind,
    body: InboundBody,
) -> Result<Response, RelayError> {
    let endpoint = kind.endpoint(&state.config.upstream_base_url);
    tracing::info!(%kind, %endpoint, "Relaying export request");
    forward(
        &state.http,
        &state.config.credential,
        &endpoint,
        body,
        kind.response_mode(),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    async fn body_bytes(resp: Response) -> Vec<u8> {
        axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn missing_token_fails_before_any_call() {
        let server = httpmock::MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(httpmock::Method::POST);
                then.status(200).body("should not be reached");
            })
            .await;

        let credential = Credential::new("", "", None);
        let err = forward(
            &Client::new(),
            &credential,
            &server.url("/v1/message/html"),
            InboundBody::empty(),
            ResponseMode::Structured,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, RelayError::TokenNotConfigured));
        assert_eq!(mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn structured_mode_passes_body_and_content_type_through() {
        let server = httpmock::MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(httpmock::Method::POST)
                    .path("/v1/message/pdf")
                    .header("authorization", "Bearer tok")
                    .header("content-type", "application/json")
                    .json_body(json!({"page_size": "Full", "html": "<p/>"}));
                then.status(200)
                    .header("content-type", "application/json")
                    .body(r#"{"url":"https://cdn.example/x.pdf"}"#);
            })
            .await;

        let credential = Credential::new("", "", Some("tok"));
        let resp = forward(
            &Client::new(),
            &credential,
            &server.url("/v1/message/pdf"),
            InboundBody::Structured(json!({"page_size": "Full", "html": "<p/>"})),
            ResponseMode::Structured,
        )
        .await
        .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(body_bytes(resp).await, br#"{"url":"https://cdn.example/x.pdf"}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_becomes_export_error() {
        let server = httpmock::MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(httpmock::Method::POST);
                then.status(400).json_body(json!({"message": "bad page"}));
            })
            .await;

        let endpoint = server.url("/v1/message/html");
        let err = forward(
            &Client::new(),
            &Credential::new("", "", Some("tok")),
            &endpoint,
            InboundBody::empty(),
            ResponseMode::Structured,
        )
        .await
        .unwrap_err();

        match err {
            RelayError::Export { endpoint: e, failure } => {
                assert_eq!(e, endpoint);
                assert_eq!(failure.details, json!({"message": "bad page"}));
            }
            other => panic!("expected export error, got {other:?}"),
        }
    }
}
