use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::{DefaultBodyLimit, State};
use axum::response::Response;
use axum::routing::{get, post};
use reqwest::Client;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth;
use crate::body::InboundBody;
use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::export::ExportKind;
use crate::relay;

pub const AUTH_PATH: &str = "/proxy/bee-auth";
pub const LIVENESS_MESSAGE: &str = "Beefree proxy + CS API is running";

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub http: Client,
}

impl AppState {
    /// Builds the outbound HTTP client once; a timeout is applied only when
    /// configured.
    pub fn new(config: RelayConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.upstream_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            config: Arc::new(config),
        })
    }
}

/// Build the axum router for the relay.
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.body_limit;

    let mut app = Router::new()
        .route("/", get(liveness))
        .route(AUTH_PATH, post(handle_auth));

    for kind in ExportKind::ALL {
        app = app.route(
            kind.route(),
            post(move |State(state): State<AppState>, body: InboundBody| async move {
                relay::export(&state, kind, body).await
            }),
        );
    }

    app.layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the relay HTTP server on `0.0.0.0:{port}`.
pub async fn serve(config: RelayConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    if config.credential.bearer().is_none() {
        tracing::warn!("CS_API_TOKEN is not set; export routes will answer 500");
    }

    let state = AppState::new(config)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "Relay listening");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}

async fn handle_auth(
    State(state): State<AppState>,
    body: InboundBody,
) -> Result<Response, RelayError> {
    auth::authenticate(&state.http, &state.config, body).await
}
