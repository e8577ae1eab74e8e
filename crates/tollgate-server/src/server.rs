use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;
use tollgate_auth::{AuthenticationMode, Authorizer, AuthorizerRequest, PolicyResponse};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub authorizer: Arc<Authorizer>,
    pub name: String,
    pub version: String,
}

impl AppState {
    pub fn new(authorizer: Authorizer, cfg: &AppConfig) -> Self {
        Self {
            authorizer: Arc::new(authorizer),
            name: cfg.application.name.clone(),
            version: cfg.application.version.clone(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    status: &'static str,
    name: String,
    version: String,
    authentication_mode: AuthenticationMode,
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/authorize", post(authorize))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn healthz(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            name: state.name.clone(),
            version: state.version.clone(),
            authentication_mode: state.authorizer.mode(),
        }),
    )
}

/// Every well-formed event gets a 200 with a policy, Allow or Deny.
pub async fn authorize(
    State(state): State<AppState>,
    Json(request): Json<AuthorizerRequest>,
) -> Json<PolicyResponse> {
    Json(state.authorizer.authorize(&request))
}

pub struct TollgateServer {
    addr: SocketAddr,
    app: Router,
}

impl TollgateServer {
    pub fn new(addr: SocketAddr, state: AppState) -> Self {
        Self {
            addr,
            app: build_app(state),
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
