//! HTTP backend exposing the client collection.
//!
//! Routes: `GET /api/clients` (every record, unordered) and `GET /healthz`.

use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::models::Client;
use crate::source::RecordSource;

#[derive(Clone, Debug)]
pub struct ServeConfig {
    pub bind: SocketAddr,
    pub cors_origin: String,
}

struct AppState {
    source: RecordSource,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("record source failed: {0:#}")]
    Source(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Source(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("{self}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Internal Server Error" })),
        )
            .into_response()
    }
}

pub fn router(source: RecordSource, cors_origin: &str) -> Result<Router> {
    let origin = HeaderValue::from_str(cors_origin)
        .with_context(|| format!("invalid CORS origin {cors_origin:?}"))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET]);

    let state = Arc::new(AppState { source });

    Ok(Router::new()
        .route("/healthz", get(healthz))
        .route("/api/clients", get(list_clients))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

pub async fn serve(config: ServeConfig, source: RecordSource) -> Result<()> {
    let app = router(source, &config.cors_origin)?;
    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!("server running on {}", listener.local_addr()?);

    run(listener, app, shutdown_signal()).await
}

async fn run(
    listener: TcpListener,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => {
            result.context("server failed")?;
        }
        _ = shutdown => {
            info!("shutting down");
            let _ = shutdown_tx.send(());
            tokio::time::timeout(Duration::from_secs(10), &mut server)
                .await
                .context("server shutdown timed out")?
                .context("server failed")?;
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!("failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    #[cfg(not(unix))]
    ctrl_c.await;
}

async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "ok": true }))
}

async fn list_clients(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Client>>, ApiError> {
    let clients = state.source.list_clients().await?;
    Ok(Json(clients))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClientType;
    use crate::sorting::fixtures::client;

    async fn spawn(source: RecordSource) -> (String, tokio::sync::oneshot::Sender<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(source, "http://localhost:5173").unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(run(listener, app, async {
            let _ = rx.await;
        }));
        (format!("http://{addr}"), tx)
    }

    #[tokio::test]
    async fn lists_every_client() {
        let records = vec![
            client(2, "Bob", ClientType::Individual, true),
            client(1, "alice", ClientType::Company, false),
        ];
        let (base, _stop) = spawn(RecordSource::fixture(records.clone())).await;

        let response = reqwest::get(format!("{base}/api/clients")).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: Vec<Client> = response.json().await.unwrap();
        assert_eq!(body, records);
    }

    #[tokio::test]
    async fn browser_source_reads_from_server() {
        let records = vec![client(9, "Zed", ClientType::Company, true)];
        let (base, _stop) = spawn(RecordSource::fixture(records.clone())).await;

        let clients = RecordSource::http(base).list_clients().await.unwrap();
        assert_eq!(clients, records);
    }

    #[tokio::test]
    async fn source_failure_is_an_opaque_500() {
        let (base, _stop) = spawn(RecordSource::http("http://127.0.0.1:1")).await;

        let response = reqwest::get(format!("{base}/api/clients")).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body, json!({ "error": "Internal Server Error" }));
    }

    #[tokio::test]
    async fn cors_allows_configured_origin() {
        let (base, _stop) = spawn(RecordSource::fixture(vec![])).await;

        let response = reqwest::Client::new()
            .get(format!("{base}/api/clients"))
            .header("Origin", "http://localhost:5173")
            .send()
            .await
            .unwrap();
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "http://localhost:5173"
        );
    }

    #[tokio::test]
    async fn healthz_reports_ok() {
        let (base, _stop) = spawn(RecordSource::fixture(vec![])).await;
        let body: serde_json::Value = reqwest::get(format!("{base}/healthz"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body, json!({ "ok": true }));
    }

    #[test]
    fn invalid_origin_is_rejected() {
        assert!(router(RecordSource::fixture(vec![]), "bad\norigin").is_err());
    }
}
