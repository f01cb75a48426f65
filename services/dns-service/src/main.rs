use axum::{
    Json, Router,
    http::{HeaderValue, StatusCode},
    routing::{get, post},
};
use pd_contract_client::ContractGateway;
use pd_contract_http::HttpContractGateway;
use pd_record_store::RecordStore;
use pd_storage::InMemoryContract;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

mod contract;
mod records;

pub(crate) type SharedGateway = Arc<dyn ContractGateway>;

#[derive(Debug, Serialize)]
struct HealthResponse {
    service: &'static str,
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct VersionResponse {
    service: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ErrorResponse {
    error: String,
}

pub(crate) type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) store: Arc<RecordStore<SharedGateway>>,
}

impl AppState {
    pub(crate) fn new(gateway: SharedGateway) -> Self {
        Self {
            store: Arc::new(RecordStore::new(gateway)),
        }
    }

    pub(crate) fn gateway(&self) -> &SharedGateway {
        self.store.gateway()
    }
}

/// Runtime settings, read from the environment once at startup.
#[derive(Debug, Clone)]
struct ServiceConfig {
    bind_addr: SocketAddr,
    /// Upstream ledger; the service keeps its own in-memory key space when unset.
    ledger_url: Option<String>,
    cors_origin: Option<String>,
}

impl ServiceConfig {
    fn from_env() -> anyhow::Result<Self> {
        let bind_addr = match non_empty_env("PRIVATEDNS_BIND_ADDR") {
            Some(raw) => raw
                .parse()
                .map_err(|err| anyhow::anyhow!("invalid PRIVATEDNS_BIND_ADDR {raw}: {err}"))?,
            None => SocketAddr::from(([0, 0, 0, 0], 8080)),
        };

        Ok(Self {
            bind_addr,
            ledger_url: non_empty_env("PRIVATEDNS_LEDGER_URL"),
            cors_origin: non_empty_env("PRIVATEDNS_CORS_ORIGIN"),
        })
    }

    fn gateway(&self) -> SharedGateway {
        match &self.ledger_url {
            Some(url) => {
                info!("proxying contract calls to {}", url);
                Arc::new(HttpContractGateway::new(Some(url.clone())))
            }
            None => {
                info!("serving an in-memory contract key space");
                Arc::new(InMemoryContract::new())
            }
        }
    }

    fn cors(&self) -> anyhow::Result<CorsLayer> {
        let Some(origin) = &self.cors_origin else {
            return Ok(CorsLayer::permissive());
        };
        let origin: HeaderValue = origin
            .parse()
            .map_err(|err| anyhow::anyhow!("invalid PRIVATEDNS_CORS_ORIGIN {origin}: {err}"))?;
        Ok(CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any))
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ServiceConfig::from_env()?;
    let state = AppState::new(config.gateway());
    let app = app(state).layer(config.cors()?);

    info!("dns-service listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
        .route("/contract/available", get(contract::contract_available))
        .route("/contract/data", post(contract::contract_write))
        .route("/contract/data/{key}", get(contract::contract_read))
        .route("/records", get(records::list_records).post(records::submit_record))
        .route("/records/{id}/verify", post(records::verify_record))
        .route("/records/{id}/reject", post(records::reject_record))
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        service: "dns-service",
        status: "ok",
    })
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        service: "dns-service",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub(crate) fn error_response(status: StatusCode, message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: message.to_owned(),
        }),
    )
}

pub(crate) fn bad_request(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    error_response(StatusCode::BAD_REQUEST, message)
}

pub(crate) fn unauthorized(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    error_response(StatusCode::UNAUTHORIZED, message)
}

pub(crate) fn internal_error(err: impl std::fmt::Display) -> (StatusCode, Json<ErrorResponse>) {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
}
