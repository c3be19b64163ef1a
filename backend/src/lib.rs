pub mod handlers;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, Method, StatusCode},
    middleware,
    response::Response,
    routing::{get, post},
    Router,
};

use models::config::AppConfig;
use models::error::{AppError, REQUEST_ID};
use services::history_store::HistoryStore;
use services::job_manager::JobManager;
use services::session_store::SessionStore;
use services::store::{FileStore, KvStore, MemoryStore};
use services::stylize_client::StylizeClient;

pub struct AppState {
    pub config: Arc<AppConfig>,
    pub client: StylizeClient,
    pub jobs: JobManager,
    pub sessions: SessionStore,
    pub history: HistoryStore,
}

impl AppState {
    /// Builds the shared state; the key-value store is file-backed when `STORE_DIR` is set.
    pub async fn from_config(config: Arc<AppConfig>) -> anyhow::Result<Self> {
        let store: Arc<dyn KvStore> = match &config.store_dir {
            Some(dir) => Arc::new(FileStore::new(dir).await?),
            None => Arc::new(MemoryStore::new()),
        };
        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Arc<AppConfig>, store: Arc<dyn KvStore>) -> Self {
        Self {
            client: StylizeClient::new(config.clone()),
            jobs: JobManager::new(config.idempotency_ttl_secs),
            sessions: SessionStore::new(store.clone()),
            history: HistoryStore::new(store, config.history_limit),
            config,
        }
    }
}

async fn session_token_middleware(
    headers: HeaderMap,
    request: Request<Body>,
    next: axum::middleware::Next,
) -> Result<Response, AppError> {
    let method = request.method().clone();

    if method == Method::POST || method == Method::DELETE {
        let token = headers
            .get(handlers::SESSION_HEADER)
            .and_then(|v| v.to_str().ok());

        if token.map_or(true, |t| t.trim().is_empty()) {
            return Err(AppError::MissingSessionToken);
        }
    }

    Ok(next.run(request).await)
}

async fn request_id_middleware(
    request: Request<Body>,
    next: axum::middleware::Next,
) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    let mut response = REQUEST_ID.scope(request_id.clone(), next.run(request)).await;
    // Error responses already carry the same id in header and body.
    if !response.headers().contains_key("x-request-id") {
        if let Ok(value) = request_id.parse() {
            response.headers_mut().insert("X-Request-Id", value);
        }
    }
    response
}

/// Reject plain-HTTP requests when the gateway is exposed beyond loopback.
pub async fn require_https_middleware(
    request: Request<Body>,
    next: axum::middleware::Next,
) -> Result<Response, StatusCode> {
    // A reverse proxy terminating TLS sets X-Forwarded-Proto.
    let proto = request
        .headers()
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok());

    let is_https = proto.map_or(false, |p| p.eq_ignore_ascii_case("https"));
    if !is_https {
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(next.run(request).await)
}

/// API routes plus the session/request-id middleware; CORS and tracing are layered on in `main`.
pub fn router(state: Arc<AppState>) -> Router {
    let api_v1 = Router::new()
        .route("/presets", get(handlers::presets::get_preset))
        .route("/presets/named", get(handlers::presets::list_named))
        .route("/presets/named/:key", get(handlers::presets::get_named))
        .route("/gallery/:slug", get(handlers::presets::gallery_style))
        .route("/stylize", post(handlers::stylize::create_stylize))
        .route("/stylize/resolve", post(handlers::stylize::resolve_stylize))
        .route("/jobs/:job_id", get(handlers::stylize::get_stylize_job))
        .route("/uploads", post(handlers::session::upload_image))
        .route(
            "/session",
            get(handlers::session::get_session)
                .post(handlers::session::update_session)
                .delete(handlers::session::clear_session),
        )
        .route(
            "/history",
            get(handlers::history::list_history).delete(handlers::history::clear_history),
        )
        .route("/history/:item_id", get(handlers::history::get_history_item))
        .route("/history/:item_id/output", get(handlers::history::get_history_output));

    // Room for a base64 image plus bundled reference images in one JSON body.
    let body_limit = (state.config.max_upload_bytes as usize).saturating_mul(6);

    Router::new()
        .nest("/api/v1", api_v1)
        .route("/api/health", get(handlers::health::health_check))
        .route("/api/version", get(handlers::health::version))
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(session_token_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
