use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::Request,
    http::{header::HeaderName, Method},
    middleware,
    response::Response,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use artmorph::handlers;
use artmorph::models::config::AppConfig;
use artmorph::{require_https_middleware, router, AppState};

/// Never logged verbatim; the session token scopes a user's images and history.
const REDACTED_HEADERS: &[&str] = &["authorization", "cookie", "x-session-token"];

const JOB_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("x-request-id"),
            HeaderName::from_static("x-session-token"),
            HeaderName::from_static("idempotency-key"),
        ])
        .expose_headers([
            HeaderName::from_static("x-request-id"),
            HeaderName::from_static("content-disposition"),
        ])
}

fn describe_headers(request: &Request<Body>) -> String {
    request
        .headers()
        .iter()
        .map(|(name, value)| {
            if REDACTED_HEADERS.contains(&name.as_str()) {
                format!("{}=[REDACTED]", name)
            } else {
                format!("{}={}", name, value.to_str().unwrap_or(""))
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Loopback binds may serve plain HTTP unless `REQUIRE_HTTPS` says otherwise.
/// Wildcard binds (`0.0.0.0`, `[::]`) are reachable from other hosts.
fn https_required(config: &AppConfig) -> bool {
    let addr = config.listen_addr.as_str();
    let host = addr.rsplit_once(':').map_or(addr, |(h, _)| h);
    let loopback = matches!(host, "127.0.0.1" | "::1" | "[::1]" | "localhost");
    config.require_https || !loopback
}

fn build_app(state: Arc<AppState>, config: &AppConfig) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                headers = %describe_headers(request),
            )
        })
        .on_response(|response: &Response, latency: Duration, _span: &Span| {
            tracing::info!(
                status = response.status().as_u16(),
                latency_ms = latency.as_millis() as u64,
                "response",
            );
        });

    let app = router(state).layer(trace_layer).layer(cors_layer(config));

    if https_required(config) {
        tracing::warn!(
            listen_addr = %config.listen_addr,
            require_https = config.require_https,
            "HTTPS enforced; plain HTTP requests will be rejected"
        );
        app.layer(middleware::from_fn(require_https_middleware))
    } else {
        app
    }
}

fn spawn_job_sweeper(state: Arc<AppState>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(JOB_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            state.jobs.cleanup_old_jobs();
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    init_tracing(&config);
    handlers::health::init_start_time();

    let config = Arc::new(config);
    let state = Arc::new(AppState::from_config(config.clone()).await?);
    spawn_job_sweeper(state.clone());

    let app = build_app(state.clone(), &config);

    tracing::info!(
        backend = %state.client.endpoint(),
        history_limit = config.history_limit,
        persistent = config.store_dir.is_some(),
        "Starting gateway on {}",
        config.listen_addr
    );

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install CTRL+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_on(addr: &str, require_https: bool) -> AppConfig {
        AppConfig {
            listen_addr: addr.to_string(),
            require_https,
            ..AppConfig::default()
        }
    }

    #[test]
    fn loopback_binds_allow_plain_http() {
        assert!(!https_required(&config_on("127.0.0.1:8080", false)));
        assert!(!https_required(&config_on("localhost:8080", false)));
        assert!(https_required(&config_on("127.0.0.1:8080", true)));
        assert!(https_required(&config_on("10.0.0.5:8080", false)));
    }

    #[test]
    fn wildcard_binds_require_https() {
        assert!(https_required(&config_on("0.0.0.0:8080", false)));
        assert!(https_required(&config_on("[::]:8080", false)));
        assert!(!https_required(&AppConfig::default()));
    }

    #[test]
    fn session_token_is_redacted() {
        let request = Request::builder()
            .header("x-session-token", "secret")
            .header("content-type", "application/json")
            .body(Body::empty())
            .unwrap();
        let described = describe_headers(&request);
        assert!(described.contains("x-session-token=[REDACTED]"));
        assert!(described.contains("content-type=application/json"));
        assert!(!described.contains("secret"));
    }
}
