use std::env;

/// Largest upload the encoder will accept (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: String,
    pub allowed_origins: Vec<String>,
    pub backend_url: String,
    pub stylize_path: String,
    pub max_upload_bytes: u64,
    pub history_limit: usize,
    pub store_dir: Option<String>,
    pub style_assets_dir: String,
    pub idempotency_ttl_secs: u64,
    pub log_level: String,
    pub require_https: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:8080".to_string(),
            ],
            backend_url: "http://localhost:8000".to_string(),
            stylize_path: "/api/stylize".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            history_limit: 20,
            store_dir: None,
            style_assets_dir: "./public".to_string(),
            idempotency_ttl_secs: 600,
            log_level: "info".to_string(),
            require_https: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            listen_addr: env::var("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.allowed_origins),
            backend_url: env::var("STYLIZE_BACKEND_URL").unwrap_or(defaults.backend_url),
            stylize_path: env::var("STYLIZE_PATH").unwrap_or(defaults.stylize_path),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_upload_bytes),
            history_limit: env::var("HISTORY_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.history_limit),
            store_dir: env::var("STORE_DIR").ok().filter(|v| !v.trim().is_empty()),
            style_assets_dir: env::var("STYLE_ASSETS_DIR").unwrap_or(defaults.style_assets_dir),
            idempotency_ttl_secs: env::var("IDEMPOTENCY_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.idempotency_ttl_secs),
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            require_https: env::var("REQUIRE_HTTPS")
                .ok()
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }

    /// Full URL of the backend stylize endpoint.
    pub fn stylize_url(&self) -> String {
        let base = self.backend_url.trim_end_matches('/');
        if self.stylize_path.starts_with('/') {
            format!("{}{}", base, self.stylize_path)
        } else {
            format!("{}/{}", base, self.stylize_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stylize_url_joins_cleanly() {
        let mut config = AppConfig {
            backend_url: "http://gpu-box:8000/".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.stylize_url(), "http://gpu-box:8000/api/stylize");
        config.stylize_path = "v2/stylize".to_string();
        assert_eq!(config.stylize_url(), "http://gpu-box:8000/v2/stylize");
    }

    #[test]
    fn defaults_match_upload_limit() {
        let config = AppConfig::default();
        assert_eq!(config.max_upload_bytes, 10_485_760);
        assert_eq!(config.history_limit, 20);
        assert!(config.store_dir.is_none());
    }
}
