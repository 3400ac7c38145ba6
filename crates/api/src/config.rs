use rightsdesk_core::reconciliation::ReconciliationConfig;
use rightsdesk_core::shares::SharePolicy;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Detections below this confidence are skipped when reconciling.
    pub reconcile_min_confidence: f64,
    /// Reject contributor saves whose totals exceed a category cap.
    pub block_over_cap_saves: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                 |
    /// |----------------------------|-------------------------|
    /// | `HOST`                     | `0.0.0.0`               |
    /// | `PORT`                     | `3000`                  |
    /// | `CORS_ORIGINS`             | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                    |
    /// | `RECONCILE_MIN_CONFIDENCE` | `0.0`                   |
    /// | `BLOCK_OVER_CAP_SAVES`     | `false`                 |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let reconcile_min_confidence: f64 = std::env::var("RECONCILE_MIN_CONFIDENCE")
            .unwrap_or_else(|_| "0.0".into())
            .parse()
            .expect("RECONCILE_MIN_CONFIDENCE must be a number");

        let block_over_cap_saves: bool = std::env::var("BLOCK_OVER_CAP_SAVES")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("BLOCK_OVER_CAP_SAVES must be true or false");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            reconcile_min_confidence,
            block_over_cap_saves,
        }
    }

    pub fn reconciliation(&self) -> ReconciliationConfig {
        ReconciliationConfig {
            min_confidence: self.reconcile_min_confidence,
        }
    }

    pub fn share_policy(&self) -> SharePolicy {
        SharePolicy {
            block_over_cap: self.block_over_cap_saves,
        }
    }
}
