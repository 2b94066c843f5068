//! Server configuration
//!
//! All configuration items can be overridden through environment
//! variables:
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | HTTP_PORT | 3000 | HTTP API port |
//! | DATA_DIR | ./data | RocksDB storage directory |
//! | JWT_SECRET | dev secret | JWT signing secret |
//! | PAYMENT_SECRET_KEY | (empty) | Payment processor API key |
//! | WEBHOOK_SECRET | (empty) | Checkout webhook signing secret |
//! | CONNECT_WEBHOOK_SECRET | (empty) | Connected-account webhook signing secret |
//! | COMMISSION_RATE | 0.25 | Platform commission rate per supplier bucket |
//! | WEBHOOK_TOLERANCE_SECS | 300 | Max signed-timestamp age accepted |

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API port
    pub http_port: u16,
    /// Directory holding the embedded database
    pub data_dir: String,
    /// JWT signing secret
    pub jwt_secret: String,
    /// Payment processor API key
    pub payment_secret_key: String,
    /// Signing secret for the checkout webhook channel
    pub webhook_secret: String,
    /// Signing secret for the connected-account webhook channel
    pub connect_webhook_secret: String,
    /// Platform commission rate, applied per supplier bucket
    pub commission_rate: f64,
    /// Accepted age of a signed webhook timestamp, in seconds
    pub webhook_tolerance_secs: i64,
    /// Checkout currency (ISO 4217, lowercase)
    pub currency: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".into()),
            jwt_secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "dev-secret-change-me".into()),
            payment_secret_key: std::env::var("PAYMENT_SECRET_KEY").unwrap_or_default(),
            webhook_secret: std::env::var("WEBHOOK_SECRET").unwrap_or_default(),
            connect_webhook_secret: std::env::var("CONNECT_WEBHOOK_SECRET").unwrap_or_default(),
            commission_rate: std::env::var("COMMISSION_RATE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0.25),
            webhook_tolerance_secs: std::env::var("WEBHOOK_TOLERANCE_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            currency: std::env::var("CURRENCY").unwrap_or_else(|_| "usd".into()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
