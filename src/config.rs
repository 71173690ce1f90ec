//! Storefront server configuration

/// Server configuration, loaded once at startup
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP port
    pub http_port: u16,
    /// Path of the JSON document store
    pub data_file: String,
    /// Razorpay key id (public half, returned to checkout clients)
    pub razorpay_key_id: String,
    /// Razorpay key secret (never leaves the server)
    pub razorpay_key_secret: String,
    /// Environment: development | staging | production
    pub environment: String,
    /// Upper bound on a single gateway call (milliseconds)
    pub gateway_timeout_ms: u64,
    /// Bearer token lifetime (hours)
    pub token_ttl_hours: i64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Missing Razorpay keys are not fatal: online order creation is
    /// disabled until they are set, cash on delivery keeps working.
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            data_file: std::env::var("DATA_FILE").unwrap_or_else(|_| "data/store.json".into()),
            razorpay_key_id: std::env::var("RAZORPAY_KEY_ID").unwrap_or_default(),
            razorpay_key_secret: std::env::var("RAZORPAY_KEY_SECRET").unwrap_or_default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            gateway_timeout_ms: std::env::var("GATEWAY_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            token_ttl_hours: std::env::var("TOKEN_TTL_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(24),
        }
    }

    /// Both halves of the Razorpay key pair are present
    pub fn gateway_configured(&self) -> bool {
        !self.razorpay_key_id.is_empty() && !self.razorpay_key_secret.is_empty()
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    /// Development defaults, used by tests that never touch the environment
    fn default() -> Self {
        Self {
            http_port: 8080,
            data_file: "data/store.json".into(),
            razorpay_key_id: String::new(),
            razorpay_key_secret: String::new(),
            environment: "development".into(),
            gateway_timeout_ms: 10_000,
            token_ttl_hours: 24,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.http_port, 8080);
        assert!(!config.gateway_configured());
        assert!(!config.is_production());
        assert!(config.is_development());
    }

    #[test]
    fn test_gateway_configured_requires_both_halves() {
        let mut config = Config::default();
        config.razorpay_key_id = "rzp_test_abc".into();
        assert!(!config.gateway_configured());
        config.razorpay_key_secret = "secret".into();
        assert!(config.gateway_configured());
    }
}
