use std::time::Duration;

use clap::Parser;

use crate::error::ConfigError;

/// Live price board for a CS2 item inventory.
#[derive(Debug, Clone, Parser)]
#[command(name = "cs2_price_board", version)]
pub struct Config {
    /// Origin of the price provider, e.g. https://prices.example.com
    #[arg(long, env = "PRICE_API_URL", default_value = "http://127.0.0.1:8000")]
    pub api_url: String,

    /// Skip the /health liveness probe before fetching prices
    #[arg(long, env = "PRICE_SKIP_HEALTH")]
    pub skip_health: bool,

    /// Per-request timeout in seconds
    #[arg(long, env = "PRICE_TIMEOUT_SECS", default_value_t = 15)]
    pub timeout_secs: u64,

    /// Reload automatically every N seconds
    #[arg(long, env = "PRICE_REFRESH_SECS")]
    pub refresh_secs: Option<u64>,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Config::parse().validated()
    }

    pub fn validated(mut self) -> Result<Self, ConfigError> {
        let trimmed = self.api_url.trim().trim_end_matches('/').to_string();
        if trimmed.is_empty() {
            return Err(ConfigError::Invalid {
                key: "api_url",
                reason: "must not be empty".to_string(),
            });
        }
        if let Err(e) = reqwest::Url::parse(&trimmed) {
            return Err(ConfigError::Invalid {
                key: "api_url",
                reason: format!("{trimmed}: {e}"),
            });
        }
        self.api_url = trimmed;

        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "timeout_secs",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.refresh_secs == Some(0) {
            return Err(ConfigError::Invalid {
                key: "refresh_secs",
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        self.refresh_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        let mut argv = vec!["cs2_price_board"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let cfg = parse(&["--api-url", "https://prices.example.com/"])
            .validated()
            .unwrap();
        assert_eq!(cfg.api_url, "https://prices.example.com");
    }

    #[test]
    fn relative_origin_is_rejected() {
        let err = parse(&["--api-url", "/api"]).validated().unwrap_err();
        assert!(err.to_string().contains("api_url"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = parse(&["--timeout-secs", "0"]).validated().unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn refresh_interval() {
        let cfg = parse(&["--refresh-secs", "30"]).validated().unwrap();
        assert_eq!(cfg.refresh_interval(), Some(Duration::from_secs(30)));
        assert!(parse(&["--refresh-secs", "0"]).validated().is_err());
    }
}
