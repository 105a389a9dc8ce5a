use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

pub const DEFAULT_FINNHUB_BASE_URL: &str = "https://finnhub.io/api/v1";
pub const DEFAULT_ALPHA_VANTAGE_BASE_URL: &str = "https://www.alphavantage.co/query";

pub struct Config {
    pub listen_addr: SocketAddr,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub finnhub_api_key: Option<String>,
    pub alpha_vantage_api_key: Option<String>,
    pub finnhub_base_url: String,
    pub alpha_vantage_base_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("FB_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid FB_LISTEN_ADDR")?;
        let cors_allow = parse_origins(
            &std::env::var("FB_CORS_ALLOW_ORIGINS").unwrap_or_else(|_| "*".into()),
        );
        let timeout_ms: u64 = std::env::var("FB_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);

        Ok(Self {
            listen_addr,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            finnhub_api_key: non_empty_var("FINNHUB_API_KEY"),
            alpha_vantage_api_key: non_empty_var("ALPHA_VANTAGE_API_KEY"),
            finnhub_base_url: std::env::var("FB_FINNHUB_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_FINNHUB_BASE_URL.into()),
            alpha_vantage_base_url: std::env::var("FB_ALPHA_VANTAGE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_ALPHA_VANTAGE_BASE_URL.into()),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Comma-separated origin list, blanks dropped.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
