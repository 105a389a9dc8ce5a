use std::sync::Arc;

use finboard_market_data::{AlphaVantageProvider, FinnhubProvider, UpstreamProvider};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

/// An upstream provider and the key the proxy signs its requests with.
pub struct ProviderRoute {
    pub provider: Arc<dyn UpstreamProvider>,
    pub api_key: Option<String>,
}

pub struct AppState {
    pub http: reqwest::Client,
    pub finnhub: ProviderRoute,
    pub alpha_vantage: ProviderRoute,
}

impl AppState {
    pub fn routes(&self) -> [&ProviderRoute; 2] {
        [&self.finnhub, &self.alpha_vantage]
    }
}

pub fn init_tracing() {
    let log_format = std::env::var("FB_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let http = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()?;

    let finnhub = ProviderRoute {
        provider: Arc::new(FinnhubProvider::with_base_url(&config.finnhub_base_url)),
        api_key: config.finnhub_api_key.clone(),
    };
    let alpha_vantage = ProviderRoute {
        provider: Arc::new(AlphaVantageProvider::with_base_url(
            &config.alpha_vantage_base_url,
        )),
        api_key: config.alpha_vantage_api_key.clone(),
    };

    for route in [&finnhub, &alpha_vantage] {
        if route.api_key.is_none() {
            tracing::warn!(
                provider = route.provider.id(),
                "No API key configured, requests will fail"
            );
        }
    }

    Ok(Arc::new(AppState {
        http,
        finnhub,
        alpha_vantage,
    }))
}
