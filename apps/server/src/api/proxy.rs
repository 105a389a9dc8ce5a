use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use finboard_market_data::ProxyQuery;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::{AppState, ProviderRoute},
};

/// What the dashboard needs to know about a provider before polling it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub configured: bool,
    pub endpoints: &'static [&'static str],
    pub default_endpoint: &'static str,
    pub default_symbol: &'static str,
    pub requests_per_minute: u32,
    pub requests_per_day: Option<u32>,
}

pub async fn list_providers(State(state): State<Arc<AppState>>) -> Json<Vec<ProviderInfo>> {
    let providers = state
        .routes()
        .into_iter()
        .map(|route| {
            let capabilities = route.provider.capabilities();
            let limit = route.provider.rate_limit();
            ProviderInfo {
                id: route.provider.id(),
                name: route.provider.display_name(),
                configured: route.api_key.is_some(),
                endpoints: capabilities.endpoints,
                default_endpoint: capabilities.default_endpoint,
                default_symbol: capabilities.default_symbol,
                requests_per_minute: limit.requests_per_minute,
                requests_per_day: limit.requests_per_day,
            }
        })
        .collect();
    Json(providers)
}

pub async fn finnhub(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProxyQuery>,
) -> ApiResult<Json<Value>> {
    forward(&state.http, &state.finnhub, &query).await
}

pub async fn alpha_vantage(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProxyQuery>,
) -> ApiResult<Json<Value>> {
    forward(&state.http, &state.alpha_vantage, &query).await
}

/// Sign the query with the provider key, call upstream, and pass the JSON
/// body through unless it signals a rate limit.
///
/// A 429 status is a rate limit whatever its body; other responses must be
/// JSON and are checked for the provider's body marker.
async fn forward(
    http: &reqwest::Client,
    route: &ProviderRoute,
    query: &ProxyQuery,
) -> ApiResult<Json<Value>> {
    let provider = route.provider.as_ref();
    let name = provider.display_name();
    let Some(api_key) = route.api_key.as_deref() else {
        tracing::error!(provider = provider.id(), "API key missing");
        return Err(ApiError::MissingCredential(name));
    };

    let url = provider
        .upstream_url(query, api_key)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let response = http.get(&url).send().await.map_err(|e| {
        tracing::warn!(provider = provider.id(), error = %e.without_url(), "Upstream request failed");
        ApiError::Upstream(name)
    })?;
    let status = response.status().as_u16();
    if status == 429 {
        tracing::info!(provider = provider.id(), status, "Upstream rate limit reached");
        return Err(ApiError::RateLimited);
    }
    let body: Value = response.json().await.map_err(|e| {
        tracing::warn!(provider = provider.id(), status, error = %e.without_url(), "Upstream body is not JSON");
        ApiError::Upstream(name)
    })?;

    if provider.is_rate_limited(status, &body) {
        tracing::info!(provider = provider.id(), status, "Upstream rate limit reached");
        return Err(ApiError::RateLimited);
    }

    tracing::debug!(
        provider = provider.id(),
        symbol = query.symbol.as_deref().unwrap_or_default(),
        status,
        "Forwarded upstream response"
    );
    Ok(Json(body))
}
