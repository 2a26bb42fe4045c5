use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use reqwest::{Client, Url};
use tracing::{info, warn};

use crate::config::UpstreamConfig;
use crate::dns::VercelProvider;
use crate::update::{self, Reconciler, UpdateParams, UpdateRequest, UpdateResult};

/// Shared, immutable state. The HTTP client pools connections to the
/// provider; nothing request-specific lives here.
#[derive(Clone)]
pub struct AppState {
    client: Client,
    api_base: Url,
    upstream: Arc<UpstreamConfig>,
}

impl AppState {
    pub fn new(upstream: UpstreamConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(upstream.timeout())
            .build()
            .context("Failed to create HTTP client")?;

        let api_base = Url::parse(&upstream.api_base)
            .with_context(|| format!("Invalid upstream api_base: {}", upstream.api_base))?;

        Ok(Self {
            client,
            api_base,
            upstream: Arc::new(upstream),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/nic/update", get(update_handler))
        .route("/api/update", get(update_handler))
        .route("/checkip", get(checkip_handler))
        .route("/api/checkip", get(checkip_handler))
        .with_state(state)
}

async fn update_handler(
    State(state): State<AppState>,
    query: Result<Query<UpdateParams>, QueryRejection>,
    headers: HeaderMap,
) -> Response {
    let params = match query {
        Ok(Query(params)) => params,
        Err(e) => {
            warn!("Unreadable query string: {}", e);
            UpdateParams::default()
        }
    };

    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let result = handle_update(&state, params, authorization).await;
    match &result {
        Ok(outcome) => info!("Update answered: {}", outcome.token()),
        Err(e) => info!("Update answered: {}", e),
    }
    result.into_response()
}

async fn handle_update(
    state: &AppState,
    params: UpdateParams,
    authorization: Option<&str>,
) -> UpdateResult {
    let request = UpdateRequest::from_parts(params, authorization)?;

    let provider = VercelProvider::new(
        state.client.clone(),
        state.api_base.clone(),
        request.credentials(),
        state.upstream.page_limit,
    );
    let reconciler = Reconciler::new(
        &provider,
        state.upstream.default_ttl,
        state.upstream.max_pages,
    );

    update::apply(&request, &reconciler).await
}

async fn checkip_handler(headers: HeaderMap) -> Response {
    let ip = client_ip(&headers).unwrap_or("unknown");

    let mut response = format!("Current IP Address: {}", ip).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=UTF-8"),
    );
    response
}

/// Address reported by the fronting proxy, if any.
fn client_ip(headers: &HeaderMap) -> Option<&str> {
    let real_ip = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    if real_ip.is_some() {
        return real_ip;
    }

    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
