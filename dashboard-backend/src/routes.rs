use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use log::debug;
use panel::{CategoryField, Weighting};
use panel_core::query::{QueryFacade, DEFAULT_TOP_N};
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

// App State
#[derive(Clone)]
pub struct AppState {
    pub facade: Arc<QueryFacade>,
    pub search_limit: usize,
}

type Params = Query<HashMap<String, String>>;

/// Handler failure rendered as `{"status": "ERROR", "msg": ..}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, msg) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };
        (code, Json(serde_json::json!({"status": "ERROR", "msg": msg}))).into_response()
    }
}

type ApiResult = Result<Json<serde_json::Value>, ApiError>;

fn optional<T>(params: &HashMap<String, String>, name: &str) -> Result<Option<T>, ApiError>
where
    T: FromStr,
    T::Err: Display,
{
    match params.get(name).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| ApiError::BadRequest(format!("invalid '{}': {}", name, e))),
    }
}

fn required<T>(params: &HashMap<String, String>, name: &str) -> Result<T, ApiError>
where
    T: FromStr,
    T::Err: Display,
{
    optional(params, name)?
        .ok_or_else(|| ApiError::BadRequest(format!("missing '{}'", name)))
}

fn field_of(params: &HashMap<String, String>) -> Result<CategoryField, ApiError> {
    Ok(optional(params, "field")?.unwrap_or(CategoryField::HqCountry))
}

fn weighting_of(params: &HashMap<String, String>) -> Result<Weighting, ApiError> {
    Ok(optional(params, "weighting")?.unwrap_or_default())
}

fn top_n_of(params: &HashMap<String, String>) -> Result<usize, ApiError> {
    Ok(optional(params, "n")?.unwrap_or(DEFAULT_TOP_N))
}

/// `(year, quarter?)` selection shared by the quarter-scoped routes.
fn selection(params: &HashMap<String, String>) -> Result<(i32, Option<u8>), ApiError> {
    let year = required(params, "year")?;
    let quarter: Option<u8> = optional(params, "quarter")?;
    if let Some(q) = quarter {
        if !(1..=4).contains(&q) {
            return Err(ApiError::BadRequest(format!("invalid 'quarter': {}", q)));
        }
    }
    Ok((year, quarter))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/years", get(get_years))
        .route("/years/:year/quarters", get(get_quarters))
        .route("/snapshot", get(get_snapshot))
        .route("/distribution", get(get_distribution))
        .route("/top-share", get(get_top_share))
        .route("/concentration", get(get_concentration))
        .route("/series/top-share", get(get_top_share_series))
        .route("/series/concentration", get(get_concentration_series))
        .route("/series/hhi", get(get_hhi_series))
        .route("/series/market-cap", get(get_market_cap_series))
        .route("/series/categories", get(get_category_series))
        .route("/series/entities", get(get_entity_count_series))
        .route("/series/turnover", get(get_turnover_series))
        .route("/entities/search", get(search_entities))
        .route("/entities/:key/timeseries", get(get_entity_timeseries))
        .route("/entities/:key/profile", get(get_entity_profile))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn get_years(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({"status": "OK", "years": state.facade.list_years()}))
}

async fn get_quarters(State(state): State<AppState>, Path(year): Path<String>) -> ApiResult {
    let year: i32 = year
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid year: {}", year)))?;
    Ok(Json(
        serde_json::json!({"status": "OK", "quarters": state.facade.list_quarters(year)}),
    ))
}

async fn get_snapshot(State(state): State<AppState>, Query(params): Params) -> ApiResult {
    let (year, quarter) = selection(&params)?;
    let snapshot = state.facade.snapshot_for(year, quarter);
    Ok(Json(serde_json::json!({"status": "OK", "snapshot": snapshot})))
}

async fn get_distribution(State(state): State<AppState>, Query(params): Params) -> ApiResult {
    let (year, quarter) = selection(&params)?;
    let field = field_of(&params)?;
    let distribution = match weighting_of(&params)? {
        Weighting::EqualWeighted => serde_json::to_value(
            state.facade.category_distribution(year, quarter, field),
        ),
        Weighting::CapWeighted => serde_json::to_value(
            state.facade.cap_weighted_distribution(year, quarter, field),
        ),
    }
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    Ok(Json(
        serde_json::json!({"status": "OK", "distribution": distribution}),
    ))
}

async fn get_top_share(State(state): State<AppState>, Query(params): Params) -> ApiResult {
    let (year, quarter) = selection(&params)?;
    let shares = state.facade.top_n_share(
        year,
        quarter,
        field_of(&params)?,
        weighting_of(&params)?,
        top_n_of(&params)?,
    );
    Ok(Json(serde_json::json!({"status": "OK", "top_share": shares})))
}

async fn get_concentration(State(state): State<AppState>, Query(params): Params) -> ApiResult {
    let (year, quarter) = selection(&params)?;
    let concentration = state
        .facade
        .concentration(year, quarter, top_n_of(&params)?);
    Ok(Json(
        serde_json::json!({"status": "OK", "concentration": concentration}),
    ))
}

async fn get_top_share_series(State(state): State<AppState>, Query(params): Params) -> ApiResult {
    let series = state.facade.top_n_share_series(
        field_of(&params)?,
        weighting_of(&params)?,
        top_n_of(&params)?,
    );
    Ok(Json(serde_json::json!({"status": "OK", "series": series})))
}

async fn get_concentration_series(
    State(state): State<AppState>,
    Query(params): Params,
) -> ApiResult {
    let series = state.facade.concentration_series(top_n_of(&params)?);
    Ok(Json(serde_json::json!({"status": "OK", "series": series})))
}

async fn get_hhi_series(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({"status": "OK", "series": state.facade.hhi_series()}))
}

async fn get_market_cap_series(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({"status": "OK", "series": state.facade.total_market_cap_series()}))
}

async fn get_category_series(State(state): State<AppState>, Query(params): Params) -> ApiResult {
    let series = state.facade.distinct_category_series(field_of(&params)?);
    Ok(Json(serde_json::json!({"status": "OK", "series": series})))
}

async fn get_entity_count_series(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({"status": "OK", "series": state.facade.entity_count_series()}))
}

async fn get_turnover_series(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({"status": "OK", "series": state.facade.turnover_series()}))
}

async fn search_entities(State(state): State<AppState>, Query(params): Params) -> ApiResult {
    let query = params.get("q").map(String::as_str).unwrap_or_default();
    let limit = optional(&params, "limit")?.unwrap_or(state.search_limit);
    debug!("Entity search {:?} (limit {})", query, limit);
    let matches = state.facade.search_entities(query, limit);
    Ok(Json(serde_json::json!({"status": "OK", "matches": matches})))
}

async fn get_entity_timeseries(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> impl IntoResponse {
    let timeseries = state.facade.entity_timeseries(&key);
    Json(serde_json::json!({"status": "OK", "key": key, "timeseries": timeseries}))
}

async fn get_entity_profile(State(state): State<AppState>, Path(key): Path<String>) -> ApiResult {
    match state.facade.entity_profile(&key) {
        Some(profile) => Ok(Json(serde_json::json!({"status": "OK", "profile": profile}))),
        None => Err(ApiError::NotFound(format!("Entity not found: {}", key))),
    }
}
