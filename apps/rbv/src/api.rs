//! # HTTP API
//!
//! REST API over per-session assessments.
//!
//! Each session owns one [`Assessment`]. Sessions live in memory behind an
//! async `RwLock` and are dropped once idle for longer than the configured
//! TTL. Every access to a session refreshes its last-touched time, so it
//! takes the write lock. Results are recomputed on every read.
//!
//! Optional API key authentication (`Authorization: Bearer <key>` or
//! `X-API-Key: <key>`) and a global rate limit are enforced by one
//! middleware. `/health` is exempt from authentication. Only requests that
//! pass authentication draw from the rate limit.

use crate::config::ServerConfig;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use rbv_core::{
    Assessment, AssessmentError, FactorId, MissingRatingPolicy, ProfileEntry, VrioFinding,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use subtle::ConstantTimeEq;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

/// Header accepted as an alternative to a bearer token.
pub const API_KEY_HEADER: &str = "x-api-key";

// =============================================================================
// ERRORS
// =============================================================================

/// Errors returned by API handlers, rendered as `{"error": message}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Assessment(#[from] AssessmentError),

    #[error("session '{0}' not found")]
    SessionNotFound(String),

    #[error("session limit of {0} reached")]
    SessionLimit(usize),

    #[error("missing or invalid API key")]
    Unauthorized,

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("invalid request body: {}", .0.body_text())]
    InvalidBody(#[from] JsonRejection),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Assessment(AssessmentError::InvalidRating { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Assessment(AssessmentError::IncompleteInput { .. }) => StatusCode::CONFLICT,
            Self::Assessment(AssessmentError::UnknownFactor { .. }) | Self::SessionNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::SessionLimit(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::InvalidBody(rejection) => rejection.status(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Assessment(AssessmentError::IncompleteInput { missing }) => {
                json!({ "error": self.to_string(), "missing": missing })
            }
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

// =============================================================================
// STATE
// =============================================================================

/// A session's assessment and when it was last used.
#[derive(Debug)]
struct SessionEntry {
    assessment: Assessment,
    last_touched: Instant,
}

impl SessionEntry {
    fn new(assessment: Assessment, now: Instant) -> Self {
        Self {
            assessment,
            last_touched: now,
        }
    }

    fn is_idle(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.last_touched) > ttl
    }
}

type Sessions = BTreeMap<u64, SessionEntry>;

/// Drop every session idle for longer than `ttl`. Returns how many went.
fn evict_idle(sessions: &mut Sessions, now: Instant, ttl: Duration) -> usize {
    let before = sessions.len();
    sessions.retain(|_, entry| !entry.is_idle(now, ttl));
    before - sessions.len()
}

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    sessions: Arc<RwLock<Sessions>>,
    next_id: Arc<AtomicU64>,
    config: Arc<ServerConfig>,
    limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let limiter = config
            .rate_limit
            .map(|rps| Arc::new(RateLimiter::direct(Quota::per_second(rps))));
        Self {
            sessions: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            config: Arc::new(config),
            limiter,
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

// =============================================================================
// REQUEST / RESPONSE BODIES
// =============================================================================

/// Body of a rating update. `null` (or an absent field) clears the rating.
#[derive(Debug, Deserialize)]
pub struct RatingBody {
    #[serde(default)]
    pub rating: Option<i64>,
}

/// Session profile and completeness.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: u64,
    pub policy: MissingRatingPolicy,
    pub complete: bool,
    pub missing: Vec<FactorId>,
    pub factors: Vec<ProfileEntry>,
}

impl SessionView {
    fn new(session_id: u64, assessment: &Assessment) -> Self {
        let ratings = assessment.ratings();
        Self {
            session_id,
            policy: assessment.policy(),
            complete: ratings.is_complete(),
            missing: ratings.missing(),
            factors: assessment.profile(),
        }
    }
}

// =============================================================================
// ROUTER
// =============================================================================

/// Build the API router.
pub fn create_router(config: ServerConfig) -> Router {
    let state = AppState::new(config);
    create_router_with_state(state)
}

/// Build the API router around existing state.
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/factors", get(list_factors))
        .route("/sessions", post(create_session))
        .route("/sessions/{id}", get(get_session).delete(delete_session))
        .route("/sessions/{id}/ratings/{factor}", put(put_rating))
        .route("/sessions/{id}/potential", get(get_potential))
        .route("/sessions/{id}/vrio", get(get_vrio))
        .route("/sessions/{id}/report", get(get_report))
        .route("/sessions/{id}/advice", get(get_advice))
        .layer(middleware::from_fn_with_state(state.clone(), guard))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(
        addr = %config.bind,
        auth = config.api_key.is_some(),
        rate_limit = ?config.rate_limit,
        max_sessions = config.max_sessions,
        policy = %config.policy,
        session_ttl_secs = config.session_ttl.as_secs(),
        "RBV API listening"
    );

    axum::serve(listener, create_router(config))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("RBV API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl-C; running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

// =============================================================================
// MIDDLEWARE
// =============================================================================

async fn guard(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(expected) = state.config.api_key.as_deref()
        && request.uri().path() != "/health"
        && !key_matches(request.headers(), expected)
    {
        warn!(path = %request.uri().path(), "rejected request without valid API key");
        return Err(ApiError::Unauthorized);
    }

    // Only authenticated requests draw from the quota.
    if let Some(limiter) = &state.limiter
        && limiter.check().is_err()
    {
        warn!(path = %request.uri().path(), "rate limit exceeded");
        return Err(ApiError::RateLimited);
    }

    Ok(next.run(request).await)
}

fn provided_key(headers: &HeaderMap) -> Option<&str> {
    if let Some(value) = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        return value.strip_prefix("Bearer ").map(str::trim);
    }
    headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok())
}

fn key_matches(headers: &HeaderMap, expected: &str) -> bool {
    provided_key(headers)
        .map(|key| bool::from(key.as_bytes().ct_eq(expected.as_bytes())))
        .unwrap_or(false)
}

// =============================================================================
// HANDLERS
// =============================================================================

fn parse_session_id(raw: &str) -> Result<u64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::SessionNotFound(raw.to_string()))
}

/// Look up a live session and mark it touched. An idle session found here
/// is removed and reported as missing.
fn touch_session<'a>(
    sessions: &'a mut Sessions,
    id: u64,
    raw_id: &str,
    ttl: Duration,
) -> Result<&'a mut Assessment, ApiError> {
    let now = Instant::now();
    if sessions.get(&id).is_some_and(|entry| entry.is_idle(now, ttl)) {
        sessions.remove(&id);
        info!(session = id, "idle session expired");
    }
    let entry = sessions
        .get_mut(&id)
        .ok_or_else(|| ApiError::SessionNotFound(raw_id.to_string()))?;
    entry.last_touched = now;
    Ok(&mut entry.assessment)
}

/// Run `f` against a session.
async fn with_session<T>(
    state: &AppState,
    raw_id: &str,
    f: impl FnOnce(u64, &Assessment) -> Result<T, ApiError>,
) -> Result<T, ApiError> {
    let id = parse_session_id(raw_id)?;
    let mut sessions = state.sessions.write().await;
    let assessment = touch_session(&mut sessions, id, raw_id, state.config.session_ttl)?;
    f(id, &*assessment)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn list_factors() -> Json<serde_json::Value> {
    Json(json!(FactorId::catalog()))
}

async fn create_session(State(state): State<AppState>) -> Result<Response, ApiError> {
    let mut sessions = state.sessions.write().await;
    let now = Instant::now();
    let expired = evict_idle(&mut sessions, now, state.config.session_ttl);
    if expired > 0 {
        info!(expired, "idle sessions evicted");
    }
    if sessions.len() >= state.config.max_sessions {
        warn!(limit = state.config.max_sessions, "session limit reached");
        return Err(ApiError::SessionLimit(state.config.max_sessions));
    }

    let id = state.next_id.fetch_add(1, Ordering::Relaxed);
    sessions.insert(id, SessionEntry::new(Assessment::new(state.config.policy), now));
    info!(session = id, active = sessions.len(), "session created");

    Ok((StatusCode::CREATED, Json(json!({ "session_id": id }))).into_response())
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    with_session(&state, &id, |id, a| Ok(Json(SessionView::new(id, a)))).await
}

async fn delete_session(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_session_id(&raw_id)?;
    let removed = state.sessions.write().await.remove(&id);
    match removed {
        Some(_) => {
            info!(session = id, "session deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(ApiError::SessionNotFound(raw_id)),
    }
}

async fn put_rating(
    State(state): State<AppState>,
    Path((raw_id, factor)): Path<(String, String)>,
    body: Result<Json<RatingBody>, JsonRejection>,
) -> Result<Json<SessionView>, ApiError> {
    let id = parse_session_id(&raw_id)?;
    let factor: FactorId = factor.parse()?;
    let Json(body) = body.inspect_err(|e| {
        warn!(session = id, factor = %factor, reason = %e.body_text(), "rejected rating body");
    })?;

    let mut sessions = state.sessions.write().await;
    let assessment = touch_session(&mut sessions, id, &raw_id, state.config.session_ttl)?;

    match body.rating {
        Some(value) => {
            if let Err(e) = assessment.rate(factor, value) {
                warn!(session = id, factor = %factor, value, "rejected rating");
                return Err(e.into());
            }
        }
        None => {
            assessment.clear(factor);
        }
    }
    debug!(session = id, factor = %factor, rating = ?body.rating, "rating updated");

    Ok(Json(SessionView::new(id, assessment)))
}

async fn get_potential(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    with_session(&state, &id, |id, a| {
        let breakdown = a.breakdown()?;
        debug!(session = id, potential = %breakdown.potential, "potential computed");
        Ok(Json(breakdown).into_response())
    })
    .await
}

async fn get_vrio(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    with_session(&state, &id, |_, a| {
        let matrix = a.vrio()?;
        let rows: Vec<VrioFinding> = matrix.rows.iter().map(VrioFinding::from).collect();
        Ok(Json(json!({ "rows": rows })).into_response())
    })
    .await
}

async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    with_session(&state, &id, |_, a| Ok(Json(a.report()?).into_response())).await
}

async fn get_advice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    with_session(&state, &id, |_, a| {
        let score = a.score()?;
        Ok(Json(json!({ "potential": score, "advice": score.tier().advice() })).into_response())
    })
    .await
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn error_statuses() {
        let cases = [
            (ApiError::from(AssessmentError::InvalidRating { value: 9 }), 422),
            (
                ApiError::from(AssessmentError::IncompleteInput {
                    missing: vec![FactorId::Network],
                }),
                409,
            ),
            (
                ApiError::from(AssessmentError::UnknownFactor { name: "x".into() }),
                404,
            ),
            (ApiError::SessionNotFound("7".into()), 404),
            (ApiError::SessionLimit(1), 503),
            (ApiError::Unauthorized, 401),
            (ApiError::RateLimited, 429),
        ];
        for (error, status) in cases {
            assert_eq!(error.status().as_u16(), status, "{error}");
        }
    }

    #[test]
    fn bearer_and_header_keys() {
        let mut headers = HeaderMap::new();
        assert!(!key_matches(&headers, "secret"));

        headers.insert(API_KEY_HEADER, HeaderValue::from_static("secret"));
        assert!(key_matches(&headers, "secret"));
        assert!(!key_matches(&headers, "secret2"));

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer secret"));
        assert!(key_matches(&headers, "secret"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic secret"));
        assert!(!key_matches(&headers, "secret"));
    }

    #[test]
    fn idle_sessions_are_evicted() {
        let ttl = Duration::from_secs(60);
        let start = Instant::now();
        let mut sessions = Sessions::new();
        sessions.insert(1, SessionEntry::new(Assessment::default(), start));
        sessions.insert(2, SessionEntry::new(Assessment::default(), start + Duration::from_secs(30)));

        // Exactly at the TTL a session is still live.
        assert_eq!(evict_idle(&mut sessions, start + ttl, ttl), 0);

        let later = start + Duration::from_secs(61);
        assert_eq!(evict_idle(&mut sessions, later, ttl), 1);
        assert!(sessions.contains_key(&2));
        assert!(!sessions.contains_key(&1));
    }

    #[test]
    fn touching_an_idle_session_expires_it() {
        let mut sessions = Sessions::new();
        sessions.insert(1, SessionEntry::new(Assessment::default(), Instant::now()));
        std::thread::sleep(Duration::from_millis(5));

        assert!(touch_session(&mut sessions, 1, "1", Duration::from_secs(60)).is_ok());
        std::thread::sleep(Duration::from_millis(5));

        let result = touch_session(&mut sessions, 1, "1", Duration::ZERO);
        assert!(matches!(result, Err(ApiError::SessionNotFound(_))));
        assert!(sessions.is_empty());
    }

    #[test]
    fn session_ids_must_be_numeric() {
        assert!(matches!(parse_session_id("12"), Ok(12)));
        assert!(matches!(parse_session_id("abc"), Err(ApiError::SessionNotFound(_))));
    }
}
