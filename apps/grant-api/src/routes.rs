use std::time::{Duration, Instant};

use axum::{
	Json, Router,
	extract::{State, rejection::JsonRejection},
	http::{
		HeaderValue, Method, StatusCode,
		header::{AUTHORIZATION, CONTENT_TYPE},
	},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tower_http::cors::{AllowOrigin, CorsLayer};
use uuid::Uuid;

use crate::state::AppState;
use grant_domain::{context::SearchContext, extract};
use grant_providers::health;
use grant_service::GrantResult;

const CHAT_GRANTS: usize = 5;
const CORS_MAX_AGE: Duration = Duration::from_secs(3_600);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
	#[serde(default)]
	pub message: Option<String>,
	#[serde(default)]
	pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
	pub reply: String,
	pub grants: Vec<GrantResult>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub refinement_options: Option<Vec<String>>,
	#[serde(rename = "sessionId")]
	pub session_id: String,
	pub model: String,
	pub ms: u64,
	#[serde(with = "time::serde::rfc3339")]
	pub timestamp: OffsetDateTime,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
	pub context: SearchContext,
	pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
	pub grants: Vec<GrantResult>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
	pub status: &'static str,
	pub llm: bool,
	#[serde(with = "time::serde::rfc3339")]
	pub timestamp: OffsetDateTime,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}

	fn invalid_request(message: impl Into<String>) -> Self {
		Self::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message)
	}
}

impl From<JsonRejection> for ApiError {
	fn from(err: JsonRejection) -> Self {
		Self::invalid_request(err.body_text())
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}

pub fn router(state: AppState) -> Router {
	let cors = cors_layer(&state.service.cfg.service.cors_origins);

	Router::new()
		.route("/api/chat", post(chat))
		.route("/api/search", post(search))
		.route("/api/health", get(health_check))
		.layer(cors)
		.with_state(state)
}

pub fn cors_layer(origins: &[String]) -> CorsLayer {
	let mut allowed = Vec::with_capacity(origins.len());

	for origin in origins {
		match HeaderValue::from_str(origin) {
			Ok(value) => allowed.push(value),
			Err(err) => tracing::warn!(%origin, error = %err, "Ignoring invalid CORS origin."),
		}
	}

	CorsLayer::new()
		.allow_origin(AllowOrigin::list(allowed))
		.allow_methods([Method::GET, Method::POST, Method::OPTIONS])
		.allow_headers([CONTENT_TYPE, AUTHORIZATION])
		.max_age(CORS_MAX_AGE)
}

async fn chat(
	State(state): State<AppState>,
	payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
	let started = Instant::now();
	let Json(payload) = payload?;
	let Some(message) = payload.message.filter(|message| !message.trim().is_empty()) else {
		return Err(ApiError::invalid_request("message must be a non-empty string."));
	};
	let session_id = payload
		.session_id
		.filter(|session_id| !session_id.trim().is_empty())
		.unwrap_or_else(|| Uuid::new_v4().to_string());
	let ctx = state.sessions.merge(&session_id, extract::extract_context(&message));
	let mut grants = state.service.search(&ctx, &message).await;
	let answer = state.service.compose_reply(&message, &grants).await;

	grants.truncate(CHAT_GRANTS);

	tracing::info!(
		session_id = %session_id,
		grants = grants.len(),
		elapsed_ms = started.elapsed().as_millis() as u64,
		"Chat request answered."
	);

	Ok(Json(ChatResponse {
		reply: answer.reply,
		grants,
		refinement_options: answer.refinement_options,
		session_id,
		model: format!("{} + vector-search", state.service.cfg.providers.llm_reply.model),
		ms: started.elapsed().as_millis() as u64,
		timestamp: OffsetDateTime::now_utc(),
	}))
}

async fn search(
	State(state): State<AppState>,
	payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
	let Json(payload) = payload?;
	let grants = state.service.search(&payload.context, &payload.message).await;

	Ok(Json(SearchResponse { grants }))
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
	let llm = health::probe_llm(&state.service.cfg.providers.llm_reply).await;

	Json(HealthResponse { status: "ok", llm, timestamp: OffsetDateTime::now_utc() })
}
