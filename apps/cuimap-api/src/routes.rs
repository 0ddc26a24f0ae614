use axum::{
	Json, Router,
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::Instrument;
use uuid::Uuid;

use crate::state::AppState;
use cuimap_service::{Error as ServiceError, ResolvedConcept};

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
	pub phrases: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct NormalizeRequest {
	pub query: String,
}

#[derive(Debug, Serialize)]
pub struct ConceptsResponse {
	pub request_id: Uuid,
	pub concepts: Vec<ResolvedConcept>,
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
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::NotFound { message } =>
				Self::new(StatusCode::NOT_FOUND, "not_found", message),
			ServiceError::Provider { message } =>
				Self::new(StatusCode::BAD_GATEWAY, "provider_error", message),
			ServiceError::Storage { message } =>
				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", message),
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/resolve", post(resolve))
		.route("/v1/normalize", post(normalize))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn resolve(
	State(state): State<AppState>,
	Json(payload): Json<ResolveRequest>,
) -> Result<Json<ConceptsResponse>, ApiError> {
	let request_id = Uuid::new_v4();
	let span = tracing::info_span!("resolve", %request_id, phrases = payload.phrases.len());
	let concepts = state.service.resolve(&payload.phrases).instrument(span).await?;

	Ok(Json(ConceptsResponse { request_id, concepts }))
}

async fn normalize(
	State(state): State<AppState>,
	Json(payload): Json<NormalizeRequest>,
) -> Result<Json<ConceptsResponse>, ApiError> {
	let request_id = Uuid::new_v4();
	let span = tracing::info_span!("normalize", %request_id);
	let concepts = state.service.normalize_query(&payload.query).instrument(span).await?;

	Ok(Json(ConceptsResponse { request_id, concepts }))
}
