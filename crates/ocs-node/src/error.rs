//! Maps the façade's unified [`OcsError`] onto HTTP status codes and a
//! small JSON error body, the same boundary-adapter role the teacher's
//! gateway gives its own `ApiError` (grounded here on
//! `qc-16-api-gateway::domain::error`, trimmed to this crate's plainer
//! REST surface instead of JSON-RPC error codes).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ocs_service::OcsError;
use serde::Serialize;

/// Newtype over [`OcsError`] so this crate can implement
/// [`IntoResponse`] for it (the orphan rule forbids doing so directly on
/// a foreign type).
pub struct ApiError(pub OcsError);

impl From<OcsError> for ApiError {
    fn from(e: OcsError) -> Self {
        ApiError(e)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    kind: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self.0 {
            OcsError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            OcsError::PolicyDenied(_) => (StatusCode::FORBIDDEN, "policy_denied"),
            OcsError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            OcsError::ChainConflict(_) => (StatusCode::CONFLICT, "chain_conflict"),
            OcsError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "timeout"),
            OcsError::CryptoFailure(_) => (StatusCode::UNPROCESSABLE_ENTITY, "crypto_failure"),
            OcsError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };
        let body = ErrorBody {
            kind,
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
