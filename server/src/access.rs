//! Access checks, usage recording and limit status

use axum::{
	Json,
	extract::{Path, State},
	http::StatusCode,
	response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::prelude::*;
use crate::types::{StatusResponse, UsageRequest};
use plangate_types::types::LimitStatus;

#[derive(Debug, Serialize)]
pub struct AccessResponse {
	pub user_id: UserId,
	pub endpoint: String,
	pub access: bool,
	pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LimitStatusResponse {
	pub user_id: UserId,
	pub limits: Vec<LimitStatus>,
}

/// Error response for a denied call
///
/// Shaped like the error responses, with the reason text as message.
pub fn denied_response(status: StatusCode, reason: DenyReason) -> Response {
	let code = match reason {
		DenyReason::NoSubscription => "E-NO-SUBSCRIPTION",
		DenyReason::NotGranted => "E-NOT-GRANTED",
		DenyReason::LimitReached => "E-LIMIT-REACHED",
	};
	let body = serde_json::json!({
		"error": {
			"code": code,
			"message": reason.to_string(),
		}
	});
	(status, Json(body)).into_response()
}

/// GET /access/{user_id}/{endpoint} - Read-only access check
pub async fn get_access(
	State(app): State<App>,
	Path((user_id, endpoint)): Path<(UserId, String)>,
) -> ClResult<(StatusCode, Json<AccessResponse>)> {
	let decision = app.entitlements.evaluator.check_access(user_id, &endpoint).await?;

	Ok((
		StatusCode::OK,
		Json(AccessResponse {
			user_id,
			endpoint,
			access: decision.is_allowed(),
			reason: decision.reason().map(|r| r.to_string()),
		}),
	))
}

/// POST /usage/{user_id} - Count one call if the user may make it
///
/// Denied without subscription answers 404, any other denial 403.
pub async fn post_usage(
	State(app): State<App>,
	Path(user_id): Path<UserId>,
	Json(req): Json<UsageRequest>,
) -> ClResult<Response> {
	info!(user_id = %user_id, endpoint = %req.endpoint, "POST /usage/:user_id - Recording usage");

	match app.entitlements.evaluator.record_usage(user_id, &req.endpoint).await? {
		Decision::Allowed => {
			Ok((StatusCode::OK, Json(StatusResponse::new("recorded"))).into_response())
		}
		Decision::Denied(reason @ DenyReason::NoSubscription) => {
			Ok(denied_response(StatusCode::NOT_FOUND, reason))
		}
		Decision::Denied(reason) => Ok(denied_response(StatusCode::FORBIDDEN, reason)),
	}
}

/// GET /usage/:user_id/limit - Used and allowed counts of the user's plan
pub async fn get_limit_status(
	State(app): State<App>,
	Path(user_id): Path<UserId>,
) -> ClResult<(StatusCode, Json<LimitStatusResponse>)> {
	let limits = app.entitlements.evaluator.limit_status(user_id).await?;
	Ok((StatusCode::OK, Json(LimitStatusResponse { user_id, limits })))
}

// vim: ts=4
