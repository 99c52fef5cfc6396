//! Mock service gateway
//!
//! Each configured service name doubles as the endpoint of a permission. A
//! call succeeds only when the evaluator grants and records it.

use axum::{
	Json,
	extract::{Path, Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::access::denied_response;
use crate::prelude::*;

#[derive(Debug, Deserialize)]
pub struct ServiceQuery {
	pub user_id: UserId,
}

#[derive(Debug, Serialize)]
pub struct ServiceResponse {
	pub service: String,
	pub status: &'static str,
}

/// GET /services/{service_name}?user_id= - Call a metered mock service
pub async fn call_service(
	State(app): State<App>,
	Path(service_name): Path<String>,
	Query(query): Query<ServiceQuery>,
) -> ClResult<Response> {
	info!(service = %service_name, user_id = %query.user_id, "GET /services/:service_name");

	if !app.has_service(&service_name) {
		return Err(Error::NotFound);
	}

	match app.entitlements.evaluator.record_usage(query.user_id, &service_name).await? {
		Decision::Allowed => Ok((
			StatusCode::OK,
			Json(ServiceResponse { service: service_name, status: "OK" }),
		)
			.into_response()),
		Decision::Denied(reason) => Ok(denied_response(StatusCode::FORBIDDEN, reason)),
	}
}

// vim: ts=4
