//! Subscription handlers

use axum::{
	Json,
	extract::{Path, State},
	http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::prelude::*;
use crate::types::StatusResponse;
use plangate_types::types::{SubscriptionView, UsageRecord};

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
	pub user_id: UserId,
	pub plan_id: PlanId,
}

/// Body of `PUT /subscriptions/{user_id}`, the path decides the user
#[derive(Debug, Deserialize)]
pub struct ChangePlanRequest {
	pub plan_id: PlanId,
}

#[derive(Debug, Serialize)]
pub struct UsageResponse {
	pub user_id: UserId,
	pub usage: Vec<UsageRecord>,
}

/// POST /subscriptions - Subscribe a user to a plan
pub async fn post_subscription(
	State(app): State<App>,
	Json(req): Json<SubscribeRequest>,
) -> ClResult<(StatusCode, Json<StatusResponse>)> {
	info!(user_id = %req.user_id, plan_id = %req.plan_id, "POST /subscriptions - Subscribing");

	app.entitlements.directory.subscribe(req.user_id, req.plan_id).await?;

	Ok((StatusCode::OK, Json(StatusResponse::new("subscribed"))))
}

/// PUT /subscriptions/:user_id - Move a user to another plan
pub async fn put_subscription(
	State(app): State<App>,
	Path(user_id): Path<UserId>,
	Json(req): Json<ChangePlanRequest>,
) -> ClResult<(StatusCode, Json<StatusResponse>)> {
	info!(user_id = %user_id, plan_id = %req.plan_id, "PUT /subscriptions/:user_id - Changing plan");

	app.entitlements.directory.change_plan(user_id, req.plan_id).await?;

	Ok((StatusCode::OK, Json(StatusResponse::new("updated"))))
}

/// GET /subscriptions/{user_id} - The user's plan and its grants
pub async fn get_subscription(
	State(app): State<App>,
	Path(user_id): Path<UserId>,
) -> ClResult<(StatusCode, Json<SubscriptionView>)> {
	let view = app.entitlements.directory.describe(user_id).await?;
	Ok((StatusCode::OK, Json(view)))
}

/// GET /subscriptions/{user_id}/usage - Non-zero usage counters
pub async fn get_usage(
	State(app): State<App>,
	Path(user_id): Path<UserId>,
) -> ClResult<(StatusCode, Json<UsageResponse>)> {
	let usage = app.entitlements.evaluator.usage_report(user_id).await?;
	Ok((StatusCode::OK, Json(UsageResponse { user_id, usage })))
}

// vim: ts=4
