//! Plan management handlers

use axum::{
	Json,
	extract::{Path, State},
	http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_with::{OneOrMany, serde_as};

use crate::prelude::*;
use crate::types::{IdResponse, StatusResponse};
use plangate_core::Catalog;
use plangate_types::store_adapter::{CreatePlanData, UpdatePlanData};
use plangate_types::types::{Grant, Plan, PlanGrant};

/// Body of `POST /plans`
///
/// `permission_ids` and `limits` are parallel lists. A bare number is
/// accepted as a one element list.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct CreatePlanRequest {
	pub name: String,
	pub description: Option<String>,
	#[serde_as(as = "Option<OneOrMany<_>>")]
	pub permission_ids: Option<Vec<i64>>,
	#[serde_as(as = "Option<OneOrMany<_>>")]
	pub limits: Option<Vec<i64>>,
}

/// Body of `PUT /plans/{plan_id}`
///
/// Present `permission_ids` replace the whole grant set of the plan.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct UpdatePlanRequest {
	pub name: Option<String>,
	#[serde(default)]
	pub description: Patch<String>,
	#[serde_as(as = "Option<OneOrMany<_>>")]
	pub permission_ids: Option<Vec<i64>>,
	#[serde_as(as = "Option<OneOrMany<_>>")]
	pub limits: Option<Vec<i64>>,
}

/// A plan together with everything it grants
#[derive(Debug, Serialize)]
pub struct PlanView {
	#[serde(flatten)]
	pub plan: Plan,
	pub permissions: Vec<Grant>,
}

fn update_grants(req: &UpdatePlanRequest) -> ClResult<Option<Vec<PlanGrant>>> {
	match (req.permission_ids.as_deref(), req.limits.as_deref()) {
		(None, None) => Ok(None),
		(Some(ids), limits) => Ok(Some(Catalog::grants_from_lists(ids, limits.unwrap_or_default())?)),
		(None, Some(_)) => {
			Err(Error::ValidationError("limits given without permission_ids".into()))
		}
	}
}

/// POST /plans - Create a plan with its grants
pub async fn post_plan(
	State(app): State<App>,
	Json(req): Json<CreatePlanRequest>,
) -> ClResult<(StatusCode, Json<IdResponse<PlanId>>)> {
	info!(name = %req.name, "POST /plans - Creating plan");

	let grants = Catalog::grants_from_lists(
		req.permission_ids.as_deref().unwrap_or_default(),
		req.limits.as_deref().unwrap_or_default(),
	)?;
	let plan_id = app
		.entitlements
		.catalog
		.create_plan(&CreatePlanData {
			name: &req.name,
			description: req.description.as_deref(),
			grants: &grants,
		})
		.await?;

	Ok((StatusCode::OK, Json(IdResponse { id: plan_id })))
}

/// PUT /plans/:plan_id - Update plan metadata and optionally replace its grants
pub async fn put_plan(
	State(app): State<App>,
	Path(plan_id): Path<PlanId>,
	Json(req): Json<UpdatePlanRequest>,
) -> ClResult<(StatusCode, Json<StatusResponse>)> {
	info!(plan_id = %plan_id, "PUT /plans/:plan_id - Updating plan");

	let grants = update_grants(&req)?;
	app.entitlements
		.catalog
		.update_plan(
			plan_id,
			&UpdatePlanData {
				name: req.name.as_deref(),
				description: req.description.as_deref(),
				grants: grants.as_deref(),
			},
		)
		.await?;

	Ok((StatusCode::OK, Json(StatusResponse::new("updated"))))
}

/// DELETE /plans/{plan_id} - Delete a plan, succeeds for unknown ids too
pub async fn delete_plan(
	State(app): State<App>,
	Path(plan_id): Path<PlanId>,
) -> ClResult<(StatusCode, Json<StatusResponse>)> {
	info!(plan_id = %plan_id, "DELETE /plans/:plan_id - Deleting plan");

	app.entitlements.catalog.delete_plan(plan_id).await?;

	Ok((StatusCode::OK, Json(StatusResponse::new("deleted"))))
}

/// GET /plans/:plan_id
pub async fn get_plan(
	State(app): State<App>,
	Path(plan_id): Path<PlanId>,
) -> ClResult<(StatusCode, Json<PlanView>)> {
	let plan = app.entitlements.catalog.read_plan(plan_id).await?;
	let permissions = app.entitlements.catalog.grants_for(plan_id).await?;

	Ok((StatusCode::OK, Json(PlanView { plan, permissions })))
}

/// GET /plans
pub async fn list_plans(State(app): State<App>) -> ClResult<(StatusCode, Json<Vec<Plan>>)> {
	let plans = app.entitlements.catalog.list_plans().await?;
	Ok((StatusCode::OK, Json(plans)))
}

#[cfg(test)]
mod tests {
	#![allow(clippy::unwrap_used)]
	use super::*;

	#[test]
	fn test_create_request_accepts_scalars() {
		let req: CreatePlanRequest =
			serde_json::from_str(r#"{"name":"Basic","permission_ids":3,"limits":10}"#).unwrap();
		assert_eq!(req.permission_ids, Some(vec![3]));
		assert_eq!(req.limits, Some(vec![10]));
		assert_eq!(req.description, None);
	}

	#[test]
	fn test_update_grants() {
		let req: UpdatePlanRequest = serde_json::from_str(r#"{"name":"X"}"#).unwrap();
		assert!(update_grants(&req).unwrap().is_none());
		assert!(req.description.is_undefined());

		let req: UpdatePlanRequest =
			serde_json::from_str(r#"{"permission_ids":[1,2],"limits":[5,6]}"#).unwrap();
		assert_eq!(update_grants(&req).unwrap().map(|g| g.len()), Some(2));

		// Clearing the grant set
		let req: UpdatePlanRequest = serde_json::from_str(r#"{"permission_ids":[]}"#).unwrap();
		assert_eq!(update_grants(&req).unwrap(), Some(vec![]));

		let req: UpdatePlanRequest = serde_json::from_str(r#"{"limits":[1]}"#).unwrap();
		assert!(matches!(update_grants(&req), Err(Error::ValidationError(_))));

		let req: UpdatePlanRequest = serde_json::from_str(r#"{"permission_ids":[1]}"#).unwrap();
		assert!(matches!(update_grants(&req), Err(Error::ValidationError(_))));
	}
}

// vim: ts=4
