//! Permission management handlers

use axum::{
	Json,
	extract::{Path, State},
	http::StatusCode,
};
use serde::Deserialize;

use crate::prelude::*;
use crate::types::{IdResponse, StatusResponse};
use plangate_types::store_adapter::{CreatePermissionData, UpdatePermissionData};
use plangate_types::types::Permission;

#[derive(Debug, Deserialize)]
pub struct CreatePermissionRequest {
	pub name: String,
	pub endpoint: String,
	pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePermissionRequest {
	pub name: Option<String>,
	pub endpoint: Option<String>,
	#[serde(default)]
	pub description: Patch<String>,
}

/// POST /permissions - Register an endpoint
pub async fn post_permission(
	State(app): State<App>,
	Json(req): Json<CreatePermissionRequest>,
) -> ClResult<(StatusCode, Json<IdResponse<PermissionId>>)> {
	info!(name = %req.name, endpoint = %req.endpoint, "POST /permissions - Creating permission");

	let permission_id = app
		.entitlements
		.catalog
		.create_permission(&CreatePermissionData {
			name: &req.name,
			endpoint: &req.endpoint,
			description: req.description.as_deref(),
		})
		.await?;

	Ok((StatusCode::OK, Json(IdResponse { id: permission_id })))
}

/// PUT /permissions/:permission_id
pub async fn put_permission(
	State(app): State<App>,
	Path(permission_id): Path<PermissionId>,
	Json(req): Json<UpdatePermissionRequest>,
) -> ClResult<(StatusCode, Json<StatusResponse>)> {
	info!(permission_id = %permission_id, "PUT /permissions/:permission_id - Updating permission");

	app.entitlements
		.catalog
		.update_permission(
			permission_id,
			&UpdatePermissionData {
				name: req.name.as_deref(),
				endpoint: req.endpoint.as_deref(),
				description: req.description.as_deref(),
			},
		)
		.await?;

	Ok((StatusCode::OK, Json(StatusResponse::new("updated"))))
}

/// DELETE /permissions/{permission_id} - Remove a permission, its grants and its usage
pub async fn delete_permission(
	State(app): State<App>,
	Path(permission_id): Path<PermissionId>,
) -> ClResult<(StatusCode, Json<StatusResponse>)> {
	info!(permission_id = %permission_id, "DELETE /permissions/:permission_id - Deleting permission");

	app.entitlements.catalog.delete_permission(permission_id).await?;

	Ok((StatusCode::OK, Json(StatusResponse::new("deleted"))))
}

pub async fn get_permission(
	State(app): State<App>,
	Path(permission_id): Path<PermissionId>,
) -> ClResult<(StatusCode, Json<Permission>)> {
	let permission = app.entitlements.catalog.read_permission(permission_id).await?;
	Ok((StatusCode::OK, Json(permission)))
}

/// GET /permissions/by-endpoint/{endpoint}
pub async fn get_permission_by_endpoint(
	State(app): State<App>,
	Path(endpoint): Path<String>,
) -> ClResult<(StatusCode, Json<Permission>)> {
	let permission = app.entitlements.catalog.resolve_endpoint(&endpoint).await?;
	Ok((StatusCode::OK, Json(permission)))
}

pub async fn list_permissions(
	State(app): State<App>,
) -> ClResult<(StatusCode, Json<Vec<Permission>>)> {
	let permissions = app.entitlements.catalog.list_permissions().await?;
	Ok((StatusCode::OK, Json(permissions)))
}

// vim: ts=4
