//! Catalog of permissions and plans.
//!
//! A permission maps a unique endpoint string to a capability. A plan bundles
//! permission grants, each with a cumulative call limit. Updating a plan's
//! grants replaces the whole set.

use std::collections::HashSet;
use std::sync::Arc;

use crate::prelude::*;
use plangate_types::store_adapter::{
	CreatePermissionData, CreatePlanData, StoreAdapter, UpdatePermissionData, UpdatePlanData,
};
use plangate_types::types::{Grant, Permission, Plan, PlanGrant};

#[derive(Clone, Debug)]
pub struct Catalog {
	store: Arc<dyn StoreAdapter>,
}

fn validate_name(field: &str, value: &str) -> ClResult<()> {
	if value.trim().is_empty() {
		return Err(Error::ValidationError(format!("{} must not be empty", field)));
	}
	Ok(())
}

impl Catalog {
	pub fn new(store: Arc<dyn StoreAdapter>) -> Self {
		Self { store }
	}

	/// Builds a grant sequence from the parallel id and limit lists of the wire format
	pub fn grants_from_lists(permission_ids: &[i64], limits: &[i64]) -> ClResult<Vec<PlanGrant>> {
		if permission_ids.len() != limits.len() {
			return Err(Error::ValidationError(
				"Permissions and limits lists must have the same length".into(),
			));
		}

		permission_ids
			.iter()
			.zip(limits)
			.map(|(&permission_id, &limit)| -> ClResult<PlanGrant> {
				let limit = u32::try_from(limit).map_err(|_| {
					Error::ValidationError(format!(
						"limit {} for permission {} is out of range",
						limit, permission_id
					))
				})?;
				Ok(PlanGrant { permission_id: PermissionId(permission_id), limit })
			})
			.collect()
	}

	/// Rejects repeated permission ids and ids that name no permission
	async fn validate_grants(&self, grants: &[PlanGrant]) -> ClResult<()> {
		let mut seen = HashSet::with_capacity(grants.len());
		for grant in grants {
			if !seen.insert(grant.permission_id) {
				return Err(Error::ValidationError(format!(
					"permission {} is listed more than once",
					grant.permission_id
				)));
			}
			match self.store.read_permission(grant.permission_id).await {
				Ok(_) => {}
				Err(Error::NotFound) => {
					return Err(Error::ValidationError(format!(
						"permission {} does not exist",
						grant.permission_id
					)));
				}
				Err(err) => return Err(err),
			}
		}
		Ok(())
	}

	// Plans
	//*******
	pub async fn create_plan(&self, data: &CreatePlanData<'_>) -> ClResult<PlanId> {
		validate_name("plan name", data.name)?;
		self.validate_grants(data.grants).await?;

		let plan_id = self.store.create_plan(data).await?;
		info!(plan_id = %plan_id, name = data.name, grants = data.grants.len(), "Plan created");
		Ok(plan_id)
	}

	pub async fn update_plan(&self, plan_id: PlanId, data: &UpdatePlanData<'_>) -> ClResult<()> {
		if let Some(name) = data.name {
			validate_name("plan name", name)?;
		}
		if let Some(grants) = data.grants {
			self.validate_grants(grants).await?;
		}

		self.store.update_plan(plan_id, data).await?;
		info!(plan_id = %plan_id, grants_replaced = data.grants.is_some(), "Plan updated");
		Ok(())
	}

	/// Removes a plan and its grants. Deleting an unknown plan succeeds.
	pub async fn delete_plan(&self, plan_id: PlanId) -> ClResult<()> {
		self.store.delete_plan(plan_id).await
	}

	pub async fn read_plan(&self, plan_id: PlanId) -> ClResult<Plan> {
		self.store.read_plan(plan_id).await
	}

	pub async fn list_plans(&self) -> ClResult<Vec<Plan>> {
		self.store.list_plans().await
	}

	/// Every permission granted by a plan, with its limit
	pub async fn grants_for(&self, plan_id: PlanId) -> ClResult<Vec<Grant>> {
		self.store.list_grants(plan_id).await
	}

	// Permissions
	//*************
	pub async fn create_permission(&self, data: &CreatePermissionData<'_>) -> ClResult<PermissionId> {
		validate_name("permission name", data.name)?;
		validate_name("endpoint", data.endpoint)?;

		let permission_id = self.store.create_permission(data).await?;
		info!(permission_id = %permission_id, endpoint = data.endpoint, "Permission created");
		Ok(permission_id)
	}

	pub async fn update_permission(
		&self,
		permission_id: PermissionId,
		data: &UpdatePermissionData<'_>,
	) -> ClResult<()> {
		if let Some(name) = data.name {
			validate_name("permission name", name)?;
		}
		if let Some(endpoint) = data.endpoint {
			validate_name("endpoint", endpoint)?;
		}

		self.store.update_permission(permission_id, data).await
	}

	/// Removes a permission, its plan links and its usage counters
	pub async fn delete_permission(&self, permission_id: PermissionId) -> ClResult<()> {
		self.store.delete_permission(permission_id).await
	}

	pub async fn read_permission(&self, permission_id: PermissionId) -> ClResult<Permission> {
		self.store.read_permission(permission_id).await
	}

	pub async fn list_permissions(&self) -> ClResult<Vec<Permission>> {
		self.store.list_permissions().await
	}

	/// Looks up the permission mapped to `endpoint`, `Error::NotFound` if none
	pub async fn resolve_endpoint(&self, endpoint: &str) -> ClResult<Permission> {
		self.store.read_permission_by_endpoint(endpoint).await
	}

	pub async fn limit_for(
		&self,
		plan_id: PlanId,
		permission_id: PermissionId,
	) -> ClResult<Option<u32>> {
		self.store.read_limit(plan_id, permission_id).await
	}
}

#[cfg(test)]
mod tests {
	#![allow(clippy::unwrap_used)]
	use super::*;

	#[test]
	fn test_grants_from_lists_keeps_order() {
		let grants = Catalog::grants_from_lists(&[3, 1], &[10, 0]).unwrap();
		assert_eq!(
			grants,
			vec![
				PlanGrant { permission_id: PermissionId(3), limit: 10 },
				PlanGrant { permission_id: PermissionId(1), limit: 0 },
			]
		);
	}

	#[test]
	fn test_grants_from_lists_length_mismatch() {
		let res = Catalog::grants_from_lists(&[1, 2], &[5]);
		assert!(matches!(res, Err(Error::ValidationError(_))));
	}

	#[test]
	fn test_grants_from_lists_negative_limit() {
		let res = Catalog::grants_from_lists(&[1], &[-1]);
		assert!(matches!(res, Err(Error::ValidationError(_))));
	}

	#[test]
	fn test_grants_from_lists_empty() {
		assert!(Catalog::grants_from_lists(&[], &[]).unwrap().is_empty());
	}

	#[test]
	fn test_validate_name() {
		assert!(validate_name("plan name", "Basic").is_ok());
		assert!(matches!(validate_name("plan name", "  "), Err(Error::ValidationError(_))));
	}
}

// vim: ts=4
