//! Adapter that persists the catalog, the subscription directory and the quota ledger.
//!
//! Every mutating method is all-or-nothing: an implementation must apply a
//! multi-row change (a plan together with its grant set, a permission
//! together with its links) inside a single store transaction.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::prelude::*;
use crate::types::{
	Grant, LimitStatus, Permission, PermissionId, Plan, PlanGrant, PlanId, Subscription, UsageRecord,
	UserId,
};

/// Data needed to create a new permission
#[derive(Debug)]
pub struct CreatePermissionData<'a> {
	pub name: &'a str,
	pub endpoint: &'a str,
	pub description: Option<&'a str>,
}

/// Data to update an existing permission
#[derive(Debug, Default)]
pub struct UpdatePermissionData<'a> {
	pub name: Option<&'a str>,
	pub endpoint: Option<&'a str>,
	pub description: Patch<&'a str>,
}

/// Data needed to create a new plan
#[derive(Debug)]
pub struct CreatePlanData<'a> {
	pub name: &'a str,
	pub description: Option<&'a str>,
	pub grants: &'a [PlanGrant],
}

/// Data to update an existing plan
///
/// `grants: Some(..)` replaces the full grant set of the plan.
#[derive(Debug, Default)]
pub struct UpdatePlanData<'a> {
	pub name: Option<&'a str>,
	pub description: Patch<&'a str>,
	pub grants: Option<&'a [PlanGrant]>,
}

/// Result of a conditional increment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsumeOutcome {
	/// The counter was below the limit and has been incremented to `count`
	Allowed { count: u32 },
	/// The counter already reached the limit; nothing was written
	LimitReached,
}

/// A plangate store adapter
///
/// The core components receive an `Arc<dyn StoreAdapter>` at construction
/// time and never reach storage any other way.
#[async_trait]
pub trait StoreAdapter: Debug + Send + Sync {
	// Permissions
	async fn create_permission(&self, data: &CreatePermissionData<'_>) -> ClResult<PermissionId>;
	async fn read_permission(&self, permission_id: PermissionId) -> ClResult<Permission>;
	/// Reads the permission mapped to an endpoint, `Error::NotFound` if none
	async fn read_permission_by_endpoint(&self, endpoint: &str) -> ClResult<Permission>;
	async fn list_permissions(&self) -> ClResult<Vec<Permission>>;
	async fn update_permission(
		&self,
		permission_id: PermissionId,
		data: &UpdatePermissionData<'_>,
	) -> ClResult<()>;
	/// Deletes a permission with its plan links and usage counters. No error if absent.
	async fn delete_permission(&self, permission_id: PermissionId) -> ClResult<()>;

	// Plans
	async fn create_plan(&self, data: &CreatePlanData<'_>) -> ClResult<PlanId>;
	async fn read_plan(&self, plan_id: PlanId) -> ClResult<Plan>;
	async fn list_plans(&self) -> ClResult<Vec<Plan>>;
	async fn update_plan(&self, plan_id: PlanId, data: &UpdatePlanData<'_>) -> ClResult<()>;
	/// Deletes a plan with its links. No error if absent.
	async fn delete_plan(&self, plan_id: PlanId) -> ClResult<()>;
	async fn list_grants(&self, plan_id: PlanId) -> ClResult<Vec<Grant>>;
	async fn read_limit(&self, plan_id: PlanId, permission_id: PermissionId)
	-> ClResult<Option<u32>>;

	// Subscriptions
	/// Creates a subscription, `Error::Conflict` if the user already has one
	async fn create_subscription(&self, user_id: UserId, plan_id: PlanId) -> ClResult<()>;
	async fn read_subscription(&self, user_id: UserId) -> ClResult<Subscription>;
	/// Points an existing subscription to another plan, `Error::NotFound` if none
	async fn update_subscription(&self, user_id: UserId, plan_id: PlanId) -> ClResult<()>;

	// Usage
	async fn read_usage(&self, user_id: UserId, permission_id: PermissionId) -> ClResult<u32>;
	/// Lists every non-zero counter of a user
	async fn list_usage(&self, user_id: UserId) -> ClResult<Vec<UsageRecord>>;
	/// Lists used/limit pairs for every grant of a plan
	async fn list_limit_status(&self, user_id: UserId, plan_id: PlanId)
	-> ClResult<Vec<LimitStatus>>;
	/// Increments the counter if and only if it is below `limit`, as one indivisible step
	async fn try_consume(
		&self,
		user_id: UserId,
		permission_id: PermissionId,
		limit: u32,
	) -> ClResult<ConsumeOutcome>;

	/// Releases the underlying connections
	async fn close(&self);
}

// vim: ts=4
