//! Entitlement evaluator.
//!
//! Resolution order for a (user, endpoint) pair:
//!
//! 1. endpoint to permission, `Error::PermissionUnknown` if unmapped
//! 2. user to active plan, denied with [`DenyReason::NoSubscription`]
//! 3. plan and permission to limit, denied with [`DenyReason::NotGranted`]
//! 4. usage against limit, denied with [`DenyReason::LimitReached`]
//!
//! [`Evaluator::check_access`] only reads. [`Evaluator::record_usage`] runs
//! steps 1 to 3 and hands step 4 together with the increment to the ledger.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::directory::SubscriptionDirectory;
use crate::ledger::QuotaLedger;
use crate::prelude::*;
use plangate_types::store_adapter::ConsumeOutcome;
use plangate_types::types::{LimitStatus, Permission, UsageRecord};

/// Why a call was denied
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
	NoSubscription,
	NotGranted,
	LimitReached,
}

impl DenyReason {
	/// Stable machine readable code
	pub fn code(self) -> &'static str {
		match self {
			DenyReason::NoSubscription => "no_subscription",
			DenyReason::NotGranted => "not_granted",
			DenyReason::LimitReached => "limit_reached",
		}
	}
}

impl std::fmt::Display for DenyReason {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			DenyReason::NoSubscription => write!(f, "No subscription"),
			DenyReason::NotGranted => write!(f, "Endpoint not in plan permissions"),
			DenyReason::LimitReached => write!(f, "Usage limit reached"),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
	Allowed,
	Denied(DenyReason),
}

impl Decision {
	pub fn is_allowed(self) -> bool {
		matches!(self, Decision::Allowed)
	}

	pub fn reason(self) -> Option<DenyReason> {
		match self {
			Decision::Allowed => None,
			Decision::Denied(reason) => Some(reason),
		}
	}
}

/// Outcome of steps 1 to 3
enum Resolved {
	Granted { permission: Permission, limit: u32 },
	Denied(DenyReason),
}

#[derive(Clone, Debug)]
pub struct Evaluator {
	catalog: Catalog,
	directory: SubscriptionDirectory,
	ledger: QuotaLedger,
}

impl Evaluator {
	pub fn new(catalog: Catalog, directory: SubscriptionDirectory, ledger: QuotaLedger) -> Self {
		Self { catalog, directory, ledger }
	}

	async fn resolve(&self, user_id: UserId, endpoint: &str) -> ClResult<Resolved> {
		let permission = match self.catalog.resolve_endpoint(endpoint).await {
			Ok(permission) => permission,
			Err(Error::NotFound) => return Err(Error::PermissionUnknown),
			Err(err) => return Err(err),
		};

		let Some(plan_id) = self.directory.active_plan_for(user_id).await? else {
			return Ok(Resolved::Denied(DenyReason::NoSubscription));
		};

		match self.catalog.limit_for(plan_id, permission.permission_id).await? {
			Some(limit) => Ok(Resolved::Granted { permission, limit }),
			None => Ok(Resolved::Denied(DenyReason::NotGranted)),
		}
	}

	/// Decides whether `user_id` may call `endpoint` without recording anything
	pub async fn check_access(&self, user_id: UserId, endpoint: &str) -> ClResult<Decision> {
		let decision = match self.resolve(user_id, endpoint).await? {
			Resolved::Denied(reason) => Decision::Denied(reason),
			Resolved::Granted { permission, limit } => {
				let used = self.ledger.used_count(user_id, permission.permission_id).await?;
				if used >= limit {
					Decision::Denied(DenyReason::LimitReached)
				} else {
					Decision::Allowed
				}
			}
		};

		debug!(user_id = %user_id, endpoint, ?decision, "Access checked");
		Ok(decision)
	}

	/// Checks access and, if allowed, counts the call in the same atomic step
	///
	/// A denied or failed call leaves every counter untouched.
	pub async fn record_usage(&self, user_id: UserId, endpoint: &str) -> ClResult<Decision> {
		let (permission, limit) = match self.resolve(user_id, endpoint).await? {
			Resolved::Granted { permission, limit } => (permission, limit),
			Resolved::Denied(reason) => {
				debug!(user_id = %user_id, endpoint, %reason, "Usage denied");
				return Ok(Decision::Denied(reason));
			}
		};

		match self.ledger.try_consume(user_id, permission.permission_id, limit).await? {
			ConsumeOutcome::Allowed { count } => {
				debug!(user_id = %user_id, endpoint, count, limit, "Usage recorded");
				Ok(Decision::Allowed)
			}
			ConsumeOutcome::LimitReached => {
				debug!(user_id = %user_id, endpoint, limit, "Usage limit reached");
				Ok(Decision::Denied(DenyReason::LimitReached))
			}
		}
	}

	/// Used and allowed counts for every grant of the user's plan
	pub async fn limit_status(&self, user_id: UserId) -> ClResult<Vec<LimitStatus>> {
		let plan_id = self.directory.active_plan_for(user_id).await?.ok_or(Error::NotFound)?;
		self.ledger.limit_status(user_id, plan_id).await
	}

	/// Non-zero counters of a subscribed user
	pub async fn usage_report(&self, user_id: UserId) -> ClResult<Vec<UsageRecord>> {
		if self.directory.active_plan_for(user_id).await?.is_none() {
			return Err(Error::NotFound);
		}
		self.ledger.usage_report(user_id).await
	}
}


// vim: ts=4
