//! Quota ledger: cumulative per-(user, permission) usage counters.
//!
//! Counters are created on first use and never reset. The only way to
//! increment one is [`QuotaLedger::try_consume`], which checks the limit and
//! increments in a single store operation.

use std::sync::Arc;

use crate::prelude::*;
use plangate_types::store_adapter::{ConsumeOutcome, StoreAdapter};
use plangate_types::types::{LimitStatus, UsageRecord};

#[derive(Clone, Debug)]
pub struct QuotaLedger {
	store: Arc<dyn StoreAdapter>,
}

impl QuotaLedger {
	pub fn new(store: Arc<dyn StoreAdapter>) -> Self {
		Self { store }
	}

	/// Current count, 0 when the counter does not exist yet
	pub async fn used_count(&self, user_id: UserId, permission_id: PermissionId) -> ClResult<u32> {
		self.store.read_usage(user_id, permission_id).await
	}

	pub async fn try_consume(
		&self,
		user_id: UserId,
		permission_id: PermissionId,
		limit: u32,
	) -> ClResult<ConsumeOutcome> {
		self.store.try_consume(user_id, permission_id, limit).await
	}

	/// All non-zero counters of a user
	pub async fn usage_report(&self, user_id: UserId) -> ClResult<Vec<UsageRecord>> {
		self.store.list_usage(user_id).await
	}

	/// Used and allowed counts for every grant of `plan_id`
	pub async fn limit_status(&self, user_id: UserId, plan_id: PlanId) -> ClResult<Vec<LimitStatus>> {
		self.store.list_limit_status(user_id, plan_id).await
	}
}

// vim: ts=4
