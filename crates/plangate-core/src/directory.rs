//! Subscription directory: the one active plan of each user.

use std::sync::Arc;

use crate::prelude::*;
use plangate_types::store_adapter::StoreAdapter;
use plangate_types::types::SubscriptionView;

#[derive(Clone, Debug)]
pub struct SubscriptionDirectory {
	store: Arc<dyn StoreAdapter>,
}

impl SubscriptionDirectory {
	pub fn new(store: Arc<dyn StoreAdapter>) -> Self {
		Self { store }
	}

	/// Subscribes a user to a plan
	///
	/// `Error::NotFound` if the plan does not exist, `Error::Conflict` if the
	/// user already has a subscription (the existing one is kept).
	pub async fn subscribe(&self, user_id: UserId, plan_id: PlanId) -> ClResult<()> {
		self.store.read_plan(plan_id).await?;
		self.store.create_subscription(user_id, plan_id).await?;
		info!(user_id = %user_id, plan_id = %plan_id, "User subscribed");
		Ok(())
	}

	/// Moves an existing subscription to another plan. Usage counters are kept.
	pub async fn change_plan(&self, user_id: UserId, plan_id: PlanId) -> ClResult<()> {
		self.store.read_plan(plan_id).await?;
		self.store.update_subscription(user_id, plan_id).await?;
		info!(user_id = %user_id, plan_id = %plan_id, "Subscription changed");
		Ok(())
	}

	pub async fn active_plan_for(&self, user_id: UserId) -> ClResult<Option<PlanId>> {
		match self.store.read_subscription(user_id).await {
			Ok(sub) => Ok(Some(sub.plan_id)),
			Err(Error::NotFound) => Ok(None),
			Err(err) => Err(err),
		}
	}

	/// The user's plan with every permission it grants
	///
	/// `Error::NotFound` if the user has no subscription or the subscribed
	/// plan has been deleted since.
	pub async fn describe(&self, user_id: UserId) -> ClResult<SubscriptionView> {
		let sub = self.store.read_subscription(user_id).await?;
		let plan = self.store.read_plan(sub.plan_id).await.inspect_err(|err| {
			if matches!(err, Error::NotFound) {
				warn!(user_id = %user_id, plan_id = %sub.plan_id, "Subscription refers to a deleted plan");
			}
		})?;
		let permissions = self.store.list_grants(sub.plan_id).await?;

		Ok(SubscriptionView { user_id, plan, permissions })
	}
}

// vim: ts=4
