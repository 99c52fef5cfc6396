//! Subscription management operations

use sqlx::{Row, SqlitePool};

use crate::utils::*;
use plangate_types::{prelude::*, types::Subscription};

pub(crate) async fn create_subscription(
	db: &SqlitePool,
	user_id: UserId,
	plan_id: PlanId,
) -> ClResult<()> {
	sqlx::query("INSERT INTO subscriptions (user_id, plan_id) VALUES (?1, ?2)")
		.bind(user_id.0)
		.bind(plan_id.0)
		.execute(db)
		.await
		.map_err(|e| write_err(e, || "Subscription already exists".into()))?;

	Ok(())
}

pub(crate) async fn read_subscription(db: &SqlitePool, user_id: UserId) -> ClResult<Subscription> {
	let res = sqlx::query("SELECT user_id, plan_id FROM subscriptions WHERE user_id = ?1")
		.bind(user_id.0)
		.fetch_one(db)
		.await;

	map_res(res, |row| {
		Ok(Subscription {
			user_id: UserId(row.try_get("user_id")?),
			plan_id: PlanId(row.try_get("plan_id")?),
		})
	})
}

pub(crate) async fn update_subscription(
	db: &SqlitePool,
	user_id: UserId,
	plan_id: PlanId,
) -> ClResult<()> {
	let res = sqlx::query(
		"UPDATE subscriptions SET plan_id = ?2, updated_at = unixepoch() WHERE user_id = ?1",
	)
	.bind(user_id.0)
	.bind(plan_id.0)
	.execute(db)
	.await
	.map_err(db_err)?;

	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}
	Ok(())
}

// vim: ts=4
