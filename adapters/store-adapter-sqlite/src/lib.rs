//! SQLite store adapter for plangate
//!
//! Persists the catalog (plans, permissions, plan grants), the subscription
//! directory and the usage ledger in a single SQLite database.
//!
//! # Module Organization
//!
//! - `schema` - Database initialization and migrations
//! - `utils` - Error mapping helpers
//! - `permission` - Permission CRUD
//! - `plan` - Plan CRUD and grant sets
//! - `subscription` - User subscriptions
//! - `usage` - Usage counters and the conditional increment

#![forbid(unsafe_code)]

mod permission;
mod plan;
mod schema;
mod subscription;
mod usage;
mod utils;

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};
use std::path::Path;

use plangate_types::{
	prelude::*,
	store_adapter::*,
	types::{Grant, LimitStatus, Permission, Plan, Subscription, UsageRecord},
};

const DB_FILE: &str = "plangate.db";

#[derive(Debug)]
pub struct StoreAdapterSqlite {
	db: SqlitePool,
}

impl StoreAdapterSqlite {
	/// Opens (or creates) `plangate.db` inside `path` and initializes the schema
	pub async fn new(path: impl AsRef<Path>) -> ClResult<Self> {
		let path = path.as_ref();
		tokio::fs::create_dir_all(path).await?;

		let opts = sqlite::SqliteConnectOptions::new()
			.filename(path.join(DB_FILE))
			.create_if_missing(true)
			.foreign_keys(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(|err| error!("DbError: {:#?}", err))
			.or(Err(Error::DbError))?;

		schema::init_db(&db)
			.await
			.inspect_err(|err| error!("DbError: {:#?}", err))
			.or(Err(Error::DbError))?;

		debug!("Store opened at {}", path.display());
		Ok(Self { db })
	}
}

#[async_trait]
impl StoreAdapter for StoreAdapterSqlite {
	// Permissions
	//*************
	async fn create_permission(&self, data: &CreatePermissionData<'_>) -> ClResult<PermissionId> {
		permission::create_permission(&self.db, data).await
	}

	async fn read_permission(&self, permission_id: PermissionId) -> ClResult<Permission> {
		permission::read_permission(&self.db, permission_id).await
	}

	async fn read_permission_by_endpoint(&self, endpoint: &str) -> ClResult<Permission> {
		permission::read_permission_by_endpoint(&self.db, endpoint).await
	}

	async fn list_permissions(&self) -> ClResult<Vec<Permission>> {
		permission::list_permissions(&self.db).await
	}

	async fn update_permission(
		&self,
		permission_id: PermissionId,
		data: &UpdatePermissionData<'_>,
	) -> ClResult<()> {
		permission::update_permission(&self.db, permission_id, data).await
	}

	async fn delete_permission(&self, permission_id: PermissionId) -> ClResult<()> {
		permission::delete_permission(&self.db, permission_id).await
	}

	// Plans
	//*******
	async fn create_plan(&self, data: &CreatePlanData<'_>) -> ClResult<PlanId> {
		plan::create_plan(&self.db, data).await
	}

	async fn read_plan(&self, plan_id: PlanId) -> ClResult<Plan> {
		plan::read_plan(&self.db, plan_id).await
	}

	async fn list_plans(&self) -> ClResult<Vec<Plan>> {
		plan::list_plans(&self.db).await
	}

	async fn update_plan(&self, plan_id: PlanId, data: &UpdatePlanData<'_>) -> ClResult<()> {
		plan::update_plan(&self.db, plan_id, data).await
	}

	async fn delete_plan(&self, plan_id: PlanId) -> ClResult<()> {
		plan::delete_plan(&self.db, plan_id).await
	}

	async fn list_grants(&self, plan_id: PlanId) -> ClResult<Vec<Grant>> {
		plan::list_grants(&self.db, plan_id).await
	}

	async fn read_limit(
		&self,
		plan_id: PlanId,
		permission_id: PermissionId,
	) -> ClResult<Option<u32>> {
		plan::read_limit(&self.db, plan_id, permission_id).await
	}

	// Subscriptions
	//***************
	async fn create_subscription(&self, user_id: UserId, plan_id: PlanId) -> ClResult<()> {
		subscription::create_subscription(&self.db, user_id, plan_id).await
	}

	async fn read_subscription(&self, user_id: UserId) -> ClResult<Subscription> {
		subscription::read_subscription(&self.db, user_id).await
	}

	async fn update_subscription(&self, user_id: UserId, plan_id: PlanId) -> ClResult<()> {
		subscription::update_subscription(&self.db, user_id, plan_id).await
	}

	// Usage
	//*******
	async fn read_usage(&self, user_id: UserId, permission_id: PermissionId) -> ClResult<u32> {
		usage::read_usage(&self.db, user_id, permission_id).await
	}

	async fn list_usage(&self, user_id: UserId) -> ClResult<Vec<UsageRecord>> {
		usage::list_usage(&self.db, user_id).await
	}

	async fn list_limit_status(
		&self,
		user_id: UserId,
		plan_id: PlanId,
	) -> ClResult<Vec<LimitStatus>> {
		usage::list_limit_status(&self.db, user_id, plan_id).await
	}

	async fn try_consume(
		&self,
		user_id: UserId,
		permission_id: PermissionId,
		limit: u32,
	) -> ClResult<ConsumeOutcome> {
		usage::try_consume(&self.db, user_id, permission_id, limit).await
	}

	async fn close(&self) {
		self.db.close().await;
		info!("Store closed");
	}
}

// vim: ts=4
