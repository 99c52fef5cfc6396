//! Database schema initialization and migrations

use sqlx::{Sqlite, SqlitePool, Transaction};

/// Get the current database version from vars table
async fn get_db_version(tx: &mut Transaction<'_, Sqlite>) -> Result<i64, sqlx::Error> {
	let version = sqlx::query_scalar::<_, String>("SELECT value FROM vars WHERE key = 'db_version'")
		.fetch_optional(&mut **tx)
		.await?;
	Ok(version.and_then(|v| v.parse().ok()).unwrap_or(0))
}

/// Set the database version in vars table
async fn set_db_version(tx: &mut Transaction<'_, Sqlite>, version: i64) -> Result<(), sqlx::Error> {
	sqlx::query("INSERT OR REPLACE INTO vars (key, value) VALUES ('db_version', ?)")
		.bind(version.to_string())
		.execute(&mut **tx)
		.await?;
	Ok(())
}

// Current schema version - update this when adding new migrations
const CURRENT_DB_VERSION: i64 = 1;

/// Initialize the database schema and run migrations
pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	// Create vars table first (needed for version tracking)
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS vars (
		key text NOT NULL,
		value text NOT NULL,
		created_at INTEGER DEFAULT (unixepoch()),
		updated_at INTEGER DEFAULT (unixepoch()),
		PRIMARY KEY(key)
	)",
	)
	.execute(&mut *tx)
	.await?;

	let version = get_db_version(&mut tx).await?;

	// Permissions
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS permissions (
			permission_id integer NOT NULL,
			name text NOT NULL,
			endpoint text NOT NULL,
			description text,
			created_at INTEGER DEFAULT (unixepoch()),
			updated_at INTEGER DEFAULT (unixepoch()),
			PRIMARY KEY(permission_id)
		)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS idx_permissions_name ON permissions (name)")
		.execute(&mut *tx)
		.await?;
	sqlx::query(
		"CREATE UNIQUE INDEX IF NOT EXISTS idx_permissions_endpoint ON permissions (endpoint)",
	)
	.execute(&mut *tx)
	.await?;

	// Plans
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS plans (
			plan_id integer NOT NULL,
			name text NOT NULL,
			description text,
			created_at INTEGER DEFAULT (unixepoch()),
			updated_at INTEGER DEFAULT (unixepoch()),
			PRIMARY KEY(plan_id)
		)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS idx_plans_name ON plans (name)")
		.execute(&mut *tx)
		.await?;

	// Plan permissions
	sqlx::query(
		r#"CREATE TABLE IF NOT EXISTS plan_permissions (
			plan_id integer NOT NULL REFERENCES plans(plan_id) ON DELETE CASCADE,
			permission_id integer NOT NULL REFERENCES permissions(permission_id) ON DELETE CASCADE,
			"limit" integer NOT NULL CHECK ("limit" >= 0),
			PRIMARY KEY(plan_id, permission_id)
		)"#,
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query(
		"CREATE INDEX IF NOT EXISTS idx_plan_permissions_permission ON plan_permissions (permission_id)",
	)
	.execute(&mut *tx)
	.await?;

	// Subscriptions
	// plan_id is not a foreign key: deleting a plan leaves its subscriptions in place
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS subscriptions (
			user_id integer NOT NULL,
			plan_id integer NOT NULL,
			created_at INTEGER DEFAULT (unixepoch()),
			updated_at INTEGER DEFAULT (unixepoch()),
			PRIMARY KEY(user_id)
		)",
	)
	.execute(&mut *tx)
	.await?;

	// Usage
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS usage (
			user_id integer NOT NULL,
			permission_id integer NOT NULL REFERENCES permissions(permission_id) ON DELETE CASCADE,
			count integer NOT NULL DEFAULT 0 CHECK (count >= 0),
			updated_at INTEGER DEFAULT (unixepoch()),
			PRIMARY KEY(user_id, permission_id)
		)",
	)
	.execute(&mut *tx)
	.await?;

	if version < CURRENT_DB_VERSION {
		set_db_version(&mut tx, CURRENT_DB_VERSION).await?;
	}

	tx.commit().await?;

	Ok(())
}

// vim: ts=4
