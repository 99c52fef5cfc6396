//! Usage counters

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::utils::*;
use plangate_types::{
	prelude::*,
	store_adapter::ConsumeOutcome,
	types::{LimitStatus, UsageRecord},
};

pub(crate) async fn read_usage(
	db: &SqlitePool,
	user_id: UserId,
	permission_id: PermissionId,
) -> ClResult<u32> {
	let count = sqlx::query_scalar::<_, i64>(
		"SELECT count FROM usage WHERE user_id = ?1 AND permission_id = ?2",
	)
	.bind(user_id.0)
	.bind(permission_id.0)
	.fetch_optional(db)
	.await
	.map_err(db_err)?;

	to_u32(count.unwrap_or(0)).map_err(db_err)
}

pub(crate) async fn list_usage(db: &SqlitePool, user_id: UserId) -> ClResult<Vec<UsageRecord>> {
	let rows = sqlx::query(
		"SELECT u.permission_id, p.endpoint, u.count
		FROM usage u
		JOIN permissions p ON p.permission_id = u.permission_id
		WHERE u.user_id = ?1 AND u.count > 0
		ORDER BY u.permission_id",
	)
	.bind(user_id.0)
	.fetch_all(db)
	.await
	.map_err(db_err)?;

	collect_res(rows.iter().map(|row: &SqliteRow| {
		Ok(UsageRecord {
			permission_id: PermissionId(row.try_get("permission_id")?),
			endpoint: row.try_get("endpoint")?,
			count: to_u32(row.try_get("count")?)?,
		})
	}))
}

pub(crate) async fn list_limit_status(
	db: &SqlitePool,
	user_id: UserId,
	plan_id: PlanId,
) -> ClResult<Vec<LimitStatus>> {
	let rows = sqlx::query(
		r#"SELECT pp.permission_id, p.endpoint, coalesce(u.count, 0) AS used, pp."limit"
		FROM plan_permissions pp
		JOIN permissions p ON p.permission_id = pp.permission_id
		LEFT JOIN usage u ON u.user_id = ?1 AND u.permission_id = pp.permission_id
		WHERE pp.plan_id = ?2
		ORDER BY pp.permission_id"#,
	)
	.bind(user_id.0)
	.bind(plan_id.0)
	.fetch_all(db)
	.await
	.map_err(db_err)?;

	collect_res(rows.iter().map(|row: &SqliteRow| {
		Ok(LimitStatus {
			permission_id: PermissionId(row.try_get("permission_id")?),
			endpoint: row.try_get("endpoint")?,
			used: to_u32(row.try_get("used")?)?,
			limit: to_u32(row.try_get("limit")?)?,
		})
	}))
}

/// Conditionally increment a usage counter
///
/// A single upsert statement: the row is created with count 1 when absent
/// (and the limit is non-zero), or incremented only while `count < limit`.
/// When the guard fails no row is returned and nothing is written, so
/// concurrent callers can never push the counter past the limit.
pub(crate) async fn try_consume(
	db: &SqlitePool,
	user_id: UserId,
	permission_id: PermissionId,
	limit: u32,
) -> ClResult<ConsumeOutcome> {
	let count = sqlx::query_scalar::<_, i64>(
		"INSERT INTO usage (user_id, permission_id, count)
		SELECT ?1, ?2, 1 WHERE ?3 > 0
		ON CONFLICT(user_id, permission_id) DO UPDATE
			SET count = count + 1, updated_at = unixepoch()
			WHERE usage.count < ?3
		RETURNING count",
	)
	.bind(user_id.0)
	.bind(permission_id.0)
	.bind(i64::from(limit))
	.fetch_optional(db)
	.await
	.map_err(db_err)?;

	match count {
		Some(count) => Ok(ConsumeOutcome::Allowed { count: to_u32(count).map_err(db_err)? }),
		None => Ok(ConsumeOutcome::LimitReached),
	}
}

// vim: ts=4
