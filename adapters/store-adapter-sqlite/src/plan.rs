//! Plan and plan grant management operations

use sqlx::{Row, Sqlite, SqlitePool, Transaction, sqlite::SqliteRow};

use crate::utils::*;
use plangate_types::{
	prelude::*,
	store_adapter::*,
	types::{Grant, Plan, PlanGrant},
};

const PLAN_CONFLICT: &str = "Plan name must be unique";

fn parse_plan_row(row: &SqliteRow) -> Result<Plan, sqlx::Error> {
	Ok(Plan {
		plan_id: PlanId(row.try_get("plan_id")?),
		name: row.try_get("name")?,
		description: row.try_get("description")?,
	})
}

fn parse_grant_row(row: &SqliteRow) -> Result<Grant, sqlx::Error> {
	Ok(Grant {
		permission_id: PermissionId(row.try_get("permission_id")?),
		name: row.try_get("name")?,
		endpoint: row.try_get("endpoint")?,
		limit: to_u32(row.try_get("limit")?)?,
	})
}

/// Insert the grant set of a plan inside an open transaction
async fn insert_grants(
	tx: &mut Transaction<'_, Sqlite>,
	plan_id: PlanId,
	grants: &[PlanGrant],
) -> ClResult<()> {
	for grant in grants {
		sqlx::query(
			r#"INSERT INTO plan_permissions (plan_id, permission_id, "limit") VALUES (?1, ?2, ?3)"#,
		)
		.bind(plan_id.0)
		.bind(grant.permission_id.0)
		.bind(i64::from(grant.limit))
		.execute(&mut **tx)
		.await
		.map_err(|e| {
			write_err(e, || format!("permission {} granted twice", grant.permission_id))
		})?;
	}
	Ok(())
}

pub(crate) async fn create_plan(db: &SqlitePool, data: &CreatePlanData<'_>) -> ClResult<PlanId> {
	let mut tx = db.begin().await.map_err(db_err)?;

	let plan_id = sqlx::query_scalar::<_, i64>(
		"INSERT INTO plans (name, description) VALUES (?1, ?2) RETURNING plan_id",
	)
	.bind(data.name)
	.bind(data.description)
	.fetch_one(&mut *tx)
	.await
	.map_err(|e| write_err(e, || PLAN_CONFLICT.into()))?;
	let plan_id = PlanId(plan_id);

	insert_grants(&mut tx, plan_id, data.grants).await?;

	tx.commit().await.map_err(db_err)?;
	Ok(plan_id)
}

pub(crate) async fn read_plan(db: &SqlitePool, plan_id: PlanId) -> ClResult<Plan> {
	let res = sqlx::query("SELECT plan_id, name, description FROM plans WHERE plan_id = ?1")
		.bind(plan_id.0)
		.fetch_one(db)
		.await;

	map_res(res, parse_plan_row)
}

pub(crate) async fn list_plans(db: &SqlitePool) -> ClResult<Vec<Plan>> {
	let rows = sqlx::query("SELECT plan_id, name, description FROM plans ORDER BY plan_id")
		.fetch_all(db)
		.await
		.map_err(db_err)?;

	collect_res(rows.iter().map(parse_plan_row))
}

/// Update a plan, replacing its full grant set when `data.grants` is present
pub(crate) async fn update_plan(
	db: &SqlitePool,
	plan_id: PlanId,
	data: &UpdatePlanData<'_>,
) -> ClResult<()> {
	let mut tx = db.begin().await.map_err(db_err)?;

	let mut query = sqlx::QueryBuilder::new("UPDATE plans SET updated_at=unixepoch()");
	if let Some(name) = data.name {
		query.push(", name=").push_bind(name);
	}
	push_patch!(query, "description", &data.description);
	query.push(" WHERE plan_id=").push_bind(plan_id.0);

	let res = query
		.build()
		.execute(&mut *tx)
		.await
		.map_err(|e| write_err(e, || PLAN_CONFLICT.into()))?;
	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}

	if let Some(grants) = data.grants {
		sqlx::query("DELETE FROM plan_permissions WHERE plan_id = ?1")
			.bind(plan_id.0)
			.execute(&mut *tx)
			.await
			.map_err(db_err)?;
		insert_grants(&mut tx, plan_id, grants).await?;
	}

	tx.commit().await.map_err(db_err)?;
	Ok(())
}

pub(crate) async fn delete_plan(db: &SqlitePool, plan_id: PlanId) -> ClResult<()> {
	let mut tx = db.begin().await.map_err(db_err)?;

	sqlx::query("DELETE FROM plan_permissions WHERE plan_id = ?1")
		.bind(plan_id.0)
		.execute(&mut *tx)
		.await
		.map_err(db_err)?;
	let res = sqlx::query("DELETE FROM plans WHERE plan_id = ?1")
		.bind(plan_id.0)
		.execute(&mut *tx)
		.await
		.map_err(db_err)?;

	tx.commit().await.map_err(db_err)?;

	if res.rows_affected() > 0 {
		info!("Deleted plan {}", plan_id);
	}
	Ok(())
}

pub(crate) async fn list_grants(db: &SqlitePool, plan_id: PlanId) -> ClResult<Vec<Grant>> {
	let rows = sqlx::query(
		r#"SELECT pp.permission_id, p.name, p.endpoint, pp."limit"
		FROM plan_permissions pp
		JOIN permissions p ON p.permission_id = pp.permission_id
		WHERE pp.plan_id = ?1
		ORDER BY pp.permission_id"#,
	)
	.bind(plan_id.0)
	.fetch_all(db)
	.await
	.map_err(db_err)?;

	collect_res(rows.iter().map(parse_grant_row))
}

pub(crate) async fn read_limit(
	db: &SqlitePool,
	plan_id: PlanId,
	permission_id: PermissionId,
) -> ClResult<Option<u32>> {
	let limit = sqlx::query_scalar::<_, i64>(
		r#"SELECT "limit" FROM plan_permissions WHERE plan_id = ?1 AND permission_id = ?2"#,
	)
	.bind(plan_id.0)
	.bind(permission_id.0)
	.fetch_optional(db)
	.await
	.map_err(db_err)?;

	limit.map(to_u32).transpose().map_err(db_err)
}

// vim: ts=4
