//! Permission management operations

use sqlx::{Row, SqlitePool, sqlite::SqliteRow};

use crate::utils::*;
use plangate_types::{prelude::*, store_adapter::*, types::Permission};

fn parse_permission_row(row: &SqliteRow) -> Result<Permission, sqlx::Error> {
	Ok(Permission {
		permission_id: PermissionId(row.try_get("permission_id")?),
		name: row.try_get("name")?,
		endpoint: row.try_get("endpoint")?,
		description: row.try_get("description")?,
	})
}

pub(crate) async fn create_permission(
	db: &SqlitePool,
	data: &CreatePermissionData<'_>,
) -> ClResult<PermissionId> {
	let permission_id = sqlx::query_scalar::<_, i64>(
		"INSERT INTO permissions (name, endpoint, description) VALUES (?1, ?2, ?3)
		RETURNING permission_id",
	)
	.bind(data.name)
	.bind(data.endpoint)
	.bind(data.description)
	.fetch_one(db)
	.await
	.map_err(|e| write_err(e, || "Permission name or endpoint must be unique".into()))?;

	Ok(PermissionId(permission_id))
}

pub(crate) async fn read_permission(
	db: &SqlitePool,
	permission_id: PermissionId,
) -> ClResult<Permission> {
	let res = sqlx::query(
		"SELECT permission_id, name, endpoint, description FROM permissions WHERE permission_id = ?1",
	)
	.bind(permission_id.0)
	.fetch_one(db)
	.await;

	map_res(res, parse_permission_row)
}

pub(crate) async fn read_permission_by_endpoint(
	db: &SqlitePool,
	endpoint: &str,
) -> ClResult<Permission> {
	let res = sqlx::query(
		"SELECT permission_id, name, endpoint, description FROM permissions WHERE endpoint = ?1",
	)
	.bind(endpoint)
	.fetch_one(db)
	.await;

	map_res(res, parse_permission_row)
}

pub(crate) async fn list_permissions(db: &SqlitePool) -> ClResult<Vec<Permission>> {
	let rows = sqlx::query(
		"SELECT permission_id, name, endpoint, description FROM permissions ORDER BY permission_id",
	)
	.fetch_all(db)
	.await
	.map_err(db_err)?;

	collect_res(rows.iter().map(parse_permission_row))
}

pub(crate) async fn update_permission(
	db: &SqlitePool,
	permission_id: PermissionId,
	data: &UpdatePermissionData<'_>,
) -> ClResult<()> {
	let mut query = sqlx::QueryBuilder::new("UPDATE permissions SET updated_at=unixepoch()");
	if let Some(name) = data.name {
		query.push(", name=").push_bind(name);
	}
	if let Some(endpoint) = data.endpoint {
		query.push(", endpoint=").push_bind(endpoint);
	}
	push_patch!(query, "description", &data.description);
	query.push(" WHERE permission_id=").push_bind(permission_id.0);

	let res = query
		.build()
		.execute(db)
		.await
		.map_err(|e| write_err(e, || "Permission name or endpoint must be unique".into()))?;

	if res.rows_affected() == 0 {
		return Err(Error::NotFound);
	}
	Ok(())
}

/// Delete a permission together with its plan links and usage counters
pub(crate) async fn delete_permission(db: &SqlitePool, permission_id: PermissionId) -> ClResult<()> {
	let mut tx = db.begin().await.map_err(db_err)?;

	sqlx::query("DELETE FROM plan_permissions WHERE permission_id = ?1")
		.bind(permission_id.0)
		.execute(&mut *tx)
		.await
		.map_err(db_err)?;
	sqlx::query("DELETE FROM usage WHERE permission_id = ?1")
		.bind(permission_id.0)
		.execute(&mut *tx)
		.await
		.map_err(db_err)?;
	let res = sqlx::query("DELETE FROM permissions WHERE permission_id = ?1")
		.bind(permission_id.0)
		.execute(&mut *tx)
		.await
		.map_err(db_err)?;

	tx.commit().await.map_err(db_err)?;

	if res.rows_affected() > 0 {
		info!("Deleted permission {}", permission_id);
	}
	Ok(())
}

// vim: ts=4
