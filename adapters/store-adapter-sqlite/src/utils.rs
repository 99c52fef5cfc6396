//! Shared utilities for the SQLite store adapter
//!
//! Error mapping helpers and the patch macro used across the domain modules.

use sqlx::sqlite::SqliteRow;

use plangate_types::prelude::*;

/// Applies a `Patch` field to an UPDATE statement
///
/// Expects at least one assignment to be pushed already.
macro_rules! push_patch {
	($query:expr, $field:literal, $patch:expr) => {{
		match $patch {
			Patch::Undefined => {}
			Patch::Null => {
				$query.push(concat!(", ", $field, "=NULL"));
			}
			Patch::Value(v) => {
				$query.push(concat!(", ", $field, "=")).push_bind(*v);
			}
		}
	}};
}

pub(crate) use push_patch;

/// Log database error for debugging
pub(crate) fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

/// Map a single-row query result, translating SQL errors to ClResult
pub(crate) fn map_res<T, F>(row: Result<SqliteRow, sqlx::Error>, f: F) -> ClResult<T>
where
	F: FnOnce(&SqliteRow) -> Result<T, sqlx::Error>,
{
	match row {
		Ok(ref row) => f(row).inspect_err(inspect).map_err(|_| Error::DbError),
		Err(sqlx::Error::RowNotFound) => Err(Error::NotFound),
		Err(err) => {
			inspect(&err);
			Err(Error::DbError)
		}
	}
}

/// Collect result iterator into a vector
pub(crate) fn collect_res<T>(
	iter: impl Iterator<Item = Result<T, sqlx::Error>>,
) -> ClResult<Vec<T>> {
	let mut items = Vec::new();
	for item in iter {
		items.push(item.inspect_err(inspect).map_err(|_| Error::DbError)?);
	}
	Ok(items)
}

/// Map a plain error to `Error::DbError` after logging it
pub(crate) fn db_err(err: sqlx::Error) -> Error {
	inspect(&err);
	Error::DbError
}

/// Map a failed write, turning constraint violations into caller errors
///
/// Unique and primary key violations become `Error::Conflict` with the message
/// produced by `conflict`, foreign key violations become `Error::ValidationError`.
pub(crate) fn write_err(err: sqlx::Error, conflict: impl FnOnce() -> String) -> Error {
	if let sqlx::Error::Database(ref db_err) = err {
		if db_err.is_unique_violation() || db_err.message().contains("UNIQUE") {
			return Error::Conflict(conflict());
		}
		if db_err.is_foreign_key_violation() {
			return Error::ValidationError("referenced permission does not exist".into());
		}
	}
	inspect(&err);
	Error::DbError
}

/// Convert a stored counter or limit to `u32`
pub(crate) fn to_u32(value: i64) -> Result<u32, sqlx::Error> {
	u32::try_from(value).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

// vim: ts=4
