//! Error type shared by every plangate crate.
//!
//! Access denials are not errors: the evaluator returns them as ordinary
//! decision values. The variants here are failed preconditions on
//! administrative operations, configuration problems and storage faults.

use axum::{
	Json,
	http::StatusCode,
	response::{IntoResponse, Response},
};

pub type ClResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	/// A referenced plan, permission or subscription does not exist
	NotFound,
	/// Uniqueness violation (duplicate plan name, permission name or endpoint, subscription)
	Conflict(String),
	/// Malformed input (negative limit, mismatched grant lists, unknown permission id)
	ValidationError(String),
	/// No permission is mapped to the requested endpoint
	PermissionUnknown,
	/// The backing store failed
	DbError,
	ConfigError(String),
	Internal(String),

	// externals
	Io(std::io::Error),
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::NotFound => write!(f, "not found"),
			Error::Conflict(msg) => write!(f, "conflict: {}", msg),
			Error::ValidationError(msg) => write!(f, "invalid argument: {}", msg),
			Error::PermissionUnknown => write!(f, "permission not found for endpoint"),
			Error::DbError => write!(f, "storage error"),
			Error::ConfigError(msg) => write!(f, "configuration error: {}", msg),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
			Error::Io(err) => write!(f, "io error: {}", err),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Error::Io(err) => Some(err),
			_ => None,
		}
	}
}

impl Error {
	/// HTTP status and stable error code of the variant
	pub fn status_and_code(&self) -> (StatusCode, &'static str) {
		match self {
			Error::NotFound => (StatusCode::NOT_FOUND, "E-NOT-FOUND"),
			Error::PermissionUnknown => (StatusCode::NOT_FOUND, "E-PERMISSION-UNKNOWN"),
			Error::Conflict(_) => (StatusCode::CONFLICT, "E-CONFLICT"),
			Error::ValidationError(_) => (StatusCode::BAD_REQUEST, "E-VALIDATION"),
			Error::DbError => (StatusCode::INTERNAL_SERVER_ERROR, "E-STORAGE"),
			Error::ConfigError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "E-CONFIG"),
			Error::Internal(_) | Error::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "E-INTERNAL"),
		}
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		let (status, code) = self.status_and_code();
		let message = if status.is_server_error() {
			tracing::error!("Request failed: {}", self);
			"Internal server error".to_string()
		} else {
			self.to_string()
		};

		let body = serde_json::json!({
			"error": {
				"code": code,
				"message": message,
			}
		});
		(status, Json(body)).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_status_mapping() {
		assert_eq!(Error::NotFound.status_and_code().0, StatusCode::NOT_FOUND);
		assert_eq!(Error::PermissionUnknown.status_and_code().0, StatusCode::NOT_FOUND);
		assert_eq!(Error::Conflict("x".into()).status_and_code().0, StatusCode::CONFLICT);
		assert_eq!(Error::ValidationError("x".into()).status_and_code().0, StatusCode::BAD_REQUEST);
		assert_eq!(Error::DbError.status_and_code().0, StatusCode::INTERNAL_SERVER_ERROR);
	}

	#[test]
	fn test_display() {
		assert_eq!(Error::PermissionUnknown.to_string(), "permission not found for endpoint");
		assert_eq!(
			Error::Conflict("Plan name must be unique".into()).to_string(),
			"conflict: Plan name must be unique"
		);
	}
}

// vim: ts=4
