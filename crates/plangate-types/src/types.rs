//! Common types used throughout plangate.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_with::skip_serializing_none;

// Ids //
//*****//
macro_rules! id_type {
	($(#[$meta:meta])* $name:ident) => {
		$(#[$meta])*
		#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(pub i64);

		impl std::fmt::Display for $name {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				write!(f, "{}", self.0)
			}
		}
	};
}

id_type!(
	/// Caller supplied user identity. Trusted as given.
	UserId
);
id_type!(PlanId);
id_type!(PermissionId);

// Patch //
//*******//
/// Three-state field for partial updates.
///
/// A missing field (with `#[serde(default)]`) is `Undefined`, an explicit
/// `null` is `Null` and anything else is `Value`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Patch<T> {
	#[default]
	Undefined,
	Null,
	Value(T),
}

impl<T> Patch<T> {
	pub fn is_undefined(&self) -> bool {
		matches!(self, Patch::Undefined)
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Patch::Null)
	}

	pub fn is_value(&self) -> bool {
		matches!(self, Patch::Value(_))
	}

	pub fn value(&self) -> Option<&T> {
		match self {
			Patch::Value(v) => Some(v),
			_ => None,
		}
	}

	/// `None` if undefined, `Some(None)` if null, `Some(Some(v))` otherwise
	pub fn as_option(&self) -> Option<Option<&T>> {
		match self {
			Patch::Undefined => None,
			Patch::Null => Some(None),
			Patch::Value(v) => Some(Some(v)),
		}
	}

	pub fn as_deref(&self) -> Patch<&T::Target>
	where
		T: std::ops::Deref,
	{
		match self {
			Patch::Undefined => Patch::Undefined,
			Patch::Null => Patch::Null,
			Patch::Value(v) => Patch::Value(v.deref()),
		}
	}

	pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Patch<U> {
		match self {
			Patch::Undefined => Patch::Undefined,
			Patch::Null => Patch::Null,
			Patch::Value(v) => Patch::Value(f(v)),
		}
	}
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		Ok(match Option::<T>::deserialize(deserializer)? {
			Some(v) => Patch::Value(v),
			None => Patch::Null,
		})
	}
}

impl<T: Serialize> Serialize for Patch<T> {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		match self {
			Patch::Value(v) => v.serialize(serializer),
			_ => serializer.serialize_none(),
		}
	}
}

// Catalog records //
//*****************//
/// An addressable capability, looked up by its unique endpoint string
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
	#[serde(rename = "id")]
	pub permission_id: PermissionId,
	pub name: Box<str>,
	pub endpoint: Box<str>,
	pub description: Option<Box<str>>,
}

/// A named bundle of permission grants
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
	#[serde(rename = "id")]
	pub plan_id: PlanId,
	pub name: Box<str>,
	pub description: Option<Box<str>>,
}

/// One (permission, limit) pair of a plan, as stored
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanGrant {
	pub permission_id: PermissionId,
	pub limit: u32,
}

/// A plan grant joined with its permission
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Grant {
	pub permission_id: PermissionId,
	pub name: Box<str>,
	pub endpoint: Box<str>,
	pub limit: u32,
}

// Directory records //
//*******************//
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
	pub user_id: UserId,
	pub plan_id: PlanId,
}

/// Read-only projection of a user's plan and everything it grants
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SubscriptionView {
	pub user_id: UserId,
	pub plan: Plan,
	pub permissions: Vec<Grant>,
}

// Ledger records //
//****************//
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UsageRecord {
	pub permission_id: PermissionId,
	pub endpoint: Box<str>,
	pub count: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LimitStatus {
	pub permission_id: PermissionId,
	pub endpoint: Box<str>,
	pub used: u32,
	pub limit: u32,
}

#[cfg(test)]
mod tests {
	#![allow(clippy::unwrap_used)]
	use super::*;

	#[derive(Debug, Deserialize)]
	struct PatchHolder {
		#[serde(default)]
		description: Patch<String>,
	}

	#[test]
	fn test_patch_states() {
		let undefined: PatchHolder = serde_json::from_str("{}").unwrap();
		assert!(undefined.description.is_undefined());

		let null: PatchHolder = serde_json::from_str(r#"{"description": null}"#).unwrap();
		assert!(null.description.is_null());
		assert_eq!(null.description.as_option(), Some(None));

		let value: PatchHolder = serde_json::from_str(r#"{"description": "Pro"}"#).unwrap();
		assert_eq!(value.description.value().map(String::as_str), Some("Pro"));
		assert_eq!(value.description.as_deref(), Patch::Value("Pro"));
	}

	#[test]
	fn test_ids_are_transparent() {
		let id: PlanId = serde_json::from_str("42").unwrap();
		assert_eq!(id, PlanId(42));
		assert_eq!(serde_json::to_string(&UserId(7)).unwrap(), "7");
		assert_eq!(PermissionId(3).to_string(), "3");
	}

	#[test]
	fn test_permission_serializes_id_field() {
		let perm = Permission {
			permission_id: PermissionId(1),
			name: "p".into(),
			endpoint: "svc1".into(),
			description: None,
		};
		let json = serde_json::to_value(&perm).unwrap();
		assert_eq!(json["id"], 1);
		assert_eq!(json["endpoint"], "svc1");
		assert!(json.get("description").is_none());
	}
}

// vim: ts=4
