//! Request and response shapes shared by the handlers

use serde::{Deserialize, Serialize};

/// `{"status": "..."}` acknowledgement of a mutation
#[derive(Debug, Serialize)]
pub struct StatusResponse {
	pub status: &'static str,
}

impl StatusResponse {
	pub fn new(status: &'static str) -> Self {
		Self { status }
	}
}

/// `{"id": ...}` answer of a create call
#[derive(Debug, Serialize)]
pub struct IdResponse<T> {
	pub id: T,
}

/// Body of `POST /usage/{user_id}`
#[derive(Debug, Deserialize)]
pub struct UsageRequest {
	pub endpoint: String,
}

// vim: ts=4
