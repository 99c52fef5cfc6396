//! Shared helpers for the HTTP tests
//!
//! Every test gets its own store in a `TempDir`, returned alongside the
//! router so the database lives until the end of the test.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
	Router,
	body::Body,
	http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use plangate::{App, AppBuilder, routes};
use plangate_store_adapter_sqlite::StoreAdapterSqlite;

pub async fn create_test_app() -> (Router, App, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let store = StoreAdapterSqlite::new(temp_dir.path()).await.expect("Failed to create store");

	let mut builder = AppBuilder::new();
	builder.store(Arc::new(store));
	let app = builder.build().expect("Failed to build app");

	(routes::init(app.clone()), app, temp_dir)
}

/// Sends one request and decodes the JSON answer (`Value::Null` when empty)
pub async fn send(
	router: &Router,
	method: Method,
	uri: &str,
	body: Option<Value>,
) -> (StatusCode, Value) {
	let builder = Request::builder().method(method).uri(uri);
	let request = match body {
		Some(body) => builder
			.header(header::CONTENT_TYPE, "application/json")
			.body(Body::from(body.to_string())),
		None => builder.body(Body::empty()),
	}
	.expect("Failed to build request");

	let response = router.clone().oneshot(request).await.expect("Request failed");
	let status = response.status();
	let bytes = response.into_body().collect().await.expect("Failed to read body").to_bytes();
	let value = if bytes.is_empty() {
		Value::Null
	} else {
		serde_json::from_slice(&bytes).unwrap_or(Value::Null)
	};
	(status, value)
}

pub async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
	send(router, Method::GET, uri, None).await
}

pub async fn post(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
	send(router, Method::POST, uri, Some(body)).await
}

pub async fn put(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
	send(router, Method::PUT, uri, Some(body)).await
}

pub async fn delete(router: &Router, uri: &str) -> (StatusCode, Value) {
	send(router, Method::DELETE, uri, None).await
}

/// Creates a permission and returns its id
pub async fn create_permission(router: &Router, name: &str, endpoint: &str) -> i64 {
	let (status, body) = post(
		router,
		"/permissions",
		serde_json::json!({"name": name, "endpoint": endpoint, "description": ""}),
	)
	.await;
	assert_eq!(status, StatusCode::OK, "create permission failed: {}", body);
	body["id"].as_i64().expect("permission id")
}

/// Creates a plan with parallel permission and limit lists and returns its id
pub async fn create_plan(router: &Router, name: &str, permission_ids: &[i64], limits: &[i64]) -> i64 {
	let (status, body) = post(
		router,
		"/plans",
		serde_json::json!({
			"name": name,
			"description": "",
			"permission_ids": permission_ids,
			"limits": limits,
		}),
	)
	.await;
	assert_eq!(status, StatusCode::OK, "create plan failed: {}", body);
	body["id"].as_i64().expect("plan id")
}

pub async fn subscribe(router: &Router, user_id: i64, plan_id: i64) {
	let (status, body) =
		post(router, "/subscriptions", serde_json::json!({"user_id": user_id, "plan_id": plan_id}))
			.await;
	assert_eq!(status, StatusCode::OK, "subscribe failed: {}", body);
}

// vim: ts=4
