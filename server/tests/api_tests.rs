//! HTTP API tests driving the router directly
#![allow(clippy::panic, clippy::unwrap_used, clippy::expect_used)]

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::*;

// Plans
//*******
#[tokio::test]
async fn test_create_plan() {
	let (router, _app, _temp) = create_test_app().await;

	let (status, body) = post(
		&router,
		"/plans",
		json!({"name": "Basic", "description": "Basic plan", "permission_ids": [], "limits": []}),
	)
	.await;
	assert_eq!(status, StatusCode::OK);
	assert!(body["id"].is_i64());
}

#[tokio::test]
async fn test_duplicate_plan_name() {
	let (router, _app, _temp) = create_test_app().await;
	create_plan(&router, "Basic", &[], &[]).await;

	let (status, body) = post(&router, "/plans", json!({"name": "Basic"})).await;
	assert_eq!(status, StatusCode::CONFLICT);
	assert_eq!(body["error"]["code"], "E-CONFLICT");
}

#[tokio::test]
async fn test_plan_list_length_mismatch() {
	let (router, _app, _temp) = create_test_app().await;
	let perm = create_permission(&router, "p1", "svc1").await;

	let (status, body) =
		post(&router, "/plans", json!({"name": "Bad", "permission_ids": [perm], "limits": []})).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error"]["code"], "E-VALIDATION");

	let (status, _) =
		post(&router, "/plans", json!({"name": "Neg", "permission_ids": [perm], "limits": [-1]}))
			.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	let (status, _) =
		post(&router, "/plans", json!({"name": "Ghost", "permission_ids": [999], "limits": [1]}))
			.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_plan_scalar_grant_fields() {
	let (router, _app, _temp) = create_test_app().await;
	let perm = create_permission(&router, "p1", "svc1").await;

	let (status, body) =
		post(&router, "/plans", json!({"name": "One", "permission_ids": perm, "limits": 4})).await;
	assert_eq!(status, StatusCode::OK);

	let (status, plan) = get(&router, &format!("/plans/{}", body["id"])).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(plan["name"], "One");
	assert_eq!(plan["permissions"][0]["limit"], 4);
}

#[tokio::test]
async fn test_update_plan() {
	let (router, _app, _temp) = create_test_app().await;
	let pid = create_plan(&router, "Pro", &[], &[]).await;

	let (status, body) = put(&router, &format!("/plans/{}", pid), json!({"name": "ProPlus"})).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["status"], "updated");

	let (_, plans) = get(&router, "/plans").await;
	assert_eq!(plans[0]["name"], "ProPlus");

	let (status, _) = put(&router, "/plans/999", json!({"name": "X"})).await;
	assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_plan_replaces_grants() {
	let (router, _app, _temp) = create_test_app().await;
	let p1 = create_permission(&router, "p1", "svc1").await;
	let p2 = create_permission(&router, "p2", "svc2").await;
	let pid = create_plan(&router, "Flex", &[p1], &[2]).await;

	let (status, _) = put(
		&router,
		&format!("/plans/{}", pid),
		json!({"permission_ids": [p2], "limits": [9]}),
	)
	.await;
	assert_eq!(status, StatusCode::OK);

	let (_, plan) = get(&router, &format!("/plans/{}", pid)).await;
	let grants = plan["permissions"].as_array().unwrap();
	assert_eq!(grants.len(), 1);
	assert_eq!(grants[0]["permission_id"], p2);
	assert_eq!(grants[0]["limit"], 9);
}

#[tokio::test]
async fn test_delete_plan() {
	let (router, _app, _temp) = create_test_app().await;
	let pid = create_plan(&router, "Temp", &[], &[]).await;

	let (status, body) = delete(&router, &format!("/plans/{}", pid)).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["status"], "deleted");

	let (status, _) = put(&router, &format!("/plans/{}", pid), json!({"name": "X"})).await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	let (status, _) = delete(&router, &format!("/plans/{}", pid)).await;
	assert_eq!(status, StatusCode::OK);
}

// Permissions
//*************
#[tokio::test]
async fn test_create_permission() {
	let (router, _app, _temp) = create_test_app().await;

	let (status, body) = post(
		&router,
		"/permissions",
		json!({"name": "storage", "endpoint": "service1", "description": "Object storage"}),
	)
	.await;
	assert_eq!(status, StatusCode::OK);
	let id = body["id"].as_i64().unwrap();

	let (status, perm) = get(&router, "/permissions/by-endpoint/service1").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(perm["id"], id);
	assert_eq!(perm["description"], "Object storage");
}

#[tokio::test]
async fn test_duplicate_permission() {
	let (router, _app, _temp) = create_test_app().await;
	create_permission(&router, "p1", "e1").await;

	let (status, body) =
		post(&router, "/permissions", json!({"name": "p1", "endpoint": "e1"})).await;
	assert_eq!(status, StatusCode::CONFLICT);
	assert!(body["error"]["message"].as_str().unwrap().contains("unique"));
}

#[tokio::test]
async fn test_update_and_delete_permission() {
	let (router, _app, _temp) = create_test_app().await;
	let pid = create_permission(&router, "p2", "e2").await;

	let (status, body) =
		put(&router, &format!("/permissions/{}", pid), json!({"endpoint": "e2-new"})).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["status"], "updated");

	let (_, perm) = get(&router, &format!("/permissions/{}", pid)).await;
	assert_eq!(perm["endpoint"], "e2-new");

	let (status, body) = delete(&router, &format!("/permissions/{}", pid)).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["status"], "deleted");

	let (_, perms) = get(&router, "/permissions").await;
	assert!(perms.as_array().unwrap().is_empty());

	let (status, _) = put(&router, &format!("/permissions/{}", pid), json!({"name": "x"})).await;
	assert_eq!(status, StatusCode::NOT_FOUND);
}

// Subscriptions
//***************
#[tokio::test]
async fn test_subscribe_twice() {
	let (router, _app, _temp) = create_test_app().await;
	let plan_id = create_plan(&router, "SubPlan", &[], &[]).await;

	let (status, body) =
		post(&router, "/subscriptions", json!({"user_id": 42, "plan_id": plan_id})).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["status"], "subscribed");

	let (status, body) =
		post(&router, "/subscriptions", json!({"user_id": 42, "plan_id": plan_id})).await;
	assert_eq!(status, StatusCode::CONFLICT);
	assert!(body["error"]["message"].as_str().unwrap().contains("exists"));

	let (status, _) = post(&router, "/subscriptions", json!({"user_id": 43, "plan_id": 999})).await;
	assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_change_plan() {
	let (router, _app, _temp) = create_test_app().await;
	let plan1 = create_plan(&router, "One", &[], &[]).await;
	let plan2 = create_plan(&router, "Two", &[], &[]).await;
	subscribe(&router, 7, plan1).await;

	let (status, body) =
		put(&router, "/subscriptions/7", json!({"user_id": 7, "plan_id": plan2})).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["status"], "updated");

	let (_, view) = get(&router, "/subscriptions/7").await;
	assert_eq!(view["plan"]["id"], plan2);

	let (status, _) = put(&router, "/subscriptions/8", json!({"plan_id": plan2})).await;
	assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_view_subscription_details() {
	let (router, _app, _temp) = create_test_app().await;
	let perm = create_permission(&router, "p4", "e4").await;
	let plan = create_plan(&router, "PlanA", &[perm], &[3]).await;
	subscribe(&router, 9, plan).await;

	let (status, body) = get(&router, "/subscriptions/9").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["user_id"], 9);
	assert_eq!(body["plan"]["id"], plan);
	assert_eq!(body["permissions"][0]["endpoint"], "e4");
	assert_eq!(body["permissions"][0]["limit"], 3);

	let (status, _) = get(&router, "/subscriptions/10").await;
	assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_view_usage_empty_and_limit_status() {
	let (router, _app, _temp) = create_test_app().await;
	let perm = create_permission(&router, "p5", "e5").await;
	let plan = create_plan(&router, "PlanB", &[perm], &[1]).await;
	subscribe(&router, 11, plan).await;

	let (status, usage) = get(&router, "/subscriptions/11/usage").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(usage["usage"], json!([]));

	let (status, lim) = get(&router, "/usage/11/limit").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(lim["limits"][0]["used"], 0);
	assert_eq!(lim["limits"][0]["limit"], 1);

	let (status, _) = get(&router, "/usage/12/limit").await;
	assert_eq!(status, StatusCode::NOT_FOUND);
	let (status, _) = get(&router, "/subscriptions/12/usage").await;
	assert_eq!(status, StatusCode::NOT_FOUND);
}

// Enforcement
//*************
#[tokio::test]
async fn test_access_control_and_usage_tracking() {
	let (router, _app, _temp) = create_test_app().await;
	let perm = create_permission(&router, "p6", "svc1").await;
	let plan = create_plan(&router, "PlanC", &[perm], &[2]).await;
	subscribe(&router, 21, plan).await;

	let (status, ok) = get(&router, "/access/21/svc1").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(ok["access"], true);
	assert_eq!(ok["reason"], serde_json::Value::Null);

	let (status, body) = post(&router, "/usage/21", json!({"endpoint": "svc1"})).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["status"], "recorded");
	post(&router, "/usage/21", json!({"endpoint": "svc1"})).await;

	let (status, body) = post(&router, "/usage/21", json!({"endpoint": "svc1"})).await;
	assert_eq!(status, StatusCode::FORBIDDEN);
	assert!(body["error"]["message"].as_str().unwrap().contains("limit"));

	let (_, denied) = get(&router, "/access/21/svc1").await;
	assert_eq!(denied["access"], false);
	assert_eq!(denied["reason"], "Usage limit reached");

	let (_, usage) = get(&router, "/subscriptions/21/usage").await;
	assert_eq!(usage["usage"][0]["endpoint"], "svc1");
	assert_eq!(usage["usage"][0]["count"], 2);
}

#[tokio::test]
async fn test_record_usage_denials() {
	let (router, _app, _temp) = create_test_app().await;
	let p1 = create_permission(&router, "p1", "svc1").await;
	create_permission(&router, "p2", "svc2").await;
	let plan = create_plan(&router, "Narrow", &[p1], &[5]).await;

	let (status, body) = post(&router, "/usage/50", json!({"endpoint": "svc1"})).await;
	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(body["error"]["code"], "E-NO-SUBSCRIPTION");

	subscribe(&router, 50, plan).await;
	let (status, body) = post(&router, "/usage/50", json!({"endpoint": "svc2"})).await;
	assert_eq!(status, StatusCode::FORBIDDEN);
	assert_eq!(body["error"]["message"], "Endpoint not in plan permissions");

	let (status, body) = post(&router, "/usage/99", json!({"endpoint": "unknown-endpoint"})).await;
	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(body["error"]["code"], "E-PERMISSION-UNKNOWN");

	let (status, _) = get(&router, "/access/50/unknown-endpoint").await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	let (_, no_sub) = get(&router, "/access/51/svc1").await;
	assert_eq!(no_sub["reason"], "No subscription");
}

#[tokio::test]
async fn test_service_route_integration() {
	let (router, _app, _temp) = create_test_app().await;
	let perm = create_permission(&router, "p7", "service2").await;
	let plan = create_plan(&router, "PlanD", &[perm], &[1]).await;
	subscribe(&router, 31, plan).await;

	let (status, body) = get(&router, "/services/service2?user_id=31").await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["service"], "service2");
	assert_eq!(body["status"], "OK");

	let (status, _) = get(&router, "/services/service2?user_id=31").await;
	assert_eq!(status, StatusCode::FORBIDDEN);

	let (status, _) = get(&router, "/services/unknown?user_id=31").await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	let (status, _) = get(&router, "/services/service2").await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health() {
	let (router, app, _temp) = create_test_app().await;
	assert!(app.has_service("service6"));

	let (status, _) = get(&router, "/health").await;
	assert_eq!(status, StatusCode::OK);
}

// vim: ts=4
