use axum::{
	Router,
	routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::prelude::*;
use crate::{access, permission, plan, service, subscription};

pub fn init(app: App) -> Router {
	Router::new()
		// Catalog
		.route("/plans", get(plan::list_plans).post(plan::post_plan))
		.route("/plans/{plan_id}", get(plan::get_plan).put(plan::put_plan).delete(plan::delete_plan))
		.route(
			"/permissions",
			get(permission::list_permissions).post(permission::post_permission),
		)
		.route(
			"/permissions/{permission_id}",
			get(permission::get_permission)
				.put(permission::put_permission)
				.delete(permission::delete_permission),
		)
		.route("/permissions/by-endpoint/{endpoint}", get(permission::get_permission_by_endpoint))
		// Subscriptions
		.route("/subscriptions", post(subscription::post_subscription))
		.route(
			"/subscriptions/{user_id}",
			get(subscription::get_subscription).put(subscription::put_subscription),
		)
		.route("/subscriptions/{user_id}/usage", get(subscription::get_usage))
		// Enforcement
		.route("/access/{user_id}/{endpoint}", get(access::get_access))
		.route("/usage/{user_id}", post(access::post_usage))
		.route("/usage/{user_id}/limit", get(access::get_limit_status))
		.route("/services/{service_name}", get(service::call_service))
		.route("/health", get(async || "OK\n"))
		.layer(TraceLayer::new_for_http())
		.with_state(app)
}

// vim: ts=4
