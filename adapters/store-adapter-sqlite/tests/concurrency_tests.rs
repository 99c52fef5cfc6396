//! Store adapter concurrency tests
//!
//! Concurrent conditional increments against the same and different counters
#![allow(clippy::unwrap_used, clippy::expect_used)]

use plangate_store_adapter_sqlite::StoreAdapterSqlite;
use plangate_types::prelude::*;
use plangate_types::store_adapter::{ConsumeOutcome, CreatePermissionData, StoreAdapter};
use std::sync::Arc;
use tempfile::TempDir;

async fn create_test_adapter() -> (Arc<StoreAdapterSqlite>, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let adapter = StoreAdapterSqlite::new(temp_dir.path()).await.expect("Failed to create adapter");
	(Arc::new(adapter), temp_dir)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_consume_never_exceeds_limit() {
	let (adapter, _temp) = create_test_adapter().await;
	let permission_id = adapter
		.create_permission(&CreatePermissionData { name: "p", endpoint: "svc1", description: None })
		.await
		.unwrap();
	let user = UserId(1);
	let limit = 5;

	let mut handles = vec![];
	for _ in 0..25 {
		let adapter = Arc::clone(&adapter);
		handles.push(tokio::spawn(async move { adapter.try_consume(user, permission_id, limit).await }));
	}

	let mut allowed = 0;
	let mut denied = 0;
	for handle in handles {
		match handle.await.expect("Task panicked").expect("Store error") {
			ConsumeOutcome::Allowed { .. } => allowed += 1,
			ConsumeOutcome::LimitReached => denied += 1,
		}
	}

	assert_eq!(allowed, 5);
	assert_eq!(denied, 20);
	assert_eq!(adapter.read_usage(user, permission_id).await.unwrap(), limit);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_consume_on_disjoint_keys() {
	let (adapter, _temp) = create_test_adapter().await;
	let permission_id = adapter
		.create_permission(&CreatePermissionData { name: "p", endpoint: "svc1", description: None })
		.await
		.unwrap();

	let futures = (1..=8).flat_map(|user| {
		let adapter = Arc::clone(&adapter);
		(0..3).map(move |_| {
			let adapter = Arc::clone(&adapter);
			async move { adapter.try_consume(UserId(user), permission_id, 2).await }
		})
	});
	let results = futures::future::join_all(futures).await;

	let allowed =
		results.iter().filter(|r| matches!(r, Ok(ConsumeOutcome::Allowed { .. }))).count();
	assert_eq!(allowed, 16);
	for user in 1..=8 {
		assert_eq!(adapter.read_usage(UserId(user), permission_id).await.unwrap(), 2);
	}
}

// vim: ts=4
