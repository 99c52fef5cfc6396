//! Entitlement and quota enforcement core for plangate.
//!
//! Four components, leaves first:
//!
//! - [`Catalog`] - permissions, plans and their per-permission limits
//! - [`SubscriptionDirectory`] - the one active plan of each user
//! - [`QuotaLedger`] - per-(user, permission) usage counters
//! - [`Evaluator`] - decides whether a call is allowed and commits its usage
//!
//! Every component holds the same injected [`StoreAdapter`] handle and is
//! cheap to clone. [`Entitlements`] bundles them for the server.

#![forbid(unsafe_code)]

pub mod catalog;
pub mod directory;
pub mod evaluator;
pub mod ledger;
pub mod prelude;

use std::sync::Arc;

use plangate_types::store_adapter::StoreAdapter;

pub use catalog::Catalog;
pub use directory::SubscriptionDirectory;
pub use evaluator::{Decision, DenyReason, Evaluator};
pub use ledger::QuotaLedger;

/// All entitlement components wired to one store
#[derive(Clone, Debug)]
pub struct Entitlements {
	pub catalog: Catalog,
	pub directory: SubscriptionDirectory,
	pub ledger: QuotaLedger,
	pub evaluator: Evaluator,
	store: Arc<dyn StoreAdapter>,
}

impl Entitlements {
	pub fn new(store: Arc<dyn StoreAdapter>) -> Self {
		let catalog = Catalog::new(Arc::clone(&store));
		let directory = SubscriptionDirectory::new(Arc::clone(&store));
		let ledger = QuotaLedger::new(Arc::clone(&store));
		let evaluator = Evaluator::new(catalog.clone(), directory.clone(), ledger.clone());
		Self { catalog, directory, ledger, evaluator, store }
	}

	/// Closes the underlying store. Components must not be used afterwards.
	pub async fn close(&self) {
		self.store.close().await;
	}
}

// vim: ts=4
