//! App builder - constructs and runs the plangate service

use std::sync::Arc;

use crate::prelude::*;
use crate::routes;
use plangate_core::Entitlements;
use plangate_types::store_adapter::StoreAdapter;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Names of the mock services reachable through `/services/{name}`
pub const DEFAULT_SERVICES: [&str; 6] =
	["service1", "service2", "service3", "service4", "service5", "service6"];

#[derive(Debug)]
pub struct AppBuilderOpts {
	pub listen: Box<str>,
	pub services: Box<[Box<str>]>,
}

#[derive(Debug)]
pub struct AppState {
	pub opts: AppBuilderOpts,
	pub entitlements: Entitlements,
}

impl AppState {
	pub fn has_service(&self, name: &str) -> bool {
		self.opts.services.iter().any(|s| s.as_ref() == name)
	}
}

pub type App = Arc<AppState>;

pub struct AppBuilder {
	opts: AppBuilderOpts,
	store: Option<Arc<dyn StoreAdapter>>,
}

impl AppBuilder {
	pub fn new() -> Self {
		AppBuilder {
			opts: AppBuilderOpts {
				listen: "127.0.0.1:8000".into(),
				services: DEFAULT_SERVICES.iter().map(|&s| s.into()).collect(),
			},
			store: None,
		}
	}

	// Opts
	pub fn listen(&mut self, listen: impl Into<Box<str>>) -> &mut Self {
		self.opts.listen = listen.into();
		self
	}

	pub fn services(&mut self, services: impl IntoIterator<Item = impl Into<Box<str>>>) -> &mut Self {
		self.opts.services = services.into_iter().map(Into::into).collect();
		self
	}

	// Adapters
	pub fn store(&mut self, store: Arc<dyn StoreAdapter>) -> &mut Self {
		self.store = Some(store);
		self
	}

	/// Wires the entitlement components to the configured store
	pub fn build(self) -> ClResult<App> {
		let Some(store) = self.store else {
			error!("FATAL: No store adapter configured");
			return Err(Error::Internal("No store adapter configured".to_string()));
		};

		Ok(Arc::new(AppState { opts: self.opts, entitlements: Entitlements::new(store) }))
	}

	pub async fn run(self) -> ClResult<()> {
		if tracing_subscriber::fmt()
			.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
			.with_target(false)
			.try_init()
			.is_err()
		{
			debug!("Tracing subscriber already installed");
		}
		info!("plangate V{}", VERSION);

		let app = self.build()?;
		let router = routes::init(app.clone());

		let listener = tokio::net::TcpListener::bind(app.opts.listen.as_ref()).await?;
		info!("Listening on HTTP {}", app.opts.listen);

		let res = axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await;

		// Close the store even when the server loop failed
		app.entitlements.close().await;
		res?;

		info!("Shutdown complete");
		Ok(())
	}
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}

async fn shutdown_signal() {
	match tokio::signal::ctrl_c().await {
		Ok(()) => info!("Shutdown signal received"),
		Err(err) => error!("Failed to listen for shutdown signal: {}", err),
	}
}

// vim: ts=4
