mod config;

use std::sync::Arc;

use plangate::AppBuilder;
use plangate_store_adapter_sqlite::StoreAdapterSqlite;
use plangate_types::prelude::*;

use crate::config::Config;

#[tokio::main]
async fn main() -> ClResult<()> {
	let config = Config::from_env()?;

	let store = Arc::new(StoreAdapterSqlite::new(&config.db_dir).await?);

	let mut builder = AppBuilder::new();
	builder.listen(config.listen.to_string()).services(config.services).store(store);
	builder.run().await
}

// vim: ts=4
