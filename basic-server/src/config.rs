//! Server configuration read from environment variables
//!
//! | Variable   | Default                         |
//! |------------|---------------------------------|
//! | `LISTEN`   | `127.0.0.1:8000`                |
//! | `DB_DIR`   | `./data`                        |
//! | `SERVICES` | `service1,...,service6`         |

use std::{env, net::SocketAddr, path::PathBuf};

use plangate::app::DEFAULT_SERVICES;
use plangate_types::prelude::*;

#[derive(Debug)]
pub struct Config {
	pub listen: SocketAddr,
	pub db_dir: PathBuf,
	pub services: Vec<String>,
}

impl Config {
	pub fn from_env() -> ClResult<Self> {
		Self::from_vars(|name| env::var(name).ok())
	}

	/// Builds the configuration from a variable lookup
	pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> ClResult<Self> {
		let listen = var("LISTEN").unwrap_or_else(|| "127.0.0.1:8000".to_string());
		let listen = listen
			.parse()
			.map_err(|_| Error::ConfigError(format!("LISTEN is not a socket address: {}", listen)))?;

		let db_dir = PathBuf::from(var("DB_DIR").unwrap_or_else(|| "./data".to_string()));

		let services = match var("SERVICES") {
			Some(list) => {
				let services: Vec<String> = list
					.split(',')
					.map(str::trim)
					.filter(|s| !s.is_empty())
					.map(ToString::to_string)
					.collect();
				if services.is_empty() {
					return Err(Error::ConfigError("SERVICES must name at least one service".into()));
				}
				services
			}
			None => DEFAULT_SERVICES.iter().map(ToString::to_string).collect(),
		};

		Ok(Config { listen, db_dir, services })
	}
}

#[cfg(test)]
mod tests {
	#![allow(clippy::unwrap_used)]
	use super::*;
	use std::collections::HashMap;

	fn config_from(vars: &[(&str, &str)]) -> ClResult<Config> {
		let vars: HashMap<String, String> =
			vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
		Config::from_vars(|name| vars.get(name).cloned())
	}

	#[test]
	fn test_defaults() {
		let config = config_from(&[]).unwrap();
		assert_eq!(config.listen.to_string(), "127.0.0.1:8000");
		assert_eq!(config.db_dir, PathBuf::from("./data"));
		assert_eq!(config.services.len(), 6);
		assert_eq!(config.services[0], "service1");
	}

	#[test]
	fn test_overrides() {
		let config = config_from(&[
			("LISTEN", "0.0.0.0:9000"),
			("DB_DIR", "/var/lib/plangate"),
			("SERVICES", "search, maps ,,"),
		])
		.unwrap();
		assert_eq!(config.listen.port(), 9000);
		assert_eq!(config.db_dir, PathBuf::from("/var/lib/plangate"));
		assert_eq!(config.services, vec!["search", "maps"]);
	}

	#[test]
	fn test_invalid_values() {
		assert!(matches!(config_from(&[("LISTEN", "localhost")]), Err(Error::ConfigError(_))));
		assert!(matches!(config_from(&[("SERVICES", " , ")]), Err(Error::ConfigError(_))));
	}
}

// vim: ts=4
