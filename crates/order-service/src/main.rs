//! Main entry point for the order service.
//!
//! Loads the configuration, builds the configured order store and serves the
//! GraphQL API until interrupted.

use clap::Parser;
use order_config::Config;
use order_storage::implementations::memory::MemoryStorage;
use order_storage::{StorageFactory, StorageService};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

mod builder;
mod graphql;
mod server;

/// Command-line arguments for the order service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,

	/// Print the GraphQL schema and exit
	#[arg(long)]
	print_schema: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if args.print_schema {
		let store = Arc::new(StorageService::new(Box::new(MemoryStorage::new())));
		println!("{}", graphql::build_schema(store).sdl());
		return Ok(());
	}

	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	tracing::info!("Started order service");

	let config_path = args.config.to_string_lossy();
	let config = Config::from_file(&config_path).await?;
	tracing::info!("Loaded configuration [{}]", config.service.id);

	let store = builder::build_storage(&config, &storage_factories())?;
	let schema = graphql::build_schema(Arc::new(store));

	server::start_server(config.api, schema).await?;

	tracing::info!("Stopped order service");
	Ok(())
}

/// Known storage backends, keyed by implementation name.
fn storage_factories() -> HashMap<String, StorageFactory> {
	order_storage::get_all_implementations()
		.into_iter()
		.map(|(name, factory)| (name.to_string(), factory))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn test_args_defaults() {
		let args = Args::parse_from(["orders"]);
		assert_eq!(args.config, PathBuf::from("config.toml"));
		assert_eq!(args.log_level, "info");
		assert!(!args.print_schema);
	}

	#[test]
	fn test_args_custom_values() {
		let args = Args::parse_from([
			"orders",
			"--config",
			"custom.toml",
			"-l",
			"debug",
			"--print-schema",
		]);
		assert_eq!(args.config, PathBuf::from("custom.toml"));
		assert_eq!(args.log_level, "debug");
		assert!(args.print_schema);
	}

	#[test]
	fn test_storage_factories() {
		let factories = storage_factories();
		assert_eq!(factories.len(), 2);
		assert!(factories.contains_key("file"));
		assert!(factories.contains_key("memory"));
	}

	#[tokio::test]
	async fn test_store_from_config_file() {
		let dir = tempfile::tempdir().unwrap();
		let snapshot = dir.path().join("orders.json");
		let mut file = tempfile::NamedTempFile::new_in(dir.path()).unwrap();
		write!(
			file,
			r#"
[service]
id = "orders-file-test"

[storage]
primary = "file"

[storage.implementations.file]
storage_path = "{}"

[api]
port = 4000
playground = true
"#,
			snapshot.display()
		)
		.unwrap();

		let config = Config::from_file(&file.path().to_string_lossy())
			.await
			.unwrap();
		assert_eq!(config.service.id, "orders-file-test");
		assert_eq!(config.api.port, 4000);
		assert!(config.api.playground);

		let store = builder::build_storage(&config, &storage_factories()).unwrap();
		let schema = graphql::build_schema(Arc::new(store));
		let response = schema
			.execute(
				r#"mutation { createOrder(input: {
					fullName: "Nick Wilson", address: "Brighton Circle Road",
					status: "PAID", itemName: "Suitcase", total: 200
				}) { order { id } } }"#,
			)
			.await;
		assert!(response.errors.is_empty());
		assert!(snapshot.exists());
	}
}
