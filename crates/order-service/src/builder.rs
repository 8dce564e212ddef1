//! Construction of the order store from configuration.

use order_config::Config;
use order_storage::{StorageFactory, StorageService};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur while building the order store.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
}

/// Builds the storage service for the configured primary implementation.
///
/// Every configured implementation must name a known backend, but only the
/// primary one is instantiated.
pub fn build_storage(
	config: &Config,
	factories: &HashMap<String, StorageFactory>,
) -> Result<StorageService, BuilderError> {
	let mut unknown: Vec<&str> = config
		.storage
		.implementations
		.keys()
		.filter(|name| !factories.contains_key(*name))
		.map(String::as_str)
		.collect();
	if !unknown.is_empty() {
		unknown.sort_unstable();
		return Err(BuilderError::Config(format!(
			"Unknown storage implementation(s): {}",
			unknown.join(", ")
		)));
	}

	let name = &config.storage.primary;
	let (factory, implementation_config) = factories
		.get(name)
		.zip(config.primary_storage())
		.ok_or_else(|| {
			BuilderError::Config(format!("Primary storage '{}' is not configured", name))
		})?;

	let backend = factory(implementation_config).map_err(|e| {
		tracing::error!(
			component = "storage",
			implementation = %name,
			error = %e,
			"Failed to create storage implementation"
		);
		BuilderError::Config(format!(
			"Failed to create storage implementation '{}': {}",
			name, e
		))
	})?;

	// Validate the configuration using the implementation's schema
	if let Err(e) = backend.config_schema().validate(implementation_config) {
		tracing::error!(
			component = "storage",
			implementation = %name,
			error = %e,
			"Invalid configuration for storage implementation"
		);
		return Err(BuilderError::Config(format!(
			"Invalid configuration for storage implementation '{}': {}",
			name, e
		)));
	}

	tracing::info!(component = "storage", implementation = %name, "Loaded");
	Ok(StorageService::new(backend))
}
