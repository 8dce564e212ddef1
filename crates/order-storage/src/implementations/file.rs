//! File-based storage backend for the order service.
//!
//! All orders are kept in a single JSON snapshot file. The snapshot is read
//! on first access and rewritten on every insert by writing a temp file and
//! renaming it over the original, so readers never see a half-written file.

use crate::{StorageError, StorageFactory, StorageInterface, StorageRegistry};
use async_trait::async_trait;
use chrono::Utc;
use order_types::{
	ConfigSchema, Field, FieldType, ImplementationRegistry, NewOrder, Order, OrderFilter, Schema,
	ValidationError,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::{OnceCell, RwLock};

const DEFAULT_STORAGE_PATH: &str = "./data/orders.json";

/// On-disk layout of the snapshot file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
	/// Highest id ever assigned.
	last_id: u64,
	/// Orders in insertion (and therefore id) order.
	orders: Vec<Order>,
}

/// File-based storage implementation.
pub struct FileStorage {
	/// Path of the snapshot file.
	path: PathBuf,
	/// Pretty-print the snapshot JSON.
	pretty: bool,
	/// Snapshot contents, loaded lazily on first access.
	snapshot: OnceCell<RwLock<Snapshot>>,
}

impl FileStorage {
	/// Creates a new FileStorage backed by the file at `path`.
	///
	/// The file is not touched until the first operation.
	pub fn new(path: PathBuf, pretty: bool) -> Self {
		Self {
			path,
			pretty,
			snapshot: OnceCell::new(),
		}
	}

	async fn snapshot(&self) -> Result<&RwLock<Snapshot>, StorageError> {
		self.snapshot
			.get_or_try_init(|| async { self.load().await.map(RwLock::new) })
			.await
	}

	/// Reads the snapshot file. A missing file is an empty store.
	async fn load(&self) -> Result<Snapshot, StorageError> {
		let data = match fs::read(&self.path).await {
			Ok(data) => data,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				tracing::debug!(path = %self.path.display(), "No snapshot found, starting empty");
				return Ok(Snapshot::default());
			},
			Err(e) => return Err(StorageError::Backend(e.to_string())),
		};

		let mut snapshot: Snapshot = serde_json::from_slice(&data).map_err(|e| {
			StorageError::Serialization(format!("{}: {}", self.path.display(), e))
		})?;

		// Never hand out an id that is already on disk
		let max_id = snapshot.orders.iter().map(|o| o.id).max().unwrap_or(0);
		snapshot.last_id = snapshot.last_id.max(max_id);

		tracing::info!(
			path = %self.path.display(),
			orders = snapshot.orders.len(),
			"Loaded order snapshot"
		);
		Ok(snapshot)
	}

	/// Writes the snapshot atomically by writing a temp file then renaming.
	async fn persist(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
		let bytes = if self.pretty {
			serde_json::to_vec_pretty(snapshot)
		} else {
			serde_json::to_vec(snapshot)
		}
		.map_err(|e| StorageError::Serialization(e.to_string()))?;

		if let Some(parent) = self.path.parent() {
			fs::create_dir_all(parent)
				.await
				.map_err(|e| StorageError::Backend(e.to_string()))?;
		}

		let temp_path = self.path.with_extension("tmp");
		fs::write(&temp_path, bytes)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;

		fs::rename(&temp_path, &self.path)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;

		Ok(())
	}
}

#[async_trait]
impl StorageInterface for FileStorage {
	async fn insert(&self, order: NewOrder) -> Result<Order, StorageError> {
		let mut snapshot = self.snapshot().await?.write().await;

		let id = snapshot.last_id + 1;
		let order = Order::from_new(id, order, Utc::now());
		snapshot.orders.push(order.clone());
		snapshot.last_id = id;

		if let Err(e) = self.persist(&snapshot).await {
			snapshot.orders.pop();
			snapshot.last_id = id - 1;
			tracing::warn!(path = %self.path.display(), error = %e, "Failed to persist order");
			return Err(e);
		}

		Ok(order)
	}

	async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, StorageError> {
		let snapshot = self.snapshot().await?.read().await;
		Ok(snapshot
			.orders
			.iter()
			.filter(|order| filter.matches(order))
			.cloned()
			.collect())
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(FileStorageSchema)
	}
}

/// Configuration schema for FileStorage.
pub struct FileStorageSchema;

impl ConfigSchema for FileStorageSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![],
			vec![
				Field::new("storage_path", FieldType::String).with_validator(|value| {
					match value.as_str() {
						Some(path) if !path.trim().is_empty() => Ok(()),
						_ => Err("storage_path cannot be empty".to_string()),
					}
				}),
				Field::new("pretty", FieldType::Boolean),
			],
		);
		schema.validate(config)
	}
}

/// Factory function to create a file storage backend from configuration.
///
/// Configuration parameters:
/// - `storage_path`: Snapshot file (default: "./data/orders.json")
/// - `pretty`: Pretty-print the snapshot (default: false)
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn StorageInterface>, StorageError> {
	FileStorageSchema
		.validate(config)
		.map_err(|e| StorageError::Configuration(e.to_string()))?;

	let storage_path = config
		.get("storage_path")
		.and_then(|v| v.as_str())
		.unwrap_or(DEFAULT_STORAGE_PATH);
	let pretty = config
		.get("pretty")
		.and_then(|v| v.as_bool())
		.unwrap_or(false);

	Ok(Box::new(FileStorage::new(PathBuf::from(storage_path), pretty)))
}

/// Registry for the file storage implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "file";
	type Factory = StorageFactory;

	fn factory() -> Self::Factory {
		create_storage
	}
}

impl StorageRegistry for Registry {}
