//! In-memory storage backend implementation for the order service.
//!
//! Orders live in a `BTreeMap` keyed by id, so nothing survives a restart.
//! Useful for tests and local development.

use crate::{StorageError, StorageFactory, StorageInterface, StorageRegistry};
use async_trait::async_trait;
use chrono::Utc;
use order_types::{
	ConfigSchema, ImplementationRegistry, NewOrder, Order, OrderFilter, Schema, ValidationError,
};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct MemoryState {
	orders: BTreeMap<u64, Order>,
	last_id: u64,
}

/// In-memory storage implementation.
pub struct MemoryStorage {
	/// The in-memory store protected by a read-write lock.
	state: RwLock<MemoryState>,
}

impl MemoryStorage {
	/// Creates a new, empty MemoryStorage instance.
	pub fn new() -> Self {
		Self {
			state: RwLock::new(MemoryState::default()),
		}
	}
}

impl Default for MemoryStorage {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl StorageInterface for MemoryStorage {
	async fn insert(&self, order: NewOrder) -> Result<Order, StorageError> {
		let mut state = self.state.write().await;
		let id = state.last_id + 1;
		let order = Order::from_new(id, order, Utc::now());
		state.orders.insert(id, order.clone());
		state.last_id = id;
		Ok(order)
	}

	async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, StorageError> {
		let state = self.state.read().await;
		Ok(state
			.orders
			.values()
			.filter(|order| filter.matches(order))
			.cloned()
			.collect())
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(MemoryStorageSchema)
	}
}

/// Configuration schema for MemoryStorage.
pub struct MemoryStorageSchema;

impl ConfigSchema for MemoryStorageSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		// Memory storage accepts no keys
		Schema::new(vec![], vec![]).validate(config)
	}
}

/// Factory function to create a memory storage backend from configuration.
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn StorageInterface>, StorageError> {
	MemoryStorageSchema
		.validate(config)
		.map_err(|e| StorageError::Configuration(e.to_string()))?;
	Ok(Box::new(MemoryStorage::new()))
}

/// Registry for the memory storage implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "memory";
	type Factory = StorageFactory;

	fn factory() -> Self::Factory {
		create_storage
	}
}

impl StorageRegistry for Registry {}

#[cfg(test)]
mod tests {
	use super::*;

	fn order(status: &str) -> NewOrder {
		NewOrder {
			full_name: "Bryanna Davies".to_string(),
			address: "Howard Street Oswego NY 13127".to_string(),
			status: status.to_string(),
			item_name: "Pen".to_string(),
			total: 100,
		}
	}

	#[tokio::test]
	async fn test_ids_start_at_one_and_increase() {
		let storage = MemoryStorage::new();

		let first = storage.insert(order("UNPAID")).await.unwrap();
		let second = storage.insert(order("PAID")).await.unwrap();
		assert_eq!(first.id, 1);
		assert_eq!(second.id, 2);
		assert!(second.created_at >= first.created_at);
	}

	#[tokio::test]
	async fn test_list_filters_by_status() {
		let storage = MemoryStorage::new();
		storage.insert(order("UNPAID")).await.unwrap();
		storage.insert(order("PAID")).await.unwrap();
		storage.insert(order("PAID")).await.unwrap();

		let all = storage.list(&OrderFilter::all()).await.unwrap();
		assert_eq!(all.len(), 3);

		let paid: Vec<u64> = storage
			.list(&OrderFilter::by_status("PAID"))
			.await
			.unwrap()
			.iter()
			.map(|o| o.id)
			.collect();
		assert_eq!(paid, vec![2, 3]);

		let none = storage.list(&OrderFilter::by_status("REFUNDED")).await.unwrap();
		assert!(none.is_empty());
	}

	#[tokio::test]
	async fn test_repeated_lists_are_identical() {
		let storage = MemoryStorage::new();
		storage.insert(order("UNPAID")).await.unwrap();
		storage.insert(order("PAID")).await.unwrap();

		let first = storage.list(&OrderFilter::all()).await.unwrap();
		let second = storage.list(&OrderFilter::all()).await.unwrap();
		assert_eq!(first, second);
	}

	#[tokio::test]
	async fn test_concurrent_inserts_get_distinct_ids() {
		let storage = std::sync::Arc::new(MemoryStorage::new());
		let handles: Vec<_> = (0..16)
			.map(|_| {
				let storage = storage.clone();
				tokio::spawn(async move { storage.insert(order("PAID")).await.unwrap().id })
			})
			.collect();

		let mut ids = Vec::new();
		for handle in handles {
			ids.push(handle.await.unwrap());
		}
		ids.sort_unstable();
		assert_eq!(ids, (1..=16).collect::<Vec<u64>>());
	}

	#[test]
	fn test_factory_rejects_unknown_keys() {
		let config: toml::Value = toml::from_str("storage_path = \"/tmp\"").unwrap();
		assert!(matches!(
			create_storage(&config),
			Err(StorageError::Configuration(_))
		));

		let empty = toml::Value::Table(toml::map::Map::new());
		assert!(create_storage(&empty).is_ok());
	}
}
