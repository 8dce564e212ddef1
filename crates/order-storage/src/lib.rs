//! Storage module for the order service.
//!
//! This module owns persistence of order records. Backends implement
//! [`StorageInterface`]; the [`StorageService`] on top of them validates
//! incoming attributes and guarantees the ordering of list results no matter
//! which backend is configured.

use async_trait::async_trait;
use order_types::{
	ConfigSchema, ImplementationRegistry, NewOrder, Order, OrderAttributes, OrderFilter,
	ValidationErrors,
};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod file;
	pub mod memory;
}

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
	/// Error that occurs during serialization/deserialization.
	#[error("Serialization error: {0}")]
	Serialization(String),
	/// Error that occurs in the storage backend.
	#[error("Backend error: {0}")]
	Backend(String),
	/// Error that occurs during configuration validation.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Errors returned when creating an order.
#[derive(Debug, Error)]
pub enum CreateOrderError {
	/// One or more required fields were blank. Nothing was written.
	#[error(transparent)]
	Invalid(#[from] ValidationErrors),
	/// The backend failed to persist a valid order.
	#[error(transparent)]
	Storage(#[from] StorageError),
}

/// Trait defining the interface for order storage backends.
///
/// Any backend that wants to integrate with the service implements this
/// trait. Backends receive orders that already passed validation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageInterface: Send + Sync {
	/// Assigns the next sequential id and persists the order.
	///
	/// Id assignment and the write happen atomically: on error the id is not
	/// consumed and no record is visible.
	async fn insert(&self, order: NewOrder) -> Result<Order, StorageError>;

	/// Returns every stored order matching `filter`, in any order.
	async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, StorageError>;

	/// Returns the configuration schema for validation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;
}

/// Type alias for storage factory functions.
///
/// This is the function signature that all storage implementations must provide
/// to create instances of their storage interface.
pub type StorageFactory = fn(&toml::Value) -> Result<Box<dyn StorageInterface>, StorageError>;

/// Registry trait for storage implementations.
pub trait StorageRegistry: ImplementationRegistry<Factory = StorageFactory> {}

/// Get all registered storage implementations.
///
/// Returns a vector of (name, factory) tuples for all available storage implementations.
pub fn get_all_implementations() -> Vec<(&'static str, StorageFactory)> {
	use implementations::{file, memory};

	vec![
		(file::Registry::NAME, file::Registry::factory()),
		(memory::Registry::NAME, memory::Registry::factory()),
	]
}

/// High-level order store.
///
/// Wraps a backend with validation on the way in and id ordering on the
/// way out.
pub struct StorageService {
	/// The underlying storage backend implementation.
	backend: Box<dyn StorageInterface>,
}

impl StorageService {
	/// Creates a new StorageService with the specified backend.
	pub fn new(backend: Box<dyn StorageInterface>) -> Self {
		Self { backend }
	}

	/// Validates `attributes` and persists the resulting order.
	///
	/// Every blank field is reported; the backend is not touched unless all
	/// fields are present.
	pub async fn create(&self, attributes: OrderAttributes) -> Result<Order, CreateOrderError> {
		let order = match attributes.validate() {
			Ok(order) => order,
			Err(errors) => {
				tracing::debug!(component = "storage", errors = %errors, "Rejected order");
				return Err(errors.into());
			},
		};

		let order = self.backend.insert(order).await?;
		tracing::info!(
			component = "storage",
			order_id = order.id,
			status = %order.status,
			"Created order"
		);
		Ok(order)
	}

	/// Lists orders matching `filter` in ascending id order.
	pub async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, StorageError> {
		let mut orders = self.backend.list(filter).await?;
		orders.sort_unstable_by_key(|order| order.id);
		Ok(orders)
	}
}
