//! GraphQL schema for the order API.
//!
//! The schema exposes the `orders` query and the `createOrder` mutation.
//! The order store is injected as schema data when the schema is built.

mod mutation;
mod query;
mod types;

pub use mutation::MutationRoot;
pub use query::QueryRoot;

use async_graphql::{EmptySubscription, Schema};
use order_storage::StorageService;
use std::sync::Arc;

/// GraphQL schema type
pub type OrderSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Builds the schema around the given order store.
pub fn build_schema(store: Arc<StorageService>) -> OrderSchema {
	Schema::build(QueryRoot, MutationRoot, EmptySubscription)
		.data(store)
		.finish()
}
