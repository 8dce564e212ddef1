//! Query root.

use super::types::OrderObject;
use async_graphql::{Context, Error, Object, Result};
use order_storage::StorageService;
use order_types::OrderFilter;
use std::sync::Arc;

#[derive(Debug, Default, Clone, Copy)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
	/// Returns every order in creation order, optionally only those whose
	/// status equals `status` exactly.
	#[graphql(name = "orders")]
	async fn orders(&self, ctx: &Context<'_>, status: Option<String>) -> Result<Vec<OrderObject>> {
		let store = ctx.data::<Arc<StorageService>>()?;
		let filter = OrderFilter { status };

		let orders = store.list(&filter).await.map_err(|e| {
			tracing::warn!(error = %e, "Listing orders failed");
			Error::new(format!("Failed to list orders: {}", e))
		})?;
		tracing::debug!(count = orders.len(), status = ?filter.status, "Listed orders");

		Ok(orders.into_iter().map(OrderObject::from).collect())
	}
}
