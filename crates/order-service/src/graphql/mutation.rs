//! Mutation root.

use super::types::{input_wire_name, CreateOrderInput, CreateOrderPayload};
use async_graphql::{Context, Error, ErrorExtensionValues, Object, Result, ServerError};
use order_storage::{CreateOrderError, StorageService};
use order_types::FieldError;
use std::sync::Arc;

#[derive(Debug, Default, Clone, Copy)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
	/// Creates an order.
	///
	/// When any field is blank, `createOrder` resolves to `null` and each
	/// blank field is reported as its own top-level error.
	#[graphql(name = "createOrder")]
	async fn create_order(
		&self,
		ctx: &Context<'_>,
		input: CreateOrderInput,
	) -> Result<Option<CreateOrderPayload>> {
		let store = ctx.data::<Arc<StorageService>>()?;
		let (attributes, client_mutation_id) = input.into_parts();

		match store.create(attributes).await {
			Ok(order) => Ok(Some(CreateOrderPayload {
				order: Some(order.into()),
				errors: Vec::new(),
				client_mutation_id,
			})),
			Err(CreateOrderError::Invalid(errors)) => {
				for error in errors {
					ctx.add_error(field_error(ctx, error));
				}
				Ok(None)
			},
			Err(CreateOrderError::Storage(e)) => {
				tracing::warn!(error = %e, "Order creation failed");
				Err(Error::new(format!("Failed to create order: {}", e)))
			},
		}
	}
}

/// Converts a validation failure into a GraphQL error located at the
/// `createOrder` field, tagged with the wire name of the offending input.
fn field_error(ctx: &Context<'_>, error: FieldError) -> ServerError {
	let mut extensions = ErrorExtensionValues::default();
	extensions.set("field", input_wire_name(&error.field).to_string());

	let mut server_error = ServerError::new(error.message, Some(ctx.item.pos));
	server_error.extensions = Some(extensions);
	server_error
}
