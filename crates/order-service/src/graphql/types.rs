//! GraphQL object, input and scalar types.
//!
//! Wire names are camelCase and are declared explicitly on every field;
//! the Rust side keeps the snake_case names used by the store.

use async_graphql::{
	InputObject, InputValueError, InputValueResult, Object, Scalar, ScalarType, SimpleObject,
	Value, ID,
};
use chrono::{DateTime, SecondsFormat, Utc};
use order_types::{Order, OrderAttributes};

/// Internal field name to wire name, for every field of the creation input.
const INPUT_WIRE_NAMES: [(&str, &str); 5] = [
	("full_name", "fullName"),
	("address", "address"),
	("status", "status"),
	("item_name", "itemName"),
	("total", "total"),
];

/// Returns the wire name of an order input field.
pub fn input_wire_name(field: &str) -> &str {
	INPUT_WIRE_NAMES
		.iter()
		.find(|(internal, _)| *internal == field)
		.map(|(_, wire)| *wire)
		.unwrap_or(field)
}

/// UTC timestamp serialized as ISO-8601 with second precision,
/// e.g. `2024-03-01T12:00:00Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Iso8601DateTime(pub DateTime<Utc>);

#[Scalar(name = "ISO8601DateTime")]
impl ScalarType for Iso8601DateTime {
	fn parse(value: Value) -> InputValueResult<Self> {
		match &value {
			Value::String(s) => DateTime::parse_from_rfc3339(s)
				.map(|dt| Self(dt.with_timezone(&Utc)))
				.map_err(|e| InputValueError::custom(e)),
			_ => Err(InputValueError::expected_type(value)),
		}
	}

	fn to_value(&self) -> Value {
		Value::String(self.0.to_rfc3339_opts(SecondsFormat::Secs, true))
	}
}

/// GraphQL view of a stored order.
pub struct OrderObject(Order);

impl From<Order> for OrderObject {
	fn from(order: Order) -> Self {
		Self(order)
	}
}

#[Object(name = "Order")]
impl OrderObject {
	/// Store-assigned identifier, serialized as a string.
	#[graphql(name = "id")]
	async fn id(&self) -> ID {
		ID(self.0.id.to_string())
	}

	#[graphql(name = "fullName")]
	async fn full_name(&self) -> &str {
		&self.0.full_name
	}

	#[graphql(name = "address")]
	async fn address(&self) -> &str {
		&self.0.address
	}

	#[graphql(name = "status")]
	async fn status(&self) -> &str {
		&self.0.status
	}

	#[graphql(name = "itemName")]
	async fn item_name(&self) -> &str {
		&self.0.item_name
	}

	#[graphql(name = "total")]
	async fn total(&self) -> i32 {
		self.0.total
	}

	#[graphql(name = "createdAt")]
	async fn created_at(&self) -> Iso8601DateTime {
		Iso8601DateTime(self.0.created_at)
	}

	#[graphql(name = "updatedAt")]
	async fn updated_at(&self) -> Iso8601DateTime {
		Iso8601DateTime(self.0.updated_at)
	}
}

/// Input of the `createOrder` mutation.
///
/// Fields are nullable on the wire; blank values are rejected by the store
/// with one error per field.
#[derive(Debug, Default, InputObject)]
#[graphql(name = "CreateOrderInput")]
pub struct CreateOrderInput {
	#[graphql(name = "fullName")]
	pub full_name: Option<String>,
	#[graphql(name = "address")]
	pub address: Option<String>,
	#[graphql(name = "status")]
	pub status: Option<String>,
	#[graphql(name = "itemName")]
	pub item_name: Option<String>,
	#[graphql(name = "total")]
	pub total: Option<i32>,
	/// Opaque value echoed back in the payload.
	#[graphql(name = "clientMutationId")]
	pub client_mutation_id: Option<String>,
}

impl CreateOrderInput {
	/// Splits the input into store attributes and the client mutation id.
	pub fn into_parts(self) -> (OrderAttributes, Option<String>) {
		let attributes = OrderAttributes {
			full_name: self.full_name,
			address: self.address,
			status: self.status,
			item_name: self.item_name,
			total: self.total,
		};
		(attributes, self.client_mutation_id)
	}
}

/// Result of the `createOrder` mutation.
#[derive(SimpleObject)]
#[graphql(name = "CreateOrderPayload")]
pub struct CreateOrderPayload {
	#[graphql(name = "order")]
	pub order: Option<OrderObject>,
	// Validation failures are reported as top-level errors, so this
	// stays empty on every payload that is returned.
	#[graphql(name = "errors")]
	pub errors: Vec<String>,
	#[graphql(name = "clientMutationId")]
	pub client_mutation_id: Option<String>,
}
