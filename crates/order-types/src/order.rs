//! Order records and the attributes they are created from.

use crate::errors::{FieldError, ValidationErrors};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
	/// Store-assigned identifier. Ids increase strictly in creation order.
	pub id: u64,
	pub full_name: String,
	pub address: String,
	/// Payment status, e.g. `UNPAID` or `PAID`. Not restricted to known values.
	pub status: String,
	pub item_name: String,
	pub total: i32,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Order {
	/// Builds the record stored for `order` under a freshly assigned id.
	pub fn from_new(id: u64, order: NewOrder, now: DateTime<Utc>) -> Self {
		Self {
			id,
			full_name: order.full_name,
			address: order.address,
			status: order.status,
			item_name: order.item_name,
			total: order.total,
			created_at: now,
			updated_at: now,
		}
	}
}

/// Attributes supplied by a caller to create an order.
///
/// Every field is optional here because the transport only guarantees the
/// field was sent, not that it carries a value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAttributes {
	pub full_name: Option<String>,
	pub address: Option<String>,
	pub status: Option<String>,
	pub item_name: Option<String>,
	pub total: Option<i32>,
}

/// An order that passed validation and is ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
	pub full_name: String,
	pub address: String,
	pub status: String,
	pub item_name: String,
	pub total: i32,
}

/// Values that can be blank.
trait Presence {
	fn is_blank(&self) -> bool;
}

impl Presence for String {
	fn is_blank(&self) -> bool {
		self.trim().is_empty()
	}
}

impl Presence for i32 {
	fn is_blank(&self) -> bool {
		false
	}
}

/// Records an error for `field` unless `value` is present and non-blank.
fn require<T: Presence>(errors: &mut ValidationErrors, field: &str, value: Option<T>) -> Option<T> {
	match value {
		Some(value) if !value.is_blank() => Some(value),
		_ => {
			errors.push(FieldError::blank(field));
			None
		},
	}
}

impl OrderAttributes {
	/// Validates every required field.
	///
	/// All five fields are checked even after a failure, so the error
	/// carries one entry per blank field in declaration order.
	pub fn validate(self) -> Result<NewOrder, ValidationErrors> {
		let mut errors = ValidationErrors::default();

		let full_name = require(&mut errors, "full_name", self.full_name);
		let address = require(&mut errors, "address", self.address);
		let status = require(&mut errors, "status", self.status);
		let item_name = require(&mut errors, "item_name", self.item_name);
		let total = require(&mut errors, "total", self.total);

		match (full_name, address, status, item_name, total) {
			(Some(full_name), Some(address), Some(status), Some(item_name), Some(total)) => {
				Ok(NewOrder {
					full_name,
					address,
					status,
					item_name,
					total,
				})
			},
			_ => Err(errors),
		}
	}
}

/// Selection criteria for listing orders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
	/// Exact, case-sensitive status to match. `None` matches every order.
	pub status: Option<String>,
}

impl OrderFilter {
	/// A filter matching every order.
	pub fn all() -> Self {
		Self::default()
	}

	pub fn by_status(status: impl Into<String>) -> Self {
		Self {
			status: Some(status.into()),
		}
	}

	pub fn matches(&self, order: &Order) -> bool {
		match &self.status {
			Some(status) => order.status == *status,
			None => true,
		}
	}
}
