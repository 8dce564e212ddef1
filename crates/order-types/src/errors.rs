//! Record-level validation errors.
//!
//! A failed validation never stops at the first problem: every violated
//! field contributes one [`FieldError`], and the collection keeps them in
//! the order the fields were checked.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single violated rule on a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
	/// Internal (snake_case) name of the offending field.
	pub field: String,
	/// Full human-readable message, e.g. `Item name can't be blank`.
	pub message: String,
}

impl FieldError {
	/// Creates the error reported when a required field is blank.
	pub fn blank(field: &str) -> Self {
		Self {
			field: field.to_string(),
			message: format!("{} can't be blank", humanize(field)),
		}
	}
}

/// Accumulated validation failures for one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
	errors: Vec<FieldError>,
}

impl ValidationErrors {
	pub fn push(&mut self, error: FieldError) {
		self.errors.push(error);
	}

	pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
		self.errors.iter()
	}

	/// Returns the message of every failure, in check order.
	pub fn full_messages(&self) -> Vec<String> {
		self.errors.iter().map(|e| e.message.clone()).collect()
	}
}

impl IntoIterator for ValidationErrors {
	type Item = FieldError;
	type IntoIter = std::vec::IntoIter<FieldError>;

	fn into_iter(self) -> Self::IntoIter {
		self.errors.into_iter()
	}
}

impl fmt::Display for ValidationErrors {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Validation failed: {}", self.full_messages().join(", "))
	}
}

impl std::error::Error for ValidationErrors {}

/// Turns a snake_case field name into the label used in messages.
///
/// Underscores become spaces and the first letter is capitalized, so
/// `item_name` becomes `Item name`.
pub fn humanize(field: &str) -> String {
	let spaced = field.replace('_', " ");
	let mut chars = spaced.trim().chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_humanize() {
		assert_eq!(humanize("full_name"), "Full name");
		assert_eq!(humanize("item_name"), "Item name");
		assert_eq!(humanize("total"), "Total");
		assert_eq!(humanize(""), "");
	}

	#[test]
	fn test_blank_message() {
		let error = FieldError::blank("item_name");
		assert_eq!(error.field, "item_name");
		assert_eq!(error.message, "Item name can't be blank");
	}

	#[test]
	fn test_display_joins_messages() {
		let mut errors = ValidationErrors::default();
		errors.push(FieldError::blank("address"));
		errors.push(FieldError::blank("total"));

		assert_eq!(errors.iter().count(), 2);
		assert_eq!(
			errors.to_string(),
			"Validation failed: Address can't be blank, Total can't be blank"
		);
	}
}
