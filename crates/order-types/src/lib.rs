//! Common types module for the order service.
//!
//! This crate defines the order record, the caller-supplied attributes it is
//! built from, and the validation types shared by the storage backends and
//! the GraphQL layer.

/// Record validation errors and field name humanization.
pub mod errors;
/// Order records, creation attributes and list filters.
pub mod order;
/// Self-registration trait for pluggable implementations.
pub mod registry;
/// Configuration validation types for backend configuration tables.
pub mod validation;

pub use errors::{humanize, FieldError, ValidationErrors};
pub use order::{NewOrder, Order, OrderAttributes, OrderFilter};
pub use registry::ImplementationRegistry;
pub use validation::*;
