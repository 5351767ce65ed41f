//! # polyschema-mock — Reference Vendors
//!
//! Two small, self-contained schema libraries with complete adapters, used
//! by the workspace test suites to drive the compiler and the validator
//! normalizer end to end. They model the two ways real libraries represent
//! modifiers:
//!
//! - [`fluent`]: every modifier is a wrapper node around another node;
//!   recursion goes through lazy nodes; validation returns parsed output
//!   and segment-list issue paths.
//! - [`describe`]: a schema is one JSON document and modifiers are flags
//!   on it; validation returns a bare boolean or accessor-chain paths.
//!
//! Neither binds to a real library.

pub mod describe;
pub mod fluent;

use std::sync::Arc;

use polyschema_core::AdapterRegistry;

pub use describe::DescribeAdapter;
pub use fluent::FluentAdapter;

/// Registry with both reference vendors, fluent first.
pub fn registry() -> AdapterRegistry {
    AdapterRegistry::new()
        .with_adapter(Arc::new(FluentAdapter))
        .with_adapter(Arc::new(DescribeAdapter))
}
