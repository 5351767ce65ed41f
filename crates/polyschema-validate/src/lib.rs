//! # polyschema-validate — Validator Normalizer
//!
//! One call validates data against a schema from any registered vendor
//! and always answers in the same shape:
//!
//! ```json
//! {"success": true,  "data": ...}
//! {"success": false, "issues": [{"message": "...", "path": ["items", 0]}]}
//! ```
//!
//! Data checking is delegated entirely to the vendor's own validator via
//! [`SchemaAdapter::validate`](polyschema_core::SchemaAdapter::validate)
//! or its async counterpart. This crate only adapts result shapes and
//! issue paths.
//!
//! ## Crate Policy
//!
//! - Depends only on `polyschema-core` internally.
//! - Total: every failure mode, including a vendor error and an unclaimed
//!   node, yields a [`ValidationResult`](polyschema_core::ValidationResult).
//! - No timeouts or retries; async cancellation belongs to the caller.

pub mod normalize;
pub mod path;

pub use normalize::{normalize, unsupported, Validator, GENERIC_FAILURE};
pub use path::normalize_path;
