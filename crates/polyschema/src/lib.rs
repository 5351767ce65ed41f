//! # polyschema — Vendor-Agnostic Schemas
//!
//! Register one adapter per schema library at startup, then validate data
//! or compile JSON Schema from any of their schemas through one API:
//!
//! ```ignore
//! polyschema::register(Arc::new(MyVendorAdapter));
//!
//! let document = polyschema::compile(&schema);
//! let result = polyschema::validate(&schema, &data);
//! ```
//!
//! ## Process-Wide Registry
//!
//! Adapters live in one registry behind a `parking_lot::RwLock`. Only
//! [`register`] and [`set_policy`] take the write lock. Every entry point
//! works on a snapshot taken by [`registry`], so no lock is held while a
//! document compiles or across an `.await`. Code that needs isolation
//! (tests, embedded use) can build its own [`AdapterRegistry`] and use
//! [`Compiler`] and [`Validator`] directly.

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

pub use polyschema_compiler::{CompileOptions, Compiler, ConfigError};
pub use polyschema_core::{
    AdapterError, AdapterRegistry, Constraints, Issue, NativeIssue, NativeOutcome, NativePath,
    NodeId, PathSegment, ResolvePolicy, SchemaAdapter, SchemaNode, ValidationResult,
};
pub use polyschema_validate::{normalize_path, Validator};

static REGISTRY: RwLock<AdapterRegistry> = parking_lot::const_rwlock(AdapterRegistry::new());

/// Append an adapter to the process-wide registry.
///
/// Registration order is resolution order: an earlier adapter wins every
/// node it claims.
pub fn register(adapter: Arc<dyn SchemaAdapter>) {
    REGISTRY.write().register(adapter);
}

/// Change how the process-wide registry treats nodes claimed by several
/// adapters.
pub fn set_policy(policy: ResolvePolicy) {
    tracing::debug!(?policy, "setting adapter resolve policy");
    REGISTRY.write().set_policy(policy);
}

/// Snapshot of the process-wide registry.
pub fn registry() -> AdapterRegistry {
    REGISTRY.read().clone()
}

/// Compile `schema` into a JSON Schema document with default options.
pub fn compile(schema: &SchemaNode) -> Value {
    compile_with(schema, &CompileOptions::default())
}

/// Compile `schema` with explicit options.
pub fn compile_with(schema: &SchemaNode, options: &CompileOptions) -> Value {
    let registry = registry();
    Compiler::new(&registry)
        .with_options(options.clone())
        .compile(schema)
}

/// Validate `data` against `schema` with its vendor's validator.
pub fn validate(schema: &SchemaNode, data: &Value) -> ValidationResult {
    let registry = registry();
    Validator::new(&registry).validate(schema, data)
}

/// Validate `data` against `schema` with its vendor's async validator.
pub async fn validate_async(schema: &SchemaNode, data: &Value) -> ValidationResult {
    let registry = registry();
    Validator::new(&registry).validate_async(schema, data).await
}
