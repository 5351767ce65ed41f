//! # polyschema-core — Foundational Types
//!
//! This crate defines the contract between the polyschema engines (the
//! JSON Schema compiler and the validator normalizer) and the vendor
//! adapters that teach them about a particular schema library.
//!
//! ## Key Design Principles
//!
//! 1. **Opaque nodes.** A [`SchemaNode`] is an `Arc<dyn Any>` handle. The
//!    engines never look inside it; only the adapter that claims a node
//!    downcasts it. Node identity is allocation identity, which is what
//!    cycle detection keys on.
//!
//! 2. **Default-filled capability trait.** [`SchemaAdapter`] has two
//!    required methods (`vendor`, `matches`). Every predicate, extractor
//!    and metadata getter has a harmless default, so a partial adapter is
//!    still a complete one: unsupported concepts are never detected.
//!
//! 3. **Ordered, first-match registry.** [`AdapterRegistry`] resolves a node
//!    to the first adapter whose `matches` accepts it. Registration order
//!    is the only tie-breaker.
//!
//! 4. **Results by value.** Vendor validators report a [`NativeOutcome`];
//!    callers receive a [`ValidationResult`]. Neither holds shared state.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `polyschema-*` crates (leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod adapter;
pub mod constraints;
pub mod error;
pub mod node;
pub mod outcome;
pub mod registry;

// Re-export primary types for ergonomic imports.
pub use adapter::SchemaAdapter;
pub use constraints::Constraints;
pub use error::AdapterError;
pub use node::{NodeId, SchemaNode};
pub use outcome::{Issue, NativeIssue, NativeOutcome, NativePath, PathSegment, ValidationResult};
pub use registry::{AdapterRegistry, ResolvePolicy};
