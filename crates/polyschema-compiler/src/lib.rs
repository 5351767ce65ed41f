//! # polyschema-compiler — Generic JSON Schema Compiler
//!
//! Walks any vendor's schema tree through the [`SchemaAdapter`] capability
//! trait and produces a draft-07-compatible JSON Schema document. The
//! compiler knows no vendor; everything it learns about a node comes from
//! the adapter the registry resolves for that node.
//!
//! ## Pipeline
//!
//! - **Modifier unwrapping** peels optional, nullable, default, catch,
//!   refine, branded, transform and lazy layers until a structural node
//!   remains.
//! - **Structural dispatch** maps the remaining node to one of 25 shapes in
//!   a fixed priority order and recurses into its children.
//! - **Outer-wins merging** folds constraints and metadata from the
//!   structural node outward through each layer.
//! - **Cycle handling** replaces re-entry into an in-progress node with a
//!   `$ref` and stores that node once under `$defs`.
//!
//! ## Configuration
//!
//! [`CompileOptions`] controls the `$schema` URI, `$defs` naming, the depth
//! limit and the date format. It loads from YAML, JSON or `POLYSCHEMA_*`
//! environment variables.
//!
//! ## Crate Policy
//!
//! - Depends only on `polyschema-core` internally.
//! - Compilation is total: adapter failures degrade one node to `{}` and
//!   are logged through `tracing`, never returned.
//!
//! [`SchemaAdapter`]: polyschema_core::SchemaAdapter

mod compile;
mod fragment;
pub mod options;
mod shape;

pub use compile::Compiler;
pub use options::{CompileOptions, ConfigError};

use polyschema_core::{AdapterRegistry, SchemaNode};
use serde_json::Value;

/// Compile `node` with default options.
pub fn compile(registry: &AdapterRegistry, node: &SchemaNode) -> Value {
    Compiler::new(registry).compile(node)
}
