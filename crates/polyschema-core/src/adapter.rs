//! # Capability Trait
//!
//! [`SchemaAdapter`] is every question the compiler and the validator
//! normalizer may ask about a schema node. One implementation exists per
//! vendor library; it is the only extension point of polyschema.
//!
//! ## Defaults
//!
//! Only [`SchemaAdapter::vendor`] and [`SchemaAdapter::matches`] are
//! required. Predicates default to `false`, extractors to empty/`None`,
//! and native validation to [`AdapterError::Unsupported`]. A vendor that
//! cannot express a concept simply never reports it; the compiler then
//! emits `{}` for that node.
//!
//! ## Contract
//!
//! - `matches` must be cheap, side-effect free and total: it is called for
//!   every node the engines touch, with payloads of any type.
//! - For a given node, at most one type predicate should be true at a
//!   time; the compiler dispatches first-true-wins in a fixed order.
//! - `unwrap` returns the single wrapped node of a modifier and `None` at
//!   a terminal node, so the compiler's unwrap loop always ends.
//! - Lazy nodes should hand back the same [`SchemaNode`] on every
//!   `unwrap`; identity is how recursion is detected.
//!
//! The trait is object safe and requires `Send + Sync`, so adapters live
//! in the registry as `Arc<dyn SchemaAdapter>`.

use async_trait::async_trait;
use serde_json::Value;

use crate::constraints::Constraints;
use crate::error::AdapterError;
use crate::node::SchemaNode;
use crate::outcome::NativeOutcome;

/// Vendor adapter: the capability interface for one schema library.
#[async_trait]
pub trait SchemaAdapter: Send + Sync {
    /// Vendor name, e.g. `"zod"`.
    fn vendor(&self) -> &str;

    /// Returns true if `node` belongs to this vendor.
    fn matches(&self, node: &SchemaNode) -> bool;

    // ── Type predicates ─────────────────────────────────────────────────

    fn is_string(&self, _node: &SchemaNode) -> bool {
        false
    }
    fn is_number(&self, _node: &SchemaNode) -> bool {
        false
    }
    fn is_boolean(&self, _node: &SchemaNode) -> bool {
        false
    }
    fn is_null(&self, _node: &SchemaNode) -> bool {
        false
    }
    fn is_undefined(&self, _node: &SchemaNode) -> bool {
        false
    }
    fn is_void(&self, _node: &SchemaNode) -> bool {
        false
    }
    fn is_any(&self, _node: &SchemaNode) -> bool {
        false
    }
    fn is_unknown(&self, _node: &SchemaNode) -> bool {
        false
    }
    fn is_never(&self, _node: &SchemaNode) -> bool {
        false
    }
    fn is_object(&self, _node: &SchemaNode) -> bool {
        false
    }
    fn is_array(&self, _node: &SchemaNode) -> bool {
        false
    }
    fn is_union(&self, _node: &SchemaNode) -> bool {
        false
    }
    fn is_literal(&self, _node: &SchemaNode) -> bool {
        false
    }
    fn is_enum(&self, _node: &SchemaNode) -> bool {
        false
    }
    fn is_optional(&self, _node: &SchemaNode) -> bool {
        false
    }
    fn is_nullable(&self, _node: &SchemaNode) -> bool {
        false
    }
    fn is_tuple(&self, _node: &SchemaNode) -> bool {
        false
    }
    fn is_record(&self, _node: &SchemaNode) -> bool {
        false
    }
    fn is_map(&self, _node: &SchemaNode) -> bool {
        false
    }
    fn is_set(&self, _node: &SchemaNode) -> bool {
        false
    }
    fn is_intersection(&self, _node: &SchemaNode) -> bool {
        false
    }
    fn is_lazy(&self, _node: &SchemaNode) -> bool {
        false
    }
    fn is_transform(&self, _node: &SchemaNode) -> bool {
        false
    }
    fn is_refine(&self, _node: &SchemaNode) -> bool {
        false
    }
    fn is_default(&self, _node: &SchemaNode) -> bool {
        false
    }
    fn is_catch(&self, _node: &SchemaNode) -> bool {
        false
    }
    fn is_branded(&self, _node: &SchemaNode) -> bool {
        false
    }
    fn is_date(&self, _node: &SchemaNode) -> bool {
        false
    }
    fn is_bigint(&self, _node: &SchemaNode) -> bool {
        false
    }
    fn is_symbol(&self, _node: &SchemaNode) -> bool {
        false
    }
    fn is_function(&self, _node: &SchemaNode) -> bool {
        false
    }
    fn is_promise(&self, _node: &SchemaNode) -> bool {
        false
    }
    fn is_instance_of(&self, _node: &SchemaNode) -> bool {
        false
    }

    // ── Unwrap ──────────────────────────────────────────────────────────

    /// Inner node of a modifier (optional, nullable, default, catch,
    /// refine, branded, lazy) or the input side of a transform.
    /// `None` at a terminal node.
    fn unwrap(&self, _node: &SchemaNode) -> Result<Option<SchemaNode>, AdapterError> {
        Ok(None)
    }

    // ── Structural extractors ───────────────────────────────────────────

    /// Object entries in declaration order.
    fn object_entries(
        &self,
        _node: &SchemaNode,
    ) -> Result<Vec<(String, SchemaNode)>, AdapterError> {
        Ok(Vec::new())
    }

    fn array_element(&self, _node: &SchemaNode) -> Result<Option<SchemaNode>, AdapterError> {
        Ok(None)
    }

    fn union_options(&self, _node: &SchemaNode) -> Result<Vec<SchemaNode>, AdapterError> {
        Ok(Vec::new())
    }

    fn literal_value(&self, _node: &SchemaNode) -> Option<Value> {
        None
    }

    fn enum_values(&self, _node: &SchemaNode) -> Vec<Value> {
        Vec::new()
    }

    /// Fixed tuple positions, in order.
    fn tuple_items(&self, _node: &SchemaNode) -> Result<Vec<SchemaNode>, AdapterError> {
        Ok(Vec::new())
    }

    /// Variadic rest element of a tuple, if the vendor supports one.
    fn tuple_rest(&self, _node: &SchemaNode) -> Result<Option<SchemaNode>, AdapterError> {
        Ok(None)
    }

    fn record_key_type(&self, _node: &SchemaNode) -> Result<Option<SchemaNode>, AdapterError> {
        Ok(None)
    }

    fn record_value_type(
        &self,
        _node: &SchemaNode,
    ) -> Result<Option<SchemaNode>, AdapterError> {
        Ok(None)
    }

    fn map_key_type(&self, _node: &SchemaNode) -> Result<Option<SchemaNode>, AdapterError> {
        Ok(None)
    }

    fn map_value_type(&self, _node: &SchemaNode) -> Result<Option<SchemaNode>, AdapterError> {
        Ok(None)
    }

    fn set_element(&self, _node: &SchemaNode) -> Result<Option<SchemaNode>, AdapterError> {
        Ok(None)
    }

    fn intersection_schemas(
        &self,
        _node: &SchemaNode,
    ) -> Result<Vec<SchemaNode>, AdapterError> {
        Ok(Vec::new())
    }

    fn promise_inner(&self, _node: &SchemaNode) -> Result<Option<SchemaNode>, AdapterError> {
        Ok(None)
    }

    /// Class name for instance-of checks, e.g. `"Date"`.
    fn instance_of_class(&self, _node: &SchemaNode) -> Option<String> {
        None
    }

    // ── Constraints & metadata ──────────────────────────────────────────

    /// Constraints attached to this node only (not to its children).
    fn constraints(&self, _node: &SchemaNode) -> Option<Constraints> {
        None
    }

    fn description(&self, _node: &SchemaNode) -> Option<String> {
        None
    }

    fn title(&self, _node: &SchemaNode) -> Option<String> {
        None
    }

    /// Default value (default and catch modifiers).
    fn default_value(&self, _node: &SchemaNode) -> Option<Value> {
        None
    }

    fn examples(&self, _node: &SchemaNode) -> Vec<Value> {
        Vec::new()
    }

    fn is_deprecated(&self, _node: &SchemaNode) -> bool {
        false
    }

    // ── Native validation ───────────────────────────────────────────────

    /// Run the vendor's own validator synchronously.
    ///
    /// A vendor exception is reported as `Err`; the normalizer converts it
    /// into a failure result.
    fn validate(&self, _node: &SchemaNode, _data: &Value) -> Result<NativeOutcome, AdapterError> {
        Err(AdapterError::Unsupported {
            vendor: self.vendor().to_string(),
            operation: "validate",
        })
    }

    /// Run the vendor's async validator. Vendors without an async path
    /// inherit this fallback to [`SchemaAdapter::validate`].
    async fn validate_async(
        &self,
        node: &SchemaNode,
        data: &Value,
    ) -> Result<NativeOutcome, AdapterError> {
        self.validate(node, data)
    }
}
