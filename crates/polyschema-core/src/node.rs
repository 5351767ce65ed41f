//! # Schema Node Handles
//!
//! A [`SchemaNode`] wraps a value from some vendor's schema representation
//! behind `Arc<dyn Any + Send + Sync>`. Cloning a handle clones the `Arc`,
//! so every clone shares one [`NodeId`]. Recursive schemas rely on this:
//! a lazy getter that hands back the same handle each time lets the
//! compiler see the re-entry and emit a `$ref`.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Identity of a schema node: the address of its shared allocation.
///
/// Two handles compare equal only if they point at the same allocation.
/// Ids are meaningful only while at least one handle is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node@{:#x}", self.0)
    }
}

/// Opaque, cheaply clonable handle to a vendor schema value.
#[derive(Clone)]
pub struct SchemaNode {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl SchemaNode {
    /// Wrap a vendor value in a fresh allocation.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Wrap an existing `Arc`, keeping its identity.
    ///
    /// Vendors that already share their nodes through `Arc` should use this
    /// so that two handles built from the same `Arc` are the same node.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            inner: value,
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Borrow the payload as `T` if that is its concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Returns true if the payload is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Identity of the underlying allocation.
    pub fn id(&self) -> NodeId {
        NodeId(Arc::as_ptr(&self.inner) as *const () as usize)
    }

    /// Returns true if both handles share one allocation.
    pub fn ptr_eq(&self, other: &SchemaNode) -> bool {
        self.id() == other.id()
    }

    /// Rust type name of the payload, for diagnostics only.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for SchemaNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaNode")
            .field("id", &self.id())
            .field("type", &self.type_name)
            .finish()
    }
}
