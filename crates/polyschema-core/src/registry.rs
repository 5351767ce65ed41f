//! # Adapter Registry
//!
//! An ordered list of vendor adapters. [`AdapterRegistry::resolve`] walks
//! the list front to back and returns the first adapter whose `matches`
//! accepts the node.
//!
//! ## Ordering
//!
//! Registration order is significant. When one vendor's duck-typed shape
//! is a strict superset of another's, the more specific vendor must be
//! registered first or the general one will claim its nodes.
//!
//! ## Ambiguity
//!
//! First match is authoritative. With [`ResolvePolicy::WarnOnAmbiguity`]
//! the registry still returns the first match, but checks the remaining
//! adapters and logs every vendor that also claims the node.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::adapter::SchemaAdapter;
use crate::node::SchemaNode;

/// How [`AdapterRegistry::resolve`] treats nodes claimed by several adapters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvePolicy {
    /// Return the first match without checking the rest.
    #[default]
    FirstMatch,
    /// Return the first match and warn if any later adapter also matches.
    WarnOnAmbiguity,
}

/// Ordered collection of vendor adapters.
///
/// Cloning is cheap (the adapters are shared), which lets callers take a
/// snapshot of a shared registry before long-running or async work.
#[derive(Clone)]
pub struct AdapterRegistry {
    adapters: Vec<Arc<dyn SchemaAdapter>>,
    policy: ResolvePolicy,
}

impl AdapterRegistry {
    /// Create an empty registry with [`ResolvePolicy::FirstMatch`].
    pub const fn new() -> Self {
        Self {
            adapters: Vec::new(),
            policy: ResolvePolicy::FirstMatch,
        }
    }

    /// Builder: set the resolve policy.
    pub fn with_policy(mut self, policy: ResolvePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Builder: append an adapter.
    pub fn with_adapter(mut self, adapter: Arc<dyn SchemaAdapter>) -> Self {
        self.register(adapter);
        self
    }

    /// Change the resolve policy.
    pub fn set_policy(&mut self, policy: ResolvePolicy) {
        self.policy = policy;
    }

    /// Current resolve policy.
    pub fn policy(&self) -> ResolvePolicy {
        self.policy
    }

    /// Append an adapter. Earlier registrations are tried first.
    pub fn register(&mut self, adapter: Arc<dyn SchemaAdapter>) {
        tracing::debug!(
            vendor = adapter.vendor(),
            position = self.adapters.len(),
            "registering schema adapter"
        );
        self.adapters.push(adapter);
    }

    /// Return the first adapter that claims `node`.
    pub fn resolve(&self, node: &SchemaNode) -> Option<&dyn SchemaAdapter> {
        let position = self.adapters.iter().position(|a| a.matches(node))?;
        let adapter = self.adapters[position].as_ref();

        if self.policy == ResolvePolicy::WarnOnAmbiguity {
            let others: Vec<&str> = self.adapters[position + 1..]
                .iter()
                .filter(|a| a.matches(node))
                .map(|a| a.vendor())
                .collect();
            if !others.is_empty() {
                tracing::warn!(
                    chosen = adapter.vendor(),
                    also_matching = ?others,
                    node_type = node.type_name(),
                    "schema node claimed by several adapters; using first registered"
                );
            }
        }

        Some(adapter)
    }

    /// Every vendor whose adapter claims `node`, in registration order.
    pub fn matching_vendors(&self, node: &SchemaNode) -> Vec<&str> {
        self.adapters
            .iter()
            .filter(|a| a.matches(node))
            .map(|a| a.vendor())
            .collect()
    }

    /// Registered vendor names, in registration order.
    pub fn vendors(&self) -> Vec<&str> {
        self.adapters.iter().map(|a| a.vendor()).collect()
    }

    /// Number of registered adapters.
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Returns true if no adapter is registered.
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("vendors", &self.vendors())
            .field("policy", &self.policy)
            .finish()
    }
}
