//! # Recursive Compiler
//!
//! [`Compiler::compile`] turns any registered vendor's schema tree into a
//! JSON Schema document. Per node:
//!
//! 1. **Cycle check.** A node already in the visit set compiles to
//!    `{"$ref": "#/$defs/<name>"}`; the node is named once and its full
//!    fragment is stored under `$defs` when its own compilation finishes.
//! 2. **Resolve** the node's adapter. Children are re-resolved, so one
//!    document may mix vendors. No adapter means `{}`.
//! 3. **Unwrap loop.** Modifier layers (optional, nullable, default, catch,
//!    refine, branded, transform, lazy) are peeled off with
//!    [`SchemaAdapter::unwrap`] until a structural node or a terminal is
//!    reached. Every unwrapped node joins the visit set before anything
//!    under it is compiled.
//! 4. **Dispatch** on the structural shape and recurse into children.
//! 5. **Merge** constraints and metadata from the structural node outward
//!    through each layer, so outer layers win.
//!
//! Compilation is total. An adapter error degrades only the node that
//! raised it to `{}`.

use std::collections::{HashMap, HashSet};

use polyschema_core::{AdapterError, AdapterRegistry, NodeId, SchemaAdapter, SchemaNode};
use serde_json::{json, Map, Value};

use crate::fragment::Fragment;
use crate::options::CompileOptions;
use crate::shape::{Bounds, Modifier, Shape};

/// Keywords that make a compiled key schema worth keeping as `propertyNames`.
const KEY_RESTRICTIONS: &[&str] = &["enum", "const", "pattern", "format", "minLength", "maxLength"];

/// JSON Schema compiler bound to an adapter registry.
///
/// The compiler holds no per-call state; each [`Compiler::compile`] call
/// builds its own session, so one compiler may be shared across threads.
#[derive(Debug, Clone)]
pub struct Compiler<'r> {
    registry: &'r AdapterRegistry,
    options: CompileOptions,
}

impl<'r> Compiler<'r> {
    /// Create a compiler with default options.
    pub fn new(registry: &'r AdapterRegistry) -> Self {
        Self {
            registry,
            options: CompileOptions::default(),
        }
    }

    /// Builder: replace the options.
    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    /// Current options.
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compile `node` into a JSON Schema document.
    pub fn compile(&self, node: &SchemaNode) -> Value {
        let mut session = Session::new(self.registry, &self.options);
        let root = session.compile_node(node, 0).schema;
        session.into_document(root)
    }
}

/// Result of compiling one node as seen by its parent.
struct Compiled {
    schema: Value,
    /// Some layer of the node's modifier chain was `optional`.
    optional: bool,
    /// Keyword family of the node's structural shape, for wrappers that
    /// embed the schema and add bounds of their own.
    bounds: Bounds,
}

impl Compiled {
    fn required(schema: Value, bounds: Bounds) -> Self {
        Self {
            schema,
            optional: false,
            bounds,
        }
    }

    fn empty() -> Self {
        Self::required(Value::Object(Map::new()), Bounds::Value)
    }
}

/// One peeled modifier.
struct Layer<'a> {
    node: SchemaNode,
    adapter: &'a dyn SchemaAdapter,
    modifier: Modifier,
}

/// State for one top-level `compile` call.
struct Session<'a> {
    registry: &'a AdapterRegistry,
    options: &'a CompileOptions,
    /// Nodes currently being compiled. Handles are held so that an
    /// in-progress node's address cannot be reused by another node.
    visiting: HashMap<NodeId, SchemaNode>,
    /// `$defs` names of nodes reached recursively.
    names: HashMap<NodeId, (String, SchemaNode)>,
    /// Base shape bounds of in-progress chains, for `$ref`s back into them.
    bounds: HashMap<NodeId, Bounds>,
    taken: HashSet<String>,
    defs: Map<String, Value>,
    counter: usize,
}

impl<'a> Session<'a> {
    fn new(registry: &'a AdapterRegistry, options: &'a CompileOptions) -> Self {
        Self {
            registry,
            options,
            visiting: HashMap::new(),
            names: HashMap::new(),
            bounds: HashMap::new(),
            taken: HashSet::new(),
            defs: Map::new(),
            counter: 0,
        }
    }

    fn compile_node(&mut self, node: &SchemaNode, depth: usize) -> Compiled {
        if self.visiting.contains_key(&node.id()) {
            let (schema, bounds) = self.reference(node);
            return Compiled::required(schema, bounds);
        }
        if depth > self.options.max_depth {
            tracing::warn!(
                max_depth = self.options.max_depth,
                node_type = node.type_name(),
                "schema nesting exceeds max_depth; emitting empty schema"
            );
            return Compiled::empty();
        }

        let registry = self.registry;
        let Some(adapter) = registry.resolve(node) else {
            tracing::debug!(
                node_type = node.type_name(),
                "no adapter claims schema node; emitting empty schema"
            );
            return Compiled::empty();
        };

        let mut entered = Vec::new();
        let mut optional = false;
        let result = self.compile_chain(node, adapter, depth, &mut entered, &mut optional);
        for id in &entered {
            self.visiting.remove(id);
            self.bounds.remove(id);
        }

        match result {
            Ok(compiled) => compiled,
            Err(err) => {
                tracing::warn!(
                    vendor = err.vendor(),
                    error = %err,
                    "schema node could not be compiled; emitting empty schema"
                );
                // Recursion points under the failed node must still resolve.
                for id in &entered {
                    if let Some((name, _)) = self.names.get(id) {
                        if !self.defs.contains_key(name) {
                            self.defs.insert(name.clone(), Value::Object(Map::new()));
                        }
                    }
                }
                Compiled {
                    optional,
                    ..Compiled::empty()
                }
            }
        }
    }

    fn compile_chain(
        &mut self,
        node: &SchemaNode,
        adapter: &'a dyn SchemaAdapter,
        depth: usize,
        entered: &mut Vec<NodeId>,
        optional: &mut bool,
    ) -> Result<Compiled, AdapterError> {
        self.enter(node, entered);

        let registry = self.registry;
        let mut layers: Vec<Layer<'a>> = Vec::new();
        let mut current = node.clone();
        let mut adapter = adapter;
        let mut base: Option<(SchemaNode, &'a dyn SchemaAdapter, Option<Modifier>)> = None;

        let mut fragment = loop {
            let Some(modifier) = Modifier::of(adapter, &current) else {
                self.record_bounds(adapter, &current, entered);
                let fragment = self.compile_shape(&current, adapter, depth)?;
                base = Some((current, adapter, None));
                break fragment;
            };
            if layers.len() >= self.options.max_depth {
                return Err(AdapterError::malformed(
                    adapter.vendor(),
                    "modifier chain does not reach a terminal node",
                ));
            }
            *optional |= modifier == Modifier::Optional;

            let Some(inner) = adapter.unwrap(&current)? else {
                // A modifier with nothing to unwrap is its own base.
                self.record_bounds(adapter, &current, entered);
                let fragment = self.compile_shape(&current, adapter, depth)?;
                base = Some((current, adapter, Some(modifier)));
                break fragment;
            };

            layers.push(Layer {
                node: current,
                adapter,
                modifier,
            });

            if self.visiting.contains_key(&inner.id()) {
                let (schema, bounds) = self.reference(&inner);
                break Fragment::embed(schema, bounds);
            }
            self.enter(&inner, entered);

            match registry.resolve(&inner) {
                Some(next) => adapter = next,
                None => {
                    tracing::debug!(
                        node_type = inner.type_name(),
                        "no adapter claims unwrapped schema node; emitting empty schema"
                    );
                    break Fragment::any();
                }
            }
            current = inner;
        };

        if let Some((node, adapter, modifier)) = &base {
            fragment.absorb(*adapter, node);
            if *modifier == Some(Modifier::Nullable) {
                fragment.mark_nullable();
            }
            self.materialize(node, &fragment);
        }
        for layer in layers.iter().rev() {
            fragment.absorb(layer.adapter, &layer.node);
            if layer.modifier == Modifier::Nullable {
                fragment.mark_nullable();
            }
            self.materialize(&layer.node, &fragment);
        }

        Ok(Compiled {
            schema: fragment.finalize(),
            optional: *optional,
            bounds: fragment.bounds(),
        })
    }

    fn compile_shape(
        &mut self,
        node: &SchemaNode,
        adapter: &'a dyn SchemaAdapter,
        depth: usize,
    ) -> Result<Fragment, AdapterError> {
        let Some(shape) = Shape::of(adapter, node) else {
            tracing::debug!(
                vendor = adapter.vendor(),
                node_type = node.type_name(),
                "adapter reports no known shape; emitting empty schema"
            );
            return Ok(Fragment::any());
        };
        let child_depth = depth + 1;
        let mut body = Map::new();

        match shape {
            Shape::Literal => {
                if let Some(value) = adapter.literal_value(node) {
                    body.insert("const".into(), value);
                }
            }
            Shape::Enum => {
                let values = adapter.enum_values(node);
                if values.is_empty() {
                    body.insert("not".into(), json!({}));
                } else {
                    body.insert("enum".into(), Value::Array(values));
                }
            }
            Shape::Date => self.date_body(&mut body),
            Shape::InstanceOf => match adapter.instance_of_class(node).as_deref() {
                Some("Date") => self.date_body(&mut body),
                _ => {
                    body.insert("type".into(), json!("object"));
                }
            },
            Shape::BigInt => {
                body.insert("type".into(), json!("integer"));
            }
            Shape::Symbol | Shape::Function | Shape::Any | Shape::Unknown => {}
            Shape::Promise => {
                if let Some(inner) = adapter.promise_inner(node)? {
                    let inner = self.compile_node(&inner, child_depth);
                    return Ok(Fragment::embed(inner.schema, inner.bounds));
                }
            }
            Shape::Union => {
                let mut options = Vec::new();
                for option in adapter.union_options(node)? {
                    options.push(self.compile_node(&option, child_depth));
                }
                if options.len() == 1 {
                    if let Some(only) = options.pop() {
                        return Ok(Fragment::embed(only.schema, only.bounds));
                    }
                }
                if options.is_empty() {
                    body.insert("not".into(), json!({}));
                } else {
                    let branches = options.into_iter().map(|o| o.schema).collect();
                    body.insert("anyOf".into(), Value::Array(branches));
                }
            }
            Shape::Intersection => {
                let mut parts = Vec::new();
                for part in adapter.intersection_schemas(node)? {
                    parts.push(self.compile_node(&part, child_depth).schema);
                }
                if !parts.is_empty() {
                    body.insert("allOf".into(), Value::Array(parts));
                }
            }
            Shape::Tuple => {
                let mut items = Vec::new();
                for item in adapter.tuple_items(node)? {
                    items.push(self.compile_node(&item, child_depth).schema);
                }
                let count = items.len();
                let rest = match adapter.tuple_rest(node)? {
                    Some(rest) => Some(self.compile_node(&rest, child_depth).schema),
                    None => None,
                };
                body.insert("type".into(), json!("array"));
                // A positional `items` list must be non-empty; with no fixed
                // positions the rest element applies to every item.
                match (count, rest) {
                    (0, Some(rest)) => {
                        body.insert("items".into(), rest);
                    }
                    (0, None) => {
                        body.insert("maxItems".into(), Value::from(0));
                    }
                    (_, Some(rest)) => {
                        body.insert("items".into(), Value::Array(items));
                        body.insert("additionalItems".into(), rest);
                        body.insert("minItems".into(), Value::from(count));
                    }
                    (_, None) => {
                        body.insert("items".into(), Value::Array(items));
                        body.insert("minItems".into(), Value::from(count));
                        body.insert("maxItems".into(), Value::from(count));
                    }
                }
            }
            Shape::Object => {
                let mut properties = Map::new();
                let mut required = Vec::new();
                for (key, child) in adapter.object_entries(node)? {
                    let compiled = self.compile_node(&child, child_depth);
                    let key_value = Value::String(key.clone());
                    // A repeated key replaces the earlier entry.
                    required.retain(|k| k != &key_value);
                    if !compiled.optional {
                        required.push(key_value);
                    }
                    properties.insert(key, compiled.schema);
                }
                body.insert("type".into(), json!("object"));
                body.insert("properties".into(), Value::Object(properties));
                if !required.is_empty() {
                    body.insert("required".into(), Value::Array(required));
                }
            }
            Shape::Array => {
                body.insert("type".into(), json!("array"));
                if let Some(element) = adapter.array_element(node)? {
                    let items = self.compile_node(&element, child_depth).schema;
                    body.insert("items".into(), items);
                }
            }
            Shape::Record => {
                let key = adapter.record_key_type(node)?;
                let value = adapter.record_value_type(node)?;
                self.keyed_body(&mut body, key, value, child_depth);
            }
            Shape::Map => {
                let key = adapter.map_key_type(node)?;
                let value = adapter.map_value_type(node)?;
                self.keyed_body(&mut body, key, value, child_depth);
            }
            Shape::Set => {
                body.insert("type".into(), json!("array"));
                body.insert("uniqueItems".into(), Value::Bool(true));
                if let Some(element) = adapter.set_element(node)? {
                    let items = self.compile_node(&element, child_depth).schema;
                    body.insert("items".into(), items);
                }
            }
            Shape::String => {
                body.insert("type".into(), json!("string"));
            }
            Shape::Number => {
                body.insert("type".into(), json!("number"));
            }
            Shape::Boolean => {
                body.insert("type".into(), json!("boolean"));
            }
            Shape::Null => {
                body.insert("type".into(), json!("null"));
            }
            Shape::Undefined | Shape::Void | Shape::Never => {
                body.insert("not".into(), json!({}));
            }
        }

        Ok(Fragment::new(body, shape.bounds()))
    }

    fn date_body(&self, body: &mut Map<String, Value>) {
        body.insert("type".into(), json!("string"));
        body.insert(
            "format".into(),
            Value::String(self.options.date_format.clone()),
        );
    }

    /// Body for records and maps: values become `additionalProperties`;
    /// keys survive only as a string restriction in `propertyNames`.
    fn keyed_body(
        &mut self,
        body: &mut Map<String, Value>,
        key: Option<SchemaNode>,
        value: Option<SchemaNode>,
        depth: usize,
    ) {
        body.insert("type".into(), json!("object"));
        if let Some(key) = key {
            let key_schema = self.compile_node(&key, depth).schema;
            let restricts = key_schema
                .as_object()
                .is_some_and(|k| KEY_RESTRICTIONS.iter().any(|kw| k.contains_key(*kw)));
            if restricts {
                body.insert("propertyNames".into(), key_schema);
            }
        }
        if let Some(value) = value {
            let value_schema = self.compile_node(&value, depth).schema;
            body.insert("additionalProperties".into(), value_schema);
        }
    }

    /// Note the base shape's bounds for every node of the current chain.
    fn record_bounds(
        &mut self,
        adapter: &dyn SchemaAdapter,
        base: &SchemaNode,
        entered: &[NodeId],
    ) {
        let bounds = Shape::of(adapter, base).map_or(Bounds::Value, Shape::bounds);
        for id in entered {
            self.bounds.insert(*id, bounds);
        }
    }

    fn enter(&mut self, node: &SchemaNode, entered: &mut Vec<NodeId>) {
        let id = node.id();
        if self.visiting.insert(id, node.clone()).is_none() {
            entered.push(id);
        }
    }

    /// `$ref` to `node`, naming it on first use, with the bounds of the
    /// shape it refers to.
    fn reference(&mut self, node: &SchemaNode) -> (Value, Bounds) {
        let id = node.id();
        let name = match self.names.get(&id) {
            Some((name, _)) => name.clone(),
            None => {
                let name = self.def_name(node);
                self.taken.insert(name.clone());
                self.names.insert(id, (name.clone(), node.clone()));
                name
            }
        };
        tracing::debug!(def = %name, "recursive schema reference");
        let bounds = self.bounds.get(&id).copied().unwrap_or(Bounds::Value);
        (json!({ "$ref": format!("#/$defs/{name}") }), bounds)
    }

    fn def_name(&mut self, node: &SchemaNode) -> String {
        if self.options.name_defs_from_title {
            let title = self
                .registry
                .resolve(node)
                .and_then(|adapter| adapter.title(node));
            if let Some(title) = title.filter(|t| is_def_name(t) && !self.taken.contains(t)) {
                return title;
            }
        }
        loop {
            let candidate = format!("{}{}", self.options.def_prefix, self.counter);
            self.counter += 1;
            if !self.taken.contains(&candidate) {
                return candidate;
            }
        }
    }

    /// Store the fragment of a named node under `$defs`, once.
    fn materialize(&mut self, node: &SchemaNode, fragment: &Fragment) {
        if let Some((name, _)) = self.names.get(&node.id()) {
            if !self.defs.contains_key(name) {
                self.defs.insert(name.clone(), fragment.finalize());
            }
        }
    }

    fn into_document(self, root: Value) -> Value {
        let Value::Object(root) = root else {
            return root;
        };
        let mut doc = Map::new();
        if let Some(uri) = &self.options.schema_uri {
            doc.insert("$schema".into(), Value::String(uri.clone()));
        }
        doc.extend(root);
        if !self.defs.is_empty() {
            doc.insert("$defs".into(), Value::Object(self.defs));
        }
        Value::Object(doc)
    }
}

/// Titles usable verbatim as `$defs` keys (no JSON Pointer escaping needed).
fn is_def_name(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
