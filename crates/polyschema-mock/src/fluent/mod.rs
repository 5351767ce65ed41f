//! # Fluent Vendor
//!
//! A builder-style schema library in the manner of chainable validation
//! libraries: constructors such as [`string`], [`object`] or [`union`]
//! return a [`Fluent`] builder; modifier methods such as
//! [`Fluent::optional`] wrap the current schema in a new node, so one
//! logical schema is a stack of wrapper nodes over a structural node.
//! Constraints and metadata may be attached at any layer.
//!
//! Recursion goes through [`Recursive`]: a shared slot that lazy nodes
//! read on every unwrap, so the recursive target keeps one identity.
//! [`lazy`] is the other flavour, a getter that may build a fresh node on
//! every call.
//!
//! [`FluentAdapter`] implements the full capability trait, including a
//! native validator that reports issue paths as segment lists.

mod check;

use std::fmt;
use std::sync::{Arc, OnceLock};

use polyschema_core::{AdapterError, Constraints, NativeOutcome, SchemaAdapter, SchemaNode};
use serde_json::Value;

/// Vendor name reported by [`FluentAdapter`].
pub const VENDOR: &str = "fluent";

/// Output transformation attached with [`Fluent::transform`].
pub type TransformFn = Arc<dyn Fn(Value) -> Value + Send + Sync>;
/// Predicate attached with [`Fluent::refine`].
pub type RefineFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;
/// Getter behind a [`lazy`] node.
pub type LazyFn = Arc<dyn Fn() -> SchemaNode + Send + Sync>;

#[derive(Clone)]
pub(crate) enum Kind {
    String,
    Number,
    Boolean,
    Null,
    Undefined,
    Void,
    Any,
    Unknown,
    Never,
    BigInt,
    Symbol,
    Function,
    Date,
    Literal(Value),
    Enum(Vec<Value>),
    InstanceOf(String),
    Object(Vec<(String, SchemaNode)>),
    Array(SchemaNode),
    Tuple {
        items: Vec<SchemaNode>,
        rest: Option<SchemaNode>,
    },
    Union(Vec<SchemaNode>),
    Intersection(Vec<SchemaNode>),
    Record {
        key: SchemaNode,
        value: SchemaNode,
    },
    Map {
        key: SchemaNode,
        value: SchemaNode,
    },
    Set(SchemaNode),
    Promise(SchemaNode),
    Optional(SchemaNode),
    Nullable(SchemaNode),
    Default(SchemaNode, Value),
    Catch(SchemaNode, Value),
    Refine {
        inner: SchemaNode,
        message: String,
        check: RefineFn,
    },
    Brand(SchemaNode, String),
    Transform(SchemaNode, TransformFn),
    Lazy(Lazy),
}

#[derive(Clone)]
pub(crate) enum Lazy {
    Slot(Arc<OnceLock<SchemaNode>>),
    Getter(LazyFn),
}

impl Lazy {
    fn force(&self) -> Result<SchemaNode, AdapterError> {
        match self {
            Self::Slot(slot) => slot.get().cloned().ok_or_else(|| {
                AdapterError::malformed(VENDOR, "lazy schema used before it was defined")
            }),
            Self::Getter(getter) => Ok(getter()),
        }
    }
}

impl Kind {
    fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Undefined => "undefined",
            Self::Void => "void",
            Self::Any => "any",
            Self::Unknown => "unknown",
            Self::Never => "never",
            Self::BigInt => "bigint",
            Self::Symbol => "symbol",
            Self::Function => "function",
            Self::Date => "date",
            Self::Literal(_) => "literal",
            Self::Enum(_) => "enum",
            Self::InstanceOf(_) => "instanceof",
            Self::Object(_) => "object",
            Self::Array(_) => "array",
            Self::Tuple { .. } => "tuple",
            Self::Union(_) => "union",
            Self::Intersection(_) => "intersection",
            Self::Record { .. } => "record",
            Self::Map { .. } => "map",
            Self::Set(_) => "set",
            Self::Promise(_) => "promise",
            Self::Optional(_) => "optional",
            Self::Nullable(_) => "nullable",
            Self::Default(..) => "default",
            Self::Catch(..) => "catch",
            Self::Refine { .. } => "refine",
            Self::Brand(..) => "brand",
            Self::Transform(..) => "transform",
            Self::Lazy(_) => "lazy",
        }
    }

    /// The wrapped node of a modifier kind.
    fn inner(&self) -> Result<Option<SchemaNode>, AdapterError> {
        Ok(match self {
            Self::Optional(inner)
            | Self::Nullable(inner)
            | Self::Default(inner, _)
            | Self::Catch(inner, _)
            | Self::Refine { inner, .. }
            | Self::Brand(inner, _)
            | Self::Transform(inner, _) => Some(inner.clone()),
            Self::Lazy(lazy) => Some(lazy.force()?),
            _ => None,
        })
    }
}

#[derive(Clone, Default)]
pub(crate) struct Meta {
    constraints: Constraints,
    title: Option<String>,
    description: Option<String>,
    examples: Vec<Value>,
    deprecated: bool,
}

/// One fluent schema node under construction.
#[derive(Clone)]
pub struct Fluent {
    pub(crate) kind: Kind,
    pub(crate) meta: Meta,
}

impl fmt::Debug for Fluent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fluent")
            .field("kind", &self.kind.name())
            .field("title", &self.meta.title)
            .finish_non_exhaustive()
    }
}

impl From<Fluent> for SchemaNode {
    fn from(schema: Fluent) -> Self {
        SchemaNode::new(schema)
    }
}

impl Fluent {
    fn new(kind: Kind) -> Self {
        Self {
            kind,
            meta: Meta::default(),
        }
    }

    /// Freeze the builder into a node handle.
    pub fn into_node(self) -> SchemaNode {
        self.into()
    }

    fn wrap(self, kind: impl FnOnce(SchemaNode) -> Kind) -> Self {
        Self::new(kind(self.into_node()))
    }

    // ── Constraints & metadata (attached to this layer) ─────────────────

    pub fn min(mut self, min: f64) -> Self {
        self.meta.constraints.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.meta.constraints.max = Some(max);
        self
    }

    pub fn min_length(mut self, len: u64) -> Self {
        self.meta.constraints.min_length = Some(len);
        self
    }

    pub fn max_length(mut self, len: u64) -> Self {
        self.meta.constraints.max_length = Some(len);
        self
    }

    /// Regex pattern. Reported to the compiler; not enforced by
    /// [`FluentAdapter::validate`].
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.meta.constraints.pattern = Some(pattern.into());
        self
    }

    /// Format name. Reported to the compiler; not enforced.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.meta.constraints.format = Some(format.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.meta.title = Some(title.into());
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.meta.description = Some(description.into());
        self
    }

    pub fn example(mut self, example: impl Into<Value>) -> Self {
        self.meta.examples.push(example.into());
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.meta.deprecated = true;
        self
    }

    // ── Modifiers (each wraps the current schema in a new node) ─────────

    pub fn optional(self) -> Self {
        self.wrap(Kind::Optional)
    }

    pub fn nullable(self) -> Self {
        self.wrap(Kind::Nullable)
    }

    /// Value used when the field is absent.
    pub fn default(self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.wrap(|inner| Kind::Default(inner, value))
    }

    /// Value used when validation of the inner schema fails.
    pub fn catch(self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.wrap(|inner| Kind::Catch(inner, value))
    }

    pub fn refine<F>(self, message: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let message = message.into();
        self.wrap(|inner| Kind::Refine {
            inner,
            message,
            check: Arc::new(check),
        })
    }

    pub fn brand(self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.wrap(|inner| Kind::Brand(inner, name))
    }

    pub fn transform<F>(self, f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.wrap(|inner| Kind::Transform(inner, Arc::new(f)))
    }
}

// ── Constructors ────────────────────────────────────────────────────────

pub fn string() -> Fluent {
    Fluent::new(Kind::String)
}

pub fn number() -> Fluent {
    Fluent::new(Kind::Number)
}

pub fn boolean() -> Fluent {
    Fluent::new(Kind::Boolean)
}

pub fn null() -> Fluent {
    Fluent::new(Kind::Null)
}

pub fn undefined() -> Fluent {
    Fluent::new(Kind::Undefined)
}

pub fn void() -> Fluent {
    Fluent::new(Kind::Void)
}

pub fn any() -> Fluent {
    Fluent::new(Kind::Any)
}

pub fn unknown() -> Fluent {
    Fluent::new(Kind::Unknown)
}

pub fn never() -> Fluent {
    Fluent::new(Kind::Never)
}

pub fn bigint() -> Fluent {
    Fluent::new(Kind::BigInt)
}

pub fn symbol() -> Fluent {
    Fluent::new(Kind::Symbol)
}

pub fn function() -> Fluent {
    Fluent::new(Kind::Function)
}

pub fn date() -> Fluent {
    Fluent::new(Kind::Date)
}

pub fn literal(value: impl Into<Value>) -> Fluent {
    Fluent::new(Kind::Literal(value.into()))
}

pub fn enumeration<I, V>(values: I) -> Fluent
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Fluent::new(Kind::Enum(values.into_iter().map(Into::into).collect()))
}

pub fn instance_of(class: impl Into<String>) -> Fluent {
    Fluent::new(Kind::InstanceOf(class.into()))
}

/// Object with entries in declaration order.
pub fn object<I, K, N>(entries: I) -> Fluent
where
    I: IntoIterator<Item = (K, N)>,
    K: Into<String>,
    N: Into<SchemaNode>,
{
    Fluent::new(Kind::Object(
        entries
            .into_iter()
            .map(|(k, n)| (k.into(), n.into()))
            .collect(),
    ))
}

pub fn array(element: impl Into<SchemaNode>) -> Fluent {
    Fluent::new(Kind::Array(element.into()))
}

pub fn tuple<I, N>(items: I) -> Fluent
where
    I: IntoIterator<Item = N>,
    N: Into<SchemaNode>,
{
    Fluent::new(Kind::Tuple {
        items: nodes(items),
        rest: None,
    })
}

/// Tuple whose positions after `items` all match `rest`.
pub fn tuple_with_rest<I, N>(items: I, rest: impl Into<SchemaNode>) -> Fluent
where
    I: IntoIterator<Item = N>,
    N: Into<SchemaNode>,
{
    Fluent::new(Kind::Tuple {
        items: nodes(items),
        rest: Some(rest.into()),
    })
}

pub fn union<I, N>(options: I) -> Fluent
where
    I: IntoIterator<Item = N>,
    N: Into<SchemaNode>,
{
    Fluent::new(Kind::Union(nodes(options)))
}

pub fn intersection<I, N>(parts: I) -> Fluent
where
    I: IntoIterator<Item = N>,
    N: Into<SchemaNode>,
{
    Fluent::new(Kind::Intersection(nodes(parts)))
}

pub fn record(key: impl Into<SchemaNode>, value: impl Into<SchemaNode>) -> Fluent {
    Fluent::new(Kind::Record {
        key: key.into(),
        value: value.into(),
    })
}

pub fn map(key: impl Into<SchemaNode>, value: impl Into<SchemaNode>) -> Fluent {
    Fluent::new(Kind::Map {
        key: key.into(),
        value: value.into(),
    })
}

pub fn set(element: impl Into<SchemaNode>) -> Fluent {
    Fluent::new(Kind::Set(element.into()))
}

pub fn promise(inner: impl Into<SchemaNode>) -> Fluent {
    Fluent::new(Kind::Promise(inner.into()))
}

/// Lazy node whose getter runs on every unwrap.
///
/// A getter that builds a new node each time gives the compiler nothing
/// to recognize, so only the depth limit stops such a recursion.
pub fn lazy<F>(getter: F) -> Fluent
where
    F: Fn() -> SchemaNode + Send + Sync + 'static,
{
    Fluent::new(Kind::Lazy(Lazy::Getter(Arc::new(getter))))
}

fn nodes<I, N>(items: I) -> Vec<SchemaNode>
where
    I: IntoIterator<Item = N>,
    N: Into<SchemaNode>,
{
    items.into_iter().map(Into::into).collect()
}

/// Forward declaration for a self-referential schema.
///
/// ```
/// use polyschema_mock::fluent::{self, Recursive};
///
/// let tree = Recursive::new();
/// let node = tree.define(fluent::object([
///     ("value", fluent::number().into_node()),
///     ("children", fluent::array(tree.reference()).into_node()),
/// ]));
/// assert!(tree.get().is_some_and(|n| n.ptr_eq(&node)));
/// ```
#[derive(Clone, Default)]
pub struct Recursive {
    slot: Arc<OnceLock<SchemaNode>>,
}

impl Recursive {
    pub fn new() -> Self {
        Self::default()
    }

    /// A lazy node resolving to the defined schema.
    pub fn reference(&self) -> Fluent {
        Fluent::new(Kind::Lazy(Lazy::Slot(Arc::clone(&self.slot))))
    }

    /// Define the target. The first definition wins; the returned handle
    /// is always the target that references resolve to.
    pub fn define(&self, node: impl Into<SchemaNode>) -> SchemaNode {
        self.slot.get_or_init(|| node.into()).clone()
    }

    pub fn get(&self) -> Option<SchemaNode> {
        self.slot.get().cloned()
    }
}

impl fmt::Debug for Recursive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recursive")
            .field("defined", &self.slot.get().is_some())
            .finish()
    }
}

/// Capability adapter for [`Fluent`] nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FluentAdapter;

impl FluentAdapter {
    fn kind_is(node: &SchemaNode, f: impl Fn(&Kind) -> bool) -> bool {
        node.downcast_ref::<Fluent>().is_some_and(|s| f(&s.kind))
    }

    fn kind(node: &SchemaNode) -> Result<&Kind, AdapterError> {
        node.downcast_ref::<Fluent>()
            .map(|s| &s.kind)
            .ok_or_else(|| AdapterError::malformed(VENDOR, "node is not a fluent schema"))
    }

    fn meta(node: &SchemaNode) -> Option<&Meta> {
        node.downcast_ref::<Fluent>().map(|s| &s.meta)
    }
}

impl SchemaAdapter for FluentAdapter {
    fn vendor(&self) -> &str {
        VENDOR
    }

    fn matches(&self, node: &SchemaNode) -> bool {
        node.is::<Fluent>()
    }

    fn is_string(&self, node: &SchemaNode) -> bool {
        Self::kind_is(node, |k| matches!(k, Kind::String))
    }
    fn is_number(&self, node: &SchemaNode) -> bool {
        Self::kind_is(node, |k| matches!(k, Kind::Number))
    }
    fn is_boolean(&self, node: &SchemaNode) -> bool {
        Self::kind_is(node, |k| matches!(k, Kind::Boolean))
    }
    fn is_null(&self, node: &SchemaNode) -> bool {
        Self::kind_is(node, |k| matches!(k, Kind::Null))
    }
    fn is_undefined(&self, node: &SchemaNode) -> bool {
        Self::kind_is(node, |k| matches!(k, Kind::Undefined))
    }
    fn is_void(&self, node: &SchemaNode) -> bool {
        Self::kind_is(node, |k| matches!(k, Kind::Void))
    }
    fn is_any(&self, node: &SchemaNode) -> bool {
        Self::kind_is(node, |k| matches!(k, Kind::Any))
    }
    fn is_unknown(&self, node: &SchemaNode) -> bool {
        Self::kind_is(node, |k| matches!(k, Kind::Unknown))
    }
    fn is_never(&self, node: &SchemaNode) -> bool {
        Self::kind_is(node, |k| matches!(k, Kind::Never))
    }
    fn is_object(&self, node: &SchemaNode) -> bool {
        Self::kind_is(node, |k| matches!(k, Kind::Object(_)))
    }
    fn is_array(&self, node: &SchemaNode) -> bool {
        Self::kind_is(node, |k| matches!(k, Kind::Array(_)))
    }
    fn is_union(&self, node: &SchemaNode) -> bool {
        Self::kind_is(node, |k| matches!(k, Kind::Union(_)))
    }
    fn is_literal(&self, node: &SchemaNode) -> bool {
        Self::kind_is(node, |k| matches!(k, Kind::Literal(_)))
    }
    fn is_enum(&self, node: &SchemaNode) -> bool {
        Self::kind_is(node, |k| matches!(k, Kind::Enum(_)))
    }
    fn is_optional(&self, node: &SchemaNode) -> bool {
        Self::kind_is(node, |k| matches!(k, Kind::Optional(_)))
    }
    fn is_nullable(&self, node: &SchemaNode) -> bool {
        Self::kind_is(node, |k| matches!(k, Kind::Nullable(_)))
    }
    fn is_tuple(&self, node: &SchemaNode) -> bool {
        Self::kind_is(node, |k| matches!(k, Kind::Tuple { .. }))
    }
    fn is_record(&self, node: &SchemaNode) -> bool {
        Self::kind_is(node, |k| matches!(k, Kind::Record { .. }))
    }
    fn is_map(&self, node: &SchemaNode) -> bool {
        Self::kind_is(node, |k| matches!(k, Kind::Map { .. }))
    }
    fn is_set(&self, node: &SchemaNode) -> bool {
        Self::kind_is(node, |k| matches!(k, Kind::Set(_)))
    }
    fn is_intersection(&self, node: &SchemaNode) -> bool {
        Self::kind_is(node, |k| matches!(k, Kind::Intersection(_)))
    }
    fn is_lazy(&self, node: &SchemaNode) -> bool {
        Self::kind_is(node, |k| matches!(k, Kind::Lazy(_)))
    }
    fn is_transform(&self, node: &SchemaNode) -> bool {
        Self::kind_is(node, |k| matches!(k, Kind::Transform(..)))
    }
    fn is_refine(&self, node: &SchemaNode) -> bool {
        Self::kind_is(node, |k| matches!(k, Kind::Refine { .. }))
    }
    fn is_default(&self, node: &SchemaNode) -> bool {
        Self::kind_is(node, |k| matches!(k, Kind::Default(..)))
    }
    fn is_catch(&self, node: &SchemaNode) -> bool {
        Self::kind_is(node, |k| matches!(k, Kind::Catch(..)))
    }
    fn is_branded(&self, node: &SchemaNode) -> bool {
        Self::kind_is(node, |k| matches!(k, Kind::Brand(..)))
    }
    fn is_date(&self, node: &SchemaNode) -> bool {
        Self::kind_is(node, |k| matches!(k, Kind::Date))
    }
    fn is_bigint(&self, node: &SchemaNode) -> bool {
        Self::kind_is(node, |k| matches!(k, Kind::BigInt))
    }
    fn is_symbol(&self, node: &SchemaNode) -> bool {
        Self::kind_is(node, |k| matches!(k, Kind::Symbol))
    }
    fn is_function(&self, node: &SchemaNode) -> bool {
        Self::kind_is(node, |k| matches!(k, Kind::Function))
    }
    fn is_promise(&self, node: &SchemaNode) -> bool {
        Self::kind_is(node, |k| matches!(k, Kind::Promise(_)))
    }
    fn is_instance_of(&self, node: &SchemaNode) -> bool {
        Self::kind_is(node, |k| matches!(k, Kind::InstanceOf(_)))
    }

    fn unwrap(&self, node: &SchemaNode) -> Result<Option<SchemaNode>, AdapterError> {
        Self::kind(node)?.inner()
    }

    fn object_entries(
        &self,
        node: &SchemaNode,
    ) -> Result<Vec<(String, SchemaNode)>, AdapterError> {
        match Self::kind(node)? {
            Kind::Object(entries) => Ok(entries.clone()),
            _ => Ok(Vec::new()),
        }
    }

    fn array_element(&self, node: &SchemaNode) -> Result<Option<SchemaNode>, AdapterError> {
        match Self::kind(node)? {
            Kind::Array(element) => Ok(Some(element.clone())),
            _ => Ok(None),
        }
    }

    fn union_options(&self, node: &SchemaNode) -> Result<Vec<SchemaNode>, AdapterError> {
        match Self::kind(node)? {
            Kind::Union(options) => Ok(options.clone()),
            _ => Ok(Vec::new()),
        }
    }

    fn literal_value(&self, node: &SchemaNode) -> Option<Value> {
        match Self::kind(node).ok()? {
            Kind::Literal(value) => Some(value.clone()),
            _ => None,
        }
    }

    fn enum_values(&self, node: &SchemaNode) -> Vec<Value> {
        match Self::kind(node) {
            Ok(Kind::Enum(values)) => values.clone(),
            _ => Vec::new(),
        }
    }

    fn tuple_items(&self, node: &SchemaNode) -> Result<Vec<SchemaNode>, AdapterError> {
        match Self::kind(node)? {
            Kind::Tuple { items, .. } => Ok(items.clone()),
            _ => Ok(Vec::new()),
        }
    }

    fn tuple_rest(&self, node: &SchemaNode) -> Result<Option<SchemaNode>, AdapterError> {
        match Self::kind(node)? {
            Kind::Tuple { rest, .. } => Ok(rest.clone()),
            _ => Ok(None),
        }
    }

    fn record_key_type(&self, node: &SchemaNode) -> Result<Option<SchemaNode>, AdapterError> {
        match Self::kind(node)? {
            Kind::Record { key, .. } => Ok(Some(key.clone())),
            _ => Ok(None),
        }
    }

    fn record_value_type(
        &self,
        node: &SchemaNode,
    ) -> Result<Option<SchemaNode>, AdapterError> {
        match Self::kind(node)? {
            Kind::Record { value, .. } => Ok(Some(value.clone())),
            _ => Ok(None),
        }
    }

    fn map_key_type(&self, node: &SchemaNode) -> Result<Option<SchemaNode>, AdapterError> {
        match Self::kind(node)? {
            Kind::Map { key, .. } => Ok(Some(key.clone())),
            _ => Ok(None),
        }
    }

    fn map_value_type(&self, node: &SchemaNode) -> Result<Option<SchemaNode>, AdapterError> {
        match Self::kind(node)? {
            Kind::Map { value, .. } => Ok(Some(value.clone())),
            _ => Ok(None),
        }
    }

    fn set_element(&self, node: &SchemaNode) -> Result<Option<SchemaNode>, AdapterError> {
        match Self::kind(node)? {
            Kind::Set(element) => Ok(Some(element.clone())),
            _ => Ok(None),
        }
    }

    fn intersection_schemas(
        &self,
        node: &SchemaNode,
    ) -> Result<Vec<SchemaNode>, AdapterError> {
        match Self::kind(node)? {
            Kind::Intersection(parts) => Ok(parts.clone()),
            _ => Ok(Vec::new()),
        }
    }

    fn promise_inner(&self, node: &SchemaNode) -> Result<Option<SchemaNode>, AdapterError> {
        match Self::kind(node)? {
            Kind::Promise(inner) => Ok(Some(inner.clone())),
            _ => Ok(None),
        }
    }

    fn instance_of_class(&self, node: &SchemaNode) -> Option<String> {
        match Self::kind(node).ok()? {
            Kind::InstanceOf(class) => Some(class.clone()),
            _ => None,
        }
    }

    fn constraints(&self, node: &SchemaNode) -> Option<Constraints> {
        Self::meta(node)
            .map(|m| m.constraints.clone())
            .filter(|c| !c.is_empty())
    }

    fn description(&self, node: &SchemaNode) -> Option<String> {
        Self::meta(node).and_then(|m| m.description.clone())
    }

    fn title(&self, node: &SchemaNode) -> Option<String> {
        Self::meta(node).and_then(|m| m.title.clone())
    }

    fn default_value(&self, node: &SchemaNode) -> Option<Value> {
        match Self::kind(node).ok()? {
            Kind::Default(_, value) | Kind::Catch(_, value) => Some(value.clone()),
            _ => None,
        }
    }

    fn examples(&self, node: &SchemaNode) -> Vec<Value> {
        Self::meta(node).map(|m| m.examples.clone()).unwrap_or_default()
    }

    fn is_deprecated(&self, node: &SchemaNode) -> bool {
        Self::meta(node).is_some_and(|m| m.deprecated)
    }

    fn validate(&self, node: &SchemaNode, data: &Value) -> Result<NativeOutcome, AdapterError> {
        check::run(node, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn modifiers_stack_as_separate_nodes() {
        let node = string().min_length(1).optional().nullable().into_node();
        let adapter = FluentAdapter;
        assert!(adapter.is_nullable(&node));
        let optional = adapter.unwrap(&node).unwrap().unwrap();
        assert!(adapter.is_optional(&optional));
        let base = adapter.unwrap(&optional).unwrap().unwrap();
        assert!(adapter.is_string(&base));
        assert!(adapter.unwrap(&base).unwrap().is_none());
        assert_eq!(adapter.constraints(&base).unwrap().min_length, Some(1));
        assert!(adapter.constraints(&optional).is_none());
    }

    #[test]
    fn recursive_reference_resolves_to_one_identity() {
        let tree = Recursive::new();
        let reference = tree.reference().into_node();
        let target = tree.define(object([("next", reference.clone())]));
        let adapter = FluentAdapter;
        let first = adapter.unwrap(&reference).unwrap().unwrap();
        let second = adapter.unwrap(&reference).unwrap().unwrap();
        assert!(first.ptr_eq(&target));
        assert!(second.ptr_eq(&target));
    }

    #[test]
    fn undefined_reference_is_malformed() {
        let tree = Recursive::new();
        let reference = tree.reference().into_node();
        let err = FluentAdapter.unwrap(&reference).unwrap_err();
        assert!(matches!(err, AdapterError::Malformed { .. }));
    }

    #[test]
    fn default_and_catch_report_default_value() {
        let adapter = FluentAdapter;
        let with_default = number().default(3).into_node();
        let with_catch = number().catch(json!(0)).into_node();
        assert_eq!(adapter.default_value(&with_default), Some(json!(3)));
        assert_eq!(adapter.default_value(&with_catch), Some(json!(0)));
    }

    #[test]
    fn foreign_payloads_are_not_claimed() {
        let adapter = FluentAdapter;
        assert!(!adapter.matches(&SchemaNode::new("string")));
        assert!(!adapter.is_string(&SchemaNode::new(0_u32)));
    }
}
