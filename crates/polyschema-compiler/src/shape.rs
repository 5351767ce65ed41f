//! # Shape Classification
//!
//! Turns the adapter's boolean predicates into two closed enums:
//! [`Modifier`] for wrapper nodes peeled off by the unwrap loop, and
//! [`Shape`] for the structural node left underneath. Both are tested in a
//! fixed priority order and the first true predicate wins.

use polyschema_core::{SchemaAdapter, SchemaNode};

/// Wrapper node kinds handled by the unwrap loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Modifier {
    Optional,
    Nullable,
    Default,
    Catch,
    Refine,
    Branded,
    Transform,
    Lazy,
}

impl Modifier {
    /// First modifier predicate that holds for `node`, if any.
    pub(crate) fn of(adapter: &dyn SchemaAdapter, node: &SchemaNode) -> Option<Self> {
        if adapter.is_optional(node) {
            Some(Self::Optional)
        } else if adapter.is_nullable(node) {
            Some(Self::Nullable)
        } else if adapter.is_default(node) {
            Some(Self::Default)
        } else if adapter.is_catch(node) {
            Some(Self::Catch)
        } else if adapter.is_refine(node) {
            Some(Self::Refine)
        } else if adapter.is_branded(node) {
            Some(Self::Branded)
        } else if adapter.is_transform(node) {
            Some(Self::Transform)
        } else if adapter.is_lazy(node) {
            Some(Self::Lazy)
        } else {
            None
        }
    }
}

/// Structural node kinds, in dispatch priority order.
///
/// Literal and enum come before union so a vendor that models enums as
/// unions of literals is still compiled as an enum when it says so.
/// The special object-like kinds come before the generic containers, and
/// the catch-all kinds come last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    Literal,
    Enum,
    Date,
    InstanceOf,
    BigInt,
    Symbol,
    Function,
    Promise,
    Union,
    Intersection,
    Tuple,
    Object,
    Array,
    Record,
    Map,
    Set,
    String,
    Number,
    Boolean,
    Null,
    Undefined,
    Void,
    Never,
    Any,
    Unknown,
}

const DISPATCH_ORDER: [Shape; 25] = [
    Shape::Literal,
    Shape::Enum,
    Shape::Date,
    Shape::InstanceOf,
    Shape::BigInt,
    Shape::Symbol,
    Shape::Function,
    Shape::Promise,
    Shape::Union,
    Shape::Intersection,
    Shape::Tuple,
    Shape::Object,
    Shape::Array,
    Shape::Record,
    Shape::Map,
    Shape::Set,
    Shape::String,
    Shape::Number,
    Shape::Boolean,
    Shape::Null,
    Shape::Undefined,
    Shape::Void,
    Shape::Never,
    Shape::Any,
    Shape::Unknown,
];

impl Shape {
    /// First structural predicate that holds for `node`, if any.
    pub(crate) fn of(adapter: &dyn SchemaAdapter, node: &SchemaNode) -> Option<Self> {
        DISPATCH_ORDER
            .into_iter()
            .find(|shape| shape.holds(adapter, node))
    }

    /// Whether the adapter reports this shape for `node`.
    fn holds(self, adapter: &dyn SchemaAdapter, node: &SchemaNode) -> bool {
        match self {
            Self::Literal => adapter.is_literal(node),
            Self::Enum => adapter.is_enum(node),
            Self::Date => adapter.is_date(node),
            Self::InstanceOf => adapter.is_instance_of(node),
            Self::BigInt => adapter.is_bigint(node),
            Self::Symbol => adapter.is_symbol(node),
            Self::Function => adapter.is_function(node),
            Self::Promise => adapter.is_promise(node),
            Self::Union => adapter.is_union(node),
            Self::Intersection => adapter.is_intersection(node),
            Self::Tuple => adapter.is_tuple(node),
            Self::Object => adapter.is_object(node),
            Self::Array => adapter.is_array(node),
            Self::Record => adapter.is_record(node),
            Self::Map => adapter.is_map(node),
            Self::Set => adapter.is_set(node),
            Self::String => adapter.is_string(node),
            Self::Number => adapter.is_number(node),
            Self::Boolean => adapter.is_boolean(node),
            Self::Null => adapter.is_null(node),
            Self::Undefined => adapter.is_undefined(node),
            Self::Void => adapter.is_void(node),
            Self::Never => adapter.is_never(node),
            Self::Any => adapter.is_any(node),
            Self::Unknown => adapter.is_unknown(node),
        }
    }

    /// How shape-relative constraint bounds (`min`/`max`) are rendered.
    pub(crate) fn bounds(self) -> Bounds {
        match self {
            Self::String | Self::Date => Bounds::Length,
            Self::Array | Self::Tuple | Self::Set => Bounds::Items,
            Self::Object | Self::Record | Self::Map => Bounds::Properties,
            _ => Bounds::Value,
        }
    }
}

/// JSON Schema keyword family a `min`/`max` bound maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Bounds {
    Value,
    Length,
    Items,
    Properties,
}

impl Bounds {
    pub(crate) fn keywords(self) -> (&'static str, &'static str) {
        match self {
            Self::Value => ("minimum", "maximum"),
            Self::Length => ("minLength", "maxLength"),
            Self::Items => ("minItems", "maxItems"),
            Self::Properties => ("minProperties", "maxProperties"),
        }
    }

    /// Keywords for explicit length constraints.
    pub(crate) fn length_keywords(self) -> (&'static str, &'static str) {
        match self {
            Self::Items => ("minItems", "maxItems"),
            _ => ("minLength", "maxLength"),
        }
    }
}
