//! # Describe Vendor
//!
//! A schema library whose schemas are plain JSON description documents,
//! the form object-schema libraries emit from their `describe()` call:
//!
//! ```json
//! {
//!   "type": "object",
//!   "flags": { "presence": "optional", "description": "A user", "label": "User" },
//!   "keys": { "name": { "type": "string", "rules": [{ "name": "min", "args": { "limit": 1 } }] } }
//! }
//! ```
//!
//! Modifiers are flags on one document rather than wrapper nodes:
//! `flags.presence = "optional"`, `null` in `allow`, and `flags.default`.
//! Unwrapping clears one flag and hands back a fresh node, so this vendor
//! has no recursion. `flags.only` with `allow` values makes a literal or
//! an enum. `object` with `patterns` is a record; `array` with `ordered`
//! is a tuple.
//!
//! The native validator answers with a bare boolean on success and with
//! accessor-chain paths (`items[0].name`) on failure.

use polyschema_core::{
    AdapterError, Constraints, NativeIssue, NativeOutcome, NativePath, SchemaAdapter, SchemaNode,
};
use serde_json::{json, Map, Value};

/// Vendor name reported by [`DescribeAdapter`].
pub const VENDOR: &str = "describe";

/// A description document.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor(pub Value);

/// Wrap a description document as a schema node.
pub fn schema(doc: Value) -> SchemaNode {
    SchemaNode::new(Descriptor(doc))
}

impl Descriptor {
    fn ty(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    fn flag(&self, name: &str) -> Option<&Value> {
        self.0.get("flags").and_then(|f| f.get(name))
    }

    fn flag_str(&self, name: &str) -> Option<&str> {
        self.flag(name).and_then(Value::as_str)
    }

    fn only(&self) -> bool {
        self.flag("only").and_then(Value::as_bool).unwrap_or(false)
    }

    fn allow(&self) -> &[Value] {
        self.0
            .get("allow")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// `allow` values other than `null`.
    fn valid_values(&self) -> Vec<Value> {
        self.allow().iter().filter(|v| !v.is_null()).cloned().collect()
    }

    fn is_optional(&self) -> bool {
        self.flag_str("presence") == Some("optional")
    }

    fn is_nullable(&self) -> bool {
        !self.only() && self.allow().iter().any(Value::is_null)
    }

    fn is_default(&self) -> bool {
        self.flag("default").is_some()
    }

    fn is_forbidden(&self) -> bool {
        self.flag_str("presence") == Some("forbidden")
    }

    fn rules(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.0
            .get("rules")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|rule| {
                let name = rule.get("name")?.as_str()?;
                Some((name, rule.get("args")))
            })
    }

    /// Copy of the document with `mutate` applied.
    fn edited(&self, mutate: impl FnOnce(&mut Map<String, Value>)) -> SchemaNode {
        let mut doc = self.0.clone();
        if let Value::Object(fields) = &mut doc {
            mutate(fields);
        }
        schema(doc)
    }

    fn without_flag(&self, flag: &str) -> SchemaNode {
        self.edited(|fields| {
            if let Some(Value::Object(flags)) = fields.get_mut("flags") {
                flags.remove(flag);
            }
        })
    }

    fn child(&self, field: &str) -> Result<Option<&Value>, AdapterError> {
        match self.0.get(field) {
            None => Ok(None),
            Some(value) if value.is_object() || value.is_array() => Ok(Some(value)),
            Some(_) => Err(AdapterError::malformed(
                VENDOR,
                format!("`{field}` must be an object or array"),
            )),
        }
    }

    fn keys(&self) -> Result<Vec<(String, SchemaNode)>, AdapterError> {
        match self.child("keys")? {
            None => Ok(Vec::new()),
            Some(Value::Object(keys)) => Ok(keys
                .iter()
                .map(|(k, doc)| (k.clone(), schema(doc.clone())))
                .collect()),
            Some(_) => Err(AdapterError::malformed(VENDOR, "`keys` must be an object")),
        }
    }

    fn list(&self, field: &str) -> Result<Vec<Value>, AdapterError> {
        match self.child(field)? {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => Ok(items.clone()),
            Some(_) => Err(AdapterError::malformed(VENDOR, format!("`{field}` must be an array"))),
        }
    }

    fn alternatives(&self) -> Result<Vec<Value>, AdapterError> {
        self.list("matches")?
            .into_iter()
            .map(|m| {
                m.get("schema").cloned().ok_or_else(|| {
                    AdapterError::malformed(VENDOR, "alternative without `schema`")
                })
            })
            .collect()
    }

    fn first_pattern(&self) -> Result<Option<Value>, AdapterError> {
        Ok(self.list("patterns")?.into_iter().next())
    }

    fn is_record(&self) -> bool {
        self.ty() == Some("object") && self.0.get("patterns").is_some()
    }

    fn is_tuple(&self) -> bool {
        self.ty() == Some("array") && self.0.get("ordered").is_some()
    }
}

/// `/^a+$/i` → `^a+$`.
fn regex_source(raw: &str) -> String {
    match raw.strip_prefix('/').and_then(|r| r.rfind('/').map(|end| &r[..end])) {
        Some(source) => source.to_string(),
        None => raw.to_string(),
    }
}

fn limit(args: Option<&Value>) -> Option<f64> {
    args.and_then(|a| a.get("limit")).and_then(Value::as_f64)
}

/// Capability adapter for [`Descriptor`] nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescribeAdapter;

impl DescribeAdapter {
    fn doc(node: &SchemaNode) -> Option<&Descriptor> {
        node.downcast_ref::<Descriptor>()
    }

    fn doc_or_err(node: &SchemaNode) -> Result<&Descriptor, AdapterError> {
        Self::doc(node)
            .ok_or_else(|| AdapterError::malformed(VENDOR, "node is not a description document"))
    }

    /// Type test that holds only once every modifier flag is gone.
    fn base_is(node: &SchemaNode, ty: &str) -> bool {
        Self::doc(node).is_some_and(|d| {
            !d.is_optional()
                && !d.is_nullable()
                && !d.is_default()
                && !d.is_forbidden()
                && !d.only()
                && d.ty() == Some(ty)
        })
    }

    fn is_modified(d: &Descriptor) -> bool {
        d.is_optional() || d.is_nullable() || d.is_default()
    }
}

impl SchemaAdapter for DescribeAdapter {
    fn vendor(&self) -> &str {
        VENDOR
    }

    fn matches(&self, node: &SchemaNode) -> bool {
        Self::doc(node).is_some_and(|d| d.0.is_object())
    }

    fn is_string(&self, node: &SchemaNode) -> bool {
        Self::base_is(node, "string")
    }
    fn is_number(&self, node: &SchemaNode) -> bool {
        Self::base_is(node, "number")
    }
    fn is_boolean(&self, node: &SchemaNode) -> bool {
        Self::base_is(node, "boolean")
    }
    fn is_any(&self, node: &SchemaNode) -> bool {
        Self::base_is(node, "any")
    }
    fn is_date(&self, node: &SchemaNode) -> bool {
        Self::base_is(node, "date")
    }
    fn is_symbol(&self, node: &SchemaNode) -> bool {
        Self::base_is(node, "symbol")
    }
    fn is_function(&self, node: &SchemaNode) -> bool {
        Self::base_is(node, "function")
    }
    fn is_union(&self, node: &SchemaNode) -> bool {
        Self::base_is(node, "alternatives")
    }
    fn is_object(&self, node: &SchemaNode) -> bool {
        Self::base_is(node, "object") && Self::doc(node).is_some_and(|d| !d.is_record())
    }
    fn is_record(&self, node: &SchemaNode) -> bool {
        Self::base_is(node, "object") && Self::doc(node).is_some_and(Descriptor::is_record)
    }
    fn is_array(&self, node: &SchemaNode) -> bool {
        Self::base_is(node, "array") && Self::doc(node).is_some_and(|d| !d.is_tuple())
    }
    fn is_tuple(&self, node: &SchemaNode) -> bool {
        Self::base_is(node, "array") && Self::doc(node).is_some_and(Descriptor::is_tuple)
    }

    fn is_never(&self, node: &SchemaNode) -> bool {
        Self::doc(node).is_some_and(|d| !Self::is_modified(d) && d.is_forbidden())
    }

    fn is_literal(&self, node: &SchemaNode) -> bool {
        Self::doc(node)
            .is_some_and(|d| !Self::is_modified(d) && d.only() && d.valid_values().len() == 1)
    }

    fn is_enum(&self, node: &SchemaNode) -> bool {
        Self::doc(node)
            .is_some_and(|d| !Self::is_modified(d) && d.only() && d.valid_values().len() != 1)
    }

    fn is_optional(&self, node: &SchemaNode) -> bool {
        Self::doc(node).is_some_and(Descriptor::is_optional)
    }

    fn is_nullable(&self, node: &SchemaNode) -> bool {
        Self::doc(node).is_some_and(|d| !d.is_optional() && d.is_nullable())
    }

    fn is_default(&self, node: &SchemaNode) -> bool {
        Self::doc(node).is_some_and(|d| !d.is_optional() && !d.is_nullable() && d.is_default())
    }

    fn unwrap(&self, node: &SchemaNode) -> Result<Option<SchemaNode>, AdapterError> {
        let d = Self::doc_or_err(node)?;
        Ok(if d.is_optional() {
            Some(d.without_flag("presence"))
        } else if d.is_nullable() {
            Some(d.edited(|fields| {
                if let Some(Value::Array(allow)) = fields.get_mut("allow") {
                    allow.retain(|v| !v.is_null());
                }
            }))
        } else if d.is_default() {
            Some(d.without_flag("default"))
        } else {
            None
        })
    }

    fn object_entries(
        &self,
        node: &SchemaNode,
    ) -> Result<Vec<(String, SchemaNode)>, AdapterError> {
        Self::doc_or_err(node)?.keys()
    }

    fn array_element(&self, node: &SchemaNode) -> Result<Option<SchemaNode>, AdapterError> {
        let items = Self::doc_or_err(node)?.list("items")?;
        Ok(match items.len() {
            0 => None,
            1 => items.into_iter().next().map(schema),
            _ => Some(schema(json!({
                "type": "alternatives",
                "matches": items.into_iter().map(|s| json!({"schema": s})).collect::<Vec<_>>(),
            }))),
        })
    }

    fn union_options(&self, node: &SchemaNode) -> Result<Vec<SchemaNode>, AdapterError> {
        Ok(Self::doc_or_err(node)?
            .alternatives()?
            .into_iter()
            .map(schema)
            .collect())
    }

    fn literal_value(&self, node: &SchemaNode) -> Option<Value> {
        Self::doc(node)?.valid_values().into_iter().next()
    }

    fn enum_values(&self, node: &SchemaNode) -> Vec<Value> {
        Self::doc(node).map(Descriptor::valid_values).unwrap_or_default()
    }

    fn tuple_items(&self, node: &SchemaNode) -> Result<Vec<SchemaNode>, AdapterError> {
        Ok(Self::doc_or_err(node)?
            .list("ordered")?
            .into_iter()
            .map(schema)
            .collect())
    }

    fn tuple_rest(&self, node: &SchemaNode) -> Result<Option<SchemaNode>, AdapterError> {
        self.array_element(node)
    }

    fn record_key_type(&self, node: &SchemaNode) -> Result<Option<SchemaNode>, AdapterError> {
        let pattern = Self::doc_or_err(node)?.first_pattern()?;
        Ok(pattern.map(|p| {
            let mut key = json!({"type": "string"});
            if let Some(regex) = p.get("regex").and_then(Value::as_str) {
                key["rules"] = json!([{"name": "pattern", "args": {"regex": regex}}]);
            }
            schema(key)
        }))
    }

    fn record_value_type(
        &self,
        node: &SchemaNode,
    ) -> Result<Option<SchemaNode>, AdapterError> {
        let pattern = Self::doc_or_err(node)?.first_pattern()?;
        Ok(pattern.and_then(|p| p.get("rule").cloned()).map(schema))
    }

    fn constraints(&self, node: &SchemaNode) -> Option<Constraints> {
        let d = Self::doc(node)?;
        let mut c = Constraints::default();
        for (name, args) in d.rules() {
            match name {
                "min" => c.min = limit(args),
                "max" => c.max = limit(args),
                "length" => {
                    c.min = limit(args);
                    c.max = limit(args);
                }
                "pattern" => {
                    c.pattern = args
                        .and_then(|a| a.get("regex"))
                        .and_then(Value::as_str)
                        .map(regex_source);
                }
                "email" => c.format = Some("email".into()),
                "uri" => c.format = Some("uri".into()),
                "isoDate" => c.format = Some("date-time".into()),
                _ => {}
            }
        }
        Some(c).filter(|c| !c.is_empty())
    }

    fn description(&self, node: &SchemaNode) -> Option<String> {
        Self::doc(node)?.flag_str("description").map(str::to_string)
    }

    fn title(&self, node: &SchemaNode) -> Option<String> {
        Self::doc(node)?.flag_str("label").map(str::to_string)
    }

    fn default_value(&self, node: &SchemaNode) -> Option<Value> {
        Self::doc(node)?.flag("default").cloned()
    }

    fn examples(&self, node: &SchemaNode) -> Vec<Value> {
        Self::doc(node)
            .and_then(|d| d.0.get("examples"))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }

    fn is_deprecated(&self, node: &SchemaNode) -> bool {
        Self::doc(node)
            .and_then(|d| d.flag("deprecated"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    fn validate(&self, node: &SchemaNode, data: &Value) -> Result<NativeOutcome, AdapterError> {
        let d = Self::doc_or_err(node)?;
        let mut issues = Vec::new();
        check(d, data, &mut String::new(), &mut issues)?;
        Ok(if issues.is_empty() {
            NativeOutcome::Accepted
        } else {
            NativeOutcome::Issues(issues)
        })
    }
}

/// Append `key` to an accessor chain.
fn push_key(path: &mut String, key: &str) {
    let plain = !key.is_empty()
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !key.starts_with(|c: char| c.is_ascii_digit());
    if plain {
        if !path.is_empty() {
            path.push('.');
        }
        path.push_str(key);
    } else {
        path.push_str(&format!("[{}]", Value::String(key.to_string())));
    }
}

fn check(
    d: &Descriptor,
    data: &Value,
    path: &mut String,
    issues: &mut Vec<NativeIssue>,
) -> Result<(), AdapterError> {
    let label = if path.is_empty() {
        "value".to_string()
    } else {
        path.clone()
    };
    let mut report = |message: String| {
        issues.push(NativeIssue::at(message, NativePath::Accessor(path.clone())));
    };

    if d.is_forbidden() {
        report(format!("\"{label}\" is not allowed"));
        return Ok(());
    }
    if d.allow().contains(data) {
        return Ok(());
    }
    if d.only() {
        report(format!("\"{label}\" must be one of {}", Value::Array(d.valid_values())));
        return Ok(());
    }

    let ty = d.ty().unwrap_or("any");
    let type_ok = match ty {
        "any" | "symbol" | "function" => true,
        "string" | "date" => data.is_string(),
        "number" => data.is_number(),
        "boolean" => data.is_boolean(),
        "object" => data.is_object(),
        "array" => data.is_array(),
        "alternatives" => true,
        other => {
            return Err(AdapterError::malformed(VENDOR, format!("unknown type `{other}`")));
        }
    };
    if !type_ok {
        report(format!("\"{label}\" must be a {ty}"));
        return Ok(());
    }

    let size = match data {
        Value::String(s) => Some(s.chars().count() as f64),
        Value::Number(n) => n.as_f64(),
        Value::Array(items) => Some(items.len() as f64),
        Value::Object(fields) => Some(fields.len() as f64),
        _ => None,
    };
    if let Some(size) = size {
        for (name, args) in d.rules() {
            match (name, limit(args)) {
                ("min", Some(min)) if size < min => report(format!("\"{label}\" must be at least {min}")),
                ("max", Some(max)) if size > max => report(format!("\"{label}\" must be at most {max}")),
                ("length", Some(len)) if size != len => report(format!("\"{label}\" must be exactly {len}")),
                _ => {}
            }
        }
    }

    match (ty, data) {
        ("object", Value::Object(fields)) if d.is_record() => {
            let Some(rule) = d.first_pattern()?.and_then(|p| p.get("rule").cloned()) else {
                return Ok(());
            };
            let rule = Descriptor(rule);
            for (key, value) in fields {
                let mark = path.len();
                push_key(path, key);
                check(&rule, value, path, issues)?;
                path.truncate(mark);
            }
        }
        ("object", Value::Object(fields)) => {
            for (key, child) in d.keys()? {
                let mark = path.len();
                push_key(path, &key);
                let child = DescribeAdapter::doc_or_err(&child)?.clone();
                match fields.get(&key) {
                    Some(value) => check(&child, value, path, issues)?,
                    None if child.is_optional() || child.is_default() => {}
                    None => issues.push(NativeIssue::at(
                        format!("\"{path}\" is required"),
                        NativePath::Accessor(path.clone()),
                    )),
                }
                path.truncate(mark);
            }
        }
        ("array", Value::Array(values)) => {
            let ordered = d.list("ordered")?;
            let items = d.list("items")?;
            for (i, value) in values.iter().enumerate() {
                let mark = path.len();
                path.push_str(&format!("[{i}]"));
                let candidates: Vec<Value> = match ordered.get(i) {
                    Some(position) => vec![position.clone()],
                    None => items.clone(),
                };
                if !candidates.is_empty() {
                    let mut matched = false;
                    for candidate in &candidates {
                        let mut scratch = Vec::new();
                        check(&Descriptor(candidate.clone()), value, path, &mut scratch)?;
                        if scratch.is_empty() {
                            matched = true;
                            break;
                        }
                        if candidates.len() == 1 {
                            issues.extend(scratch);
                            matched = true;
                        }
                    }
                    if !matched {
                        issues.push(NativeIssue::at(
                            format!("\"{path}\" does not match any allowed type"),
                            NativePath::Accessor(path.clone()),
                        ));
                    }
                } else if d.is_tuple() {
                    issues.push(NativeIssue::at(
                        format!("\"{path}\" is not allowed"),
                        NativePath::Accessor(path.clone()),
                    ));
                }
                path.truncate(mark);
            }
            if values.len() < ordered.len() {
                issues.push(NativeIssue::at(
                    format!("\"{label}\" must contain {} items", ordered.len()),
                    NativePath::Accessor(path.clone()),
                ));
            }
        }
        ("alternatives", _) => {
            let mut matched = false;
            for alternative in d.alternatives()? {
                let mut scratch = Vec::new();
                check(&Descriptor(alternative), data, path, &mut scratch)?;
                if scratch.is_empty() {
                    matched = true;
                    break;
                }
            }
            if !matched {
                issues.push(NativeIssue::at(
                    format!("\"{label}\" does not match any of the allowed types"),
                    NativePath::Accessor(path.clone()),
                ));
            }
        }
        _ => {}
    }
    Ok(())
}
