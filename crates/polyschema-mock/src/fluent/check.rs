//! Native validator for fluent schemas.
//!
//! Walks the schema alongside the data, collecting every issue with a
//! segment-list path, and produces the parsed output: defaults filled in,
//! caught failures replaced, transforms applied. `pattern` and `format`
//! constraints are not enforced.

use polyschema_core::{
    AdapterError, Constraints, NativeIssue, NativeOutcome, NativePath, PathSegment, SchemaNode,
};
use serde_json::{Map, Value};

use super::{Fluent, Kind, VENDOR};

/// Schema nesting beyond this (lazy chains that never reach data) is an error.
const MAX_NESTING: usize = 1024;

pub(crate) fn run(node: &SchemaNode, data: &Value) -> Result<NativeOutcome, AdapterError> {
    let mut checker = Checker::default();
    let output = checker.check(node, data, 0)?;
    if checker.issues.is_empty() {
        Ok(NativeOutcome::Parsed(output))
    } else {
        Ok(NativeOutcome::Issues(checker.issues))
    }
}

/// What an absent object field resolves to.
enum Absent {
    Skip,
    Fill(Value),
    Missing,
}

#[derive(Default)]
struct Checker {
    path: Vec<PathSegment>,
    issues: Vec<NativeIssue>,
}

impl Checker {
    fn report(&mut self, message: impl Into<String>) {
        self.issues.push(NativeIssue::at(
            message,
            NativePath::Segments(self.path.clone()),
        ));
    }

    /// Run `f` on a scratch checker at the current path; its issues are
    /// returned instead of recorded.
    fn trial<F>(&self, f: F) -> Result<(Value, Vec<NativeIssue>), AdapterError>
    where
        F: FnOnce(&mut Checker) -> Result<Value, AdapterError>,
    {
        let mut scratch = Checker {
            path: self.path.clone(),
            issues: Vec::new(),
        };
        let output = f(&mut scratch)?;
        Ok((output, scratch.issues))
    }

    fn at<F>(&mut self, segment: PathSegment, f: F) -> Result<Value, AdapterError>
    where
        F: FnOnce(&mut Checker) -> Result<Value, AdapterError>,
    {
        self.path.push(segment);
        let result = f(self);
        self.path.pop();
        result
    }

    fn check(&mut self, node: &SchemaNode, data: &Value, depth: usize) -> Result<Value, AdapterError> {
        if depth > MAX_NESTING {
            return Err(AdapterError::malformed(VENDOR, "schema nesting too deep"));
        }
        let Some(schema) = node.downcast_ref::<Fluent>() else {
            tracing::debug!(
                node_type = node.type_name(),
                "foreign node inside fluent schema; accepting value"
            );
            return Ok(data.clone());
        };

        let before = self.issues.len();
        let output = self.check_kind(&schema.kind, data, depth + 1)?;
        if self.issues.len() == before {
            self.check_constraints(&schema.meta.constraints, data);
        }
        Ok(output)
    }

    fn check_kind(&mut self, kind: &Kind, data: &Value, depth: usize) -> Result<Value, AdapterError> {
        match kind {
            Kind::String | Kind::Date => self.expect(data.is_string(), "string", data),
            Kind::Number => self.expect(data.is_number(), "number", data),
            Kind::Boolean => self.expect(data.is_boolean(), "boolean", data),
            Kind::Null => self.expect(data.is_null(), "null", data),
            Kind::BigInt => self.expect(data.is_i64() || data.is_u64(), "integer", data),
            Kind::Undefined | Kind::Void => {
                self.report(format!("expected undefined, received {}", type_of(data)));
                Ok(data.clone())
            }
            Kind::Never => {
                self.report("no value is allowed here");
                Ok(data.clone())
            }
            Kind::Any | Kind::Unknown | Kind::Symbol | Kind::Function => Ok(data.clone()),
            Kind::Literal(expected) => {
                if data != expected {
                    self.report(format!("expected literal {expected}"));
                }
                Ok(data.clone())
            }
            Kind::Enum(values) => {
                if !values.contains(data) {
                    self.report(format!("expected one of {}", Value::Array(values.clone())));
                }
                Ok(data.clone())
            }
            Kind::InstanceOf(class) if class == "Date" => {
                self.expect(data.is_string(), "string", data)
            }
            Kind::InstanceOf(class) => {
                if !data.is_object() {
                    self.report(format!("expected instance of {class}"));
                }
                Ok(data.clone())
            }
            Kind::Object(entries) => self.check_object(entries, data, depth),
            Kind::Array(element) => {
                let Some(items) = data.as_array() else {
                    return self.expect(false, "array", data);
                };
                let mut out = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    out.push(self.at(i.into(), |c| c.check(element, item, depth))?);
                }
                Ok(Value::Array(out))
            }
            Kind::Tuple { items, rest } => self.check_tuple(items, rest.as_ref(), data, depth),
            Kind::Set(element) => {
                let Some(items) = data.as_array() else {
                    return self.expect(false, "array", data);
                };
                let mut out: Vec<Value> = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    let value = self.at(i.into(), |c| c.check(element, item, depth))?;
                    if out.contains(&value) {
                        self.at(i.into(), |c| {
                            c.report("duplicate set element");
                            Ok(Value::Null)
                        })?;
                    }
                    out.push(value);
                }
                Ok(Value::Array(out))
            }
            Kind::Record { key, value } | Kind::Map { key, value } => {
                let Some(fields) = data.as_object() else {
                    return self.expect(false, "object", data);
                };
                let mut out = Map::new();
                for (k, v) in fields {
                    let checked = self.at(k.as_str().into(), |c| {
                        c.check(key, &Value::String(k.clone()), depth)?;
                        c.check(value, v, depth)
                    })?;
                    out.insert(k.clone(), checked);
                }
                Ok(Value::Object(out))
            }
            Kind::Union(options) => {
                for option in options {
                    let (output, issues) = self.trial(|c| c.check(option, data, depth))?;
                    if issues.is_empty() {
                        return Ok(output);
                    }
                }
                self.report("value does not match any union option");
                Ok(data.clone())
            }
            Kind::Intersection(parts) => {
                for part in parts {
                    self.check(part, data, depth)?;
                }
                Ok(data.clone())
            }
            Kind::Promise(inner) | Kind::Optional(inner) | Kind::Brand(inner, _) => {
                self.check(inner, data, depth)
            }
            Kind::Nullable(inner) => {
                if data.is_null() {
                    Ok(Value::Null)
                } else {
                    self.check(inner, data, depth)
                }
            }
            Kind::Default(inner, _) => self.check(inner, data, depth),
            Kind::Catch(inner, fallback) => {
                let (output, issues) = self.trial(|c| c.check(inner, data, depth))?;
                Ok(if issues.is_empty() {
                    output
                } else {
                    fallback.clone()
                })
            }
            Kind::Refine {
                inner,
                message,
                check,
            } => {
                let before = self.issues.len();
                let output = self.check(inner, data, depth)?;
                if self.issues.len() == before && !check(&output) {
                    self.report(message.clone());
                }
                Ok(output)
            }
            Kind::Transform(inner, f) => {
                let before = self.issues.len();
                let output = self.check(inner, data, depth)?;
                Ok(if self.issues.len() == before {
                    f(output)
                } else {
                    output
                })
            }
            Kind::Lazy(lazy) => {
                let inner = lazy.force()?;
                self.check(&inner, data, depth)
            }
        }
    }

    fn check_object(
        &mut self,
        entries: &[(String, SchemaNode)],
        data: &Value,
        depth: usize,
    ) -> Result<Value, AdapterError> {
        let Some(fields) = data.as_object() else {
            return self.expect(false, "object", data);
        };
        let mut out = fields.clone();
        for (key, child) in entries {
            match fields.get(key) {
                Some(value) => {
                    let checked = self.at(key.as_str().into(), |c| c.check(child, value, depth))?;
                    out.insert(key.clone(), checked);
                }
                None => match absent(child)? {
                    Absent::Skip => {}
                    Absent::Fill(value) => {
                        out.insert(key.clone(), value);
                    }
                    Absent::Missing => {
                        self.at(key.as_str().into(), |c| {
                            c.report("required");
                            Ok(Value::Null)
                        })?;
                    }
                },
            }
        }
        Ok(Value::Object(out))
    }

    fn check_tuple(
        &mut self,
        items: &[SchemaNode],
        rest: Option<&SchemaNode>,
        data: &Value,
        depth: usize,
    ) -> Result<Value, AdapterError> {
        let Some(values) = data.as_array() else {
            return self.expect(false, "array", data);
        };
        if values.len() < items.len() {
            self.report(format!("expected at least {} items", items.len()));
            return Ok(data.clone());
        }
        if rest.is_none() && values.len() > items.len() {
            self.report(format!("expected at most {} items", items.len()));
            return Ok(data.clone());
        }
        let mut out = Vec::with_capacity(values.len());
        for (i, value) in values.iter().enumerate() {
            let schema = items.get(i).or(rest);
            let checked = match schema {
                Some(schema) => self.at(i.into(), |c| c.check(schema, value, depth))?,
                None => value.clone(),
            };
            out.push(checked);
        }
        Ok(Value::Array(out))
    }

    fn check_constraints(&mut self, c: &Constraints, data: &Value) {
        let (size, unit) = match data {
            Value::String(s) => (s.chars().count() as f64, "characters"),
            Value::Array(items) => (items.len() as f64, "items"),
            Value::Object(fields) => (fields.len() as f64, "properties"),
            Value::Number(n) => {
                let n = n.as_f64().unwrap_or(0.0);
                if let Some(min) = c.min.filter(|min| n < *min) {
                    self.report(format!("must be >= {min}"));
                }
                if let Some(max) = c.max.filter(|max| n > *max) {
                    self.report(format!("must be <= {max}"));
                }
                return;
            }
            _ => return,
        };
        let min = c.min.or(c.min_length.map(|l| l as f64));
        let max = c.max.or(c.max_length.map(|l| l as f64));
        if let Some(min) = min.filter(|min| size < *min) {
            self.report(format!("must contain at least {min} {unit}"));
        }
        if let Some(max) = max.filter(|max| size > *max) {
            self.report(format!("must contain at most {max} {unit}"));
        }
    }

    fn expect(&mut self, ok: bool, expected: &str, data: &Value) -> Result<Value, AdapterError> {
        if !ok {
            self.report(format!("expected {expected}, received {}", type_of(data)));
        }
        Ok(data.clone())
    }
}

/// Follow the modifier chain of an absent field's schema.
fn absent(node: &SchemaNode) -> Result<Absent, AdapterError> {
    let mut current = node.clone();
    for _ in 0..MAX_NESTING {
        let Some(schema) = current.downcast_ref::<Fluent>() else {
            return Ok(Absent::Missing);
        };
        let next = match &schema.kind {
            Kind::Optional(_) | Kind::Undefined | Kind::Void => return Ok(Absent::Skip),
            Kind::Default(_, value) | Kind::Catch(_, value) => {
                return Ok(Absent::Fill(value.clone()))
            }
            Kind::Nullable(inner) | Kind::Brand(inner, _) | Kind::Refine { inner, .. } => {
                inner.clone()
            }
            Kind::Transform(inner, _) => inner.clone(),
            Kind::Lazy(lazy) => lazy.force()?,
            _ => return Ok(Absent::Missing),
        };
        current = next;
    }
    Err(AdapterError::malformed(VENDOR, "schema nesting too deep"))
}

fn type_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
