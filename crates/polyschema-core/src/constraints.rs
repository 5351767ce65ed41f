//! # Constraints
//!
//! The flat constraint record every vendor maps its checks onto. Which
//! JSON Schema keyword a bound becomes (`minimum`, `minLength`,
//! `minItems`, ...) is decided by the compiler from the base shape, not
//! here.

use serde::{Deserialize, Serialize};

/// Flat constraint record reported by an adapter for one node.
///
/// All fields are optional. `min`/`max` are shape-relative bounds; the
/// explicit `min_length`/`max_length` are length bounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    /// Lower bound (value, length, item count or property count).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper bound (value, length, item count or property count).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Minimum length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    /// Maximum length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    /// ECMA-262 regular expression the value must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// JSON Schema `format` name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Constraints {
    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Lay `outer` over `self`: every field set in `outer` replaces ours.
    pub fn overlay(&mut self, outer: &Constraints) {
        if outer.min.is_some() {
            self.min = outer.min;
        }
        if outer.max.is_some() {
            self.max = outer.max;
        }
        if outer.min_length.is_some() {
            self.min_length = outer.min_length;
        }
        if outer.max_length.is_some() {
            self.max_length = outer.max_length;
        }
        if outer.pattern.is_some() {
            self.pattern.clone_from(&outer.pattern);
        }
        if outer.format.is_some() {
            self.format.clone_from(&outer.format);
        }
    }

    /// Builder: set `min`.
    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Builder: set `max`.
    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Builder: set `min_length`.
    pub fn with_min_length(mut self, len: u64) -> Self {
        self.min_length = Some(len);
        self
    }

    /// Builder: set `max_length`.
    pub fn with_max_length(mut self, len: u64) -> Self {
        self.max_length = Some(len);
        self
    }

    /// Builder: set `pattern`.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Builder: set `format`.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        assert!(Constraints::default().is_empty());
        assert!(!Constraints::default().with_min(0.0).is_empty());
    }

    #[test]
    fn overlay_outer_wins_on_conflict() {
        let mut inner = Constraints::default().with_min(1.0).with_max(10.0);
        let outer = Constraints::default().with_min(5.0);
        inner.overlay(&outer);
        assert_eq!(inner.min, Some(5.0));
        assert_eq!(inner.max, Some(10.0));
    }

    #[test]
    fn overlay_keeps_inner_when_outer_silent() {
        let mut inner = Constraints::default().with_pattern("^a").with_format("email");
        inner.overlay(&Constraints::default());
        assert_eq!(inner.pattern.as_deref(), Some("^a"));
        assert_eq!(inner.format.as_deref(), Some("email"));
    }

    #[test]
    fn serde_uses_camel_case_and_skips_unset() {
        let c = Constraints::default().with_min_length(1).with_max_length(100);
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json, serde_json::json!({"minLength": 1, "maxLength": 100}));
        let back: Constraints = serde_json::from_value(json).unwrap();
        assert_eq!(back, c);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn constraints() -> impl Strategy<Value = Constraints> {
        (
            proptest::option::of(-1000i32..1000),
            proptest::option::of(-1000i32..1000),
            proptest::option::of(0u64..500),
            proptest::option::of(0u64..500),
            proptest::option::of("[a-z^$]{1,8}"),
            proptest::option::of(prop_oneof![Just("email"), Just("uuid"), Just("uri")]),
        )
            .prop_map(|(min, max, min_length, max_length, pattern, format)| Constraints {
                min: min.map(f64::from),
                max: max.map(f64::from),
                min_length,
                max_length,
                pattern,
                format: format.map(str::to_string),
            })
    }

    proptest! {
        /// Laying an empty record over anything changes nothing.
        #[test]
        fn overlay_empty_is_identity(c in constraints()) {
            let mut merged = c.clone();
            merged.overlay(&Constraints::default());
            prop_assert_eq!(merged, c);
        }

        /// Laying a record over itself changes nothing.
        #[test]
        fn overlay_is_idempotent(c in constraints()) {
            let mut merged = c.clone();
            merged.overlay(&c);
            prop_assert_eq!(merged, c);
        }

        /// Every field the outer record sets ends up in the result.
        #[test]
        fn overlay_outer_fields_win(inner in constraints(), outer in constraints()) {
            let mut merged = inner.clone();
            merged.overlay(&outer);
            if outer.min.is_some() { prop_assert_eq!(merged.min, outer.min); }
            if outer.max.is_some() { prop_assert_eq!(merged.max, outer.max); }
            if outer.pattern.is_some() { prop_assert_eq!(&merged.pattern, &outer.pattern); }
            if outer.min_length.is_none() { prop_assert_eq!(merged.min_length, inner.min_length); }
        }
    }
}
