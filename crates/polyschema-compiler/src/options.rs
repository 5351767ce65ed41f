//! # Compiler Configuration
//!
//! [`CompileOptions`] can be built in code, deserialized from YAML or
//! JSON, or read from `POLYSCHEMA_*` environment variables. Unknown keys
//! are rejected so a typo in a config file fails loudly.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable: `$schema` URI for the document root.
pub const ENV_SCHEMA_URI: &str = "POLYSCHEMA_SCHEMA_URI";
/// Environment variable: prefix for generated `$defs` names.
pub const ENV_DEF_PREFIX: &str = "POLYSCHEMA_DEF_PREFIX";
/// Environment variable: recursion depth limit.
pub const ENV_MAX_DEPTH: &str = "POLYSCHEMA_MAX_DEPTH";
/// Environment variable: `format` used for date nodes.
pub const ENV_DATE_FORMAT: &str = "POLYSCHEMA_DATE_FORMAT";
/// Environment variable: name `$defs` entries after node titles.
pub const ENV_NAME_DEFS_FROM_TITLE: &str = "POLYSCHEMA_NAME_DEFS_FROM_TITLE";

/// Error loading [`CompileOptions`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// YAML source could not be parsed.
    #[error("invalid compiler config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON source could not be parsed.
    #[error("invalid compiler config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// An environment variable held an unusable value.
    #[error("invalid value for {var}: {reason}")]
    Env {
        /// Variable name.
        var: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Options controlling document shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileOptions {
    /// When set, emitted as `$schema` at the document root.
    pub schema_uri: Option<String>,
    /// Prefix for generated `$defs` names (`<prefix><n>`).
    pub def_prefix: String,
    /// Use a recursive node's `title` as its `$defs` name when possible.
    pub name_defs_from_title: bool,
    /// Nodes nested deeper than this compile to `{}`.
    ///
    /// Only reached by vendors whose lazy getters build a fresh node on
    /// every call, which defeats identity-based cycle detection.
    pub max_depth: usize,
    /// `format` emitted for date nodes.
    pub date_format: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            schema_uri: None,
            def_prefix: "schema".to_string(),
            name_defs_from_title: true,
            max_depth: 256,
            date_format: "date-time".to_string(),
        }
    }
}

impl CompileOptions {
    /// Parse options from YAML. Missing keys take their defaults.
    pub fn from_yaml_str(src: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(src)?)
    }

    /// Parse options from JSON. Missing keys take their defaults.
    pub fn from_json_str(src: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(src)?)
    }

    /// Defaults overridden by any `POLYSCHEMA_*` variables that are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overridden through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();
        if let Some(uri) = lookup(ENV_SCHEMA_URI) {
            opts.schema_uri = Some(uri).filter(|u| !u.is_empty());
        }
        if let Some(prefix) = lookup(ENV_DEF_PREFIX) {
            if prefix.is_empty() {
                return Err(ConfigError::Env {
                    var: ENV_DEF_PREFIX,
                    reason: "prefix must not be empty".to_string(),
                });
            }
            opts.def_prefix = prefix;
        }
        if let Some(depth) = lookup(ENV_MAX_DEPTH) {
            opts.max_depth = parse_env(ENV_MAX_DEPTH, &depth)?;
        }
        if let Some(format) = lookup(ENV_DATE_FORMAT) {
            opts.date_format = format;
        }
        if let Some(flag) = lookup(ENV_NAME_DEFS_FROM_TITLE) {
            opts.name_defs_from_title = parse_env(ENV_NAME_DEFS_FROM_TITLE, &flag)?;
        }
        Ok(opts)
    }

    /// Builder: set the `$schema` URI.
    pub fn with_schema_uri(mut self, uri: impl Into<String>) -> Self {
        self.schema_uri = Some(uri.into());
        self
    }

    /// Builder: set the `$defs` name prefix.
    pub fn with_def_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.def_prefix = prefix.into();
        self
    }

    /// Builder: set the depth limit.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

fn parse_env<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Env {
        var,
        reason: format!("{raw:?}: {e}"),
    })
}
