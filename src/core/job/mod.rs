#![allow(clippy::result_large_err)] // Record accessors return AppError so stages can propagate with `?`.

use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod loader;
pub mod symbol;

pub use loader::{load_kind_file, parse_kind};
pub use symbol::{join_symbol, split_symbol};

/// Field names read or written by the raptor stages.
pub mod fields {
    pub const TEST_NAME: &str = "test-name";
    pub const TRY_NAME: &str = "try-name";
    pub const DESCRIPTION: &str = "description";
    pub const TREEHERDER_SYMBOL: &str = "treeherder-symbol";
    pub const TEST_PLATFORM: &str = "test-platform";
    pub const APPS: &str = "apps";
    pub const APP: &str = "app";
    pub const PAGELOAD: &str = "pageload";
    pub const CONDPROF: &str = "condprof";
    pub const ACTIVITY: &str = "activity";
    pub const BINARY_PATH: &str = "binary-path";
    pub const RAPTOR_TEST: &str = "raptor-test";
    pub const RAPTOR_SUBTESTS: &str = "raptor-subtests";
    pub const COLD: &str = "cold";
    pub const RUN_VISUAL_METRICS: &str = "run-visual-metrics";
    pub const MAX_RUN_TIME: &str = "max-run-time";
    pub const REQUIRE_SIGNED_EXTENSIONS: &str = "require-signed-extensions";
    pub const MOZHARNESS: &str = "mozharness";
    pub const EXTRA_OPTIONS: &str = "extra-options";
    pub const ATTRIBUTES: &str = "attributes";
}

/// One candidate CI job description.
///
/// Wraps an insertion-ordered JSON mapping. Cloning is a deep copy, so fan-out
/// siblings never share nested structures.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobRecord(Map<String, Value>);

impl JobRecord {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build a record from a JSON value, rejecting anything but a mapping.
    pub fn from_value(value: Value) -> Result<Self, AppError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(AppError::new(
                ErrorCategory::ValidationError,
                format!("job description must be a mapping, got {}", type_name(&other)),
            )
            .with_code("RAPTOR-SCHEMA-002")),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert<V: Into<Value>>(&mut self, key: &str, value: V) -> Option<Value> {
        self.0.insert(key.to_string(), value.into())
    }

    /// Set `key` only when it is absent.
    pub fn set_default<V: Into<Value>>(&mut self, key: &str, value: V) {
        self.0.entry(key.to_string()).or_insert_with(|| value.into());
    }

    /// Remove and return a field, keeping the order of the remaining keys.
    pub fn pop(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    /// Pop a field and read it as a flag; absent or non-boolean values are `false`.
    pub fn pop_flag(&mut self, key: &str) -> bool {
        matches!(self.pop(key), Some(Value::Bool(true)))
    }

    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Read a string field every record is expected to carry by this point.
    pub fn require_str(&self, key: &str) -> Result<&str, AppError> {
        self.str_field(key).ok_or_else(|| {
            AppError::new(
                ErrorCategory::InvariantViolation,
                format!("job record is missing string field '{}'", key),
            )
            .with_code("RAPTOR-INVARIANT-002")
            .for_job(self.test_name())
            .at_field(key)
        })
    }

    /// Record identity used in logs and errors.
    pub fn test_name(&self) -> &str {
        self.str_field(fields::TEST_NAME).unwrap_or("<unnamed>")
    }

    pub fn test_platform(&self) -> &str {
        self.str_field(fields::TEST_PLATFORM).unwrap_or_default()
    }

    /// Append `suffix` to an existing string field.
    pub fn append_str(&mut self, key: &str, suffix: &str) -> Result<(), AppError> {
        let current = match self.0.get(key) {
            Some(Value::String(text)) => text.clone(),
            other => {
                let found = if other.is_some() { "non-string" } else { "missing" };
                return Err(AppError::new(
                    ErrorCategory::InvariantViolation,
                    format!("cannot append to {} field '{}'", found, key),
                )
                .with_code("RAPTOR-INVARIANT-002")
                .for_job(self.test_name())
                .at_field(key))
            }
        };
        self.insert(key, format!("{}{}", current, suffix));
        Ok(())
    }

    pub fn symbol(&self) -> Result<(String, String), AppError> {
        self.require_str(fields::TREEHERDER_SYMBOL)
            .map(symbol::split_symbol)
    }

    pub fn set_symbol(&mut self, group: &str, leaf: &str) {
        self.insert(fields::TREEHERDER_SYMBOL, symbol::join_symbol(group, leaf));
    }

    /// Append `suffix` to the leaf component of the treeherder symbol.
    pub fn suffix_symbol_leaf(&mut self, suffix: &str) -> Result<(), AppError> {
        let (group, leaf) = self.symbol()?;
        self.set_symbol(&group, &format!("{}{}", leaf, suffix));
        Ok(())
    }

    /// Append `suffix` to the group component of the treeherder symbol.
    pub fn suffix_symbol_group(&mut self, suffix: &str) -> Result<(), AppError> {
        let (group, leaf) = self.symbol()?;
        self.set_symbol(&format!("{}{}", group, suffix), &leaf);
        Ok(())
    }

    /// Mutable access to a nested mapping, creating it when absent.
    pub fn mapping_mut(&mut self, key: &str) -> Result<&mut Map<String, Value>, AppError> {
        let test_name = self.test_name().to_string();
        let slot = self
            .0
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        slot.as_object_mut().ok_or_else(|| {
            AppError::new(
                ErrorCategory::InvariantViolation,
                format!("field '{}' must be a mapping", key),
            )
            .with_code("RAPTOR-INVARIANT-002")
            .for_job(test_name)
            .at_field(key)
        })
    }

    /// `mozharness.extra-options`, created empty when absent.
    pub fn extra_options_mut(&mut self) -> Result<&mut Vec<Value>, AppError> {
        let test_name = self.test_name().to_string();
        let mozharness = self.mapping_mut(fields::MOZHARNESS)?;
        let slot = mozharness
            .entry(fields::EXTRA_OPTIONS.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        slot.as_array_mut().ok_or_else(|| {
            AppError::new(
                ErrorCategory::InvariantViolation,
                "mozharness.extra-options must be a list",
            )
            .with_code("RAPTOR-INVARIANT-002")
            .for_job(test_name)
            .at_field("mozharness.extra-options")
        })
    }

    pub fn push_extra_option<T: Into<String>>(&mut self, option: T) -> Result<(), AppError> {
        self.extra_options_mut()?.push(Value::String(option.into()));
        Ok(())
    }

    /// Current extra options, ignoring non-string entries.
    pub fn extra_options(&self) -> Vec<&str> {
        self.0
            .get(fields::MOZHARNESS)
            .and_then(|mozharness| mozharness.get(fields::EXTRA_OPTIONS))
            .and_then(Value::as_array)
            .map(|options| options.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

impl From<Map<String, Value>> for JobRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}
