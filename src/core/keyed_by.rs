//! Resolution of `by-<attribute>` wrapped values.
//!
//! A keyed-by value looks like `{"by-app": {"fenix": 3000, "default": 1800}}` and
//! is replaced by the alternative selected from the record's own attributes.
//! Wrappers may nest: the selected alternative is resolved again.

use crate::core::job::JobRecord;
use regex::Regex;
use serde_json::{Map, Value};

const KEYED_BY_PREFIX: &str = "by-";
const DEFAULT_KEY: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyedByError {
    #[error("no attribute '{attribute}' and no value for 'default' found while determining item {item}")]
    MissingAttribute { attribute: String, item: String },
    #[error("no {attribute} matching {key:?} nor 'default' found while determining item {item}")]
    NoMatch {
        attribute: String,
        key: String,
        item: String,
    },
    #[error("multiple matching values for {attribute} {key:?} found while determining item {item}")]
    Ambiguous {
        attribute: String,
        key: String,
        item: String,
    },
    #[error("invalid alternative {pattern:?} under by-{attribute} while determining item {item}: {reason}")]
    InvalidPattern {
        attribute: String,
        pattern: String,
        item: String,
        reason: String,
    },
}

/// Split a keyed-by wrapper into its attribute name and alternatives.
pub fn keyed_by_parts(value: &Value) -> Option<(&str, &Map<String, Value>)> {
    let map = value.as_object()?;
    if map.len() != 1 {
        return None;
    }
    let (key, alternatives) = map.iter().next()?;
    let attribute = key.strip_prefix(KEYED_BY_PREFIX)?;
    Some((attribute, alternatives.as_object()?))
}

pub fn is_keyed_by(value: &Value) -> bool {
    keyed_by_parts(value).is_some()
}

/// Reduce a possibly keyed-by value to a concrete one.
pub fn evaluate_keyed_by(
    value: &Value,
    item_name: &str,
    attributes: &Map<String, Value>,
) -> Result<Value, KeyedByError> {
    let mut current = value;
    while let Some((attribute, alternatives)) = keyed_by_parts(current) {
        if alternatives.len() == 1 {
            if let Some(default) = alternatives.get(DEFAULT_KEY) {
                current = default;
                continue;
            }
        }

        let Some(key) = attributes.get(attribute).and_then(attribute_key) else {
            current = alternatives
                .get(DEFAULT_KEY)
                .ok_or_else(|| KeyedByError::MissingAttribute {
                    attribute: attribute.to_string(),
                    item: item_name.to_string(),
                })?;
            continue;
        };

        let matches = keymatch(alternatives, &key, attribute, item_name)?;
        current = match matches.as_slice() {
            [single] => *single,
            [] => {
                return Err(KeyedByError::NoMatch {
                    attribute: attribute.to_string(),
                    key,
                    item: item_name.to_string(),
                })
            }
            _ => {
                return Err(KeyedByError::Ambiguous {
                    attribute: attribute.to_string(),
                    key,
                    item: item_name.to_string(),
                })
            }
        };
    }
    Ok(current.clone())
}

/// Resolve `field` of `record` in place; a dotted field addresses a nested mapping.
///
/// Missing fields are left alone. Attributes are the record's own fields overlaid
/// with `extra`.
pub fn resolve_keyed_by(
    record: &mut JobRecord,
    field: &str,
    item_name: &str,
    extra: &Map<String, Value>,
) -> Result<(), KeyedByError> {
    let Some(value) = lookup(record.as_map(), field) else {
        return Ok(());
    };
    if !is_keyed_by(value) {
        return Ok(());
    }

    let mut attributes = record.as_map().clone();
    for (key, value) in extra {
        attributes.insert(key.clone(), value.clone());
    }
    let resolved = evaluate_keyed_by(value, item_name, &attributes)?;
    if let Some(slot) = lookup_mut(record, field) {
        *slot = resolved;
    }
    Ok(())
}

fn lookup<'a>(map: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    let mut segments = field.split('.');
    let mut current = map.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

fn lookup_mut<'a>(record: &'a mut JobRecord, field: &str) -> Option<&'a mut Value> {
    let mut segments = field.split('.');
    let mut current = record.get_mut(segments.next()?)?;
    for segment in segments {
        current = current.as_object_mut()?.get_mut(segment)?;
    }
    Some(current)
}

fn attribute_key(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Exact key first, then every key that matches as an anchored regex, then `default`.
fn keymatch<'a>(
    alternatives: &'a Map<String, Value>,
    key: &str,
    attribute: &str,
    item_name: &str,
) -> Result<Vec<&'a Value>, KeyedByError> {
    if let Some(exact) = alternatives.get(key) {
        return Ok(vec![exact]);
    }

    let mut matches = Vec::new();
    for (pattern, value) in alternatives {
        let regex = Regex::new(&format!("^(?:{})$", pattern)).map_err(|err| {
            KeyedByError::InvalidPattern {
                attribute: attribute.to_string(),
                pattern: pattern.clone(),
                item: item_name.to_string(),
                reason: err.to_string(),
            }
        })?;
        if regex.is_match(key) {
            matches.push(value);
        }
    }
    if !matches.is_empty() {
        return Ok(matches);
    }

    Ok(alternatives.get(DEFAULT_KEY).into_iter().collect())
}
