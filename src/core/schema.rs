#![allow(clippy::result_large_err)] // Schema APIs return AppError to preserve structured validation context without boxing.

use crate::core::error::AppError;
use crate::core::job::{fields, type_name, JobRecord};
use crate::core::keyed_by::keyed_by_parts;
use crate::core::types::ErrorCategory;
use serde_json::Value;

/// Page-load modes accepted by the `pageload` field.
pub const PAGELOAD_MODES: &[&str] = &["cold", "warm", "both"];

/// Shape a concrete (non keyed-by) field value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Str,
    Bool,
    Int,
    StrList,
    StrOrStrList,
    OneOf(&'static [&'static str]),
    /// A string, null, or a mapping with `index` and `name`.
    Target,
}

impl Shape {
    fn accepts(&self, value: &Value) -> bool {
        match self {
            Shape::Str => value.is_string(),
            Shape::Bool => value.is_boolean(),
            Shape::Int => value.is_i64() || value.is_u64(),
            Shape::StrList => is_str_list(value),
            Shape::StrOrStrList => value.is_string() || is_str_list(value),
            Shape::OneOf(allowed) => value
                .as_str()
                .map(|text| allowed.contains(&text))
                .unwrap_or(false),
            Shape::Target => match value {
                Value::Null | Value::String(_) => true,
                Value::Object(map) => map.contains_key("index") && map.contains_key("name"),
                _ => false,
            },
        }
    }

    fn describe(&self) -> String {
        match self {
            Shape::Str => "a string".to_string(),
            Shape::Bool => "a boolean".to_string(),
            Shape::Int => "an integer".to_string(),
            Shape::StrList => "a list of strings".to_string(),
            Shape::StrOrStrList => "a string or a list of strings".to_string(),
            Shape::OneOf(allowed) => format!("one of {}", allowed.join(", ")),
            Shape::Target => "a string, null, or a mapping with index and name".to_string(),
        }
    }
}

fn is_str_list(value: &Value) -> bool {
    value
        .as_array()
        .map(|items| items.iter().all(Value::is_string))
        .unwrap_or(false)
}

/// One entry of the job schema.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub required: bool,
    pub shape: Shape,
    /// Attributes a `by-*` wrapper may key this field by; empty means not keyable.
    pub keyed_by: &'static [&'static str],
}

const fn required(name: &'static str, shape: Shape) -> FieldRule {
    FieldRule {
        name,
        required: true,
        shape,
        keyed_by: &[],
    }
}

const fn optional(
    name: &'static str,
    shape: Shape,
    keyed_by: &'static [&'static str],
) -> FieldRule {
    FieldRule {
        name,
        required: false,
        shape,
        keyed_by,
    }
}

/// Raptor job schema. Keys not listed here pass through unchecked.
pub const RAPTOR_JOB_SCHEMA: &[FieldRule] = &[
    required(fields::TEST_NAME, Shape::Str),
    required(fields::TEST_PLATFORM, Shape::Str),
    required(fields::REQUIRE_SIGNED_EXTENSIONS, Shape::Bool),
    required(fields::TREEHERDER_SYMBOL, Shape::Str),
    required(fields::DESCRIPTION, Shape::Str),
    optional(fields::TRY_NAME, Shape::Str, &[]),
    optional(fields::APPS, Shape::StrList, &["test-platform"]),
    optional(fields::RAPTOR_TEST, Shape::Str, &[]),
    optional(fields::RAPTOR_SUBTESTS, Shape::StrList, &[]),
    optional(fields::ACTIVITY, Shape::Str, &["app"]),
    optional(fields::BINARY_PATH, Shape::Str, &["app"]),
    optional(
        fields::PAGELOAD,
        Shape::OneOf(PAGELOAD_MODES),
        &["test-platform", "app"],
    ),
    optional(fields::CONDPROF, Shape::Bool, &["app"]),
    optional(fields::MAX_RUN_TIME, Shape::Int, &["app", "test-platform"]),
    optional(
        "run-on-projects",
        Shape::StrOrStrList,
        &["app", "test-platform"],
    ),
    optional("variants", Shape::StrList, &["app"]),
    optional("target", Shape::Target, &["app", "test-platform"]),
    optional(fields::RUN_VISUAL_METRICS, Shape::Bool, &["app"]),
];

/// Validate every job, failing on the first violation.
pub fn validate_jobs(jobs: &[JobRecord]) -> Result<(), AppError> {
    for (index, job) in jobs.iter().enumerate() {
        validate_job(job).map_err(|mut err| {
            err.add_context("index", &index.to_string());
            err
        })?;
    }
    Ok(())
}

/// Validate a single job against [`RAPTOR_JOB_SCHEMA`].
pub fn validate_job(job: &JobRecord) -> Result<(), AppError> {
    for rule in RAPTOR_JOB_SCHEMA {
        match job.get(rule.name) {
            None if rule.required => {
                return Err(AppError::new(
                    ErrorCategory::ValidationError,
                    format!("required key '{}' not provided", rule.name),
                )
                .with_code("RAPTOR-SCHEMA-001")
                .for_job(job.test_name())
                .at_field(rule.name));
            }
            None => {}
            Some(value) => check_value(job, rule, value, rule.name)?,
        }
    }
    Ok(())
}

fn check_value(job: &JobRecord, rule: &FieldRule, value: &Value, path: &str) -> Result<(), AppError> {
    if let Some((attribute, alternatives)) = keyed_by_parts(value) {
        if !rule.keyed_by.contains(&attribute) {
            let allowed = if rule.keyed_by.is_empty() {
                "it cannot be keyed".to_string()
            } else {
                format!("allowed: by-{}", rule.keyed_by.join(", by-"))
            };
            return Err(AppError::new(
                ErrorCategory::ValidationError,
                format!(
                    "'{}' may not be keyed by '{}' ({})",
                    path, attribute, allowed
                ),
            )
            .with_code("RAPTOR-SCHEMA-003")
            .for_job(job.test_name())
            .at_field(path));
        }
        for (key, alternative) in alternatives {
            let nested = format!("{}.by-{}.{}", path, attribute, key);
            check_value(job, rule, alternative, &nested)?;
        }
        return Ok(());
    }

    if rule.shape.accepts(value) {
        return Ok(());
    }
    Err(AppError::new(
        ErrorCategory::ValidationError,
        format!(
            "'{}' must be {}, got {}",
            path,
            rule.shape.describe(),
            describe_value(value)
        ),
    )
    .with_code("RAPTOR-SCHEMA-002")
    .for_job(job.test_name())
    .at_field(path))
}

fn describe_value(value: &Value) -> String {
    match value {
        Value::String(text) => format!("'{}'", text),
        other => type_name(other).to_string(),
    }
}
