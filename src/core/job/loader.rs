#![allow(clippy::result_large_err)]

use super::{fields, JobRecord};
use crate::core::error::AppError;
use crate::core::keyed_by::is_keyed_by;
use crate::core::types::ErrorCategory;
use serde_json::{Map, Value};
use std::path::Path;

const JOB_DEFAULTS_KEY: &str = "job-defaults";
const JOBS_KEY: &str = "jobs";

/// Load job definitions from a kind file on disk.
pub fn load_kind_file(path: &Path) -> Result<Vec<JobRecord>, AppError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        AppError::new(
            ErrorCategory::IoError,
            format!("failed to read kind file {}: {}", path.display(), e),
        )
        .with_code("RAPTOR-LOAD-001")
    })?;
    let jobs = parse_kind(&content, &path.display().to_string())?;
    tracing::debug!(path = %path.display(), jobs = jobs.len(), "loaded kind file");
    Ok(jobs)
}

/// Parse a kind document.
///
/// Accepts a list of job mappings, a mapping with `job-defaults` and `jobs`, or a
/// bare mapping of job name to job. Named jobs default their `test-name` to the key.
pub fn parse_kind(content: &str, origin: &str) -> Result<Vec<JobRecord>, AppError> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let document: Value = serde_yaml::from_str(content).map_err(|e| {
        AppError::new(
            ErrorCategory::SerializationError,
            format!("failed to parse kind file {}: {}", origin, e),
        )
        .with_code("RAPTOR-LOAD-001")
    })?;

    match document {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                JobRecord::from_value(item).map_err(|err| err.at_field(format!("[{}]", index)))
            })
            .collect(),
        Value::Object(mut map) => {
            let defaults = map.shift_remove(JOB_DEFAULTS_KEY);
            let jobs = match map.shift_remove(JOBS_KEY) {
                Some(Value::Object(jobs)) => jobs,
                Some(other) => {
                    return Err(AppError::new(
                        ErrorCategory::ValidationError,
                        format!(
                            "'{}' in {} must be a mapping of job name to job, got {}",
                            JOBS_KEY,
                            origin,
                            super::type_name(&other)
                        ),
                    )
                    .with_code("RAPTOR-LOAD-001")
                    .at_field(JOBS_KEY))
                }
                None => map,
            };
            named_jobs(jobs, defaults.as_ref())
        }
        other => Err(AppError::new(
            ErrorCategory::ValidationError,
            format!(
                "kind file {} must contain a list or mapping of jobs, got {}",
                origin,
                super::type_name(&other)
            ),
        )
        .with_code("RAPTOR-LOAD-001")),
    }
}

fn named_jobs(
    jobs: Map<String, Value>,
    defaults: Option<&Value>,
) -> Result<Vec<JobRecord>, AppError> {
    let mut records = Vec::with_capacity(jobs.len());
    for (name, job) in jobs {
        let job = match defaults {
            Some(defaults) => merge(defaults, job),
            None => job,
        };
        let mut record = JobRecord::from_value(job).map_err(|err| err.at_field(name.clone()))?;
        record.set_default(fields::TEST_NAME, name);
        records.push(record);
    }
    Ok(records)
}

/// Deep-merge `overlay` on top of a copy of `base`.
///
/// Mappings merge recursively, lists concatenate base-first, scalars from the
/// overlay win. A `by-*` wrapper in the overlay replaces the base value whole.
pub fn merge(base: &Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(base), Value::Object(source)) => {
            let mut dest = base.clone();
            merge_into(&mut dest, source);
            Value::Object(dest)
        }
        (_, overlay) => overlay,
    }
}

fn merge_into(dest: &mut Map<String, Value>, source: Map<String, Value>) {
    for (key, value) in source {
        if is_keyed_by(&value) {
            dest.insert(key, value);
            continue;
        }
        match value {
            Value::Object(child) => {
                let slot = dest
                    .entry(key)
                    .or_insert_with(|| Value::Object(Map::new()));
                match slot {
                    Value::Object(existing) => merge_into(existing, child),
                    other => *other = Value::Object(child),
                }
            }
            Value::Array(items) => {
                let slot = dest.entry(key).or_insert_with(|| Value::Array(Vec::new()));
                match slot {
                    Value::Array(existing) => existing.extend(items),
                    other => *other = Value::Array(items),
                }
            }
            scalar => {
                dest.insert(key, scalar);
            }
        }
    }
}
