use crate::core::config::TransformConfig;
use crate::core::error::AppError;
use crate::core::job::{fields, JobRecord};
use crate::core::keyed_by::{resolve_keyed_by, KeyedByError};
use crate::core::schema::validate_jobs;
use crate::core::transform::JobTransform;
use crate::core::types::ErrorCategory;

/// Fields whose keyed-by wrappers are resolved once `app` is known.
pub const KEYED_BY_FIELDS: &[&str] = &[
    fields::CONDPROF,
    "variants",
    "limit-platforms",
    fields::ACTIVITY,
    fields::BINARY_PATH,
    fields::PAGELOAD,
    fields::MAX_RUN_TIME,
    "run-on-projects",
    "target",
    fields::RUN_VISUAL_METRICS,
];

pub struct ValidateSchemaTransform;
pub struct SetDefaultsTransform;
pub struct ResolveKeyedByTransform;

impl JobTransform for ValidateSchemaTransform {
    fn name(&self) -> &'static str {
        "ValidateSchemaTransform"
    }

    fn transform(
        &self,
        _config: &TransformConfig,
        jobs: Vec<JobRecord>,
    ) -> Result<Vec<JobRecord>, AppError> {
        validate_jobs(&jobs)?;
        Ok(jobs)
    }
}

impl JobTransform for SetDefaultsTransform {
    fn name(&self) -> &'static str {
        "SetDefaultsTransform"
    }

    fn transform(
        &self,
        _config: &TransformConfig,
        jobs: Vec<JobRecord>,
    ) -> Result<Vec<JobRecord>, AppError> {
        Ok(jobs
            .into_iter()
            .map(|mut job| {
                job.set_default(fields::PAGELOAD, "warm");
                job.set_default(fields::RUN_VISUAL_METRICS, false);
                if let Some(test_name) = job.str_field(fields::TEST_NAME).map(str::to_string) {
                    job.set_default(fields::TRY_NAME, test_name);
                }
                job
            })
            .collect())
    }
}

impl JobTransform for ResolveKeyedByTransform {
    fn name(&self) -> &'static str {
        "ResolveKeyedByTransform"
    }

    fn transform(
        &self,
        config: &TransformConfig,
        jobs: Vec<JobRecord>,
    ) -> Result<Vec<JobRecord>, AppError> {
        let extra = config.keyed_by_attributes();
        let mut resolved = Vec::with_capacity(jobs.len());
        for mut job in jobs {
            let item_name = job.test_name().to_string();
            for field in KEYED_BY_FIELDS {
                resolve_keyed_by(&mut job, field, &item_name, &extra)
                    .map_err(|err| keyed_by_error(err, &item_name, field))?;
            }
            resolved.push(job);
        }
        Ok(resolved)
    }
}

pub(super) fn keyed_by_error(err: KeyedByError, item_name: &str, field: &str) -> AppError {
    let code = match err {
        KeyedByError::MissingAttribute { .. } | KeyedByError::NoMatch { .. } => {
            "RAPTOR-KEYED-001"
        }
        KeyedByError::Ambiguous { .. } => "RAPTOR-KEYED-002",
        KeyedByError::InvalidPattern { .. } => "RAPTOR-KEYED-003",
    };
    AppError::new(ErrorCategory::ResolutionError, err.to_string())
        .with_code(code)
        .for_job(item_name)
        .at_field(field)
        .with_suggestion("add a 'default' alternative or a key matching this job")
}
