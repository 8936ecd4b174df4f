use crate::core::config::TransformConfig;
use crate::core::error::AppError;
use crate::core::job::JobRecord;
use crate::core::transform::apps::SplitAppsTransform;
use crate::core::transform::condprof::ConditionedProfileTransform;
use crate::core::transform::extra_options::ExtraOptionsTransform;
use crate::core::transform::normalize::{
    ResolveKeyedByTransform, SetDefaultsTransform, ValidateSchemaTransform,
};
use crate::core::transform::pageload::SplitPageloadTransform;
use crate::core::transform::subtests::SplitSubtestsTransform;
use crate::core::transform::JobTransform;

/// Stages in the order they run; later stages rely on fields set or removed by earlier ones.
pub fn default_stages() -> Vec<Box<dyn JobTransform>> {
    vec![
        Box::new(ValidateSchemaTransform),
        Box::new(SetDefaultsTransform),
        Box::new(SplitAppsTransform),
        Box::new(ResolveKeyedByTransform),
        Box::new(SplitPageloadTransform),
        Box::new(ConditionedProfileTransform),
        Box::new(SplitSubtestsTransform),
        Box::new(ExtraOptionsTransform),
    ]
}

pub fn stage_names() -> Vec<&'static str> {
    default_stages().iter().map(|stage| stage.name()).collect()
}

pub fn apply_default_pipeline(
    config: &TransformConfig,
    jobs: Vec<JobRecord>,
) -> Result<Vec<JobRecord>, AppError> {
    apply_pipeline(&default_stages(), config, jobs)
}

pub fn apply_pipeline(
    stages: &[Box<dyn JobTransform>],
    config: &TransformConfig,
    jobs: Vec<JobRecord>,
) -> Result<Vec<JobRecord>, AppError> {
    let initial = jobs.len();
    let mut current = jobs;
    for stage in stages {
        let before = current.len();
        current = stage.transform(config, current).map_err(|mut err| {
            err.add_context("stage", stage.name());
            err
        })?;
        tracing::debug!(
            stage = stage.name(),
            jobs_in = before,
            jobs_out = current.len(),
            "applied transform"
        );
    }
    tracing::info!(
        kind = %config.kind,
        project = %config.params.project,
        jobs_in = initial,
        jobs_out = current.len(),
        "expanded job descriptions"
    );
    Ok(current)
}
