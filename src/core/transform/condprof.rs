use crate::core::config::TransformConfig;
use crate::core::error::AppError;
use crate::core::job::{fields, JobRecord};
use crate::core::transform::JobTransform;

/// Test names containing any of these never get a conditioned-profile twin.
const EXCLUDED_TEST_NAME_PARTS: &[&str] = &["chrome", "chromium"];
const EXCLUDED_PLATFORM_PREFIX: &str = "windows10-aarch64";

pub const CONDPROF_OPTION: &str = "--with-conditioned-profile";

/// Adds a conditioned-profile copy after every job with `condprof: true`.
pub struct ConditionedProfileTransform;

impl JobTransform for ConditionedProfileTransform {
    fn name(&self) -> &'static str {
        "ConditionedProfileTransform"
    }

    fn transform(
        &self,
        _config: &TransformConfig,
        jobs: Vec<JobRecord>,
    ) -> Result<Vec<JobRecord>, AppError> {
        let mut expanded = Vec::with_capacity(jobs.len());
        for mut job in jobs {
            if !job.pop_flag(fields::CONDPROF) || is_excluded(&job) {
                expanded.push(job);
                continue;
            }

            let mut condprof = job.clone();
            expanded.push(job);

            condprof.push_extra_option(CONDPROF_OPTION)?;
            condprof.suffix_symbol_leaf("-condprof")?;
            condprof.append_str(fields::DESCRIPTION, " with condprof")?;
            condprof.append_str(fields::TRY_NAME, "-condprof")?;
            condprof.append_str(fields::TEST_NAME, "-condprof")?;
            tracing::trace!(condprof = condprof.test_name(), "added conditioned profile job");
            expanded.push(condprof);
        }
        Ok(expanded)
    }
}

fn is_excluded(job: &JobRecord) -> bool {
    let test_name = job.test_name();
    EXCLUDED_TEST_NAME_PARTS
        .iter()
        .any(|part| test_name.contains(part))
        || job.test_platform().starts_with(EXCLUDED_PLATFORM_PREFIX)
}
