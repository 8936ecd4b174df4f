use crate::core::config::TransformConfig;
use crate::core::error::AppError;
use crate::core::job::{fields, JobRecord};
use crate::core::transform::{JobTransform, BROWSERTIME_TP6_PREFIX};
use crate::core::types::ErrorCategory;
use serde_json::Value;

/// Max run time, in seconds, of cold page-load jobs.
pub const COLD_MAX_RUN_TIME: u64 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageloadMode {
    Warm,
    Cold,
    Both,
}

impl PageloadMode {
    /// Anything other than `cold` or `both`, including absence, is warm.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("cold") => PageloadMode::Cold,
            Some("both") => PageloadMode::Both,
            _ => PageloadMode::Warm,
        }
    }
}

pub struct SplitPageloadTransform;

impl JobTransform for SplitPageloadTransform {
    fn name(&self) -> &'static str {
        "SplitPageloadTransform"
    }

    fn transform(
        &self,
        _config: &TransformConfig,
        jobs: Vec<JobRecord>,
    ) -> Result<Vec<JobRecord>, AppError> {
        let mut split = Vec::with_capacity(jobs.len());
        for mut job in jobs {
            let mode = PageloadMode::from_value(job.pop(fields::PAGELOAD).as_ref());
            match mode {
                PageloadMode::Warm => split.push(job),
                PageloadMode::Cold => {
                    make_cold(&mut job)?;
                    split.push(job);
                }
                PageloadMode::Both => {
                    let warm = job.clone();
                    split.push(warm);
                    make_cold(&mut job)?;
                    tracing::trace!(cold = job.test_name(), "split cold pageload");
                    split.push(job);
                }
            }
        }
        Ok(split)
    }
}

fn make_cold(job: &mut JobRecord) -> Result<(), AppError> {
    if !job.contains(fields::RAPTOR_TEST) {
        return Err(AppError::new(
            ErrorCategory::InvariantViolation,
            "cold pageload requires 'raptor-test' to be set",
        )
        .with_code("RAPTOR-INVARIANT-001")
        .for_job(job.test_name())
        .at_field(fields::RAPTOR_TEST));
    }

    job.append_str(fields::DESCRIPTION, " using cold pageload")?;

    // browsertime keeps its test name and is told to run cold via `--cold`
    if job
        .require_str(fields::TEST_NAME)?
        .starts_with(BROWSERTIME_TP6_PREFIX)
    {
        job.insert(fields::COLD, true);
    } else {
        job.append_str(fields::RAPTOR_TEST, "-cold")?;
    }

    job.insert(fields::MAX_RUN_TIME, COLD_MAX_RUN_TIME);
    job.append_str(fields::TEST_NAME, "-cold")?;
    job.append_str(fields::TRY_NAME, "-cold")?;
    job.suffix_symbol_leaf("-c")
}
