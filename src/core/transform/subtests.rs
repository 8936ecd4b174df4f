use crate::core::config::TransformConfig;
use crate::core::error::AppError;
use crate::core::job::{fields, JobRecord};
use crate::core::transform::JobTransform;
use crate::core::types::ErrorCategory;
use serde_json::Value;

/// Splits every page-load URL listed in `raptor-subtests` into its own job.
///
/// The parent job is replaced by its chunks; chunks are numbered from 1 in the
/// treeherder symbol.
pub struct SplitSubtestsTransform;

impl JobTransform for SplitSubtestsTransform {
    fn name(&self) -> &'static str {
        "SplitSubtestsTransform"
    }

    fn transform(
        &self,
        _config: &TransformConfig,
        jobs: Vec<JobRecord>,
    ) -> Result<Vec<JobRecord>, AppError> {
        let mut chunks = Vec::with_capacity(jobs.len());
        for mut job in jobs {
            let subtests = match job.pop(fields::RAPTOR_SUBTESTS) {
                Some(Value::Array(subtests)) if !subtests.is_empty() => subtests,
                None | Some(Value::Null) | Some(Value::Array(_)) => {
                    chunks.push(job);
                    continue;
                }
                Some(other) => {
                    return Err(AppError::new(
                        ErrorCategory::InvariantViolation,
                        format!("raptor-subtests must be a list, got {}", other),
                    )
                    .with_code("RAPTOR-INVARIANT-002")
                    .for_job(job.test_name())
                    .at_field(fields::RAPTOR_SUBTESTS))
                }
            };

            let (group, leaf) = job.symbol()?;
            for (index, subtest) in subtests.iter().enumerate() {
                let subtest = subtest.as_str().ok_or_else(|| {
                    AppError::new(
                        ErrorCategory::InvariantViolation,
                        format!("raptor-subtests entries must be strings, got {}", subtest),
                    )
                    .with_code("RAPTOR-INVARIANT-002")
                    .for_job(job.test_name())
                    .at_field(fields::RAPTOR_SUBTESTS)
                })?;
                let chunk_number = index + 1;

                let mut chunked = job.clone();
                chunked.append_str(fields::TEST_NAME, &format!("-{}", subtest))?;
                chunked.append_str(fields::TRY_NAME, &format!("-{}", subtest))?;
                chunked.insert(fields::RAPTOR_TEST, subtest);
                chunked.set_symbol(&group, &format!("{}-{}", leaf, chunk_number));
                chunked.append_str(fields::DESCRIPTION, &format!("-{}", subtest))?;
                chunks.push(chunked);
            }
        }
        Ok(chunks)
    }
}
