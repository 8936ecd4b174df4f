#![allow(clippy::result_large_err)] // Transform pipeline returns AppError for structured diagnostics.

use crate::core::config::TransformConfig;
use crate::core::error::AppError;
use crate::core::job::JobRecord;

mod apps;
mod condprof;
mod extra_options;
mod normalize;
mod pageload;
mod pipeline;
mod subtests;

pub use apps::{app_symbol, SplitAppsTransform, APP_SYMBOLS};
pub use condprof::ConditionedProfileTransform;
pub use extra_options::{ExtraOptionsTransform, UrlParamRule, URL_PARAM_RULES};
pub use normalize::{ResolveKeyedByTransform, SetDefaultsTransform, ValidateSchemaTransform, KEYED_BY_FIELDS};
pub use pageload::{PageloadMode, SplitPageloadTransform, COLD_MAX_RUN_TIME};
pub use pipeline::{apply_default_pipeline, apply_pipeline, default_stages, stage_names};
pub use subtests::SplitSubtestsTransform;

/// Browsertime page-load tests take `--cold` instead of a `-cold` raptor test name.
pub const BROWSERTIME_TP6_PREFIX: &str = "browsertime-tp6";

/// Pure rewrite of the job sequence; may fan out, drop, or reorder records.
pub trait JobTransform {
    fn name(&self) -> &'static str;
    fn transform(
        &self,
        config: &TransformConfig,
        jobs: Vec<JobRecord>,
    ) -> Result<Vec<JobRecord>, AppError>;
}
