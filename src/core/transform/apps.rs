use crate::core::config::TransformConfig;
use crate::core::error::AppError;
use crate::core::job::{fields, JobRecord};
use crate::core::keyed_by::resolve_keyed_by;
use crate::core::transform::normalize::keyed_by_error;
use crate::core::transform::JobTransform;
use crate::core::types::ErrorCategory;
use serde_json::Value;

/// Treeherder group suffix per app; apps missing here keep their symbol.
pub const APP_SYMBOLS: &[(&str, &str)] = &[
    ("chrome", "ChR"),
    ("chromium", "Cr"),
    ("fenix", "fenix"),
    ("refbrow", "refbrow"),
];

const COLD_SUFFIX: &str = "-cold";

pub fn app_symbol(app: &str) -> Option<&'static str> {
    APP_SYMBOLS
        .iter()
        .find(|(name, _)| *name == app)
        .map(|(_, symbol)| *symbol)
}

/// Fans a job out into one job per entry of `apps`.
pub struct SplitAppsTransform;

impl JobTransform for SplitAppsTransform {
    fn name(&self) -> &'static str {
        "SplitAppsTransform"
    }

    fn transform(
        &self,
        config: &TransformConfig,
        jobs: Vec<JobRecord>,
    ) -> Result<Vec<JobRecord>, AppError> {
        let extra = config.keyed_by_attributes();
        let mut split = Vec::with_capacity(jobs.len());
        for mut job in jobs {
            let item_name = job.test_name().to_string();
            resolve_keyed_by(&mut job, fields::APPS, &item_name, &extra)
                .map_err(|err| keyed_by_error(err, &item_name, fields::APPS))?;

            let apps = match job.pop(fields::APPS) {
                Some(Value::Array(apps)) if !apps.is_empty() => apps,
                _ => {
                    split.push(job);
                    continue;
                }
            };

            for app in &apps {
                let app = app.as_str().ok_or_else(|| {
                    AppError::new(
                        ErrorCategory::InvariantViolation,
                        format!("apps entries must be strings, got {}", app),
                    )
                    .with_code("RAPTOR-INVARIANT-002")
                    .for_job(&item_name)
                    .at_field(fields::APPS)
                })?;
                let app_job = for_app(&job, app)?;
                tracing::trace!(from = %item_name, to = app_job.test_name(), "split app");
                split.push(app_job);
            }
        }
        Ok(split)
    }
}

fn for_app(job: &JobRecord, app: &str) -> Result<JobRecord, AppError> {
    let mut app_job = job.clone();
    app_job.insert(fields::APP, app);
    app_job.append_str(fields::DESCRIPTION, &format!(" on {}", capitalize(app)))?;

    let name = app_test_name(job.require_str(fields::TEST_NAME)?, app);
    app_job.insert(fields::TEST_NAME, name.clone());
    app_job.insert(fields::TRY_NAME, name);

    if let Some(symbol) = app_symbol(app) {
        app_job.suffix_symbol_group(&format!("-{}", symbol))?;
    }
    Ok(app_job)
}

/// `foo` becomes `foo-app`; `foo-cold` becomes `foo-app-cold`.
fn app_test_name(name: &str, app: &str) -> String {
    match name.strip_suffix(COLD_SUFFIX) {
        Some(base) => format!("{}-{}{}", base, app, COLD_SUFFIX),
        None => format!("{}-{}", name, app),
    }
}

/// Upper-case the first character and lower-case the rest.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
