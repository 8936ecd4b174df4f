use crate::core::config::TransformConfig;
use crate::core::error::AppError;
use crate::core::job::{fields, JobRecord};
use crate::core::transform::{JobTransform, BROWSERTIME_TP6_PREFIX};
use serde_json::Value;

/// Extra `--test-url-params` for tests on a platform family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlParamRule {
    pub platform_prefix: &'static str,
    /// Empty means every branch.
    pub branches: &'static [&'static str],
    /// The rule applies when any of these is a substring of the test name.
    pub test_names: &'static [&'static str],
    pub url_params: &'static [&'static str],
}

impl UrlParamRule {
    pub fn applies(&self, test_platform: &str, test_name: &str, project: &str, is_try: bool) -> bool {
        test_platform.starts_with(self.platform_prefix)
            && self.test_names.iter().any(|name| test_name.contains(name))
            && (self.branches.is_empty()
                || self.branches.iter().any(|branch| *branch == project)
                || (is_try && self.branches.contains(&"try")))
    }

    pub fn option(&self) -> String {
        format!("--test-url-params={}", self.url_params.join("&"))
    }
}

pub const URL_PARAM_RULES: &[UrlParamRule] = &[UrlParamRule {
    platform_prefix: "android-hw-g5",
    branches: &[],
    test_names: &["youtube-playback"],
    // skips the videos above 1080p
    url_params: &["exclude=1,2,9,10,17,18,21,22,26,28,30,32,39,40,47,48,55,56,63,64,71,72,79,80,83,84,89,90,95,96"],
}];

/// Turns the remaining raptor-only fields into mozharness command line options.
pub struct ExtraOptionsTransform;

impl JobTransform for ExtraOptionsTransform {
    fn name(&self) -> &'static str {
        "ExtraOptionsTransform"
    }

    fn transform(
        &self,
        config: &TransformConfig,
        jobs: Vec<JobRecord>,
    ) -> Result<Vec<JobRecord>, AppError> {
        let project = config.params.project.as_str();
        let is_try = config.params.is_try();
        jobs.into_iter()
            .map(|mut job| {
                add_extra_options(&mut job, project, is_try)?;
                Ok(job)
            })
            .collect()
    }
}

fn add_extra_options(job: &mut JobRecord, project: &str, is_try: bool) -> Result<(), AppError> {
    let mut options = Vec::new();

    if job.pop_flag(fields::RUN_VISUAL_METRICS) {
        options.push("--browsertime-video".to_string());
        job.mapping_mut(fields::ATTRIBUTES)?
            .insert(fields::RUN_VISUAL_METRICS.to_string(), Value::Bool(true));
    }

    if let Some(app) = job.pop(fields::APP) {
        options.push(format!("--app={}", option_value(&app)));
    }

    if job.test_name().starts_with(BROWSERTIME_TP6_PREFIX) && job.pop_flag(fields::COLD) {
        options.push("--cold".to_string());
    }

    for (field, flag) in [
        (fields::ACTIVITY, "--activity"),
        (fields::BINARY_PATH, "--binary-path"),
        (fields::RAPTOR_TEST, "--test"),
    ] {
        if let Some(value) = job.pop(field) {
            options.push(format!("{}={}", flag, option_value(&value)));
        }
    }

    if matches!(job.get(fields::REQUIRE_SIGNED_EXTENSIONS), Some(Value::Bool(true))) {
        options.push("--is-release-build".to_string());
    }

    let test_platform = job.test_platform().to_string();
    let test_name = job.test_name().to_string();
    options.extend(
        URL_PARAM_RULES
            .iter()
            .filter(|rule| rule.applies(&test_platform, &test_name, project, is_try))
            .map(UrlParamRule::option),
    );

    let extra_options = job.extra_options_mut()?;
    extra_options.extend(options.into_iter().map(Value::String));
    tracing::trace!(job = %test_name, count = extra_options.len(), "built extra options");
    Ok(())
}

/// Strings go in verbatim; anything else keeps its JSON rendering.
fn option_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
