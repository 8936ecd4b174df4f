#![allow(clippy::result_large_err)]

use super::Parameters;
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use std::env;
use std::path::Path;

pub struct ParametersLoader;

impl ParametersLoader {
    /// Load parameters from an optional YAML file.
    /// Environment variables override file values
    pub fn load(path: Option<&Path>) -> Result<Parameters, AppError> {
        let mut params = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Parameters::default(),
        };

        Self::apply_env_overrides(&mut params);

        Ok(params)
    }

    /// Load parameters from a specific file; the file must exist
    pub fn load_from_file(path: &Path) -> Result<Parameters, AppError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::new(
                ErrorCategory::IoError,
                format!("Failed to read parameters file {}: {}", path.display(), e),
            )
            .with_code("RAPTOR-CONFIG-001")
        })?;

        if content.trim().is_empty() {
            return Ok(Parameters::default());
        }

        serde_yaml::from_str(&content).map_err(|e| {
            AppError::new(
                ErrorCategory::ConfigError,
                format!("Failed to parse parameters file {}: {}", path.display(), e),
            )
            .with_code("RAPTOR-CONFIG-001")
        })
    }

    /// Environment variables take precedence over file values
    fn apply_env_overrides(params: &mut Parameters) {
        if let Ok(project) = env::var("RAPTOR_TASKGEN_PROJECT") {
            if !project.trim().is_empty() {
                params.project = project;
            }
        }

        if let Ok(try_mode) = env::var("RAPTOR_TASKGEN_TRY_MODE") {
            if !try_mode.trim().is_empty() {
                params.try_mode = Some(try_mode);
            }
        }
    }

}
