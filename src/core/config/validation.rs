#![allow(clippy::result_large_err)]

use super::Parameters;
use crate::core::error::AppError;
use crate::core::types::ErrorCategory;

pub struct ParametersValidator;

impl ParametersValidator {
    /// Validate parameter rules
    pub fn validate(params: &Parameters) -> Result<(), AppError> {
        if params.project.trim().is_empty() {
            return Err(AppError::new(
                ErrorCategory::ConfigError,
                "project parameter cannot be empty",
            )
            .with_code("RAPTOR-CONFIG-001"));
        }

        if params.project.chars().any(char::is_whitespace) {
            return Err(AppError::new(
                ErrorCategory::ConfigError,
                format!("project '{}' must not contain whitespace", params.project),
            )
            .with_code("RAPTOR-CONFIG-001"));
        }

        Ok(())
    }
}
