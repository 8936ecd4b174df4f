pub mod config;
pub mod error;
pub mod job;
pub mod keyed_by;
pub mod schema;
pub mod transform;
pub mod types;

pub use config::{Parameters, ParametersLoader, ParametersValidator, TransformConfig};
pub use error::{AppError, DefaultErrorReporter, ErrorReporter};
pub use job::{load_kind_file, parse_kind, JobRecord};
pub use keyed_by::{evaluate_keyed_by, resolve_keyed_by, KeyedByError};
pub use schema::{validate_job, validate_jobs};
pub use transform::{apply_default_pipeline, apply_pipeline, default_stages, JobTransform};
pub use types::*;
