use crate::core::types::OutputFormat;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Clone, Debug)]
pub struct ExpandArgs {
    /// Kind file holding the raptor job definitions
    #[arg(value_name = "KIND_FILE")]
    pub kind_file: PathBuf,

    /// YAML parameters file (project, try_mode, level, ...)
    #[arg(long, value_name = "FILE")]
    pub parameters: Option<PathBuf>,

    /// Override the project the jobs are generated for
    #[arg(long, value_name = "NAME", help_heading = "Parameter Overrides")]
    pub project: Option<String>,

    /// Mark the run as a try push with the given try mode
    #[arg(long, value_name = "MODE", help_heading = "Parameter Overrides")]
    pub try_mode: Option<String>,

    /// Emit json or yaml (default: json)
    #[arg(long, default_value = "json", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Write the expanded jobs here instead of stdout
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Clone, Debug)]
pub struct ValidateArgs {
    /// Kind file holding the raptor job definitions
    #[arg(value_name = "KIND_FILE")]
    pub kind_file: PathBuf,
}
