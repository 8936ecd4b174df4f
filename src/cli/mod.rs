pub mod args;
pub mod commands;

pub use args::{ExpandArgs, ValidateArgs};
use clap::{Parser, Subcommand};

const HELP_TEMPLATE: &str = "\
{name} {version}\n\
{about-with-newline}\n\
USAGE:\n    {usage}\n\
\nOPTIONS:\n{options}\n\
COMMANDS:\n{subcommands}\n";

const EXPAND_ENV_HELP: &str = "\
Example:
    raptor-taskgen expand taskcluster/ci/test/raptor.yml --project try --format yaml

Environment variables:
    RAPTOR_TASKGEN_PROJECT    Override the project parameter (default: mozilla-central)
    RAPTOR_TASKGEN_TRY_MODE   Override the try_mode parameter
    RAPTOR_TASKGEN_LOG_LEVEL  Override the default log level
    RAPTOR_TASKGEN_LOG_DIR    Write logs to this directory";

#[derive(Parser, Debug)]
#[command(name = "raptor-taskgen")]
#[command(version = crate::VERSION)]
#[command(about = "Expand raptor test definitions into concrete CI job descriptions")]
#[command(help_template = HELP_TEMPLATE)]
#[command(
    after_long_help = "Typical flow: validate a kind file, then expand it for a project and inspect the jobs."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(
        about = "Run the full transform pipeline over a kind file",
        long_about = "Expand loads every job of the kind file, runs each pipeline stage in order and writes the resulting job descriptions.",
        after_help = "Example:\n    raptor-taskgen expand taskcluster/ci/test/raptor.yml --project try --format yaml",
        after_long_help = EXPAND_ENV_HELP
    )]
    Expand(ExpandArgs),
    #[command(
        about = "Check job definitions against the raptor schema",
        long_about = "Validate loads the kind file and checks every job against the raptor job schema without expanding it.",
        after_help = "Example:\n    raptor-taskgen validate taskcluster/ci/test/raptor.yml"
    )]
    Validate(ValidateArgs),
    #[command(about = "List the pipeline stages in the order they run")]
    Stages,
}

pub fn run(args: Args) -> crate::Result<()> {
    match args.command {
        Command::Expand(expand_args) => commands::expand(expand_args),
        Command::Validate(validate_args) => commands::validate(validate_args),
        Command::Stages => commands::stages(),
    }
}
