pub mod config;
pub mod layers;

pub use layers::console::ConsoleOutput;

use crate::cli::Command;
use crate::logging::config::LoggingConfig;
use crate::logging::layers::{console, file};
use crate::Result;
use anyhow::{anyhow, Context};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::Registry;

/// Directory holding per-workspace tool state such as `logging.toml`.
pub const STATE_DIR: &str = ".raptor-taskgen";

static LOGGER_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Keeps logging sinks active for the duration of the command.
pub struct LoggingGuard {
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

/// Initialize logging for the provided CLI command.
///
/// Configuration precedence is defaults, then `<workspace>/.raptor-taskgen/logging.toml`,
/// then `RAPTOR_TASKGEN_LOG_*` variables; `RUST_LOG` replaces the configured level entirely.
/// Errors when invoked more than once per process.
pub fn init(command: &Command) -> Result<LoggingGuard> {
    if LOGGER_INITIALIZED
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        return Err(anyhow!("logging already initialized"));
    }

    let workspace_root = resolve_workspace_path(command);
    let config = LoggingConfig::load(workspace_root.as_deref())?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.default_level))
        .context("failed to configure tracing level")?;
    let log_file_path = file::log_file_path(&config, workspace_root.as_deref())?;
    type FileSubscriber = file::FileLayerStack<Registry>;

    let (file_layer, file_guard) = file::file_layer::<Registry>(&log_file_path, config.enable_file)?;
    let console_layer =
        console::console_layer::<FileSubscriber>(config.console_output.unwrap_or_default());

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .with(env_filter)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Workspace whose `.raptor-taskgen` directory configures logging: the kind file's
/// directory for commands that read one, else the current directory.
fn resolve_workspace_path(command: &Command) -> Option<PathBuf> {
    let kind_dir = match command {
        Command::Expand(args) => args.kind_file.parent().map(Path::to_path_buf),
        Command::Validate(args) => args.kind_file.parent().map(Path::to_path_buf),
        Command::Stages => None,
    };
    kind_dir
        .filter(|dir| !dir.as_os_str().is_empty())
        .or_else(|| env::current_dir().ok())
}
