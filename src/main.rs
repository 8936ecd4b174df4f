use clap::Parser;
use raptor_taskgen::cli::{self, Args};
use raptor_taskgen::core::{AppError, DefaultErrorReporter, ErrorReporter};
use raptor_taskgen::logging;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();

    let _guard = match logging::init(&args.command) {
        Ok(guard) => Some(guard),
        Err(err) => {
            DefaultErrorReporter::new()
                .report_warning("logging disabled", Some(format!("{:#}", err)));
            None
        }
    };

    match cli::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error = match err.downcast::<AppError>() {
                Ok(app_error) => app_error,
                Err(other) => AppError::from(other),
            };
            tracing::error!(code = %error.code, "{}", error.message);
            DefaultErrorReporter::new().report_error(&error);
            ExitCode::from(1)
        }
    }
}
