use crate::{
    cli::args::{ExpandArgs, ValidateArgs},
    core::{
        apply_default_pipeline, job::load_kind_file, schema::validate_jobs,
        transform::stage_names, JobRecord, Parameters, ParametersLoader, ParametersValidator,
        TransformConfig,
    },
    utils::serialization::{serialize_as, FileUtils},
    Result,
};
use std::io::Write;
use std::path::Path;

const DEFAULT_KIND: &str = "raptor";

pub fn expand(args: ExpandArgs) -> Result<()> {
    let params = resolve_parameters(&args)?;
    let config = TransformConfig::new(kind_name(&args.kind_file), params);
    tracing::debug!(
        kind = %config.kind,
        project = %config.params.project,
        is_try = config.params.is_try(),
        "expanding kind file"
    );

    let jobs = load_kind_file(&args.kind_file)?;
    let expanded = apply_default_pipeline(&config, jobs)?;
    let records: Vec<_> = expanded.into_iter().map(JobRecord::into_value).collect();
    let content = serialize_as(args.format, &records)?;

    match &args.output {
        Some(path) => {
            FileUtils.write_bytes(path, &content)?;
            tracing::info!(path = %path.display(), jobs = records.len(), "wrote expanded jobs");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&content)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

pub fn validate(args: ValidateArgs) -> Result<()> {
    let jobs = load_kind_file(&args.kind_file)?;
    validate_jobs(&jobs)?;
    println!(
        "{}: {} job definition(s) valid",
        args.kind_file.display(),
        jobs.len()
    );
    Ok(())
}

pub fn stages() -> Result<()> {
    for (index, name) in stage_names().iter().enumerate() {
        println!("{:>2}. {}", index + 1, name);
    }
    Ok(())
}

/// Parameters file, then environment, then command line flags.
fn resolve_parameters(args: &ExpandArgs) -> Result<Parameters> {
    let mut params = ParametersLoader::load(args.parameters.as_deref())?;
    if let Some(project) = &args.project {
        params.project = project.clone();
    }
    if let Some(try_mode) = &args.try_mode {
        params.try_mode = Some(try_mode.clone());
    }
    ParametersValidator::validate(&params)?;
    Ok(params)
}

/// `raptor.yml` is kind `raptor`; a `kind.yml` takes the name of its directory.
fn kind_name(path: &Path) -> String {
    let named = match path.file_stem().and_then(|stem| stem.to_str()) {
        Some("kind") => path
            .parent()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str()),
        other => other,
    };
    named
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_KIND)
        .to_string()
}
