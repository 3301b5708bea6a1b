//! `erbfmt` entrypoint: reads each input file, runs it through the core
//! formatting pipeline, and either prints the result or writes it back,
//! per the CLI boundary contract the core itself stays ignorant of.

use anyhow::{Context, Result};
use clap::Parser;
use core_config::load_from;
use core_grammar::Grammars;
use core_model::{FormatterResult, Severity};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_appender::non_blocking::WorkerGuard;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "erbfmt", version, about = "Embedded-template formatter")]
struct Args {
    /// Files to format. Shell globs (`*.erb`) are expanded by the shell, not
    /// this binary.
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Overwrite each input file with its formatted output instead of
    /// printing to stdout.
    #[arg(short = 'w', long = "write")]
    write: bool,

    /// Path to a config file (TOML). Defaults to the discovery rule in
    /// `core_config::discover`.
    #[arg(long = "config")]
    config: Option<PathBuf>,
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join("erbfmt.log");
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, "erbfmt.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(_) => Some(guard),
        Err(_) => None,
    }
}

fn main() -> Result<ExitCode> {
    let _log_guard = configure_logging();
    let args = Args::parse();

    info!(target: "runtime", file_count = args.paths.len(), write = args.write, "startup");

    let config = load_from(args.config.clone()).context("loading configuration")?;
    let grammars = Grammars::new().context("loading grammars")?;

    let mut had_error = false;
    for path in &args.paths {
        match process_file(&grammars, path, &config, args.write) {
            Ok(result) => {
                if result.has_errors() {
                    had_error = true;
                }
            }
            Err(err) => {
                error!(target: "io", file = %path.display(), error = %err, "file_processing_failed");
                eprintln!("erbfmt: {}: {err}", path.display());
                had_error = true;
            }
        }
    }

    Ok(if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn process_file(
    grammars: &Grammars,
    path: &Path,
    config: &core_config::Config,
    write: bool,
) -> Result<FormatterResult> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let result = core_format::format(grammars, &source, config);

    print_diagnostics(path, &result);

    if result.has_errors() {
        debug!(target: "format", file = %path.display(), "skipping_write_due_to_errors");
        return Ok(result);
    }

    if write {
        std::fs::write(path, &result.output)
            .with_context(|| format!("writing {}", path.display()))?;
    } else {
        print!("{}", result.output);
    }

    Ok(result)
}

fn print_diagnostics(path: &Path, result: &FormatterResult) {
    for diagnostic in &result.diagnostics {
        let level = match diagnostic.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        eprintln!(
            "erbfmt: {}: {level}: {}",
            path.display(),
            diagnostic.message
        );
    }
}
