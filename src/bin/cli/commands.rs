//! Command implementations for the CLI tool.

use std::path::{Path, PathBuf};

use crspatch::batch::{BatchResult, FileOutcome, patch_batch_with};
use crspatch::{Archive, Exclusions, PatchOptions, Patcher, RecordPolicy};
use indicatif::{ProgressBar, ProgressStyle};

use crate::OutputFormat;
use crate::discover::find_archives;
use crate::exit_codes::{ExitCode, error_to_exit_code};
use crate::output::{create_formatter, render_log};

/// Directory created next to the first input when no output directory is given.
const DEFAULT_OUTPUT_DIR: &str = "patched";

/// Subdirectory of the output directory holding validation logs.
const LOG_DIR: &str = "logs";

/// Configuration for the patch command.
pub struct PatchConfig<'a> {
    pub inputs: &'a [PathBuf],
    pub output_dir: Option<&'a Path>,
    pub exclude: &'a [String],
    pub keep_defaults: bool,
    pub path: Option<&'a str>,
    pub no_path_patch: bool,
    pub skip_malformed: bool,
    pub no_log: bool,
    pub format: OutputFormat,
    pub quiet: bool,
}

/// Builds patch options from command line flags.
///
/// Names given with `--exclude` replace the default exclusion set unless
/// `--keep-defaults` is also given.
pub fn build_options(config: &PatchConfig<'_>) -> crspatch::Result<PatchOptions> {
    let exclusions = if config.exclude.is_empty() || config.keep_defaults {
        Exclusions::default()
    } else {
        Exclusions::none()
    };
    let exclusions = config
        .exclude
        .iter()
        .fold(exclusions, |set, name| set.with(name.as_bytes()));

    let mut options = PatchOptions::new()
        .exclusions(exclusions)
        .patch_paths(!config.no_path_patch);
    if let Some(path) = config.path {
        options = options.replacement_path(path)?;
    }
    if config.skip_malformed {
        options = options.record_policy(RecordPolicy::Skip);
    }
    Ok(options)
}

/// Patch command implementation
pub fn patch(config: &PatchConfig<'_>) -> ExitCode {
    let formatter = create_formatter(config.format);

    let options = match build_options(config) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::BadArgs;
        }
    };

    let inputs = find_archives(config.inputs);
    if inputs.is_empty() {
        eprintln!("Error: No CRS files found to process");
        return ExitCode::BadArgs;
    }

    let output_dir = match config.output_dir {
        Some(dir) => dir.to_path_buf(),
        None => inputs[0]
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(DEFAULT_OUTPUT_DIR),
    };

    let show_progress = !config.quiet && config.format == OutputFormat::Human;
    let progress = if show_progress {
        let pb = ProgressBar::new(inputs.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    } else {
        ProgressBar::hidden()
    };

    let patcher = Patcher::new(options);
    let result = patch_batch_with(&inputs, Some(&output_dir), &patcher, |outcome| {
        if let Some(name) = outcome.input.file_name() {
            progress.set_message(name.to_string_lossy().to_string());
        }
        progress.inc(1);
    });
    progress.finish_and_clear();

    if !config.no_log {
        write_logs(&result, &output_dir.join(LOG_DIR));
    }

    if !config.quiet || config.format == OutputFormat::Json {
        print!("{}", formatter.format_batch(&result));
    }

    batch_exit_code(&result)
}

fn write_logs(result: &BatchResult, log_dir: &Path) {
    for (outcome, report) in result.succeeded() {
        let path = log_path(outcome, log_dir);
        let written = std::fs::create_dir_all(log_dir)
            .and_then(|_| std::fs::write(&path, render_log(report)));
        if let Err(e) = written {
            eprintln!("Warning: Failed to write log {}: {}", path.display(), e);
        }
    }
}

fn log_path(outcome: &FileOutcome, log_dir: &Path) -> PathBuf {
    let stem = outcome
        .input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    log_dir.join(format!("{}_patched_log.txt", stem))
}

/// Picks the exit code for a finished batch.
///
/// If anything succeeded a failure is partial; if everything failed the
/// first error decides.
pub fn batch_exit_code(result: &BatchResult) -> ExitCode {
    match result.failed().next() {
        None => ExitCode::Success,
        Some(_) if result.succeeded().next().is_some() => ExitCode::PartialFailure,
        Some((_, error)) => error_to_exit_code(error),
    }
}

/// Info command implementation
pub fn info(archive_path: &Path, format: OutputFormat, skip_malformed: bool) -> ExitCode {
    let formatter = create_formatter(format);

    let policy = if skip_malformed {
        RecordPolicy::Skip
    } else {
        RecordPolicy::Abort
    };
    let archive = match std::fs::read(archive_path)
        .map_err(crspatch::Error::from)
        .and_then(|data| Archive::from_bytes_with_policy(data, policy))
    {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error opening archive: {}", e);
            return error_to_exit_code(&e);
        }
    };

    print!("{}", formatter.format_info(archive_path, &archive));
    for warning in archive.warnings() {
        eprintln!("Warning: {}", warning);
    }

    ExitCode::Success
}
