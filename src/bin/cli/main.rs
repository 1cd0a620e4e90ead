//! CLI tool for patching CRS course archives.

mod commands;
mod discover;
mod exit_codes;
mod output;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use std::path::PathBuf;

use exit_codes::ExitCode;

/// CRS course archive patcher
#[derive(Parser)]
#[command(name = "crspatch")]
#[command(author, version, about = "Patches LINKS CRS course archives for Memorex VIS", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "human", global = true)]
    format: OutputFormat,

    /// Suppress progress and summary output
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Patch archives (alias: p)
    #[command(alias = "p")]
    Patch {
        /// Archives or directories containing archives
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory (default: `patched/` next to the first input)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Record name to remove; replaces the default set
        #[arg(short = 'e', long = "exclude", value_name = "NAME")]
        exclude: Vec<String>,

        /// Keep the default exclusions when using --exclude
        #[arg(long)]
        keep_defaults: bool,

        /// Directory written into each record's path field
        #[arg(long, value_name = "PATH", env = "CRSPATCH_PATH")]
        path: Option<String>,

        /// Leave record path fields untouched
        #[arg(long)]
        no_path_patch: bool,

        /// Drop malformed records instead of rejecting the archive
        #[arg(long)]
        skip_malformed: bool,

        /// Do not write validation logs
        #[arg(long)]
        no_log: bool,
    },

    /// Show archive contents without writing anything (alias: i)
    #[command(alias = "i")]
    Info {
        /// Archive file to inspect
        archive: PathBuf,

        /// Drop malformed records instead of failing
        #[arg(long)]
        skip_malformed: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

fn main() {
    // Set up Ctrl+C handler
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupted");
        std::process::exit(exit_codes::USER_INTERRUPT);
    })
    .ok();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(exit_codes::BAD_ARGS);
        }
        Err(e) => {
            // --help and --version
            let _ = e.print();
            std::process::exit(exit_codes::SUCCESS);
        }
    };

    let exit_code = match cli.command {
        Commands::Patch {
            inputs,
            output,
            exclude,
            keep_defaults,
            path,
            no_path_patch,
            skip_malformed,
            no_log,
        } => commands::patch(&commands::PatchConfig {
            inputs: &inputs,
            output_dir: output.as_deref(),
            exclude: &exclude,
            keep_defaults,
            path: path.as_deref(),
            no_path_patch,
            skip_malformed,
            no_log,
            format: cli.format,
            quiet: cli.quiet,
        }),

        Commands::Info {
            archive,
            skip_malformed,
        } => commands::info(&archive, cli.format, skip_malformed),

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut std::io::stdout());
            ExitCode::Success
        }
    };

    std::process::exit(exit_code.code());
}
