mod commands;
mod config;
mod logging;

use std::path::PathBuf;
use std::process;

use arlecchino_core::Policy;
use clap::{Parser, Subcommand, ValueEnum};

use config::CliConfig;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Arlecchino scenario compiler.
#[derive(Parser)]
#[command(name = "arlecchino", version, about = "Arlecchino scenario compiler")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log compiler activity to stderr (overrides ARLECCHINO_LOG)
    #[arg(long, global = true)]
    verbose: bool,

    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a scenario file and its imports to model JSON
    Compile {
        /// Path to the scenario YAML file
        file: PathBuf,
        /// Collect every diagnostic instead of stopping at the first
        #[arg(long)]
        accumulate: bool,
        /// Include the provenance table in the output
        #[arg(long)]
        provenance: bool,
    },

    /// Report every problem in a scenario file and its imports
    Check {
        /// Path to the scenario YAML file
        file: PathBuf,
        /// Stop at the first problem
        #[arg(long)]
        fail_fast: bool,
    },

    /// Print the steps each scenario would execute
    Plan {
        /// Path to the scenario YAML file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = match &cli.config {
        Some(path) => match config::read_config(path) {
            Ok(c) => c,
            Err(msg) => {
                report_error(&msg, cli.output, cli.quiet);
                process::exit(1);
            }
        },
        None => CliConfig::default(),
    };

    match cli.command {
        Commands::Compile {
            file,
            accumulate,
            provenance,
        } => {
            let flag = accumulate.then_some(Policy::Accumulate);
            let options = config.compile_options(flag, Policy::FailFast);
            commands::compile::cmd_compile(&file, &options, provenance, cli.output, cli.quiet);
        }
        Commands::Check { file, fail_fast } => {
            let flag = fail_fast.then_some(Policy::FailFast);
            let options = config.compile_options(flag, Policy::Accumulate);
            commands::check::cmd_check(&file, &options, cli.output, cli.quiet);
        }
        Commands::Plan { file } => {
            let options = config.compile_options(None, Policy::FailFast);
            commands::plan::cmd_plan(&file, &options, cli.output, cli.quiet);
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
