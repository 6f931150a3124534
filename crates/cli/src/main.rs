mod commands;
mod logger;
mod runner;
mod tap;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use commands::{cmd_check_config, cmd_list, cmd_run, RunArgs};
use runner::Suite;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Protocol conformance suites for Exchange and SharePoint web services.
#[derive(Parser)]
#[command(
    name = "protocheck",
    version,
    about = "Protocol conformance suites for Exchange and SharePoint web services"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a conformance suite against an in-memory reference server
    Run {
        /// Protocol suite to run
        #[arg(value_enum)]
        suite: Suite,
        /// Config files, layered left to right (default: the shipped files)
        #[arg(long = "config")]
        config: Vec<PathBuf>,
        /// Optional-requirement files merged after the layered config
        #[arg(long)]
        optional: Vec<PathBuf>,
        /// Server profile (reference, legacy or quirky)
        #[arg(long, default_value = "reference")]
        profile: String,
        /// Emit TAP version 13 instead of the summary
        #[arg(long)]
        tap: bool,
        /// Only run scenarios whose name or category contains this substring
        #[arg(long)]
        filter: Option<String>,
    },

    /// Load, layer and validate config files without running anything
    CheckConfig {
        /// Config files, layered left to right
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Optional-requirement files merged after the layered config
        #[arg(long)]
        optional: Vec<PathBuf>,
    },

    /// List the scenarios of a suite
    List {
        #[arg(value_enum)]
        suite: Suite,
    },
}

fn main() {
    let cli = Cli::parse();
    logger::init(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Run {
            suite,
            config,
            optional,
            profile,
            tap,
            filter,
        } => {
            let args = RunArgs {
                suite,
                config,
                optional,
                profile,
                tap,
                filter,
            };
            cmd_run(args, cli.output, cli.quiet);
        }
        Commands::CheckConfig { files, optional } => {
            cmd_check_config(&files, &optional, cli.output, cli.quiet);
        }
        Commands::List { suite } => {
            cmd_list(suite, cli.output);
        }
    }
}

/// Report an error in the selected output format.
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
