use std::path::PathBuf;
use std::process;

use log::debug;
use protocheck_sim::ServerProfile;

use crate::runner::{emit_tap, load_config, run_suite, Suite};
use crate::{report_error, OutputFormat};

pub(crate) struct RunArgs {
    pub suite: Suite,
    pub config: Vec<PathBuf>,
    pub optional: Vec<PathBuf>,
    pub profile: String,
    pub tap: bool,
    pub filter: Option<String>,
}

pub(crate) fn cmd_run(args: RunArgs, output: OutputFormat, quiet: bool) {
    let Some(profile) = ServerProfile::by_name(&args.profile) else {
        let msg = format!(
            "unknown profile '{}'. Valid: {}",
            args.profile,
            ServerProfile::NAMES.join(", ")
        );
        report_error(&msg, output, quiet);
        process::exit(1);
    };

    let config = match load_config(Some(args.suite), &args.config, &args.optional) {
        Ok(c) => c,
        Err(e) => {
            report_error(&format!("config error: {}", e), output, quiet);
            process::exit(1);
        }
    };
    debug!(
        "loaded {} properties and {} requirement flags from {:?}",
        config.property_count(),
        config.requirement_count(),
        config.origins()
    );

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            report_error(&format!("failed to create tokio runtime: {}", e), output, quiet);
            process::exit(1);
        }
    };
    let report = match rt.block_on(run_suite(
        args.suite,
        config,
        profile,
        args.filter.as_deref(),
    )) {
        Ok(r) => r,
        Err(e) => {
            report_error(&format!("server setup error: {}", e), output, quiet);
            process::exit(1);
        }
    };

    let failed = if args.tap {
        emit_tap(&report)
    } else {
        match output {
            OutputFormat::Json => match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    report_error(&format!("serialization error: {}", e), output, quiet);
                    process::exit(1);
                }
            },
            OutputFormat::Text => {
                if !quiet || report.failed > 0 {
                    print!("{}", report);
                }
            }
        }
        report.failed
    };

    if failed > 0 {
        process::exit(1);
    }
}
