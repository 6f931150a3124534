use std::path::PathBuf;
use std::process;

use serde::Serialize;

use crate::runner::load_config;
use crate::{report_error, OutputFormat};

#[derive(Serialize)]
struct ConfigSummary<'a> {
    properties: usize,
    requirements: usize,
    origins: &'a [String],
}

pub(crate) fn cmd_check_config(
    files: &[PathBuf],
    optional: &[PathBuf],
    output: OutputFormat,
    quiet: bool,
) {
    let config = match load_config(None, files, optional) {
        Ok(c) => c,
        Err(e) => {
            report_error(&format!("config error: {}", e), output, quiet);
            process::exit(1);
        }
    };

    let summary = ConfigSummary {
        properties: config.property_count(),
        requirements: config.requirement_count(),
        origins: config.origins(),
    };
    match output {
        OutputFormat::Json => match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                report_error(&format!("serialization error: {}", e), output, quiet);
                process::exit(1);
            }
        },
        OutputFormat::Text => {
            if !quiet {
                println!(
                    "config OK: {} properties, {} requirement flags",
                    summary.properties, summary.requirements
                );
                for origin in summary.origins {
                    println!("  {}", origin);
                }
            }
        }
    }
}
