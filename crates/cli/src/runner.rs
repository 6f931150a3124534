use std::path::PathBuf;
use std::sync::Arc;

use clap::ValueEnum;
use log::info;
use protocheck_harness::{ConfigError, ConformanceReport, Outcome, Scenario, SuiteConfig};
use protocheck_sim::{InMemoryMailbox, InMemorySharePoint, ServerProfile};

use crate::tap::Tap;

/// Suite runner.
///
/// Without `--config` a suite runs with the shipped files, embedded here:
///   common.toml + ms-oxwscont.toml
///   common.toml + ms-webss.toml, merged with ms-webss-should-may.toml
const COMMON: &str = include_str!("../../../config/common.toml");
const OXWSCONT: &str = include_str!("../../../config/ms-oxwscont.toml");
const WEBSS: &str = include_str!("../../../config/ms-webss.toml");
const WEBSS_SHOULD_MAY: &str = include_str!("../../../config/ms-webss-should-may.toml");

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Suite {
    /// MS-OXWSCONT: contacts and user photos
    Oxwscont,
    /// MS-WEBSS: content types, columns, CSS, files and webs
    Webss,
}

impl Suite {
    pub(crate) fn protocol(self) -> &'static str {
        match self {
            Suite::Oxwscont => "MS-OXWSCONT",
            Suite::Webss => "MS-WEBSS",
        }
    }

    pub(crate) fn scenarios(self) -> &'static [Scenario] {
        match self {
            Suite::Oxwscont => protocheck_oxwscont::SCENARIOS,
            Suite::Webss => protocheck_webss::SCENARIOS,
        }
    }

    fn default_config(self) -> Result<SuiteConfig, ConfigError> {
        let common = SuiteConfig::from_toml_str(COMMON, "config/common.toml")?;
        match self {
            Suite::Oxwscont => Ok(common.layer(SuiteConfig::from_toml_str(
                OXWSCONT,
                "config/ms-oxwscont.toml",
            )?)),
            Suite::Webss => common
                .layer(SuiteConfig::from_toml_str(WEBSS, "config/ms-webss.toml")?)
                .merge_optional(SuiteConfig::from_toml_str(
                    WEBSS_SHOULD_MAY,
                    "config/ms-webss-should-may.toml",
                )?),
        }
    }
}

/// Layer `files` left to right, or start from the shipped files of `suite`
/// when none are given, then merge each optional-requirements file.
pub(crate) fn load_config(
    suite: Option<Suite>,
    files: &[PathBuf],
    optional: &[PathBuf],
) -> Result<SuiteConfig, ConfigError> {
    let mut config = match suite {
        Some(suite) if files.is_empty() => suite.default_config()?,
        _ => SuiteConfig::load_layered(files)?,
    };
    for path in optional {
        config = config.merge_optional(SuiteConfig::load(path)?)?;
    }
    config.validate()?;
    Ok(config)
}

/// Run `suite` against the in-memory reference server for `profile`. Every
/// scenario gets its own session on one shared server.
pub(crate) async fn run_suite(
    suite: Suite,
    config: SuiteConfig,
    profile: ServerProfile,
    filter: Option<&str>,
) -> Result<ConformanceReport, ConfigError> {
    info!(
        "running {} against the {} reference server",
        suite.protocol(),
        profile.name
    );
    let config = Arc::new(config);
    let report = match suite {
        Suite::Oxwscont => {
            let server = InMemoryMailbox::new(&config, profile)?;
            let server = &server;
            protocheck_oxwscont::run_conformance_suite(
                || async move { server.session() },
                config,
                filter,
            )
            .await
        }
        Suite::Webss => {
            let server = InMemorySharePoint::new(&config, profile)?;
            let server = &server;
            protocheck_webss::run_conformance_suite(
                || async move { server.session() },
                config,
                filter,
            )
            .await
        }
    };
    Ok(report)
}

/// Print `report` as TAP; returns the number of failed scenarios.
pub(crate) fn emit_tap(report: &ConformanceReport) -> usize {
    let mut tap = Tap::new();
    for result in &report.results {
        let description = format!("{}::{}", result.category, result.name);
        let message = result.message.as_deref();
        match result.outcome {
            Outcome::Passed => tap.ok(&description),
            Outcome::Failed => tap.not_ok(&description, message.unwrap_or("failed")),
            Outcome::Inconclusive => tap.skip(&description, message.unwrap_or("not applicable")),
        }
    }
    let failed = tap.failure_count();
    tap.finish();
    failed
}
