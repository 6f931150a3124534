//! Per-scenario results and the aggregated run report.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::{CaptureRecord, RequirementId, TestFailure};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    Failed,
    /// Skipped because the scenario does not apply to the server.
    Inconclusive,
}

/// Result of a single conformance scenario.
#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    /// Scenario group (e.g. "s01_content_type").
    pub category: String,
    /// Scenario name (e.g. "tc08_create_content_type_name_too_long").
    pub name: String,
    pub outcome: Outcome,
    /// Failure or skip reason.
    pub message: Option<String>,
    /// Requirements the scenario captured, in capture order.
    pub captures: Vec<CaptureRecord>,
}

impl TestResult {
    pub fn pass(category: &str, name: &str, captures: Vec<CaptureRecord>) -> Self {
        Self {
            category: category.to_string(),
            name: name.to_string(),
            outcome: Outcome::Passed,
            message: None,
            captures,
        }
    }

    pub fn fail(category: &str, name: &str, msg: String, captures: Vec<CaptureRecord>) -> Self {
        Self {
            category: category.to_string(),
            name: name.to_string(),
            outcome: Outcome::Failed,
            message: Some(msg),
            captures,
        }
    }

    pub fn from_result(
        category: &str,
        name: &str,
        result: Result<(), TestFailure>,
        captures: Vec<CaptureRecord>,
    ) -> Self {
        match result {
            Ok(()) => Self::pass(category, name, captures),
            Err(failure) if failure.is_inconclusive() => Self {
                outcome: Outcome::Inconclusive,
                ..Self::fail(category, name, failure.to_string(), captures)
            },
            Err(failure) => Self::fail(category, name, failure.to_string(), captures),
        }
    }

    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Passed
    }
}

/// Aggregated report from a full conformance suite run.
#[derive(Debug, Clone, Serialize)]
pub struct ConformanceReport {
    pub protocol: String,
    pub results: Vec<TestResult>,
    pub passed: usize,
    pub failed: usize,
    pub inconclusive: usize,
    pub total: usize,
}

impl ConformanceReport {
    pub fn from_results(protocol: &str, results: Vec<TestResult>) -> Self {
        let count = |o: Outcome| results.iter().filter(|r| r.outcome == o).count();
        let passed = count(Outcome::Passed);
        let failed = count(Outcome::Failed);
        let inconclusive = count(Outcome::Inconclusive);
        let total = results.len();
        Self {
            protocol: protocol.to_string(),
            results,
            passed,
            failed,
            inconclusive,
            total,
        }
    }

    /// Every requirement captured during the run; `true` when all of its
    /// captures were satisfied.
    pub fn requirements(&self) -> BTreeMap<RequirementId, bool> {
        let mut coverage = BTreeMap::new();
        for record in self.results.iter().flat_map(|r| &r.captures) {
            let entry = coverage.entry(record.requirement.clone()).or_insert(true);
            *entry &= record.satisfied;
        }
        coverage
    }

    pub fn result(&self, name: &str) -> Option<&TestResult> {
        self.results.iter().find(|r| r.name == name)
    }
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} conformance: {}/{} passed ({} failed, {} inconclusive)",
            self.protocol, self.passed, self.total, self.failed, self.inconclusive
        )?;
        for r in &self.results {
            if r.outcome == Outcome::Failed {
                writeln!(
                    f,
                    "  FAIL [{}/{}]: {}",
                    r.category,
                    r.name,
                    r.message.as_deref().unwrap_or("(no message)")
                )?;
            }
        }
        Ok(())
    }
}

/// Turn a scenario outcome into a `#[test]` verdict: failures panic,
/// inconclusive scenarios pass with a note on stderr.
pub fn assert_scenario(case: &str, result: Result<(), TestFailure>) {
    match result {
        Ok(()) => {}
        Err(failure) if failure.is_inconclusive() => eprintln!("{}: {}", case, failure),
        Err(failure) => panic!("{}: {}", case, failure),
    }
}

/// A scenario as listed by the suite runners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scenario {
    /// Case id used in resource names, e.g. `S01_TC07`.
    pub case: &'static str,
    pub category: &'static str,
    pub name: &'static str,
}

impl Scenario {
    /// Whether a `--filter` substring selects this scenario.
    pub fn matches(&self, filter: Option<&str>) -> bool {
        match filter {
            None => true,
            Some(f) => {
                let f = f.to_ascii_lowercase();
                self.name.contains(&f)
                    || self.category.contains(&f)
                    || self.case.to_ascii_lowercase().contains(&f)
            }
        }
    }
}
