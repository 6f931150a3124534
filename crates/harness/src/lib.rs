//! Shared harness for protocol conformance suites.
//!
//! Provides the requirement-capture oracle ([`Site`]), layered suite
//! configuration ([`SuiteConfig`]), the tagged [`ProtocolFault`] error
//! channel returned by every adapter operation, the per-test object
//! lifecycle manager ([`TrackedObjects`]) and the run report types.

pub mod config;
pub mod error;
pub mod fault;
pub mod names;
pub mod report;
pub mod requirement;
pub mod site;
pub mod tracked;

pub use config::SuiteConfig;
pub use error::{ConfigError, TestFailure};
pub use fault::{FaultDetail, FaultExpectation, ProtocolFault, SoapFault, HTTP_UNAUTHORIZED};
pub use report::{assert_scenario, ConformanceReport, Outcome, Scenario, TestResult};
pub use requirement::{CaptureRecord, RequirementId};
pub use site::Site;
pub use tracked::{teardown, Disposer, ObjectIdSource, TrackedObjects};

/// Result type returned by every scenario.
pub type ScenarioResult = Result<(), TestFailure>;

/// Credentials the adapter presents to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserAuthentication {
    /// Configured test user.
    #[default]
    Authenticated,
    /// No or invalid credentials; the server is expected to answer 401.
    Unauthenticated,
}
