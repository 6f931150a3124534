use std::path::PathBuf;

use crate::{ProtocolFault, RequirementId};

/// Why a scenario stopped before completing.
#[derive(Debug, thiserror::Error)]
pub enum TestFailure {
    /// A capture observed behavior that contradicts a requirement.
    #[error("{requirement} not satisfied ({detail}): {description}")]
    RequirementFailed {
        requirement: RequirementId,
        description: String,
        detail: String,
    },

    /// An intermediate assertion that is not tied to a requirement failed.
    #[error("assertion failed: {message}")]
    AssertionFailed { message: String },

    /// The scenario does not apply to the server under test.
    #[error("inconclusive: {reason}")]
    Inconclusive { reason: String },

    /// An adapter call faulted where the scenario expected success.
    #[error("unexpected protocol fault: {0}")]
    UnexpectedFault(#[from] ProtocolFault),

    /// Teardown could not remove every object the scenario created.
    #[error("cleanup failed: {0}")]
    Cleanup(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl TestFailure {
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    pub fn is_inconclusive(&self) -> bool {
        matches!(self, Self::Inconclusive { .. })
    }
}

/// Errors loading or querying suite configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("missing property: {name}")]
    MissingProperty { name: String },

    #[error("property {name} has invalid value '{value}': expected {expected}")]
    InvalidProperty {
        name: String,
        value: String,
        expected: &'static str,
    },

    /// Applicability was queried for a requirement no config file mentions.
    #[error("no applicability flag configured for {0}")]
    MissingRequirementFlag(RequirementId),

    /// Base and optional-requirement files both define the same flag.
    #[error("applicability flag for {0} is defined in more than one file")]
    DuplicateRequirementFlag(RequirementId),

    #[error("invalid requirement id: {0}")]
    InvalidRequirementId(String),

    #[error("property {name} references unknown or cyclic property [{reference}]")]
    UnresolvedReference { name: String, reference: String },
}
