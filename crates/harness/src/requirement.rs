//! Requirement identifiers and capture records.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::ConfigError;

/// A numbered normative statement of a protocol document,
/// rendered as `MS-WEBSS_R344`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequirementId {
    pub doc: String,
    pub number: u32,
}

impl RequirementId {
    pub fn new(doc: impl Into<String>, number: u32) -> Self {
        Self {
            doc: doc.into(),
            number,
        }
    }
}

impl fmt::Display for RequirementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_R{}", self.doc, self.number)
    }
}

impl FromStr for RequirementId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidRequirementId(s.to_string());
        let (doc, number) = s.rsplit_once("_R").ok_or_else(invalid)?;
        if doc.is_empty() {
            return Err(invalid());
        }
        let number = parse_flag_key(&format!("R{}", number)).ok_or_else(invalid)?;
        Ok(Self::new(doc, number))
    }
}

impl Serialize for RequirementId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parse an applicability flag key (`R1023`, or a bare `1023`) into a
/// requirement number.
pub(crate) fn parse_flag_key(key: &str) -> Option<u32> {
    let digits = key.strip_prefix('R').unwrap_or(key);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// One observation recorded by the oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptureRecord {
    pub requirement: RequirementId,
    pub satisfied: bool,
    pub description: String,
}
