//! The requirement-capture oracle.
//!
//! A [`Site`] lives for one scenario. Every capture call records a
//! [`CaptureRecord`] and stops the scenario (via `?`) when the observed
//! behavior contradicts the requirement. Requirements that the suite
//! configuration marks as not applicable to the server under test are never
//! recorded, whatever the observation.

use std::fmt::Debug;
use std::sync::Arc;

use log::debug;

use crate::names;
use crate::{CaptureRecord, RequirementId, SuiteConfig, TestFailure};

pub struct Site {
    doc: String,
    config: Arc<SuiteConfig>,
    case: String,
    records: Vec<CaptureRecord>,
}

impl Site {
    /// `doc` is the protocol document requirement numbers belong to
    /// unless stated otherwise, e.g. `MS-WEBSS`.
    pub fn new(doc: impl Into<String>, config: Arc<SuiteConfig>) -> Self {
        Self {
            doc: doc.into(),
            config,
            case: String::new(),
            records: Vec::new(),
        }
    }

    pub fn doc(&self) -> &str {
        &self.doc
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Name the running case (`S01_TC07`), used in generated resource names.
    pub fn begin_case(&mut self, case: &str) {
        self.case = case.to_string();
        self.records.clear();
    }

    pub fn case(&self) -> &str {
        &self.case
    }

    pub fn records(&self) -> &[CaptureRecord] {
        &self.records
    }

    pub fn take_records(&mut self) -> Vec<CaptureRecord> {
        std::mem::take(&mut self.records)
    }

    pub fn requirement(&self, number: u32) -> RequirementId {
        RequirementId::new(self.doc.clone(), number)
    }

    // ── Captures ─────────────────────────────────────────────────────────

    /// Mark a requirement satisfied; the caller has already established it.
    pub fn capture(&mut self, number: u32, description: &str) -> Result<(), TestFailure> {
        let id = self.requirement(number);
        self.record(id, true, description, String::new)
    }

    /// Mark a requirement of another document satisfied.
    pub fn capture_in(
        &mut self,
        doc: &str,
        number: u32,
        description: &str,
    ) -> Result<(), TestFailure> {
        self.record(RequirementId::new(doc, number), true, description, String::new)
    }

    pub fn capture_if_true(
        &mut self,
        condition: bool,
        number: u32,
        description: &str,
    ) -> Result<(), TestFailure> {
        let id = self.requirement(number);
        self.record(id, condition, description, || {
            "expected true, actual false".to_string()
        })
    }

    pub fn capture_if_false(
        &mut self,
        condition: bool,
        number: u32,
        description: &str,
    ) -> Result<(), TestFailure> {
        let id = self.requirement(number);
        self.record(id, !condition, description, || {
            "expected false, actual true".to_string()
        })
    }

    pub fn capture_if_equal<T: PartialEq + Debug>(
        &mut self,
        expected: T,
        actual: T,
        number: u32,
        description: &str,
    ) -> Result<(), TestFailure> {
        let id = self.requirement(number);
        let satisfied = expected == actual;
        self.record(id, satisfied, description, || {
            format!("expected {:?}, actual {:?}", expected, actual)
        })
    }

    pub fn capture_in_if_equal<T: PartialEq + Debug>(
        &mut self,
        doc: &str,
        expected: T,
        actual: T,
        number: u32,
        description: &str,
    ) -> Result<(), TestFailure> {
        let satisfied = expected == actual;
        self.record(RequirementId::new(doc, number), satisfied, description, || {
            format!("expected {:?}, actual {:?}", expected, actual)
        })
    }

    pub fn capture_if_not_equal<T: PartialEq + Debug>(
        &mut self,
        unexpected: T,
        actual: T,
        number: u32,
        description: &str,
    ) -> Result<(), TestFailure> {
        let id = self.requirement(number);
        let satisfied = unexpected != actual;
        self.record(id, satisfied, description, || {
            format!("expected anything but {:?}", unexpected)
        })
    }

    /// Satisfied when the element is present.
    pub fn capture_if_some<T>(
        &mut self,
        value: Option<&T>,
        number: u32,
        description: &str,
    ) -> Result<(), TestFailure> {
        let id = self.requirement(number);
        self.record(id, value.is_some(), description, || {
            "expected a value, actual none".to_string()
        })
    }

    fn record(
        &mut self,
        requirement: RequirementId,
        satisfied: bool,
        description: &str,
        detail: impl FnOnce() -> String,
    ) -> Result<(), TestFailure> {
        if self.config.requirement_flag(&requirement) == Some(false) {
            debug!("skip {}: not applicable to the server under test", requirement);
            return Ok(());
        }
        debug!(
            "Verify {}: {}",
            requirement,
            if satisfied { "satisfied" } else { "violated" }
        );
        self.records.push(CaptureRecord {
            requirement: requirement.clone(),
            satisfied,
            description: description.to_string(),
        });
        if satisfied {
            Ok(())
        } else {
            Err(TestFailure::RequirementFailed {
                requirement,
                description: description.to_string(),
                detail: detail(),
            })
        }
    }

    // ── Applicability ────────────────────────────────────────────────────

    /// Whether a product-conditional requirement applies; an unconfigured
    /// flag fails the scenario.
    pub fn is_requirement_enabled(&self, number: u32) -> Result<bool, TestFailure> {
        Ok(self.config.requirement_enabled(&self.requirement(number))?)
    }

    /// Skip the rest of the scenario (inconclusive) unless the flag is on.
    pub fn assume_enabled(&self, number: u32) -> Result<(), TestFailure> {
        if self.is_requirement_enabled(number)? {
            Ok(())
        } else {
            Err(TestFailure::Inconclusive {
                reason: format!(
                    "The test case is executed only when the property 'R{}Enabled' is true.",
                    number
                ),
            })
        }
    }

    // ── Assertions ───────────────────────────────────────────────────────

    pub fn assert_true(&self, condition: bool, message: impl Into<String>) -> Result<(), TestFailure> {
        if condition {
            Ok(())
        } else {
            Err(TestFailure::assertion(message))
        }
    }

    pub fn assert_equal<T: PartialEq + Debug>(
        &self,
        expected: T,
        actual: T,
        what: &str,
    ) -> Result<(), TestFailure> {
        if expected == actual {
            Ok(())
        } else {
            Err(TestFailure::assertion(format!(
                "{}: expected {:?}, actual {:?}",
                what, expected, actual
            )))
        }
    }

    /// Unconditional failure, for branches a scenario must never reach.
    pub fn fail<T>(&self, message: impl Into<String>) -> Result<T, TestFailure> {
        Err(TestFailure::assertion(message))
    }

    pub fn assert_some<T>(&self, value: Option<T>, what: &str) -> Result<T, TestFailure> {
        value.ok_or_else(|| TestFailure::assertion(format!("{} should not be null.", what)))
    }

    // ── Configuration and naming ─────────────────────────────────────────

    pub fn property(&self, name: &str) -> Result<String, TestFailure> {
        Ok(self.config.property(name)?)
    }

    /// `{Short}_{case}_{resource}_{HHmmss_fff}`, unique per call.
    pub fn resource_name(&self, resource: &str) -> String {
        names::resource_name(&self.short_name(), &self.case, resource)
    }

    /// Like [`resource_name`](Self::resource_name) with an index appended
    /// to the resource.
    pub fn indexed_resource_name(&self, resource: &str, index: usize) -> String {
        names::resource_name(&self.short_name(), &self.case, &format!("{}{}", resource, index))
    }

    fn short_name(&self) -> String {
        self.doc.replace('-', "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> Site {
        let config = SuiteConfig::new()
            .with_requirement("MS-OXWSCONT", 1275002, false)
            .with_requirement("MS-OXWSCONT", 1275114, true)
            .with_property("Domain", "contoso.com");
        let mut site = Site::new("MS-OXWSCONT", Arc::new(config));
        site.begin_case("S01_TC01");
        site
    }

    #[test]
    fn passing_capture_is_recorded() {
        let mut site = site();
        site.capture_if_equal("a", "a", 20, "FileAs round trips").unwrap();
        assert_eq!(site.records().len(), 1);
        assert!(site.records()[0].satisfied);
        assert_eq!(site.records()[0].requirement.to_string(), "MS-OXWSCONT_R20");
    }

    #[test]
    fn failing_capture_is_recorded_and_stops() {
        let mut site = site();
        let err = site
            .capture_if_true(false, 298, "CreateItem port type")
            .unwrap_err();
        assert!(matches!(err, TestFailure::RequirementFailed { .. }));
        assert_eq!(site.records().len(), 1);
        assert!(!site.records()[0].satisfied);
    }

    #[test]
    fn disabled_requirement_is_never_recorded() {
        let mut site = site();
        site.capture(1275002, "HasPicture is read-only").unwrap();
        site.capture_if_true(false, 1275002, "HasPicture is read-only")
            .unwrap();
        assert!(site.records().is_empty());
    }

    #[test]
    fn cross_document_capture_uses_given_doc() {
        let mut site = site();
        site.capture_in("MS-OXWSCDATA", 262, "non-contact folder").unwrap();
        assert_eq!(
            site.records()[0].requirement.to_string(),
            "MS-OXWSCDATA_R262"
        );
    }

    #[test]
    fn not_equal_and_some_variants() {
        let mut site = site();
        site.capture_if_not_equal("id-1", "id-2", 292, "copy yields a new id")
            .unwrap();
        site.capture_if_some(Some(&"x"), 302058, "PictureData").unwrap();
        assert!(site
            .capture_if_some::<&str>(None, 302058, "PictureData")
            .is_err());
        assert!(site.capture_if_false(true, 1, "x").is_err());
    }

    #[test]
    fn assume_enabled_is_inconclusive_when_disabled() {
        let site = site();
        assert!(site.assume_enabled(1275114).is_ok());
        let err = site.assume_enabled(1275002).unwrap_err();
        assert!(err.is_inconclusive());
        assert!(err.to_string().contains("R1275002Enabled"));
    }

    #[test]
    fn unconfigured_flag_is_a_config_failure() {
        let site = site();
        assert!(matches!(
            site.is_requirement_enabled(42),
            Err(TestFailure::Config(_))
        ));
    }

    #[test]
    fn assertions() {
        let site = site();
        assert!(site.assert_true(true, "ok").is_ok());
        let err = site.assert_equal(1, 2, "slot count").unwrap_err();
        assert!(err.to_string().contains("slot count"));
        assert_eq!(site.assert_some(Some(5), "value").unwrap(), 5);
        assert!(site.assert_some::<u8>(None, "value").is_err());
        assert!(site.fail::<()>("unreachable").is_err());
    }

    #[test]
    fn resource_names_carry_case() {
        let site = site();
        let name = site.resource_name("Contact");
        assert!(name.starts_with("MSOXWSCONT_S01_TC01_Contact_"), "{}", name);
        let indexed = site.indexed_resource_name("Contact", 3);
        assert!(indexed.starts_with("MSOXWSCONT_S01_TC01_Contact3_"), "{}", indexed);
        assert_eq!(site.property("Domain").unwrap(), "contoso.com");
    }

    #[test]
    fn take_records_drains() {
        let mut site = site();
        site.capture(19, "complex type").unwrap();
        assert_eq!(site.take_records().len(), 1);
        assert!(site.records().is_empty());
    }
}
