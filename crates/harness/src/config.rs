//! Layered suite configuration.
//!
//! A config file is TOML with two tables:
//!
//! ```toml
//! [properties]
//! SiteCollectionUrl = "http://sut/sites/protocheck"
//! SubSiteUrl = "[SiteCollectionUrl]/subsite"
//!
//! [requirements."MS-WEBSS"]
//! R1023 = true
//! R743 = false
//! ```
//!
//! Properties parameterize the literal values scenarios expect back;
//! requirement flags decide which product-conditional requirements apply to
//! the server under test.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::warn;
use serde::Deserialize;

use crate::requirement::parse_flag_key;
use crate::{ConfigError, RequirementId};

const MAX_REFERENCE_DEPTH: usize = 8;

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    properties: BTreeMap<String, toml::Value>,
    #[serde(default)]
    requirements: BTreeMap<String, BTreeMap<String, bool>>,
}

#[derive(Debug, Clone, Default)]
pub struct SuiteConfig {
    properties: BTreeMap<String, String>,
    requirements: BTreeMap<RequirementId, bool>,
    origins: Vec<String>,
}

impl SuiteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one config document. `origin` names it in errors and logs.
    pub fn from_toml_str(source: &str, origin: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(source).map_err(|e| ConfigError::Parse {
            origin: origin.to_string(),
            source: e,
        })?;

        let properties = raw
            .properties
            .into_iter()
            .map(|(name, value)| (name, value_to_string(value)))
            .collect();

        let mut requirements = BTreeMap::new();
        for (doc, flags) in raw.requirements {
            for (key, enabled) in flags {
                let number = parse_flag_key(&key).ok_or_else(|| {
                    ConfigError::InvalidRequirementId(format!("{}.{}", doc, key))
                })?;
                requirements.insert(RequirementId::new(doc.clone(), number), enabled);
            }
        }

        Ok(Self {
            properties,
            requirements,
            origins: vec![origin.to_string()],
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&source, &path.display().to_string())
    }

    /// Load files in order; each later file is layered over the ones before.
    pub fn load_layered<P: AsRef<Path>>(paths: &[P]) -> Result<Self, ConfigError> {
        let mut config = Self::new();
        for path in paths {
            config = config.layer(Self::load(path.as_ref())?);
        }
        Ok(config)
    }

    /// Overlay `local` on `self`. Local values win; every override is logged.
    pub fn layer(mut self, local: SuiteConfig) -> Self {
        let origin = local.origins.last().cloned().unwrap_or_default();
        for (name, value) in local.properties {
            if let Some(previous) = self.properties.get(&name) {
                if *previous != value {
                    warn!(
                        "property {} overridden by {}: '{}' -> '{}'",
                        name, origin, previous, value
                    );
                }
            }
            self.properties.insert(name, value);
        }
        for (id, enabled) in local.requirements {
            if let Some(previous) = self.requirements.get(&id) {
                if *previous != enabled {
                    warn!("flag {} overridden by {}: {} -> {}", id, origin, previous, enabled);
                }
            }
            self.requirements.insert(id, enabled);
        }
        self.origins.extend(local.origins);
        self
    }

    /// Add the flags of an optional-requirements (SHOULD/MAY) file.
    ///
    /// Unlike [`layer`](Self::layer), a flag already defined is an error.
    pub fn merge_optional(mut self, optional: SuiteConfig) -> Result<Self, ConfigError> {
        for id in optional.requirements.keys() {
            if self.requirements.contains_key(id) {
                return Err(ConfigError::DuplicateRequirementFlag(id.clone()));
            }
        }
        self.requirements.extend(optional.requirements);
        let rest = SuiteConfig {
            properties: optional.properties,
            requirements: BTreeMap::new(),
            origins: optional.origins,
        };
        Ok(self.layer(rest))
    }

    pub fn with_property(mut self, name: &str, value: impl Into<String>) -> Self {
        self.properties.insert(name.to_string(), value.into());
        self
    }

    pub fn with_requirement(mut self, doc: &str, number: u32, enabled: bool) -> Self {
        self.requirements
            .insert(RequirementId::new(doc, number), enabled);
        self
    }

    /// Resolved property value; `[Name]` references are expanded.
    pub fn property(&self, name: &str) -> Result<String, ConfigError> {
        let raw = self
            .properties
            .get(name)
            .ok_or_else(|| ConfigError::MissingProperty {
                name: name.to_string(),
            })?;
        self.resolve(name, raw, 0)
    }

    pub fn property_or(&self, name: &str, default: &str) -> String {
        self.property(name).unwrap_or_else(|_| default.to_string())
    }

    pub fn property_bool(&self, name: &str) -> Result<bool, ConfigError> {
        let value = self.property(name)?;
        match value.to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(ConfigError::InvalidProperty {
                name: name.to_string(),
                value,
                expected: "true or false",
            }),
        }
    }

    pub fn property_u32(&self, name: &str) -> Result<u32, ConfigError> {
        let value = self.property(name)?;
        value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidProperty {
                name: name.to_string(),
                value,
                expected: "an unsigned integer",
            })
    }

    /// The applicability flag for `id`, if any file sets one.
    pub fn requirement_flag(&self, id: &RequirementId) -> Option<bool> {
        self.requirements.get(id).copied()
    }

    /// Like [`requirement_flag`](Self::requirement_flag), but an unconfigured
    /// flag is an error.
    pub fn requirement_enabled(&self, id: &RequirementId) -> Result<bool, ConfigError> {
        self.requirement_flag(id)
            .ok_or_else(|| ConfigError::MissingRequirementFlag(id.clone()))
    }

    pub fn requirement_flags(&self) -> impl Iterator<Item = (&RequirementId, bool)> {
        self.requirements.iter().map(|(id, enabled)| (id, *enabled))
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    pub fn requirement_count(&self) -> usize {
        self.requirements.len()
    }

    pub fn origins(&self) -> &[String] {
        &self.origins
    }

    /// Check that every property resolves.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for name in self.properties.keys() {
            self.property(name)?;
        }
        Ok(())
    }

    fn resolve(&self, name: &str, raw: &str, depth: usize) -> Result<String, ConfigError> {
        let mut out = String::with_capacity(raw.len());
        let mut rest = raw;
        while let Some(open) = rest.find('[') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let Some(close) = after.find(']') else {
                out.push_str(&rest[open..]);
                return Ok(out);
            };
            let reference = &after[..close];
            if !is_reference_name(reference) {
                out.push('[');
                rest = after;
                continue;
            }
            let unresolved = || ConfigError::UnresolvedReference {
                name: name.to_string(),
                reference: reference.to_string(),
            };
            if depth >= MAX_REFERENCE_DEPTH {
                return Err(unresolved());
            }
            let target = self.properties.get(reference).ok_or_else(unresolved)?;
            out.push_str(&self.resolve(name, target, depth + 1)?);
            rest = &after[close + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

fn is_reference_name(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn value_to_string(value: toml::Value) -> String {
    match value {
        toml::Value::String(s) => s,
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const BASE: &str = r#"
[properties]
SutComputerName = "sut01"
SiteCollectionUrl = "http://[SutComputerName]/sites/protocheck"
SubSiteUrl = "[SiteCollectionUrl]/subsite"
ListBaseTypes = "{0,1,3,4,5}"
Timeout = 30
Strict = true

[requirements."MS-WEBSS"]
R1023 = true
R743 = false
"#;

    fn base() -> SuiteConfig {
        SuiteConfig::from_toml_str(BASE, "base").unwrap()
    }

    #[test]
    fn resolves_nested_references() {
        let config = base();
        assert_eq!(
            config.property("SubSiteUrl").unwrap(),
            "http://sut01/sites/protocheck/subsite"
        );
    }

    #[test]
    fn leaves_non_reference_brackets_alone() {
        let config = base().with_property("Pattern", "a[0-9]b [x");
        assert_eq!(config.property("Pattern").unwrap(), "a[0-9]b [x");
        assert_eq!(config.property("ListBaseTypes").unwrap(), "{0,1,3,4,5}");
    }

    #[test]
    fn unknown_reference_is_an_error() {
        let config = base().with_property("Broken", "[Nope]/x");
        assert!(matches!(
            config.property("Broken"),
            Err(ConfigError::UnresolvedReference { .. })
        ));
        assert!(config.validate().is_err());
    }

    #[test]
    fn cyclic_reference_is_an_error() {
        let config = SuiteConfig::new()
            .with_property("A", "[B]")
            .with_property("B", "[A]");
        assert!(matches!(
            config.property("A"),
            Err(ConfigError::UnresolvedReference { .. })
        ));
    }

    #[test]
    fn typed_properties() {
        let config = base();
        assert_eq!(config.property_u32("Timeout").unwrap(), 30);
        assert!(config.property_bool("Strict").unwrap());
        assert!(config.property_bool("SutComputerName").is_err());
        assert_eq!(config.property_or("Missing", "fallback"), "fallback");
        assert!(matches!(
            config.property("Missing"),
            Err(ConfigError::MissingProperty { .. })
        ));
    }

    #[test]
    fn requirement_flags_are_keyed_by_document() {
        let config = base();
        let r1023 = RequirementId::new("MS-WEBSS", 1023);
        let r743 = RequirementId::new("MS-WEBSS", 743);
        let other = RequirementId::new("MS-OXWSCONT", 1023);
        assert_eq!(config.requirement_flag(&r1023), Some(true));
        assert_eq!(config.requirement_flag(&r743), Some(false));
        assert_eq!(config.requirement_flag(&other), None);
        assert!(matches!(
            config.requirement_enabled(&other),
            Err(ConfigError::MissingRequirementFlag(_))
        ));
    }

    #[test]
    fn local_layer_wins() {
        let local = SuiteConfig::from_toml_str(
            "[properties]\nSutComputerName = \"sut02\"\n[requirements.\"MS-WEBSS\"]\nR743 = true\n",
            "local",
        )
        .unwrap();
        let config = base().layer(local);
        assert_eq!(
            config.property("SiteCollectionUrl").unwrap(),
            "http://sut02/sites/protocheck"
        );
        assert_eq!(
            config.requirement_flag(&RequirementId::new("MS-WEBSS", 743)),
            Some(true)
        );
        assert_eq!(config.origins(), ["base".to_string(), "local".to_string()]);
    }

    #[test]
    fn optional_flags_may_not_repeat_base_flags() {
        let optional =
            SuiteConfig::from_toml_str("[requirements.\"MS-WEBSS\"]\nR1023 = false\n", "should-may")
                .unwrap();
        assert!(matches!(
            base().merge_optional(optional),
            Err(ConfigError::DuplicateRequirementFlag(_))
        ));

        let fresh =
            SuiteConfig::from_toml_str("[requirements.\"MS-WEBSS\"]\nR99 = true\n", "should-may")
                .unwrap();
        let merged = base().merge_optional(fresh).unwrap();
        assert_eq!(merged.requirement_count(), 3);
    }

    #[test]
    fn rejects_malformed_flag_keys() {
        let err = SuiteConfig::from_toml_str("[requirements.\"MS-WEBSS\"]\nR12x = true\n", "bad")
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRequirementId(_)));
    }

    #[test]
    fn rejects_invalid_toml() {
        let err = SuiteConfig::from_toml_str("[properties\n", "bad").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn loads_and_layers_files() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("common.toml");
        let second = dir.path().join("local.toml");
        fs::File::create(&first)
            .unwrap()
            .write_all(BASE.as_bytes())
            .unwrap();
        fs::write(&second, "[properties]\nTimeout = 60\n").unwrap();

        let config = SuiteConfig::load_layered(&[&first, &second]).unwrap();
        assert_eq!(config.property_u32("Timeout").unwrap(), 60);
        assert_eq!(config.origins().len(), 2);

        let missing = SuiteConfig::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }
}
