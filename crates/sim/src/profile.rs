//! Product behavior of a reference server.

use std::collections::BTreeSet;
use std::fmt;

/// A deliberate deviation from the protocol. Quirky servers exist so that
/// the suites can be shown to report non-conformance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Quirk {
    /// Contacts are accepted in any folder.
    IgnoreFolderRules,
    /// A hard delete reports success but the item stays in the store.
    KeepHardDeletedItems,
    /// Content type display names are not validated.
    AcceptInvalidContentTypeNames,
    /// Content type versions never change.
    StaleContentTypeVersions,
    /// Unauthenticated callers are served like authenticated ones.
    SkipAuthentication,
}

impl Quirk {
    pub const ALL: &'static [Quirk] = &[
        Quirk::IgnoreFolderRules,
        Quirk::KeepHardDeletedItems,
        Quirk::AcceptInvalidContentTypeNames,
        Quirk::StaleContentTypeVersions,
        Quirk::SkipAuthentication,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Quirk::IgnoreFolderRules => "ignore-folder-rules",
            Quirk::KeepHardDeletedItems => "keep-hard-deleted-items",
            Quirk::AcceptInvalidContentTypeNames => "accept-invalid-content-type-names",
            Quirk::StaleContentTypeVersions => "stale-content-type-versions",
            Quirk::SkipAuthentication => "skip-authentication",
        }
    }
}

impl fmt::Display for Quirk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product-behavior switches of a reference server plus the quirks it
/// exhibits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerProfile {
    pub name: String,
    /// Exchange 2013 contact elements (AccountName, Gender, Urls, ...) are
    /// stored; otherwise they are dropped on create.
    pub contact_2013_fields: bool,
    /// SetUserPhoto and GetUserPhoto are implemented.
    pub user_photo: bool,
    /// GetObjectIdFromUrl is implemented.
    pub object_ids: bool,
    pub quirks: BTreeSet<Quirk>,
}

impl ServerProfile {
    /// Profile names accepted by [`ServerProfile::by_name`].
    pub const NAMES: &'static [&'static str] = &["reference", "legacy", "quirky"];

    /// Every operation and element implemented, no quirks.
    pub fn reference() -> Self {
        Self {
            name: "reference".to_string(),
            contact_2013_fields: true,
            user_photo: true,
            object_ids: true,
            quirks: BTreeSet::new(),
        }
    }

    /// An older product: no 2013 contact elements, no user photos and no
    /// GetObjectIdFromUrl.
    pub fn legacy() -> Self {
        Self {
            name: "legacy".to_string(),
            contact_2013_fields: false,
            user_photo: false,
            object_ids: false,
            quirks: BTreeSet::new(),
        }
    }

    /// The reference profile with every quirk.
    pub fn quirky() -> Self {
        Self {
            name: "quirky".to_string(),
            quirks: Quirk::ALL.iter().copied().collect(),
            ..Self::reference()
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "reference" => Some(Self::reference()),
            "legacy" => Some(Self::legacy()),
            "quirky" => Some(Self::quirky()),
            _ => None,
        }
    }

    pub fn with_quirk(mut self, quirk: Quirk) -> Self {
        self.quirks.insert(quirk);
        self
    }

    pub fn has(&self, quirk: Quirk) -> bool {
        self.quirks.contains(&quirk)
    }
}

impl Default for ServerProfile {
    fn default() -> Self {
        Self::reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_profiles() {
        for name in ServerProfile::NAMES {
            let profile = ServerProfile::by_name(name).unwrap();
            assert_eq!(profile.name, *name);
        }
        assert!(ServerProfile::by_name("Quirky").is_some());
        assert!(ServerProfile::by_name("nope").is_none());
    }

    #[test]
    fn quirky_has_every_quirk() {
        let quirky = ServerProfile::quirky();
        assert!(Quirk::ALL.iter().all(|q| quirky.has(*q)));
        assert!(quirky.user_photo);
        assert!(ServerProfile::reference().quirks.is_empty());
    }

    #[test]
    fn single_quirk() {
        let profile = ServerProfile::reference().with_quirk(Quirk::IgnoreFolderRules);
        assert!(profile.has(Quirk::IgnoreFolderRules));
        assert!(!profile.has(Quirk::SkipAuthentication));
    }
}
