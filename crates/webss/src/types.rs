//! MS-WEBSS data model.

use std::fmt;

/// `errorcode` values the protocol defines for SOAP fault details and
/// per-method results.
pub mod error_codes {
    pub const SUCCESS: &str = "0x00000000";
    /// Blank or missing parameter.
    pub const BLANK_OR_MISSING: &str = "0x82000001";
    /// No file extension, or the file is not part of the site definition.
    pub const NO_EXTENSION: &str = "0x80131600";
    pub const FILE_NOT_FOUND: &str = "0x80070002";
    pub const ASTERISK_IN_NAME: &str = "0x81020073";
    /// Generic failure of one column method.
    pub const FAIL: &str = "0x80004005";
}

/// Declares a schema enumeration with its wire names and an `ALL` list in
/// schema order.
macro_rules! schema_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

schema_enum!(
    /// Status of a page relative to its site definition.
    CustomizedPageStatus {
        None => "None",
        Uncustomized => "Uncustomized",
        Customized => "Customized",
    }
);

schema_enum!(
    /// Objects whose server-side ids the SUT control channel can look up.
    ObjectKind {
        List => "List",
        ListItem => "ListItem",
    }
);

/// A column (field) definition. Every attribute is optional on the wire;
/// servers reject definitions that lack the ones an operation needs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldDefinition {
    /// GUID of the field.
    pub id: Option<String>,
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub field_type: Option<String>,
}

impl FieldDefinition {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_type(mut self, field_type: impl Into<String>) -> Self {
        self.field_type = Some(field_type.into());
        self
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// One add, update or delete request for a field. The method id is chosen
/// by the client and echoed in the matching result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMethod {
    pub id: String,
    pub field: FieldDefinition,
}

impl FieldMethod {
    pub fn new(id: impl Into<String>, field: FieldDefinition) -> Self {
        Self {
            id: id.into(),
            field,
        }
    }
}

/// Outcome of one [`FieldMethod`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodResult {
    pub id: String,
    pub error_code: String,
    pub error_text: Option<String>,
}

impl MethodResult {
    pub fn succeeded(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            error_code: error_codes::SUCCESS.to_string(),
            error_text: None,
        }
    }

    pub fn failed(id: impl Into<String>, code: &str, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            error_code: code.to_string(),
            error_text: Some(text.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error_code == error_codes::SUCCESS
    }
}

/// Title and description set on a content type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContentTypeProperties {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// One entry of `GetContentTypes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTypeSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub group: Option<String>,
    /// Fully qualified URL of the content type scope.
    pub scope: String,
    pub version: i32,
}

/// An XML document attached to a content type, keyed by its namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    pub namespace_uri: String,
    pub content: String,
}

/// The full definition returned by `GetContentType`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub group: Option<String>,
    pub version: i32,
    pub fields: Vec<FieldDefinition>,
    pub xml_documents: Vec<XmlDocument>,
}

/// Content type data echoed by `UpdateContentType`.
///
/// `locs`, `read_only` and `sealed` are schema types whose only legal value
/// is TRUE (`require_client_rendering_on_new` only FALSE); `None` means the
/// attribute was absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListProperties {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub group: Option<String>,
    pub feature_id: Option<String>,
    pub version: i32,
    pub locs: Option<bool>,
    pub read_only: Option<bool>,
    pub sealed: Option<bool>,
    pub require_client_rendering_on_new: Option<bool>,
}

/// Properties of the object a URL points at.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ObjectId {
    /// `{GUID}` of the list the object belongs to.
    pub list_id: Option<String>,
    pub list_server_template: Option<i32>,
    pub list_base_type: Option<i32>,
    pub list_item: bool,
    pub list_item_id: Option<String>,
    pub file: bool,
    pub folder: bool,
    /// Comma-separated alternate URLs.
    pub alternate_urls: Option<String>,
}

/// Site properties returned by `GetWeb` and the web collection operations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WebDefinition {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    /// LCID.
    pub language: Option<String>,
    pub theme: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListTemplate {
    pub name: String,
    pub display_name: String,
    pub template_type: i32,
    pub base_type: i32,
}

/// Feature GUIDs activated on the site and on its site collection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActivatedFeatures {
    pub site: Vec<String>,
    pub site_collection: Vec<String>,
}

impl ActivatedFeatures {
    /// The wire form: comma-separated GUIDs, site features first, the two
    /// groups separated by a tab.
    pub fn to_wire(&self) -> String {
        format!("{}\t{}", self.site.join(","), self.site_collection.join(","))
    }

    pub fn from_wire(s: &str) -> Self {
        let split = |part: &str| -> Vec<String> {
            part.split(',')
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(str::to_string)
                .collect()
        };
        let (site, collection) = s.split_once('\t').unwrap_or((s, ""));
        Self {
            site: split(site),
            site_collection: split(collection),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.site.iter().chain(self.site_collection.iter())
    }
}

/// Whether `id` has the content type id shape: `0x` followed by an even
/// number of hex digits.
pub fn is_content_type_id(id: &str) -> bool {
    match id.strip_prefix("0x").or_else(|| id.strip_prefix("0X")) {
        Some(hex) => !hex.is_empty() && hex.len() % 2 == 0 && hex.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}
