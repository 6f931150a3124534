//! Request payload builders for the MS-WEBSS scenarios.

use protocheck_harness::names::{new_guid, random_string};
use protocheck_harness::{Site, TestFailure};

use crate::base::CaseNames;
use crate::types::{ContentTypeProperties, FieldDefinition, FieldMethod};

/// Characters no content type display name may contain, with the
/// requirement each one traces to. `~` and `,` are rejected by servers
/// without a requirement of their own.
pub const INVALID_NAME_CHARS: &[(char, Option<u32>)] = &[
    ('\\', Some(790)),
    ('/', Some(791)),
    (':', Some(792)),
    ('*', Some(793)),
    ('?', Some(794)),
    ('"', Some(795)),
    ('#', Some(796)),
    ('%', Some(797)),
    ('<', Some(798)),
    ('>', Some(799)),
    ('{', Some(800)),
    ('}', Some(801)),
    ('&', Some(802)),
    ('|', Some(803)),
    ('\t', Some(804)),
    ('~', None),
    (',', None),
];

/// Three random letters, `c`, three random letters.
pub fn invalid_display_name(c: char) -> String {
    format!("{}{}{}", random_string(3), c, random_string(3))
}

/// Title and description applied to the content types a case creates.
pub fn content_type_properties(names: &CaseNames) -> ContentTypeProperties {
    ContentTypeProperties {
        title: Some(names.title.clone()),
        description: Some(names.description.clone()),
    }
}

/// Properties for an update: the case title and a fresh description.
pub fn updated_content_type_properties(names: &CaseNames) -> ContentTypeProperties {
    ContentTypeProperties {
        title: Some(names.title.clone()),
        description: Some(random_string(10)),
    }
}

/// The field added to every content type the case creates.
pub fn new_fields(names: &CaseNames) -> Vec<FieldMethod> {
    vec![FieldMethod::new(
        names.new_fields_method_id.clone(),
        FieldDefinition::named(names.new_field_name.clone()).with_id(names.new_field_id.clone()),
    )]
}

/// Adds one more field with a random name to an existing content type.
pub fn new_fields_for_update() -> Vec<FieldMethod> {
    vec![FieldMethod::new(
        new_guid(),
        FieldDefinition::named(random_string(10)).with_id(new_guid()),
    )]
}

/// Updates the case field under a new random name.
pub fn update_fields(names: &CaseNames) -> Vec<FieldMethod> {
    vec![FieldMethod::new(
        names.new_fields_method_id.clone(),
        FieldDefinition::named(random_string(10)).with_id(names.new_field_id.clone()),
    )]
}

/// Deletes a field that no content type has.
pub fn unknown_delete_fields() -> Vec<FieldMethod> {
    vec![FieldMethod::new(
        new_guid(),
        FieldDefinition::named(random_string(10)),
    )]
}

/// A complete site column: name, display name and the configured type.
pub fn column(site: &Site, name: &str) -> Result<FieldDefinition, TestFailure> {
    Ok(FieldDefinition::named(name)
        .with_display_name(random_string(10))
        .with_type(site.property("UpdateColumns_Type")?))
}

/// `SiteCollectionUrl` in lowercase with `relative` appended.
pub fn invalid_url(site: &Site, relative: &str) -> Result<String, TestFailure> {
    Ok(format!(
        "{}/{}",
        site.property("SiteCollectionUrl")?.to_lowercase(),
        relative
    ))
}

/// `{transport}://{server}`, the root site the context site lives under.
pub fn server_root(site: &Site) -> Result<String, TestFailure> {
    Ok(format!(
        "{}://{}",
        site.property("TransportType")?.to_lowercase(),
        site.property("SutComputerName")?.to_lowercase()
    ))
}

/// A page of the parent of the context site.
pub fn parent_site_page_url(site: &Site) -> Result<String, TestFailure> {
    Ok(format!("{}/default.aspx", server_root(site)?))
}

/// A document in the configured folder of the subsite, which no site
/// definition provides.
pub fn uploaded_document_url(site: &Site) -> Result<String, TestFailure> {
    Ok(format!(
        "{}/{}/{}",
        site.property("SubSiteUrl")?,
        site.property("FoldName")?,
        site.property("DocName")?
    ))
}

/// An XML document with root namespace `namespace`.
pub fn xml_document(namespace: &str) -> String {
    format!(
        "<FieldTest xmlns=\"{}\"><Item>{}</Item></FieldTest>",
        namespace,
        random_string(10)
    )
}

/// A namespace URI unique to this call.
pub fn xml_namespace(site: &Site) -> String {
    format!("http://www.contoso.com/{}", site.resource_name("Document"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use protocheck_harness::SuiteConfig;
    use std::sync::Arc;

    fn site() -> Site {
        let config = SuiteConfig::new()
            .with_property("SiteCollectionUrl", "http://SUT01/sites/MSWEBSS")
            .with_property("SubSiteUrl", "http://SUT01/sites/MSWEBSS/subsite")
            .with_property("TransportType", "HTTP")
            .with_property("SutComputerName", "SUT01")
            .with_property("FoldName", "Shared Documents")
            .with_property("DocName", "report.docx")
            .with_property("UpdateColumns_Type", "Text");
        let mut site = Site::new("MS-WEBSS", Arc::new(config));
        site.begin_case("S04_TC05");
        site
    }

    #[test]
    fn invalid_names_embed_the_character() {
        for (c, _) in INVALID_NAME_CHARS {
            let name = invalid_display_name(*c);
            assert_eq!(name.chars().count(), 7);
            assert_eq!(name.chars().nth(3), Some(*c));
        }
    }

    #[test]
    fn urls_derive_from_config() {
        let site = site();
        assert_eq!(
            invalid_url(&site, "NoSuchWeb").unwrap(),
            "http://sut01/sites/mswebss/NoSuchWeb"
        );
        assert_eq!(
            parent_site_page_url(&site).unwrap(),
            "http://sut01/default.aspx"
        );
        assert_eq!(
            uploaded_document_url(&site).unwrap(),
            "http://SUT01/sites/MSWEBSS/subsite/Shared Documents/report.docx"
        );
    }

    #[test]
    fn column_carries_configured_type() {
        let column = column(&site(), "Col").unwrap();
        assert_eq!(column.field_type.as_deref(), Some("Text"));
        assert!(column.display_name.is_some());
    }

    #[test]
    fn xml_document_has_namespace_root() {
        let doc = xml_document("http://www.contoso.com/a");
        assert!(doc.starts_with("<FieldTest xmlns=\"http://www.contoso.com/a\">"));
    }
}
