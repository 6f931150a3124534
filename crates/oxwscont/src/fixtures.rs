//! Request payload builders for the MS-OXWSCONT scenarios.
//!
//! Each builder returns a complete value that scenarios adjust field by
//! field. Names are generated per case so that objects left behind by a
//! failed cleanup are attributable.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use protocheck_harness::{Site, TestFailure};
use time::macros::datetime;

use crate::types::{
    AbchPersonItem, ContactItem, ContactSource, ContactUrl, ContactUrlKey, EmailAddressEntry,
    EmailAddressKey, FileAsMapping, ImAddressEntry, ImAddressKey, Importance, PhoneNumberEntry,
    PhoneNumberKey, PhysicalAddressEntry, PhysicalAddressIndex, PhysicalAddressKey, Sensitivity,
};

/// A contact with only `FileAs` set, the single element every server must
/// accept.
pub fn contact_with_required_properties(site: &Site) -> ContactItem {
    ContactItem {
        file_as: Some(site.resource_name("FileAs")),
        ..Default::default()
    }
}

/// A contact with every settable element populated.
///
/// Elements introduced by Exchange 2013 are only set when their
/// applicability flag is on for the server under test.
pub fn full_properties_contact(site: &Site) -> Result<ContactItem, TestFailure> {
    let domain = site.property("Domain")?;
    let name = site.resource_name("Contact");

    let mut contact = ContactItem {
        file_as: Some(name.clone()),
        file_as_mapping: Some(FileAsMapping::None),
        display_name: Some(name.clone()),
        given_name: Some(format!("{}_Given", name)),
        middle_name: Some(format!("{}_Middle", name)),
        surname: Some(format!("{}_Surname", name)),
        initials: Some("PT".to_string()),
        nickname: Some(format!("{}_Nick", name)),
        generation: Some("Jr.".to_string()),
        company_name: Some(format!("{}_Company", name)),
        companies: vec![format!("{}_Company", name)],
        email_addresses: vec![EmailAddressEntry {
            key: EmailAddressKey::EmailAddress1,
            value: format!("{}@{}", name, domain),
        }],
        im_addresses: vec![ImAddressEntry {
            key: ImAddressKey::ImAddress1,
            value: format!("{}@{}", name, domain),
        }],
        phone_numbers: vec![PhoneNumberEntry {
            key: PhoneNumberKey::BusinessPhone,
            value: "123456789".to_string(),
        }],
        physical_addresses: vec![PhysicalAddressEntry {
            street: Some("1 Main Street".to_string()),
            city: Some("Redmond".to_string()),
            state: Some("WA".to_string()),
            country_or_region: Some("USA".to_string()),
            postal_code: Some("123456".to_string()),
            ..PhysicalAddressEntry::new(PhysicalAddressKey::Business)
        }],
        postal_address_index: Some(PhysicalAddressIndex::Business),
        spouse_name: Some(format!("{}_Spouse", name)),
        assistant_name: Some(format!("{}_Assistant", name)),
        birthday: Some(datetime!(1988-10-16 11:59 UTC)),
        wedding_anniversary: Some(datetime!(2010-10-10 0:00 UTC)),
        business_home_page: Some("http://www.microsoft.com".to_string()),
        job_title: Some("Engineer".to_string()),
        manager: Some(format!("{}_Manager", name)),
        mileage: Some("100".to_string()),
        office_location: Some("Building 1".to_string()),
        subject: Some(name.clone()),
        categories: vec!["Business".to_string()],
        culture: Some("en-US".to_string()),
        department: Some("Test".to_string()),
        contact_source: Some(ContactSource::ActiveDirectory),
        importance: Some(Importance::Normal),
        profession: Some("Tester".to_string()),
        sensitivity: Some(Sensitivity::Normal),
        children: vec![format!("{}_Child", name)],
        ..Default::default()
    };

    if site.is_requirement_enabled(1275004)? {
        contact.account_name = Some(format!("{}_Account", name));
    }
    if site.is_requirement_enabled(1275006)? {
        contact.is_auto_update_disabled = Some(true);
    }
    if site.is_requirement_enabled(1275008)? {
        contact.comment = Some("This is a comment".to_string());
    }
    if site.is_requirement_enabled(1275014)? {
        contact.gender = Some("Female".to_string());
    }
    if site.is_requirement_enabled(1275026)? {
        contact.source_id = Some(format!("{}_Source", name));
    }
    if site.is_requirement_enabled(1275032)? {
        contact.urls = vec![ContactUrl {
            url_type: ContactUrlKey::Business,
            address: "http://www.microsoft.com".to_string(),
            name: Some("This is a url".to_string()),
        }];
    }
    if site.is_requirement_enabled(1275034)? {
        contact.cid = Some(1);
    }
    if site.is_requirement_enabled(1275040)? {
        contact.skype_id = Some(format!("{}_Skype", name));
    }
    if site.is_requirement_enabled(1275044)? {
        contact.yomi_nickname = Some(format!("{}_Yomi", name));
    }

    Ok(contact)
}

/// A contact whose `FileAs` is derived by the server from `mapping`.
///
/// `FileAs` itself is only sent for [`FileAsMapping::None`], where the
/// server must keep the value as given.
pub fn file_as_mapping_contact(site: &Site, mapping: FileAsMapping) -> ContactItem {
    let name = site.resource_name("Contact");
    ContactItem {
        file_as: (mapping == FileAsMapping::None).then(|| name.clone()),
        file_as_mapping: Some(mapping),
        given_name: Some(format!("{}_Given", name)),
        middle_name: Some(format!("{}_Middle", name)),
        surname: Some(format!("{}_Surname", name)),
        generation: Some("Jr.".to_string()),
        company_name: Some(format!("{}_Company", name)),
        display_name: Some(name),
        ..Default::default()
    }
}

pub fn contact_with_email_address(
    site: &Site,
    key: EmailAddressKey,
) -> Result<ContactItem, TestFailure> {
    let domain = site.property("Domain")?;
    let name = site.resource_name("Contact");
    Ok(ContactItem {
        file_as: Some(name.clone()),
        email_addresses: vec![EmailAddressEntry {
            key,
            value: format!("{}@{}", name, domain),
        }],
        ..Default::default()
    })
}

pub fn contact_with_im_address(site: &Site, key: ImAddressKey) -> ContactItem {
    let name = site.resource_name("Contact");
    ContactItem {
        file_as: Some(name.clone()),
        im_addresses: vec![ImAddressEntry {
            key,
            value: format!("im:{}", name),
        }],
        ..Default::default()
    }
}

pub fn contact_with_phone_number(key: PhoneNumberKey) -> ContactItem {
    ContactItem {
        phone_numbers: vec![PhoneNumberEntry {
            key,
            value: "123456789".to_string(),
        }],
        ..Default::default()
    }
}

pub fn contact_with_physical_address(site: &Site, key: PhysicalAddressKey) -> ContactItem {
    ContactItem {
        file_as: Some(site.resource_name("Contact")),
        physical_addresses: vec![PhysicalAddressEntry {
            city: Some("Redmond".to_string()),
            postal_code: Some("123456".to_string()),
            ..PhysicalAddressEntry::new(key)
        }],
        ..Default::default()
    }
}

/// A contact with one address of each kind and `index` selecting the
/// mailing address.
pub fn contact_with_postal_address_index(site: &Site, index: PhysicalAddressIndex) -> ContactItem {
    ContactItem {
        file_as: Some(site.resource_name("Contact")),
        postal_address_index: Some(index),
        physical_addresses: PhysicalAddressKey::ALL
            .iter()
            .map(|key| PhysicalAddressEntry {
                city: Some(format!("{}City", key)),
                ..PhysicalAddressEntry::new(*key)
            })
            .collect(),
        ..Default::default()
    }
}

pub fn abch_person_item(site: &Site) -> AbchPersonItem {
    AbchPersonItem {
        anti_link_info: Some(site.resource_name("AntiLinkInfo")),
        contact_categories: vec!["test category".to_string()],
        favorite_order: Some(1),
        ..Default::default()
    }
}

/// The address the user-photo scenarios act on.
pub fn photo_user_email(site: &Site) -> Result<String, TestFailure> {
    Ok(format!(
        "{}@{}",
        site.property("ContactUserName")?,
        site.property("Domain")?
    ))
}

/// A small PNG, base64-encoded.
pub fn sample_photo() -> String {
    BASE64.encode(PHOTO_BYTES)
}

/// A different image than [`sample_photo`].
pub fn changed_photo() -> String {
    let mut bytes = PHOTO_BYTES.to_vec();
    bytes.extend_from_slice(b"changed");
    BASE64.encode(bytes)
}

const PHOTO_BYTES: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f, 0x15, 0xc4,
    0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0xf8, 0xcf, 0xc0, 0xf0,
    0x1f, 0x00, 0x05, 0x00, 0x01, 0xff, 0x89, 0x99, 0x3d, 0x1d, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45,
    0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

#[cfg(test)]
mod tests {
    use super::*;
    use protocheck_harness::SuiteConfig;
    use std::sync::Arc;

    fn site(flags: bool) -> Site {
        let mut config = SuiteConfig::new().with_property("Domain", "contoso.com");
        for number in [
            1275004, 1275006, 1275008, 1275014, 1275026, 1275032, 1275034, 1275040, 1275044,
        ] {
            config = config.with_requirement("MS-OXWSCONT", number, flags);
        }
        let mut site = Site::new("MS-OXWSCONT", Arc::new(config));
        site.begin_case("S01_TC02");
        site
    }

    #[test]
    fn full_contact_includes_2013_fields_only_when_enabled() {
        let with = full_properties_contact(&site(true)).unwrap();
        assert_eq!(with.gender.as_deref(), Some("Female"));
        assert_eq!(with.cid, Some(1));
        assert_eq!(with.urls.len(), 1);

        let without = full_properties_contact(&site(false)).unwrap();
        assert!(without.gender.is_none());
        assert!(without.urls.is_empty());
        assert!(without.email_addresses[0].value.ends_with("@contoso.com"));
    }

    #[test]
    fn file_as_only_sent_for_none_mapping() {
        let site = site(true);
        assert!(file_as_mapping_contact(&site, FileAsMapping::None)
            .file_as
            .is_some());
        assert!(file_as_mapping_contact(&site, FileAsMapping::Company)
            .file_as
            .is_none());
    }

    #[test]
    fn photos_decode_and_differ() {
        let a = BASE64.decode(sample_photo()).unwrap();
        let b = BASE64.decode(changed_photo()).unwrap();
        assert_eq!(&a[1..4], b"PNG");
        assert_ne!(a, b);
    }
}
