//! MS-OXWSCONT data model.
//!
//! Optional schema elements are `Option`s; a `None` field is simply not
//! sent (or was not returned).

use std::fmt;

use time::OffsetDateTime;

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
    /// Well-known folders addressed by name.
    DistinguishedFolderId {
        Contacts => "contacts",
        Drafts => "drafts",
        Inbox => "inbox",
        DeletedItems => "deleteditems",
    }
);

schema_enum!(ResponseClass {
    Success => "Success",
    Warning => "Warning",
    Error => "Error",
});

schema_enum!(ResponseCode {
    NoError => "NoError",
    ErrorItemNotFound => "ErrorItemNotFound",
    ErrorCannotCreateContactInNonContactFolder => "ErrorCannotCreateContactInNonContactFolder",
    ErrorInvalidPropertySet => "ErrorInvalidPropertySet",
    ErrorInvalidIdMalformed => "ErrorInvalidIdMalformed",
    ErrorNonExistentMailbox => "ErrorNonExistentMailbox",
    ErrorInvalidRequest => "ErrorInvalidRequest",
});

schema_enum!(DisposalType {
    HardDelete => "HardDelete",
    SoftDelete => "SoftDelete",
    MoveToDeletedItems => "MoveToDeletedItems",
});

schema_enum!(BaseShape {
    IdOnly => "IdOnly",
    Default => "Default",
    AllProperties => "AllProperties",
});

schema_enum!(EmailAddressKey {
    EmailAddress1 => "EmailAddress1",
    EmailAddress2 => "EmailAddress2",
    EmailAddress3 => "EmailAddress3",
});

schema_enum!(ImAddressKey {
    ImAddress1 => "ImAddress1",
    ImAddress2 => "ImAddress2",
    ImAddress3 => "ImAddress3",
});

schema_enum!(PhysicalAddressKey {
    Home => "Home",
    Business => "Business",
    Other => "Other",
});

schema_enum!(PhoneNumberKey {
    AssistantPhone => "AssistantPhone",
    BusinessFax => "BusinessFax",
    BusinessPhone => "BusinessPhone",
    BusinessPhone2 => "BusinessPhone2",
    Callback => "Callback",
    CarPhone => "CarPhone",
    CompanyMainPhone => "CompanyMainPhone",
    HomeFax => "HomeFax",
    HomePhone => "HomePhone",
    HomePhone2 => "HomePhone2",
    Isdn => "Isdn",
    MobilePhone => "MobilePhone",
    OtherFax => "OtherFax",
    OtherTelephone => "OtherTelephone",
    Pager => "Pager",
    PrimaryPhone => "PrimaryPhone",
    RadioPhone => "RadioPhone",
    Telex => "Telex",
    TtyTddPhone => "TtyTddPhone",
});

schema_enum!(
    /// How the server derives `FileAs` from other contact properties.
    FileAsMapping {
        None => "None",
        LastCommaFirst => "LastCommaFirst",
        FirstSpaceLast => "FirstSpaceLast",
        Company => "Company",
        LastCommaFirstCompany => "LastCommaFirstCompany",
        CompanyLastFirst => "CompanyLastFirst",
        LastFirst => "LastFirst",
        LastFirstCompany => "LastFirstCompany",
        CompanyLastCommaFirst => "CompanyLastCommaFirst",
        LastFirstSuffix => "LastFirstSuffix",
        LastSpaceFirstCompany => "LastSpaceFirstCompany",
        CompanyLastSpaceFirst => "CompanyLastSpaceFirst",
        LastSpaceFirst => "LastSpaceFirst",
        DisplayName => "DisplayName",
        FirstName => "FirstName",
        LastFirstMiddleSuffix => "LastFirstMiddleSuffix",
        LastName => "LastName",
        Empty => "Empty",
    }
);

impl FileAsMapping {
    /// The mappings every server version accepts on create.
    pub const CLASSIC: &'static [FileAsMapping] = &[
        FileAsMapping::None,
        FileAsMapping::LastCommaFirst,
        FileAsMapping::FirstSpaceLast,
        FileAsMapping::Company,
        FileAsMapping::LastCommaFirstCompany,
        FileAsMapping::CompanyLastFirst,
        FileAsMapping::LastFirst,
        FileAsMapping::LastFirstCompany,
        FileAsMapping::CompanyLastCommaFirst,
        FileAsMapping::LastFirstSuffix,
        FileAsMapping::LastSpaceFirstCompany,
        FileAsMapping::CompanyLastSpaceFirst,
        FileAsMapping::LastSpaceFirst,
    ];
}

schema_enum!(PhysicalAddressIndex {
    None => "None",
    Home => "Home",
    Business => "Business",
    Other => "Other",
});

schema_enum!(ContactSource {
    ActiveDirectory => "ActiveDirectory",
    Store => "Store",
});

schema_enum!(Importance {
    Low => "Low",
    Normal => "Normal",
    High => "High",
});

schema_enum!(Sensitivity {
    Normal => "Normal",
    Personal => "Personal",
    Private => "Private",
    Confidential => "Confidential",
});

schema_enum!(ContactUrlKey {
    Personal => "Personal",
    Business => "Business",
    Attachment => "Attachment",
    Other => "Other",
});

schema_enum!(UserPhotoSize {
    HR48x48 => "HR48x48",
    HR64x64 => "HR64x64",
    HR96x96 => "HR96x96",
    HR120x120 => "HR120x120",
    HR240x240 => "HR240x240",
    HR360x360 => "HR360x360",
    HR432x432 => "HR432x432",
    HR504x504 => "HR504x504",
    HR648x648 => "HR648x648",
});

impl UserPhotoSize {
    /// Edge length in pixels.
    pub fn pixels(self) -> u32 {
        match self {
            Self::HR48x48 => 48,
            Self::HR64x64 => 64,
            Self::HR96x96 => 96,
            Self::HR120x120 => 120,
            Self::HR240x240 => 240,
            Self::HR360x360 => 360,
            Self::HR432x432 => 432,
            Self::HR504x504 => 504,
            Self::HR648x648 => 648,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemId {
    pub id: String,
    pub change_key: Option<String>,
}

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            change_key: None,
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddressEntry {
    pub key: EmailAddressKey,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImAddressEntry {
    pub key: ImAddressKey,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumberEntry {
    pub key: PhoneNumberKey,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalAddressEntry {
    pub key: PhysicalAddressKey,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country_or_region: Option<String>,
    pub postal_code: Option<String>,
}

impl PhysicalAddressEntry {
    pub fn new(key: PhysicalAddressKey) -> Self {
        Self {
            key,
            street: None,
            city: None,
            state: None,
            country_or_region: None,
            postal_code: None,
        }
    }
}

/// Read-only name parts the server computes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompleteName {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub suffix: Option<String>,
    pub initials: Option<String>,
    pub full_name: Option<String>,
    pub nickname: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactUrl {
    pub url_type: ContactUrlKey,
    pub address: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContactItem {
    pub item_id: Option<ItemId>,
    pub subject: Option<String>,
    pub categories: Vec<String>,
    pub importance: Option<Importance>,
    pub sensitivity: Option<Sensitivity>,
    pub culture: Option<String>,

    pub file_as: Option<String>,
    pub file_as_mapping: Option<FileAsMapping>,
    pub display_name: Option<String>,
    pub given_name: Option<String>,
    pub initials: Option<String>,
    pub middle_name: Option<String>,
    pub nickname: Option<String>,
    pub complete_name: Option<CompleteName>,
    pub company_name: Option<String>,
    pub email_addresses: Vec<EmailAddressEntry>,
    pub physical_addresses: Vec<PhysicalAddressEntry>,
    pub phone_numbers: Vec<PhoneNumberEntry>,
    pub im_addresses: Vec<ImAddressEntry>,
    pub assistant_name: Option<String>,
    pub birthday: Option<OffsetDateTime>,
    pub business_home_page: Option<String>,
    pub children: Vec<String>,
    pub companies: Vec<String>,
    pub contact_source: Option<ContactSource>,
    pub department: Option<String>,
    pub generation: Option<String>,
    pub job_title: Option<String>,
    pub manager: Option<String>,
    pub mileage: Option<String>,
    pub office_location: Option<String>,
    pub postal_address_index: Option<PhysicalAddressIndex>,
    pub profession: Option<String>,
    pub spouse_name: Option<String>,
    pub surname: Option<String>,
    pub wedding_anniversary: Option<OffsetDateTime>,
    pub has_picture: Option<bool>,

    // Exchange 2013 additions.
    pub account_name: Option<String>,
    pub is_auto_update_disabled: Option<bool>,
    pub comment: Option<String>,
    pub gender: Option<String>,
    pub source_id: Option<String>,
    pub urls: Vec<ContactUrl>,
    pub cid: Option<i64>,
    pub skype_id: Option<String>,
    pub yomi_nickname: Option<String>,
}

/// A person item from the address book (Exchange 2013+).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AbchPersonItem {
    pub item_id: Option<ItemId>,
    pub anti_link_info: Option<String>,
    pub person_id: Option<String>,
    pub contact_handles: Vec<String>,
    pub contact_categories: Vec<String>,
    pub relevance_order1: Option<String>,
    pub relevance_order2: Option<String>,
    pub favorite_order: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Contact(ContactItem),
    AbchPerson(AbchPersonItem),
}

impl Item {
    pub fn item_id(&self) -> Option<&ItemId> {
        match self {
            Item::Contact(c) => c.item_id.as_ref(),
            Item::AbchPerson(p) => p.item_id.as_ref(),
        }
    }

    pub fn set_item_id(&mut self, id: ItemId) {
        match self {
            Item::Contact(c) => c.item_id = Some(id),
            Item::AbchPerson(p) => p.item_id = Some(id),
        }
    }

    pub fn as_contact(&self) -> Option<&ContactItem> {
        match self {
            Item::Contact(c) => Some(c),
            Item::AbchPerson(_) => None,
        }
    }

    pub fn as_abch_person(&self) -> Option<&AbchPersonItem> {
        match self {
            Item::AbchPerson(p) => Some(p),
            Item::Contact(_) => None,
        }
    }
}

impl From<ContactItem> for Item {
    fn from(contact: ContactItem) -> Self {
        Item::Contact(contact)
    }
}

impl From<AbchPersonItem> for Item {
    fn from(person: AbchPersonItem) -> Self {
        Item::AbchPerson(person)
    }
}

/// Contact properties an update can delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    JobTitle,
    Department,
    Nickname,
    CompanyName,
    Manager,
    OfficeLocation,
}
