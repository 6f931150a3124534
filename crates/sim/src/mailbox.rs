//! An in-memory Exchange mailbox serving the MS-OXWSCONT operations.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use log::debug;
use protocheck_harness::names::random_string;
use protocheck_harness::{ConfigError, ProtocolFault, SuiteConfig, UserAuthentication};
use protocheck_oxwscont::messages::{
    CopyItemRequest, CreateItemRequest, DeleteItemRequest, FindItemRequest, GetItemRequest,
    GetUserPhotoRequest, GetUserPhotoResponse, ItemChange, ItemsResponse, MoveItemRequest,
    ResponseMessage, SetUserPhotoRequest, SetUserPhotoResponse, UpdateItemRequest,
};
use protocheck_oxwscont::types::{
    AbchPersonItem, BaseShape, CompleteName, ContactField, ContactItem, DisposalType,
    DistinguishedFolderId, FileAsMapping, Item, ItemId, ResponseClass, ResponseCode,
};
use protocheck_oxwscont::{AdapterResult, ContactsAdapter};
use tokio::sync::Mutex;

use crate::profile::{Quirk, ServerProfile};
use crate::session::Credentials;

const NOT_FOUND: &str = "The specified object was not found in the store.";

#[derive(Debug, Clone)]
struct StoredItem {
    folder: DistinguishedFolderId,
    item: Item,
    change: u32,
}

impl StoredItem {
    fn item_id(&self, id: &str) -> ItemId {
        ItemId {
            id: id.to_string(),
            change_key: Some(format!("CQAAABYA{:04}", self.change)),
        }
    }

    /// The item as returned to a client, in `shape`.
    fn view(&self, id: &str, shape: BaseShape) -> Item {
        let mut item = match shape {
            BaseShape::IdOnly => id_only(&self.item),
            BaseShape::Default | BaseShape::AllProperties => self.item.clone(),
        };
        item.set_item_id(self.item_id(id));
        item
    }
}

#[derive(Debug, Clone)]
struct Photo {
    content: String,
    version: u32,
    fetched: Option<u32>,
}

#[derive(Debug, Default)]
struct MailboxStore {
    /// Keyed by item id; ids sort in creation order.
    items: BTreeMap<String, StoredItem>,
    /// Soft-deleted items: invisible to every operation except a purging
    /// hard delete.
    recoverable: BTreeMap<String, StoredItem>,
    /// Keyed by lowercase SMTP address.
    photos: HashMap<String, Photo>,
    next_id: u64,
}

impl MailboxStore {
    fn new_id(&mut self) -> String {
        self.next_id += 1;
        format!("AAMkAGI{:010}{}", self.next_id, random_string(12))
    }

    fn insert(&mut self, folder: DistinguishedFolderId, item: Item) -> (String, StoredItem) {
        let id = self.new_id();
        let stored = StoredItem {
            folder,
            item,
            change: 1,
        };
        self.items.insert(id.clone(), stored.clone());
        (id, stored)
    }
}

/// In-memory mailbox of the configured contact user.
///
/// Sessions created with [`InMemoryMailbox::session`] share the store but
/// hold their own credentials, so one scenario signing out does not affect
/// another.
#[derive(Debug)]
pub struct InMemoryMailbox {
    store: Arc<Mutex<MailboxStore>>,
    credentials: Credentials,
    profile: Arc<ServerProfile>,
    /// Lowercase SMTP addresses of existing mailboxes.
    mailboxes: Arc<Vec<String>>,
}

impl InMemoryMailbox {
    /// A mailbox for `ContactUserName@Domain`.
    pub fn new(config: &SuiteConfig, profile: ServerProfile) -> Result<Self, ConfigError> {
        let address = format!(
            "{}@{}",
            config.property("ContactUserName")?,
            config.property("Domain")?
        );
        Ok(Self {
            store: Arc::new(Mutex::new(MailboxStore::default())),
            credentials: Credentials::new(),
            profile: Arc::new(profile),
            mailboxes: Arc::new(vec![address.to_lowercase()]),
        })
    }

    /// Another connection to the same mailbox.
    pub fn session(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            credentials: Credentials::new(),
            profile: Arc::clone(&self.profile),
            mailboxes: Arc::clone(&self.mailboxes),
        }
    }

    pub fn profile(&self) -> &ServerProfile {
        &self.profile
    }

    /// Number of items in all folders.
    pub async fn item_count(&self) -> usize {
        self.store.lock().await.items.len()
    }

    /// Number of soft-deleted items not yet purged.
    pub async fn recoverable_count(&self) -> usize {
        self.store.lock().await.recoverable.len()
    }

    fn has_mailbox(&self, email: &str) -> bool {
        let email = email.to_lowercase();
        self.mailboxes.iter().any(|m| *m == email)
    }

    /// Whether items may be saved to `folder`.
    fn accepts(&self, folder: DistinguishedFolderId) -> bool {
        matches!(
            folder,
            DistinguishedFolderId::Contacts | DistinguishedFolderId::DeletedItems
        ) || self.profile.has(Quirk::IgnoreFolderRules)
    }

    /// Server-side processing of a new item: read-only elements are
    /// rejected, computed ones filled in.
    fn prepare(&self, item: &Item) -> Result<Item, ResponseMessage> {
        match item {
            Item::Contact(contact) => {
                if contact.has_picture.is_some() {
                    return Err(ResponseMessage::error(
                        ResponseCode::ErrorInvalidPropertySet,
                        "HasPicture is read-only.",
                    ));
                }
                let mut contact = contact.clone();
                contact.item_id = None;
                if !self.profile.contact_2013_fields {
                    strip_2013_fields(&mut contact);
                }
                contact.has_picture = Some(false);
                compute_names(&mut contact);
                Ok(Item::Contact(contact))
            }
            Item::AbchPerson(person) => Ok(Item::AbchPerson(AbchPersonItem {
                item_id: None,
                ..person.clone()
            })),
        }
    }
}

#[async_trait]
impl ContactsAdapter for InMemoryMailbox {
    async fn initialize_service(&self, auth: UserAuthentication) {
        self.credentials.set(auth);
    }

    async fn create_item(&self, request: &CreateItemRequest) -> AdapterResult<ItemsResponse> {
        self.credentials.check(&self.profile)?;
        let folder = request.saved_item_folder;
        let mut store = self.store.lock().await;
        let mut messages = Vec::with_capacity(request.items.len());
        for item in &request.items {
            if folder != DistinguishedFolderId::Contacts && !self.profile.has(Quirk::IgnoreFolderRules)
            {
                messages.push(ResponseMessage::error(
                    ResponseCode::ErrorCannotCreateContactInNonContactFolder,
                    "Contacts can only be created in a contacts folder.",
                ));
                continue;
            }
            match self.prepare(item) {
                Ok(item) => {
                    let (id, stored) = store.insert(folder, item);
                    debug!("CreateItem: {} in {}", id, folder);
                    messages.push(ResponseMessage::success(vec![
                        stored.view(&id, BaseShape::IdOnly)
                    ]));
                }
                Err(message) => messages.push(message),
            }
        }
        Ok(ItemsResponse { messages })
    }

    async fn get_item(&self, request: &GetItemRequest) -> AdapterResult<ItemsResponse> {
        self.credentials.check(&self.profile)?;
        let store = self.store.lock().await;
        let messages = request
            .item_ids
            .iter()
            .map(|id| {
                if id.id.is_empty() {
                    return ResponseMessage::error(
                        ResponseCode::ErrorInvalidIdMalformed,
                        "Id is malformed.",
                    );
                }
                match store.items.get(&id.id) {
                    Some(stored) => {
                        ResponseMessage::success(vec![stored.view(&id.id, request.shape)])
                    }
                    None => ResponseMessage::error(ResponseCode::ErrorItemNotFound, NOT_FOUND),
                }
            })
            .collect();
        Ok(ItemsResponse { messages })
    }

    async fn delete_item(&self, request: &DeleteItemRequest) -> AdapterResult<ItemsResponse> {
        self.credentials.check(&self.profile)?;
        let mut store = self.store.lock().await;
        let mut messages = Vec::with_capacity(request.item_ids.len());
        for id in &request.item_ids {
            if !store.items.contains_key(&id.id) {
                // A hard delete purges what a soft delete left behind.
                let purged = request.disposal == DisposalType::HardDelete
                    && store.recoverable.remove(&id.id).is_some();
                messages.push(if purged {
                    debug!("DeleteItem: {} purged", id);
                    ResponseMessage::success(Vec::new())
                } else {
                    ResponseMessage::error(ResponseCode::ErrorItemNotFound, NOT_FOUND)
                });
                continue;
            }
            match request.disposal {
                DisposalType::HardDelete => {
                    if !self.profile.has(Quirk::KeepHardDeletedItems) {
                        store.items.remove(&id.id);
                    }
                }
                DisposalType::SoftDelete => {
                    if let Some(stored) = store.items.remove(&id.id) {
                        store.recoverable.insert(id.id.clone(), stored);
                    }
                }
                DisposalType::MoveToDeletedItems => {
                    if let Some(stored) = store.items.get_mut(&id.id) {
                        stored.folder = DistinguishedFolderId::DeletedItems;
                        stored.change += 1;
                    }
                }
            }
            debug!("DeleteItem: {} ({})", id, request.disposal);
            messages.push(ResponseMessage::success(Vec::new()));
        }
        Ok(ItemsResponse { messages })
    }

    async fn update_item(&self, request: &UpdateItemRequest) -> AdapterResult<ItemsResponse> {
        self.credentials.check(&self.profile)?;
        let mut store = self.store.lock().await;
        let messages = request
            .changes
            .iter()
            .map(|change| match store.items.get_mut(&change.item_id.id) {
                Some(stored) => match apply_change(&mut stored.item, change) {
                    Ok(()) => {
                        stored.change += 1;
                        debug!("UpdateItem: {}", change.item_id);
                        ResponseMessage::success(vec![
                            stored.view(&change.item_id.id, BaseShape::IdOnly)
                        ])
                    }
                    Err(message) => message,
                },
                None => ResponseMessage::error(ResponseCode::ErrorItemNotFound, NOT_FOUND),
            })
            .collect();
        Ok(ItemsResponse { messages })
    }

    async fn move_item(&self, request: &MoveItemRequest) -> AdapterResult<ItemsResponse> {
        self.credentials.check(&self.profile)?;
        let mut store = self.store.lock().await;
        let mut messages = Vec::with_capacity(request.item_ids.len());
        for id in &request.item_ids {
            if !self.accepts(request.to_folder) {
                messages.push(ResponseMessage::error(
                    ResponseCode::ErrorCannotCreateContactInNonContactFolder,
                    "Contacts can only be moved to a contacts folder.",
                ));
                continue;
            }
            match store.items.remove(&id.id) {
                Some(stored) => {
                    let (new_id, moved) = store.insert(request.to_folder, stored.item);
                    debug!("MoveItem: {} -> {} in {}", id, new_id, request.to_folder);
                    messages.push(ResponseMessage::success(vec![
                        moved.view(&new_id, BaseShape::IdOnly)
                    ]));
                }
                None => messages.push(ResponseMessage::error(
                    ResponseCode::ErrorItemNotFound,
                    NOT_FOUND,
                )),
            }
        }
        Ok(ItemsResponse { messages })
    }

    async fn copy_item(&self, request: &CopyItemRequest) -> AdapterResult<ItemsResponse> {
        self.credentials.check(&self.profile)?;
        let mut store = self.store.lock().await;
        let mut messages = Vec::with_capacity(request.item_ids.len());
        for id in &request.item_ids {
            if !self.accepts(request.to_folder) {
                messages.push(ResponseMessage::error(
                    ResponseCode::ErrorCannotCreateContactInNonContactFolder,
                    "Contacts can only be copied to a contacts folder.",
                ));
                continue;
            }
            let Some(original) = store.items.get(&id.id).cloned() else {
                messages.push(ResponseMessage::error(
                    ResponseCode::ErrorItemNotFound,
                    NOT_FOUND,
                ));
                continue;
            };
            let (new_id, copy) = store.insert(request.to_folder, original.item);
            debug!("CopyItem: {} -> {}", id, new_id);
            messages.push(ResponseMessage::success(vec![
                copy.view(&new_id, BaseShape::IdOnly)
            ]));
        }
        Ok(ItemsResponse { messages })
    }

    async fn find_item(&self, request: &FindItemRequest) -> AdapterResult<ItemsResponse> {
        self.credentials.check(&self.profile)?;
        let store = self.store.lock().await;
        let items = store
            .items
            .iter()
            .filter(|(_, stored)| stored.folder == request.parent_folder)
            .map(|(id, stored)| stored.view(id, request.shape))
            .collect();
        Ok(ItemsResponse {
            messages: vec![ResponseMessage::success(items)],
        })
    }

    async fn set_user_photo(
        &self,
        request: &SetUserPhotoRequest,
    ) -> AdapterResult<SetUserPhotoResponse> {
        self.credentials.check(&self.profile)?;
        if !self.profile.user_photo {
            return Err(item_error(ResponseCode::ErrorInvalidRequest, "SetUserPhoto is not supported."));
        }
        if !self.has_mailbox(&request.email) {
            return Err(item_error(ResponseCode::ErrorNonExistentMailbox, &request.email));
        }
        if BASE64.decode(&request.content).is_err() {
            return Err(item_error(
                ResponseCode::ErrorInvalidRequest,
                "The photo is not valid base64.",
            ));
        }
        let mut store = self.store.lock().await;
        let photo = store
            .photos
            .entry(request.email.to_lowercase())
            .or_insert(Photo {
                content: String::new(),
                version: 0,
                fetched: None,
            });
        photo.content = request.content.clone();
        photo.version += 1;
        debug!("SetUserPhoto: {} version {}", request.email, photo.version);
        Ok(SetUserPhotoResponse {
            class: ResponseClass::Success,
            code: ResponseCode::NoError,
        })
    }

    async fn get_user_photo(
        &self,
        request: &GetUserPhotoRequest,
    ) -> AdapterResult<GetUserPhotoResponse> {
        self.credentials.check(&self.profile)?;
        if !self.profile.user_photo {
            return Err(item_error(ResponseCode::ErrorInvalidRequest, "GetUserPhoto is not supported."));
        }
        if !self.has_mailbox(&request.email) {
            return Err(item_error(ResponseCode::ErrorNonExistentMailbox, &request.email));
        }
        let mut store = self.store.lock().await;
        let photo = store
            .photos
            .get_mut(&request.email.to_lowercase())
            .ok_or_else(|| item_error(ResponseCode::ErrorItemNotFound, "No photo is set."))?;
        let has_changed = photo.fetched != Some(photo.version);
        photo.fetched = Some(photo.version);
        debug!(
            "GetUserPhoto: {} at {} pixels, changed {}",
            request.email,
            request.size.pixels(),
            has_changed
        );
        Ok(GetUserPhotoResponse {
            class: ResponseClass::Success,
            code: ResponseCode::NoError,
            has_changed,
            picture_data: has_changed.then(|| photo.content.clone()),
        })
    }
}

fn item_error(code: ResponseCode, message: &str) -> ProtocolFault {
    ProtocolFault::Item {
        code: code.to_string(),
        message: Some(message.to_string()),
    }
}

fn id_only(item: &Item) -> Item {
    match item {
        Item::Contact(_) => Item::Contact(ContactItem::default()),
        Item::AbchPerson(_) => Item::AbchPerson(AbchPersonItem::default()),
    }
}

fn strip_2013_fields(contact: &mut ContactItem) {
    contact.account_name = None;
    contact.is_auto_update_disabled = None;
    contact.comment = None;
    contact.gender = None;
    contact.source_id = None;
    contact.urls.clear();
    contact.cid = None;
    contact.skype_id = None;
    contact.yomi_nickname = None;
}

/// Fill in `CompleteName` and, unless the mapping is `None`, `FileAs`.
fn compute_names(contact: &mut ContactItem) {
    let mapping = contact.file_as_mapping.unwrap_or(FileAsMapping::None);
    if mapping != FileAsMapping::None {
        contact.file_as = file_as(contact, mapping);
    }
    contact.file_as_mapping = Some(mapping);

    let full_name = join(
        " ",
        &[
            contact.given_name.as_deref(),
            contact.middle_name.as_deref(),
            contact.surname.as_deref(),
            contact.generation.as_deref(),
        ],
    );
    contact.complete_name = Some(CompleteName {
        first_name: contact.given_name.clone(),
        middle_name: contact.middle_name.clone(),
        last_name: contact.surname.clone(),
        suffix: contact.generation.clone(),
        initials: contact.initials.clone(),
        full_name,
        nickname: contact.nickname.clone(),
    });
}

/// `FileAs` derived from the name parts as `mapping` prescribes.
fn file_as(contact: &ContactItem, mapping: FileAsMapping) -> Option<String> {
    let first = contact.given_name.as_deref();
    let middle = contact.middle_name.as_deref();
    let last = contact.surname.as_deref();
    let suffix = contact.generation.as_deref();
    let company = contact.company_name.as_deref();

    let last_comma_first = join(", ", &[last, first]);
    let last_first = join("", &[last, first]);
    let last_space_first = join(" ", &[last, first]);
    let with_company = |name: Option<String>| join(" ", &[name.as_deref(), company]);
    let company_then = |name: Option<String>| join(" ", &[company, name.as_deref()]);

    match mapping {
        FileAsMapping::None => contact.file_as.clone(),
        FileAsMapping::LastCommaFirst => last_comma_first,
        FileAsMapping::FirstSpaceLast => join(" ", &[first, last]),
        FileAsMapping::Company => company.map(str::to_string),
        FileAsMapping::LastCommaFirstCompany => with_company(last_comma_first),
        FileAsMapping::CompanyLastFirst => company_then(last_first),
        FileAsMapping::LastFirst => last_first,
        FileAsMapping::LastFirstCompany => with_company(last_first),
        FileAsMapping::CompanyLastCommaFirst => company_then(last_comma_first),
        FileAsMapping::LastFirstSuffix => join(" ", &[last_first.as_deref(), suffix]),
        FileAsMapping::LastSpaceFirstCompany => with_company(last_space_first),
        FileAsMapping::CompanyLastSpaceFirst => company_then(last_space_first),
        FileAsMapping::LastSpaceFirst => last_space_first,
        FileAsMapping::DisplayName => contact.display_name.clone(),
        FileAsMapping::FirstName => first.map(str::to_string),
        FileAsMapping::LastFirstMiddleSuffix => join(" ", &[last, first, middle, suffix]),
        FileAsMapping::LastName => last.map(str::to_string),
        FileAsMapping::Empty => Some(String::new()),
    }
}

/// Non-empty parts joined by `separator`; `None` when every part is empty.
fn join(separator: &str, parts: &[Option<&str>]) -> Option<String> {
    let present: Vec<&str> = parts
        .iter()
        .flatten()
        .copied()
        .filter(|p| !p.is_empty())
        .collect();
    (!present.is_empty()).then(|| present.join(separator))
}

/// Overwrites every element present in `$from` on `$to`.
macro_rules! overlay {
    ($to:expr, $from:expr; options: $($opt:ident),+; lists: $($list:ident),+ $(,)?) => {
        $(
            if $from.$opt.is_some() {
                $to.$opt = $from.$opt.clone();
            }
        )+
        $(
            if !$from.$list.is_empty() {
                $to.$list = $from.$list.clone();
            }
        )+
    };
}

fn apply_change(item: &mut Item, change: &ItemChange) -> Result<(), ResponseMessage> {
    let Item::Contact(contact) = item else {
        return Err(ResponseMessage::error(
            ResponseCode::ErrorInvalidPropertySet,
            "Only contact items can be updated with contact properties.",
        ));
    };
    let set = &change.set;
    if set.has_picture.is_some() || set.complete_name.is_some() {
        return Err(ResponseMessage::error(
            ResponseCode::ErrorInvalidPropertySet,
            "The property is read-only.",
        ));
    }
    overlay!(contact, set;
        options: subject, importance, sensitivity, culture, file_as, file_as_mapping,
            display_name, given_name, initials, middle_name, nickname, company_name,
            assistant_name, birthday, business_home_page, contact_source, department,
            generation, job_title, manager, mileage, office_location, postal_address_index,
            profession, spouse_name, surname, wedding_anniversary, account_name,
            is_auto_update_disabled, comment, gender, source_id, cid, skype_id, yomi_nickname;
        lists: categories, email_addresses, physical_addresses, phone_numbers, im_addresses,
            children, companies, urls,
    );
    for field in &change.delete {
        match field {
            ContactField::JobTitle => contact.job_title = None,
            ContactField::Department => contact.department = None,
            ContactField::Nickname => contact.nickname = None,
            ContactField::CompanyName => contact.company_name = None,
            ContactField::Manager => contact.manager = None,
            ContactField::OfficeLocation => contact.office_location = None,
        }
    }
    compute_names(contact);
    Ok(())
}
