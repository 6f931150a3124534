//! Request and response shapes of the MS-OXWSCONT operations.

use protocheck_harness::ObjectIdSource;

use crate::types::{
    BaseShape, ContactField, ContactItem, DisposalType, DistinguishedFolderId, Item, ItemId,
    ResponseClass, ResponseCode, UserPhotoSize,
};

#[derive(Debug, Clone)]
pub struct CreateItemRequest {
    pub saved_item_folder: DistinguishedFolderId,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone)]
pub struct GetItemRequest {
    pub shape: BaseShape,
    pub item_ids: Vec<ItemId>,
}

#[derive(Debug, Clone)]
pub struct DeleteItemRequest {
    pub item_ids: Vec<ItemId>,
    pub disposal: DisposalType,
}

/// Changes to one item: fields present in `set` are overwritten, fields in
/// `delete` are removed.
#[derive(Debug, Clone)]
pub struct ItemChange {
    pub item_id: ItemId,
    pub set: ContactItem,
    pub delete: Vec<ContactField>,
}

#[derive(Debug, Clone)]
pub struct UpdateItemRequest {
    pub changes: Vec<ItemChange>,
}

#[derive(Debug, Clone)]
pub struct MoveItemRequest {
    pub to_folder: DistinguishedFolderId,
    pub item_ids: Vec<ItemId>,
}

#[derive(Debug, Clone)]
pub struct CopyItemRequest {
    pub to_folder: DistinguishedFolderId,
    pub item_ids: Vec<ItemId>,
}

#[derive(Debug, Clone)]
pub struct FindItemRequest {
    pub parent_folder: DistinguishedFolderId,
    pub shape: BaseShape,
}

#[derive(Debug, Clone)]
pub struct SetUserPhotoRequest {
    pub email: String,
    /// Base64-encoded image.
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct GetUserPhotoRequest {
    pub email: String,
    pub size: UserPhotoSize,
}

/// One slot of a batch response; slots succeed or fail independently.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseMessage {
    pub class: ResponseClass,
    pub code: ResponseCode,
    pub message_text: Option<String>,
    pub items: Vec<Item>,
}

impl ResponseMessage {
    pub fn success(items: Vec<Item>) -> Self {
        Self {
            class: ResponseClass::Success,
            code: ResponseCode::NoError,
            message_text: None,
            items,
        }
    }

    pub fn error(code: ResponseCode, text: impl Into<String>) -> Self {
        Self {
            class: ResponseClass::Error,
            code,
            message_text: Some(text.into()),
            items: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.class == ResponseClass::Success && self.code == ResponseCode::NoError
    }
}

/// Response of every item operation (create, get, update, move, copy,
/// delete, find): one message per requested item.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemsResponse {
    pub messages: Vec<ResponseMessage>,
}

impl ItemsResponse {
    /// Ids of the items returned in successful slots, in slot order.
    pub fn item_ids(&self) -> Vec<ItemId> {
        self.messages
            .iter()
            .filter(|m| m.is_success())
            .flat_map(|m| m.items.iter().filter_map(Item::item_id).cloned())
            .collect()
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.messages.iter().flat_map(|m| m.items.iter())
    }

    pub fn contacts(&self) -> Vec<&ContactItem> {
        self.items().filter_map(Item::as_contact).collect()
    }
}

impl ObjectIdSource<ItemId> for ItemsResponse {
    fn object_ids(&self) -> Vec<ItemId> {
        self.item_ids()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetUserPhotoResponse {
    pub class: ResponseClass,
    pub code: ResponseCode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetUserPhotoResponse {
    pub class: ResponseClass,
    pub code: ResponseCode,
    /// Whether the photo changed since the caller's last fetch.
    pub has_changed: bool,
    /// Base64-encoded image, absent when unchanged.
    pub picture_data: Option<String>,
}
