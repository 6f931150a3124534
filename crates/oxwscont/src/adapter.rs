use async_trait::async_trait;
use protocheck_harness::{ProtocolFault, UserAuthentication};

use crate::messages::{
    CopyItemRequest, CreateItemRequest, DeleteItemRequest, FindItemRequest, GetItemRequest,
    GetUserPhotoRequest, GetUserPhotoResponse, ItemsResponse, MoveItemRequest,
    SetUserPhotoRequest, SetUserPhotoResponse, UpdateItemRequest,
};

/// Result of one protocol operation.
pub type AdapterResult<T> = Result<T, ProtocolFault>;

/// The MS-OXWSCONT operation surface a server (or a client stub talking to
/// one) must provide to run the suite. One method per SOAP operation.
///
/// Batch operations return one response message per requested item; a
/// failed slot is not a fault. Faults are reserved for whole-request
/// failures (SOAP faults, HTTP 401). The photo operations are single-item:
/// a non-success response code surfaces as [`ProtocolFault::Item`].
#[async_trait]
pub trait ContactsAdapter: Send + Sync {
    /// Select the credentials subsequent calls present.
    async fn initialize_service(&self, auth: UserAuthentication);

    async fn create_item(&self, request: &CreateItemRequest) -> AdapterResult<ItemsResponse>;

    async fn get_item(&self, request: &GetItemRequest) -> AdapterResult<ItemsResponse>;

    async fn delete_item(&self, request: &DeleteItemRequest) -> AdapterResult<ItemsResponse>;

    async fn update_item(&self, request: &UpdateItemRequest) -> AdapterResult<ItemsResponse>;

    async fn move_item(&self, request: &MoveItemRequest) -> AdapterResult<ItemsResponse>;

    async fn copy_item(&self, request: &CopyItemRequest) -> AdapterResult<ItemsResponse>;

    /// Items in a folder; a single response message.
    async fn find_item(&self, request: &FindItemRequest) -> AdapterResult<ItemsResponse>;

    async fn set_user_photo(
        &self,
        request: &SetUserPhotoRequest,
    ) -> AdapterResult<SetUserPhotoResponse>;

    async fn get_user_photo(
        &self,
        request: &GetUserPhotoRequest,
    ) -> AdapterResult<GetUserPhotoResponse>;

    /// Whether the last response conformed to the protocol schema.
    fn schema_validated(&self) -> bool {
        true
    }
}
