use async_trait::async_trait;
use protocheck_harness::{ProtocolFault, UserAuthentication};

use crate::messages::{
    CreateContentTypeRequest, SuccessResponse, UpdateColumnsRequest, UpdateColumnsResponse,
    UpdateContentTypeRequest, UpdateContentTypeResponse,
};
use crate::types::{
    ActivatedFeatures, ContentType, ContentTypeSummary, CustomizedPageStatus, FieldDefinition,
    ListTemplate, ObjectId, ObjectKind, WebDefinition,
};

/// Result of one protocol operation.
pub type AdapterResult<T> = Result<T, ProtocolFault>;

/// The MS-WEBSS operation surface, one method per SOAP operation, bound to
/// a context site.
///
/// Errors the protocol reports as SOAP faults surface as
/// [`ProtocolFault::Soap`]; an unauthenticated caller gets
/// [`ProtocolFault::Http`] with status 401. Per-method failures inside
/// `UpdateContentType` and `UpdateColumns` are not faults: they are reported
/// in the method results.
#[async_trait]
pub trait WebsAdapter: Send + Sync {
    /// Select the credentials subsequent calls present.
    async fn initialize_service(&self, auth: UserAuthentication);

    /// Returns the id of the new content type.
    async fn create_content_type(&self, request: &CreateContentTypeRequest)
        -> AdapterResult<String>;

    /// `None` sends no `contentTypeId` element.
    async fn get_content_type(&self, content_type_id: Option<&str>) -> AdapterResult<ContentType>;

    async fn get_content_types(&self) -> AdapterResult<Vec<ContentTypeSummary>>;

    async fn update_content_type(
        &self,
        request: &UpdateContentTypeRequest,
    ) -> AdapterResult<UpdateContentTypeResponse>;

    async fn delete_content_type(&self, content_type_id: &str) -> AdapterResult<SuccessResponse>;

    /// Add or replace the XML document whose root namespace matches
    /// `document`'s.
    async fn update_content_type_xml_document(
        &self,
        content_type_id: &str,
        document: &str,
    ) -> AdapterResult<SuccessResponse>;

    async fn remove_content_type_xml_document(
        &self,
        content_type_id: &str,
        document_uri: &str,
    ) -> AdapterResult<SuccessResponse>;

    async fn get_columns(&self) -> AdapterResult<Vec<FieldDefinition>>;

    async fn update_columns(
        &self,
        request: &UpdateColumnsRequest,
    ) -> AdapterResult<UpdateColumnsResponse>;

    async fn customize_css(&self, css_file: &str) -> AdapterResult<()>;

    /// `None` sends no `cssFile` element.
    async fn revert_css(&self, css_file: Option<&str>) -> AdapterResult<()>;

    /// `None` sends no `fileUrl` element.
    async fn revert_file_content_stream(&self, file_url: Option<&str>) -> AdapterResult<()>;

    async fn revert_all_file_content_streams(&self) -> AdapterResult<()>;

    async fn get_customized_page_status(&self, file_url: &str)
        -> AdapterResult<CustomizedPageStatus>;

    async fn get_object_id_from_url(&self, object_url: &str) -> AdapterResult<ObjectId>;

    async fn get_activated_features(&self) -> AdapterResult<ActivatedFeatures>;

    /// `None` sends no `webUrl` element.
    async fn get_web(&self, web_url: Option<&str>) -> AdapterResult<WebDefinition>;

    /// Immediate child sites of the context site.
    async fn get_web_collection(&self) -> AdapterResult<Vec<WebDefinition>>;

    /// Every site in the site collection.
    async fn get_all_sub_web_collection(&self) -> AdapterResult<Vec<WebDefinition>>;

    async fn get_list_templates(&self) -> AdapterResult<Vec<ListTemplate>>;

    async fn web_url_from_page_url(&self, page_url: &str) -> AdapterResult<String>;
}

/// Out-of-band access to the server under test, used to set up
/// preconditions and to read values the protocol does not expose.
#[async_trait]
pub trait SutControlAdapter: Send + Sync {
    /// Mark the content type titled `title` on site `site` read-only and/or
    /// sealed.
    async fn set_content_type_read_only_or_sealed(
        &self,
        site: &str,
        title: &str,
        read_only: bool,
        sealed: bool,
    ) -> AdapterResult<()>;

    /// Server-side id of the configured list or list item on `site`.
    async fn get_object_id(&self, site: &str, kind: ObjectKind) -> AdapterResult<Option<String>>;
}

/// Everything the MS-WEBSS suite needs from a server binding.
pub trait WebsServer: WebsAdapter + SutControlAdapter {}

impl<T: WebsAdapter + SutControlAdapter> WebsServer for T {}
