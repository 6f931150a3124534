//! An in-memory SharePoint site collection serving the MS-WEBSS operations
//! and the SUT control channel.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use protocheck_harness::names::new_guid;
use protocheck_harness::{ConfigError, ProtocolFault, SoapFault, SuiteConfig, UserAuthentication};
use protocheck_webss::messages::{
    CreateContentTypeRequest, SuccessResponse, UpdateColumnsRequest, UpdateColumnsResponse,
    UpdateContentTypeRequest, UpdateContentTypeResponse,
};
use protocheck_webss::types::{
    error_codes, is_content_type_id, ActivatedFeatures, ContentType, ContentTypeSummary,
    CustomizedPageStatus, FieldDefinition, FieldMethod, ListProperties, ListTemplate,
    MethodResult, ObjectId, ObjectKind, WebDefinition, XmlDocument,
};
use protocheck_webss::{AdapterResult, SutControlAdapter, WebsAdapter};
use tokio::sync::Mutex;

use crate::profile::{Quirk, ServerProfile};
use crate::session::Credentials;

const SERVER_EXCEPTION: &str =
    "Exception of type 'Microsoft.SharePoint.SoapServer.SoapServerException' was thrown.";

/// Characters a content type name may not contain.
const INVALID_NAME_CHARS: &str = "\t\\/:*?\"#%<>{}|~&,";

const MAX_NAME_LEN: usize = 128;

const CUSTOM_GROUP: &str = "Custom Content Types";

const SITE_FEATURES: &[&str] = &[
    "00bfea71-4ea5-48d4-a4ad-305cf7030140",
    "00bfea71-e717-4e80-aa17-d0c71b360101",
    "fde5d850-671e-4143-950a-87b473922dc7",
];

const SITE_COLLECTION_FEATURES: &[&str] = &[
    "695b6570-a48b-4a8e-8ea5-26ea7fc1d162",
    "ca7bd552-10b1-4563-85b9-5ed1d39c962a",
];

/// `(name, display name, template type, base type)`.
const LIST_TEMPLATES: &[(&str, &str, i32, i32)] = &[
    ("custlist", "Custom List", 100, 0),
    ("doclib", "Document Library", 101, 1),
    ("links", "Links", 103, 0),
    ("announce", "Announcements", 104, 0),
    ("contacts", "Contacts", 105, 0),
    ("tasks", "Tasks", 107, 0),
];

/// The sites and URLs of the collection, fixed at construction.
#[derive(Debug, Clone)]
struct SiteLayout {
    web_site_name: String,
    server_root: String,
    root_web: WebDefinition,
    sub_web: WebDefinition,
    /// Stylesheets in the central location, lowercase.
    css_files: Vec<String>,
    /// Pages provisioned from the site definition, normalized.
    pages: Vec<String>,
    uploaded_document: String,
    list_url: String,
    list_item_url: String,
    no_list_url: String,
    parent_content_type: String,
}

impl SiteLayout {
    fn from_config(config: &SuiteConfig) -> Result<Self, ConfigError> {
        let site_collection = config.property("SiteCollectionUrl")?;
        let sub_site = config.property("SubSiteUrl")?;
        let language = config.property("TestSiteLanguage")?;
        let web_site_name = config.property("WebSiteName")?;
        let valid_page = config.property("RevertFileContentStream_ValidFileUrl")?;
        let css = config.property("CssFile_Valid")?;

        Ok(Self {
            server_root: format!(
                "{}://{}",
                config.property("TransportType")?.to_lowercase(),
                config.property("SutComputerName")?.to_lowercase()
            ),
            root_web: WebDefinition {
                title: web_site_name.clone(),
                url: site_collection.clone(),
                description: Some(String::new()),
                language: Some(language.clone()),
                theme: None,
            },
            sub_web: WebDefinition {
                title: config.property("TestSiteTitle")?,
                url: sub_site.clone(),
                description: Some(config.property("TestSiteDescription")?),
                language: Some(language),
                theme: None,
            },
            web_site_name,
            css_files: vec![css.to_lowercase(), "core.css".to_string()],
            pages: vec![
                normalize(&valid_page),
                normalize(&format!("{}/default.aspx", sub_site)),
                normalize(&format!("{}/default.aspx", site_collection)),
            ],
            uploaded_document: normalize(&format!(
                "{}/{}/{}",
                sub_site,
                config.property("FoldName")?,
                config.property("DocName")?
            )),
            list_url: normalize(&config.property("GetObjectIdFromUrl_ListUrl")?),
            list_item_url: normalize(&config.property("GetObjectIdFromUrl_ListItemUrl")?),
            no_list_url: normalize(&config.property("GetObjectIdFromUrl_NoListRelatedUrl")?),
            parent_content_type: config.property("CreateContentType_ValidateContentType")?,
        })
    }

    fn webs(&self) -> [&WebDefinition; 2] {
        [&self.root_web, &self.sub_web]
    }

    fn is_page(&self, url: &str) -> bool {
        self.pages.contains(&normalize(url))
    }

    fn alternate_urls(&self) -> String {
        format!("{}/,{}/", self.server_root, self.root_web.url)
    }
}

#[derive(Debug, Clone)]
struct StoredContentType {
    id: String,
    display_name: String,
    name: String,
    description: Option<String>,
    group: String,
    version: i32,
    fields: Vec<FieldDefinition>,
    xml_documents: Vec<XmlDocument>,
    read_only: bool,
    sealed: bool,
    built_in: bool,
}

impl StoredContentType {
    fn built_in(id: &str, name: &str, description: Option<&str>, fields: Vec<FieldDefinition>) -> Self {
        Self {
            id: id.to_string(),
            display_name: name.to_string(),
            name: name.to_string(),
            description: description.map(str::to_string),
            group: "List Content Types".to_string(),
            version: 0,
            fields,
            xml_documents: Vec::new(),
            read_only: false,
            sealed: false,
            built_in: true,
        }
    }

    fn has_name(&self, name: &str) -> bool {
        self.display_name.eq_ignore_ascii_case(name) || self.name.eq_ignore_ascii_case(name)
    }

    fn summary(&self, scope: &str) -> ContentTypeSummary {
        ContentTypeSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            group: Some(self.group.clone()),
            scope: scope.to_string(),
            version: self.version,
        }
    }

    fn definition(&self) -> ContentType {
        ContentType {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            group: Some(self.group.clone()),
            version: self.version,
            fields: self.fields.clone(),
            xml_documents: self.xml_documents.clone(),
        }
    }

    fn list_properties(&self) -> ListProperties {
        ListProperties {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            group: Some(self.group.clone()),
            feature_id: Some(format!("{{{}}}", SITE_FEATURES[0])),
            version: self.version,
            locs: Some(true),
            read_only: Some(true),
            sealed: Some(true),
            require_client_rendering_on_new: Some(false),
        }
    }
}

#[derive(Debug)]
struct SharePointStore {
    content_types: Vec<StoredContentType>,
    columns: Vec<FieldDefinition>,
    customized_css: BTreeSet<String>,
    customized_pages: BTreeSet<String>,
    list_id: String,
}

impl SharePointStore {
    fn new(layout: &SiteLayout) -> Self {
        let title = title_column();
        let mut content_types = vec![
            StoredContentType::built_in(
                "0x01",
                "Item",
                Some("Create a new list item."),
                vec![title.clone()],
            ),
            StoredContentType::built_in(
                "0x0101",
                "Document",
                Some("Create a new document."),
                vec![title.clone()],
            ),
            StoredContentType::built_in("0x0120", "Folder", Some("Create a new folder."), vec![title.clone()]),
        ];
        let parent = &layout.parent_content_type;
        if !content_types.iter().any(|ct| ct.id.eq_ignore_ascii_case(parent)) {
            content_types.push(StoredContentType::built_in(
                parent,
                &format!("Parent {}", parent),
                None,
                vec![title.clone()],
            ));
        }
        Self {
            content_types,
            columns: vec![title],
            customized_css: BTreeSet::new(),
            // The configured page starts out edited so that reverting it is
            // observable.
            customized_pages: layout.pages.iter().take(1).cloned().collect(),
            list_id: new_guid(),
        }
    }

    fn content_type(&self, id: &str) -> Option<&StoredContentType> {
        self.content_types
            .iter()
            .find(|ct| ct.id.eq_ignore_ascii_case(id))
    }

    fn content_type_mut(&mut self, id: &str) -> Option<&mut StoredContentType> {
        self.content_types
            .iter_mut()
            .find(|ct| ct.id.eq_ignore_ascii_case(id))
    }
}

/// In-memory site collection with one subsite, configured from the suite
/// properties.
///
/// Sessions created with [`InMemorySharePoint::session`] share the site
/// collection but hold their own credentials.
#[derive(Debug)]
pub struct InMemorySharePoint {
    store: Arc<Mutex<SharePointStore>>,
    credentials: Credentials,
    profile: Arc<ServerProfile>,
    layout: Arc<SiteLayout>,
}

impl InMemorySharePoint {
    pub fn new(config: &SuiteConfig, profile: ServerProfile) -> Result<Self, ConfigError> {
        let layout = SiteLayout::from_config(config)?;
        Ok(Self {
            store: Arc::new(Mutex::new(SharePointStore::new(&layout))),
            credentials: Credentials::new(),
            profile: Arc::new(profile),
            layout: Arc::new(layout),
        })
    }

    /// Another connection to the same site collection.
    pub fn session(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            credentials: Credentials::new(),
            profile: Arc::clone(&self.profile),
            layout: Arc::clone(&self.layout),
        }
    }

    pub fn profile(&self) -> &ServerProfile {
        &self.profile
    }

    /// Ids of the content types that are not built in.
    pub async fn custom_content_types(&self) -> Vec<String> {
        let store = self.store.lock().await;
        store
            .content_types
            .iter()
            .filter(|ct| !ct.built_in)
            .map(|ct| ct.id.clone())
            .collect()
    }

    /// Names of the site columns.
    pub async fn column_names(&self) -> Vec<String> {
        let store = self.store.lock().await;
        store.columns.iter().filter_map(|c| c.name.clone()).collect()
    }

    /// Stylesheets currently customized, lowercase.
    pub async fn customized_css(&self) -> Vec<String> {
        let store = self.store.lock().await;
        store.customized_css.iter().cloned().collect()
    }

    /// Edit a site definition page so that it no longer matches its
    /// definition. Returns `false` for URLs that are not such pages.
    pub async fn customize_page(&self, url: &str) -> bool {
        if !self.layout.is_page(url) {
            return false;
        }
        self.store.lock().await.customized_pages.insert(normalize(url));
        true
    }
}

#[async_trait]
impl WebsAdapter for InMemorySharePoint {
    async fn initialize_service(&self, auth: UserAuthentication) {
        self.credentials.set(auth);
    }

    async fn create_content_type(
        &self,
        request: &CreateContentTypeRequest,
    ) -> AdapterResult<String> {
        self.credentials.check(&self.profile)?;
        if !is_content_type_id(&request.parent_type) {
            return Err(fault(
                error_codes::FAIL,
                format!("{} is not a valid content type id.", request.parent_type),
            ));
        }
        let mut store = self.store.lock().await;
        let parent = store
            .content_type(&request.parent_type)
            .ok_or_else(|| {
                fault(
                    error_codes::FAIL,
                    format!("The content type {} is not on this site.", request.parent_type),
                )
            })?
            .clone();
        if !self.profile.has(Quirk::AcceptInvalidContentTypeNames) {
            validate_display_name(&request.display_name)
                .map_err(|text| fault(error_codes::FAIL, text))?;
        }
        let name = request
            .properties
            .title
            .clone()
            .unwrap_or_else(|| request.display_name.clone());
        if store
            .content_types
            .iter()
            .any(|ct| ct.has_name(&request.display_name) || ct.has_name(&name))
        {
            return Err(fault(
                error_codes::FAIL,
                format!(
                    "A content type named {} already exists on this site.",
                    request.display_name
                ),
            ));
        }

        let id = format!(
            "{}00{}",
            parent.id,
            new_guid().replace('-', "").to_uppercase()
        );
        let mut fields = parent.fields;
        for method in &request.new_fields {
            let mut field = method.field.clone();
            field.id.get_or_insert_with(new_guid);
            fields.push(field);
        }
        store.content_types.push(StoredContentType {
            id: id.clone(),
            display_name: request.display_name.clone(),
            name,
            description: request.properties.description.clone(),
            group: CUSTOM_GROUP.to_string(),
            version: 0,
            fields,
            xml_documents: Vec::new(),
            read_only: false,
            sealed: false,
            built_in: false,
        });
        debug!("CreateContentType: {} under {}", id, parent.id);
        Ok(id)
    }

    async fn get_content_type(&self, content_type_id: Option<&str>) -> AdapterResult<ContentType> {
        self.credentials.check(&self.profile)?;
        let id = required(content_type_id, "contentTypeId")?;
        let store = self.store.lock().await;
        store
            .content_type(id)
            .map(StoredContentType::definition)
            .ok_or_else(|| unknown_content_type(id))
    }

    async fn get_content_types(&self) -> AdapterResult<Vec<ContentTypeSummary>> {
        self.credentials.check(&self.profile)?;
        let store = self.store.lock().await;
        let scope = &self.layout.root_web.url;
        Ok(store
            .content_types
            .iter()
            .map(|ct| ct.summary(scope))
            .collect())
    }

    async fn update_content_type(
        &self,
        request: &UpdateContentTypeRequest,
    ) -> AdapterResult<UpdateContentTypeResponse> {
        self.credentials.check(&self.profile)?;
        let stale = self.profile.has(Quirk::StaleContentTypeVersions);
        let mut store = self.store.lock().await;
        let content_type = store
            .content_type_mut(&request.content_type_id)
            .ok_or_else(|| unknown_content_type(&request.content_type_id))?;
        if content_type.read_only {
            return Err(fault(
                error_codes::FAIL,
                format!("The content type {} is read-only.", content_type.id),
            ));
        }
        if let Some(title) = &request.properties.title {
            content_type.name = title.clone();
        }
        if let Some(description) = &request.properties.description {
            content_type.description = Some(description.clone());
        }

        let fields = &mut content_type.fields;
        let mut methods = Vec::new();
        for method in &request.new_fields {
            methods.push(add_content_type_field(fields, method));
        }
        for method in &request.update_fields {
            methods.push(match find_field(fields, &method.field) {
                Some(i) => {
                    let field = &mut fields[i];
                    merge_field(field, &method.field);
                    MethodResult::succeeded(&method.id)
                }
                None => field_not_found(method),
            });
        }
        for method in &request.delete_fields {
            methods.push(match find_field(fields, &method.field) {
                Some(i) => {
                    fields.remove(i);
                    MethodResult::succeeded(&method.id)
                }
                None => field_not_found(method),
            });
        }
        if !stale {
            content_type.version += 1;
        }
        debug!(
            "UpdateContentType: {} version {}",
            content_type.id, content_type.version
        );
        Ok(UpdateContentTypeResponse {
            methods,
            list_properties: content_type.list_properties(),
        })
    }

    async fn delete_content_type(&self, content_type_id: &str) -> AdapterResult<SuccessResponse> {
        self.credentials.check(&self.profile)?;
        let id = required(Some(content_type_id), "contentTypeId")?;
        let mut store = self.store.lock().await;
        let index = store
            .content_types
            .iter()
            .position(|ct| ct.id.eq_ignore_ascii_case(id))
            .ok_or_else(|| unknown_content_type(id))?;
        let content_type = &store.content_types[index];
        if content_type.read_only || content_type.built_in {
            return Err(fault(
                error_codes::FAIL,
                format!("The content type {} cannot be deleted.", content_type.id),
            ));
        }
        store.content_types.remove(index);
        debug!("DeleteContentType: {}", id);
        Ok(SuccessResponse::ok())
    }

    async fn update_content_type_xml_document(
        &self,
        content_type_id: &str,
        document: &str,
    ) -> AdapterResult<SuccessResponse> {
        self.credentials.check(&self.profile)?;
        let id = required(Some(content_type_id), "contentTypeId")?;
        let namespace = root_namespace(document).ok_or_else(|| {
            fault(
                error_codes::FAIL,
                "The document is not well-formed XML with a namespace on its root element.",
            )
        })?;
        let mut store = self.store.lock().await;
        let content_type = store
            .content_type_mut(id)
            .ok_or_else(|| unknown_content_type(id))?;
        content_type
            .xml_documents
            .retain(|d| d.namespace_uri != namespace);
        content_type.xml_documents.push(XmlDocument {
            namespace_uri: namespace.clone(),
            content: document.to_string(),
        });
        debug!("UpdateContentTypeXmlDocument: {} {}", id, namespace);
        Ok(SuccessResponse::ok())
    }

    async fn remove_content_type_xml_document(
        &self,
        content_type_id: &str,
        document_uri: &str,
    ) -> AdapterResult<SuccessResponse> {
        self.credentials.check(&self.profile)?;
        let id = required(Some(content_type_id), "contentTypeId")?;
        let mut store = self.store.lock().await;
        let content_type = store
            .content_type_mut(id)
            .ok_or_else(|| unknown_content_type(id))?;
        content_type
            .xml_documents
            .retain(|d| d.namespace_uri != document_uri);
        debug!("RemoveContentTypeXmlDocument: {} {}", id, document_uri);
        Ok(SuccessResponse::ok())
    }

    async fn get_columns(&self) -> AdapterResult<Vec<FieldDefinition>> {
        self.credentials.check(&self.profile)?;
        let store = self.store.lock().await;
        if let Some(broken) = store.columns.iter().find(|c| c.field_type.is_none()) {
            return Err(fault(
                error_codes::FAIL,
                format!(
                    "The column {} has no type.",
                    broken.name.as_deref().unwrap_or_default()
                ),
            ));
        }
        Ok(store.columns.clone())
    }

    async fn update_columns(
        &self,
        request: &UpdateColumnsRequest,
    ) -> AdapterResult<UpdateColumnsResponse> {
        self.credentials.check(&self.profile)?;
        for (collection, methods) in [
            ("newFields", &request.new_fields),
            ("updateFields", &request.update_fields),
            ("deleteFields", &request.delete_fields),
        ] {
            if methods.len() > 1 {
                return Err(fault(
                    error_codes::FAIL,
                    format!("{} contains more than one Method element.", collection),
                ));
            }
        }

        let mut store = self.store.lock().await;
        let columns = &mut store.columns;
        let new_fields = request
            .new_fields
            .iter()
            .map(|method| add_column(columns, method))
            .collect();
        let update_fields = request
            .update_fields
            .iter()
            .map(|method| update_column(columns, method))
            .collect();
        let delete_fields = request
            .delete_fields
            .iter()
            .map(|method| {
                if method.field.id.is_none() && method.field.name.is_none() {
                    return MethodResult::failed(
                        &method.id,
                        error_codes::FAIL,
                        "The field has neither an ID nor a Name.",
                    );
                }
                match find_field(columns, &method.field) {
                    Some(i) => {
                        columns.remove(i);
                        MethodResult::succeeded(&method.id)
                    }
                    None => field_not_found(method),
                }
            })
            .collect();
        let response = UpdateColumnsResponse {
            new_fields,
            update_fields,
            delete_fields,
        };
        debug!(
            "UpdateColumns: {} of {} methods succeeded",
            response.all().filter(|m| m.is_success()).count(),
            response.all().count()
        );
        Ok(response)
    }

    async fn customize_css(&self, css_file: &str) -> AdapterResult<()> {
        self.credentials.check(&self.profile)?;
        let file = css_file.trim();
        if file.is_empty() {
            return Err(fault(
                error_codes::BLANK_OR_MISSING,
                "Blank cssFile specified, or cssFile element missing.",
            ));
        }
        if file.contains('*') {
            return Err(fault(
                error_codes::ASTERISK_IN_NAME,
                "The cssFile value contains an asterisk (*).",
            ));
        }
        let extension = match file.rsplit_once('.') {
            Some((stem, extension)) if !stem.is_empty() && !extension.is_empty() => extension,
            _ => {
                return Err(fault(
                    error_codes::NO_EXTENSION,
                    "The specified cssFile has no file extension.",
                ))
            }
        };
        if !extension.eq_ignore_ascii_case("css") {
            return Err(fault(
                error_codes::FILE_NOT_FOUND,
                format!("{} must name a stylesheet with the extension \".css\".", file),
            ));
        }
        let lower = file.to_lowercase();
        if !self.layout.css_files.contains(&lower) {
            return Err(fault(
                error_codes::FILE_NOT_FOUND,
                format!("{} does not exist on the server.", file),
            ));
        }
        self.store.lock().await.customized_css.insert(lower);
        debug!("CustomizeCss: {}", file);
        Ok(())
    }

    /// Reverting a file that is not customized, or does not exist, succeeds
    /// without changing anything.
    async fn revert_css(&self, css_file: Option<&str>) -> AdapterResult<()> {
        self.credentials.check(&self.profile)?;
        let file = css_file.map(str::trim).filter(|f| !f.is_empty()).ok_or_else(|| {
            fault(
                error_codes::BLANK_OR_MISSING,
                "Blank or null cssFile specified.",
            )
        })?;
        let removed = self
            .store
            .lock()
            .await
            .customized_css
            .remove(&file.to_lowercase());
        debug!("RevertCss: {} (customized: {})", file, removed);
        Ok(())
    }

    async fn revert_file_content_stream(&self, file_url: Option<&str>) -> AdapterResult<()> {
        self.credentials.check(&self.profile)?;
        let url = file_url.map(str::trim).filter(|u| !u.is_empty()).ok_or_else(|| {
            fault(
                error_codes::BLANK_OR_MISSING,
                "The fileUrl element is blank or missing.",
            )
        })?;
        if normalize(url) == self.layout.uploaded_document {
            return Err(fault(
                error_codes::NO_EXTENSION,
                format!("{} is not part of a site definition.", url),
            ));
        }
        if !self.layout.is_page(url) {
            return Err(fault(
                error_codes::FILE_NOT_FOUND,
                format!(
                    "{}: {} is not a page of the context site.",
                    error_codes::FILE_NOT_FOUND,
                    url
                ),
            ));
        }
        self.store
            .lock()
            .await
            .customized_pages
            .remove(&normalize(url));
        debug!("RevertFileContentStream: {}", url);
        Ok(())
    }

    async fn revert_all_file_content_streams(&self) -> AdapterResult<()> {
        self.credentials.check(&self.profile)?;
        let mut store = self.store.lock().await;
        debug!(
            "RevertAllFileContentStreams: {} pages",
            store.customized_pages.len()
        );
        store.customized_pages.clear();
        Ok(())
    }

    async fn get_customized_page_status(
        &self,
        file_url: &str,
    ) -> AdapterResult<CustomizedPageStatus> {
        self.credentials.check(&self.profile)?;
        let url = normalize(file_url);
        if url == self.layout.uploaded_document {
            return Ok(CustomizedPageStatus::None);
        }
        if !self.layout.is_page(&url) {
            return Err(fault(
                error_codes::FILE_NOT_FOUND,
                format!("{} does not exist.", file_url),
            ));
        }
        let store = self.store.lock().await;
        Ok(if store.customized_pages.contains(&url) {
            CustomizedPageStatus::Customized
        } else {
            CustomizedPageStatus::Uncustomized
        })
    }

    async fn get_object_id_from_url(&self, object_url: &str) -> AdapterResult<ObjectId> {
        self.credentials.check(&self.profile)?;
        if !self.profile.object_ids {
            return Err(SoapFault::client(
                "Server did not recognize the value of HTTP Header SOAPAction: GetObjectIdFromUrl.",
            )
            .into());
        }
        let url = normalize(object_url);
        let layout = &self.layout;
        let list_id = self.store.lock().await.list_id.clone();
        let in_list = |list_item: bool| ObjectId {
            list_id: Some(format!("{{{}}}", list_id)),
            list_server_template: Some(100),
            list_base_type: Some(0),
            list_item,
            list_item_id: list_item.then(|| "1".to_string()),
            file: !list_item,
            folder: false,
            alternate_urls: Some(layout.alternate_urls()),
        };
        if url == layout.list_url {
            Ok(in_list(false))
        } else if url == layout.list_item_url {
            Ok(in_list(true))
        } else if url == layout.no_list_url || layout.is_page(&url) {
            Ok(ObjectId {
                file: true,
                alternate_urls: Some(layout.alternate_urls()),
                ..Default::default()
            })
        } else {
            Err(fault(
                error_codes::FILE_NOT_FOUND,
                format!("No object at {}.", object_url),
            ))
        }
    }

    async fn get_activated_features(&self) -> AdapterResult<ActivatedFeatures> {
        self.credentials.check(&self.profile)?;
        Ok(ActivatedFeatures {
            site: SITE_FEATURES.iter().map(|f| f.to_string()).collect(),
            site_collection: SITE_COLLECTION_FEATURES
                .iter()
                .map(|f| f.to_string())
                .collect(),
        })
    }

    async fn get_web(&self, web_url: Option<&str>) -> AdapterResult<WebDefinition> {
        self.credentials.check(&self.profile)?;
        let invalid = || {
            fault(
                error_codes::BLANK_OR_MISSING,
                "The webUrl is missing or names no site.",
            )
        };
        let url = normalize(web_url.ok_or_else(invalid)?);
        self.layout
            .webs()
            .into_iter()
            .find(|w| normalize(&w.url) == url)
            .cloned()
            .ok_or_else(invalid)
    }

    async fn get_web_collection(&self) -> AdapterResult<Vec<WebDefinition>> {
        self.credentials.check(&self.profile)?;
        Ok(vec![self.layout.sub_web.clone()])
    }

    async fn get_all_sub_web_collection(&self) -> AdapterResult<Vec<WebDefinition>> {
        self.credentials.check(&self.profile)?;
        Ok(self.layout.webs().into_iter().cloned().collect())
    }

    async fn get_list_templates(&self) -> AdapterResult<Vec<ListTemplate>> {
        self.credentials.check(&self.profile)?;
        Ok(LIST_TEMPLATES
            .iter()
            .map(|(name, display_name, template_type, base_type)| ListTemplate {
                name: name.to_string(),
                display_name: display_name.to_string(),
                template_type: *template_type,
                base_type: *base_type,
            })
            .collect())
    }

    async fn web_url_from_page_url(&self, page_url: &str) -> AdapterResult<String> {
        self.credentials.check(&self.profile)?;
        let page = normalize(page_url);
        self.layout
            .webs()
            .into_iter()
            .filter(|w| {
                let web = normalize(&w.url);
                page == web || page.starts_with(&format!("{}/", web))
            })
            .max_by_key(|w| w.url.len())
            .map(|w| w.url.clone())
            .ok_or_else(|| {
                fault(
                    error_codes::FILE_NOT_FOUND,
                    format!("{} is not in any site of this collection.", page_url),
                )
            })
    }
}

#[async_trait]
impl SutControlAdapter for InMemorySharePoint {
    async fn set_content_type_read_only_or_sealed(
        &self,
        site: &str,
        title: &str,
        read_only: bool,
        sealed: bool,
    ) -> AdapterResult<()> {
        self.check_site(site)?;
        let mut store = self.store.lock().await;
        let content_type = store
            .content_types
            .iter_mut()
            .find(|ct| ct.has_name(title))
            .ok_or_else(|| fault(error_codes::FAIL, format!("No content type titled {}.", title)))?;
        content_type.read_only = read_only;
        content_type.sealed = sealed;
        debug!(
            "SUT control: {} read-only {} sealed {}",
            content_type.id, read_only, sealed
        );
        Ok(())
    }

    async fn get_object_id(&self, site: &str, kind: ObjectKind) -> AdapterResult<Option<String>> {
        self.check_site(site)?;
        Ok(Some(match kind {
            ObjectKind::List => self.store.lock().await.list_id.clone(),
            ObjectKind::ListItem => "1".to_string(),
        }))
    }
}

impl InMemorySharePoint {
    fn check_site(&self, site: &str) -> Result<(), ProtocolFault> {
        if site.eq_ignore_ascii_case(&self.layout.web_site_name) {
            Ok(())
        } else {
            Err(fault(error_codes::FAIL, format!("No site named {}.", site)))
        }
    }
}

fn fault(code: &str, text: impl Into<String>) -> ProtocolFault {
    SoapFault::server(SERVER_EXCEPTION)
        .with_detail(text, Some(code))
        .into()
}

fn unknown_content_type(id: &str) -> ProtocolFault {
    fault(
        error_codes::FAIL,
        format!("The content type {} is not on this site.", id),
    )
}

/// A present, non-blank parameter.
fn required<'a>(value: Option<&'a str>, element: &str) -> Result<&'a str, ProtocolFault> {
    value.filter(|v| !v.trim().is_empty()).ok_or_else(|| {
        fault(
            error_codes::BLANK_OR_MISSING,
            format!("{} is blank or missing.", element),
        )
    })
}

/// Lowercase with trailing slashes removed.
fn normalize(url: &str) -> String {
    url.trim().trim_end_matches('/').to_lowercase()
}

fn title_column() -> FieldDefinition {
    FieldDefinition::named("Title")
        .with_id("fa564e0f-0c70-4ab9-b863-0177e6ddd247")
        .with_display_name("Title")
        .with_type("Text")
}

fn validate_display_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("The content type name cannot be empty.".to_string());
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(format!(
            "The content type name cannot be longer than {} characters.",
            MAX_NAME_LEN
        ));
    }
    if name.starts_with(char::is_whitespace) || name.ends_with(char::is_whitespace) {
        return Err("The content type name cannot begin or end with whitespace.".to_string());
    }
    if name.ends_with('.') || name.contains("..") {
        return Err(
            "The content type name cannot end with a period or contain consecutive periods."
                .to_string(),
        );
    }
    if let Some(c) = name.chars().find(|c| INVALID_NAME_CHARS.contains(*c)) {
        return Err(format!("The content type name cannot contain {:?}.", c));
    }
    Ok(())
}

/// Position of the field `wanted` refers to: by id when it carries one,
/// otherwise by name.
fn find_field(fields: &[FieldDefinition], wanted: &FieldDefinition) -> Option<usize> {
    let same = |a: &Option<String>, b: &str| a.as_deref().is_some_and(|a| a.eq_ignore_ascii_case(b));
    match (&wanted.id, &wanted.name) {
        (Some(id), _) => fields.iter().position(|f| same(&f.id, id)),
        (None, Some(name)) => fields.iter().position(|f| same(&f.name, name)),
        (None, None) => None,
    }
}

/// Copy every attribute `from` carries onto `field`, keeping its id.
fn merge_field(field: &mut FieldDefinition, from: &FieldDefinition) {
    if from.name.is_some() {
        field.name = from.name.clone();
    }
    if from.display_name.is_some() {
        field.display_name = from.display_name.clone();
    }
    if from.field_type.is_some() {
        field.field_type = from.field_type.clone();
    }
}

fn field_not_found(method: &FieldMethod) -> MethodResult {
    let reference = method
        .field
        .id
        .as_deref()
        .or(method.field.name.as_deref())
        .unwrap_or_default();
    MethodResult::failed(
        &method.id,
        error_codes::FAIL,
        format!("No field {} was found.", reference),
    )
}

fn add_content_type_field(fields: &mut Vec<FieldDefinition>, method: &FieldMethod) -> MethodResult {
    let Some(name) = method.field.name.as_deref() else {
        return MethodResult::failed(&method.id, error_codes::FAIL, "The field has no Name.");
    };
    let by_name = FieldDefinition::named(name);
    if find_field(fields, &by_name).is_some() || find_field(fields, &method.field).is_some() {
        return MethodResult::failed(
            &method.id,
            error_codes::FAIL,
            format!("The content type already has a field {}.", name),
        );
    }
    let mut field = method.field.clone();
    field.id.get_or_insert_with(new_guid);
    fields.push(field);
    MethodResult::succeeded(&method.id)
}

fn add_column(columns: &mut Vec<FieldDefinition>, method: &FieldMethod) -> MethodResult {
    let field = &method.field;
    let Some(name) = field.name.clone().or_else(|| field.display_name.clone()) else {
        return MethodResult::failed(
            &method.id,
            error_codes::FAIL,
            "The column has neither a Name nor a DisplayName.",
        );
    };
    if field.field_type.is_none() {
        return MethodResult::failed(&method.id, error_codes::FAIL, "The column has no Type.");
    }
    if find_field(columns, &FieldDefinition::named(name.as_str())).is_some() {
        return MethodResult::failed(
            &method.id,
            error_codes::FAIL,
            format!("A column named {} already exists.", name),
        );
    }
    columns.push(FieldDefinition {
        id: Some(field.id.clone().unwrap_or_else(new_guid)),
        name: Some(name.clone()),
        display_name: Some(field.display_name.clone().unwrap_or(name)),
        field_type: field.field_type.clone(),
    });
    MethodResult::succeeded(&method.id)
}

/// A definition without a type replaces the column's type with nothing,
/// which leaves the column broken.
fn update_column(columns: &mut [FieldDefinition], method: &FieldMethod) -> MethodResult {
    let Some(i) = find_field(columns, &method.field) else {
        return field_not_found(method);
    };
    let column = &mut columns[i];
    if method.field.field_type.is_none() {
        column.field_type = None;
        return MethodResult::failed(&method.id, error_codes::FAIL, "The column has no Type.");
    }
    merge_field(column, &method.field);
    MethodResult::succeeded(&method.id)
}

/// Namespace of the root element of a well-formed document, if it has one.
fn root_namespace(document: &str) -> Option<String> {
    let mut rest = document.trim();
    loop {
        if let Some(after) = rest.strip_prefix("<?") {
            rest = after[after.find("?>")? + 2..].trim_start();
        } else if let Some(after) = rest.strip_prefix("<!--") {
            rest = after[after.find("-->")? + 3..].trim_start();
        } else {
            break;
        }
    }

    let body = rest.strip_prefix('<')?;
    let name_len = body
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .unwrap_or(body.len());
    let name = &body[..name_len];
    if name.is_empty() {
        return None;
    }
    let tag_end = body.find('>')?;
    let tag = &body[name_len..tag_end];
    let self_closing = tag.trim_end().ends_with('/');
    if !self_closing && !rest.ends_with(&format!("</{}>", name)) {
        return None;
    }
    xmlns_attribute(tag).filter(|ns| !ns.is_empty())
}

/// Value of the default namespace declaration among `attributes`.
fn xmlns_attribute(attributes: &str) -> Option<String> {
    let mut rest = attributes;
    while let Some(at) = rest.find("xmlns") {
        let preceded_by_space = rest[..at]
            .chars()
            .next_back()
            .map_or(true, char::is_whitespace);
        let after = rest[at + "xmlns".len()..].trim_start();
        if preceded_by_space {
            if let Some(value) = after.strip_prefix('=') {
                let value = value.trim_start();
                let quote = value.chars().next().filter(|q| *q == '"' || *q == '\'')?;
                let value = &value[1..];
                return value.find(quote).map(|end| value[..end].to_string());
            }
        }
        rest = &rest[at + "xmlns".len()..];
    }
    None
}
