//! Per-scenario state shared by every MS-WEBSS scenario: the adapter, the
//! capture oracle, the names generated for the case and the content types,
//! columns and CSS files the case changed on the server.

use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};
use protocheck_harness::names::{new_guid, random_string};
use protocheck_harness::{
    teardown, CaptureRecord, Disposer, ScenarioResult, Site, SoapFault, SuiteConfig,
    TestFailure, TrackedObjects, UserAuthentication,
};

use crate::adapter::{AdapterResult, WebsServer};
use crate::fixtures;
use crate::messages::{
    CreateContentTypeRequest, SuccessResponse, UpdateColumnsRequest, UpdateColumnsResponse,
    UpdateContentTypeRequest, UpdateContentTypeResponse,
};
use crate::types::{
    is_content_type_id, ActivatedFeatures, ContentType, ContentTypeSummary, CustomizedPageStatus,
    FieldDefinition, FieldMethod, ListTemplate, ObjectId, WebDefinition,
};

pub const DOC: &str = "MS-WEBSS";

/// Method id used for the columns every case sets up.
const SETUP_METHOD_ID: &str = "5";

/// Names generated afresh at the start of every case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseNames {
    pub display_name: String,
    pub title: String,
    pub description: String,
    pub new_fields_method_id: String,
    pub new_field_id: String,
    pub new_field_name: String,
    pub field_name_for_update: String,
}

impl CaseNames {
    pub fn generate(site: &Site) -> Self {
        Self {
            display_name: site.resource_name("ContentType"),
            title: site.resource_name("Title"),
            description: random_string(10),
            new_fields_method_id: new_guid(),
            new_field_id: new_guid(),
            new_field_name: random_string(10),
            field_name_for_update: random_string(10),
        }
    }
}

pub struct WebsSuite<A: WebsServer> {
    pub adapter: A,
    pub site: Site,
    pub names: CaseNames,
    /// Ids of content types created by the case.
    pub content_types: TrackedObjects<String>,
    /// Names of site columns added by the case.
    pub columns: TrackedObjects<String>,
    /// CSS files customized by the case.
    pub css_files: TrackedObjects<String>,
    /// Titles of content types made read-only through the SUT control
    /// channel; unlocked before cleanup so they can be deleted.
    locked: Vec<String>,
}

impl<A: WebsServer> WebsSuite<A> {
    pub fn new(adapter: A, config: Arc<SuiteConfig>) -> Self {
        let site = Site::new(DOC, config);
        let names = CaseNames::generate(&site);
        Self {
            adapter,
            site,
            names,
            content_types: TrackedObjects::new(),
            columns: TrackedObjects::new(),
            css_files: TrackedObjects::new(),
            locked: Vec::new(),
        }
    }

    /// Start a case: fresh names and tracking, authenticated adapter.
    pub async fn begin(&mut self, case: &str) {
        info!("{} {}: start", DOC, case);
        self.site.begin_case(case);
        self.names = CaseNames::generate(&self.site);
        self.content_types.initialize();
        self.columns.initialize();
        self.css_files.initialize();
        self.locked.clear();
        self.adapter
            .initialize_service(UserAuthentication::Authenticated)
            .await;
    }

    /// Undo everything the case changed and fold the cleanup outcome into
    /// the case result. A scenario failure takes precedence over a cleanup
    /// failure.
    pub async fn finish(&mut self, result: ScenarioResult) -> (ScenarioResult, Vec<CaptureRecord>) {
        self.adapter
            .initialize_service(UserAuthentication::Authenticated)
            .await;
        let unlock = self.unlock_content_types().await;
        let content_types =
            teardown(&mut self.content_types, &DeleteContentTypes(&self.adapter)).await;
        let columns = teardown(&mut self.columns, &DeleteColumns(&self.adapter)).await;
        let css = teardown(&mut self.css_files, &RevertCssFiles(&self.adapter)).await;

        let cleanup = [unlock, content_types.map(drop), columns.map(drop), css.map(drop)]
            .into_iter()
            .find_map(Result::err);
        let result = match (result, cleanup) {
            (Err(e), _) => Err(e),
            (Ok(()), Some(e)) => Err(e),
            (Ok(()), None) => Ok(()),
        };
        info!(
            "{} {}: {}",
            DOC,
            self.site.case(),
            match &result {
                Ok(()) => "passed".to_string(),
                Err(e) => e.to_string(),
            }
        );
        (result, self.site.take_records())
    }

    pub async fn sign_out(&self) {
        self.adapter
            .initialize_service(UserAuthentication::Unauthenticated)
            .await;
    }

    pub async fn sign_in(&self) {
        self.adapter
            .initialize_service(UserAuthentication::Authenticated)
            .await;
    }

    // ── Content types ────────────────────────────────────────────────────

    /// A create request for `display_name` under the configured parent,
    /// with the case's field and properties.
    pub fn create_request(&self, display_name: &str) -> Result<CreateContentTypeRequest, TestFailure> {
        Ok(CreateContentTypeRequest {
            display_name: display_name.to_string(),
            parent_type: self.site.property("CreateContentType_ValidateContentType")?,
            new_fields: fixtures::new_fields(&self.names),
            properties: fixtures::content_type_properties(&self.names),
        })
    }

    /// CreateContentType without captures. A content type the server
    /// creates is tracked even when the scenario expected a fault.
    pub async fn try_create_content_type(
        &mut self,
        request: &CreateContentTypeRequest,
    ) -> AdapterResult<String> {
        let id = self.adapter.create_content_type(request).await?;
        self.content_types.track(id.clone());
        Ok(id)
    }

    pub async fn create_content_type(&mut self, display_name: &str) -> Result<String, TestFailure> {
        let request = self.create_request(display_name)?;
        let id = self.try_create_content_type(&request).await?;
        self.capture_response(59, "CreateContentType")?;
        self.site.capture_if_true(
            is_content_type_id(&id),
            712001,
            "[In CreateContentTypeResponse] CreateContentTypeResult: It MUST conform to the ContentTypeId type, as specified in [MS-WSSCAML] section 2.3.1.4.",
        )?;
        Ok(id)
    }

    pub async fn get_content_type(&mut self, content_type_id: &str) -> Result<ContentType, TestFailure> {
        Ok(self.adapter.get_content_type(Some(content_type_id)).await?)
    }

    pub async fn get_content_types(&mut self) -> Result<Vec<ContentTypeSummary>, TestFailure> {
        let content_types = self.adapter.get_content_types().await?;
        self.capture_response(236, "GetContentTypes")?;
        Ok(content_types)
    }

    pub async fn update_content_type(
        &mut self,
        request: &UpdateContentTypeRequest,
    ) -> Result<UpdateContentTypeResponse, TestFailure> {
        let response = self.adapter.update_content_type(request).await?;
        self.capture_response(540, "UpdateContentType")?;
        Ok(response)
    }

    /// An update of `content_type_id` with the case properties and no field
    /// changes.
    pub fn update_request(&self, content_type_id: &str) -> UpdateContentTypeRequest {
        UpdateContentTypeRequest {
            content_type_id: content_type_id.to_string(),
            properties: fixtures::updated_content_type_properties(&self.names),
            ..Default::default()
        }
    }

    /// DeleteContentType. A deleted id is no longer tracked.
    pub async fn delete_content_type(
        &mut self,
        content_type_id: &str,
    ) -> Result<SuccessResponse, TestFailure> {
        let response = self.adapter.delete_content_type(content_type_id).await?;
        self.content_types.forget(&content_type_id.to_string());
        self.capture_response(113, "DeleteContentType")?;
        Ok(response)
    }

    /// Make the content type titled `title` read-only through the SUT
    /// control channel. It is unlocked again in [`finish`](Self::finish).
    pub async fn lock_content_type(&mut self, title: &str) -> ScenarioResult {
        let web = self.site.property("WebSiteName")?;
        self.adapter
            .set_content_type_read_only_or_sealed(&web, title, true, false)
            .await?;
        self.locked.push(title.to_string());
        Ok(())
    }

    pub async fn update_xml_document(
        &mut self,
        content_type_id: &str,
        document: &str,
    ) -> Result<SuccessResponse, TestFailure> {
        let response = self
            .adapter
            .update_content_type_xml_document(content_type_id, document)
            .await?;
        self.capture_response(597, "UpdateContentTypeXmlDocument")?;
        Ok(response)
    }

    pub async fn remove_xml_document(
        &mut self,
        content_type_id: &str,
        document_uri: &str,
    ) -> Result<SuccessResponse, TestFailure> {
        let response = self
            .adapter
            .remove_content_type_xml_document(content_type_id, document_uri)
            .await?;
        self.capture_response(394, "RemoveContentTypeXmlDocument")?;
        Ok(response)
    }

    // ── Columns ──────────────────────────────────────────────────────────

    /// UpdateColumns without captures. Columns the server adds are
    /// tracked; columns it deletes are forgotten.
    pub async fn try_update_columns(
        &mut self,
        request: &UpdateColumnsRequest,
    ) -> AdapterResult<UpdateColumnsResponse> {
        let response = self.adapter.update_columns(request).await?;
        for (method, result) in request.new_fields.iter().zip(&response.new_fields) {
            if let (true, Some(name)) = (result.is_success(), method.field.name.as_ref()) {
                self.columns.track(name.clone());
            }
        }
        for (method, result) in request.delete_fields.iter().zip(&response.delete_fields) {
            if let (true, Some(name)) = (result.is_success(), method.field.name.as_ref()) {
                self.columns.forget(name);
            }
        }
        Ok(response)
    }

    pub async fn update_columns(
        &mut self,
        request: &UpdateColumnsRequest,
    ) -> Result<UpdateColumnsResponse, TestFailure> {
        let response = self.try_update_columns(request).await?;
        self.capture_response(477, "UpdateColumns")?;
        Ok(response)
    }

    pub async fn get_columns(&mut self) -> Result<Vec<FieldDefinition>, TestFailure> {
        Ok(self.adapter.get_columns().await?)
    }

    /// Add the case's column for update plus one column to delete. Returns
    /// the name of the latter.
    pub async fn init_update_columns(&mut self) -> Result<String, TestFailure> {
        let for_update = fixtures::column(&self.site, &self.names.field_name_for_update)?;
        let for_delete_name = random_string(10);
        let for_delete = fixtures::column(&self.site, &for_delete_name)?;
        for field in [for_update, for_delete] {
            let request =
                UpdateColumnsRequest::new_fields(vec![FieldMethod::new(SETUP_METHOD_ID, field)]);
            let response = self.try_update_columns(&request).await?;
            self.site.assert_true(
                response.new_fields.iter().all(|m| m.is_success()),
                "The columns used by the case should be added.",
            )?;
        }
        Ok(for_delete_name)
    }

    // ── CSS and files ────────────────────────────────────────────────────

    /// CustomizeCss without captures. A customized file is tracked so that
    /// it is reverted at cleanup.
    pub async fn try_customize_css(&mut self, css_file: &str) -> AdapterResult<()> {
        self.adapter.customize_css(css_file).await?;
        self.css_files.track(css_file.to_string());
        Ok(())
    }

    pub async fn customize_css(&mut self, css_file: &str) -> ScenarioResult {
        self.try_customize_css(css_file).await?;
        self.capture_response(88, "CustomizeCss")
    }

    pub async fn revert_css(&mut self, css_file: &str) -> ScenarioResult {
        self.adapter.revert_css(Some(css_file)).await?;
        self.css_files.forget(&css_file.to_string());
        self.capture_response(425, "RevertCss")
    }

    pub async fn revert_file_content_stream(&mut self, file_url: &str) -> ScenarioResult {
        self.adapter.revert_file_content_stream(Some(file_url)).await?;
        self.capture_response(450, "RevertFileContentStream")
    }

    pub async fn revert_all_file_content_streams(&mut self) -> ScenarioResult {
        self.adapter.revert_all_file_content_streams().await?;
        self.capture_response(415, "RevertAllFileContentStreams")
    }

    // ── Pages, objects and features ──────────────────────────────────────

    pub async fn get_customized_page_status(
        &mut self,
        file_url: &str,
    ) -> Result<CustomizedPageStatus, TestFailure> {
        let status = self.adapter.get_customized_page_status(file_url).await?;
        self.capture_response(276, "GetCustomizedPageStatus")?;
        Ok(status)
    }

    pub async fn get_object_id_from_url(&mut self, object_url: &str) -> Result<ObjectId, TestFailure> {
        let object_id = self.adapter.get_object_id_from_url(object_url).await?;
        self.capture_response(320, "GetObjectIdFromUrl")?;
        Ok(object_id)
    }

    pub async fn get_activated_features(&mut self) -> Result<ActivatedFeatures, TestFailure> {
        let features = self.adapter.get_activated_features().await?;
        self.capture_response(134, "GetActivatedFeatures")?;
        Ok(features)
    }

    pub async fn get_list_templates(&mut self) -> Result<Vec<ListTemplate>, TestFailure> {
        let templates = self.adapter.get_list_templates().await?;
        self.capture_response(305, "GetListTemplates")?;
        Ok(templates)
    }

    pub async fn web_url_from_page_url(&mut self, page_url: &str) -> Result<String, TestFailure> {
        let url = self.adapter.web_url_from_page_url(page_url).await?;
        self.capture_response(627, "WebUrlFromPageUrl")?;
        Ok(url)
    }

    // ── Webs ─────────────────────────────────────────────────────────────

    pub async fn get_web(&mut self, web_url: &str) -> Result<WebDefinition, TestFailure> {
        let web = self.adapter.get_web(Some(web_url)).await?;
        self.capture_response(355, "GetWeb")?;
        Ok(web)
    }

    pub async fn get_web_collection(&mut self) -> Result<Vec<WebDefinition>, TestFailure> {
        let webs = self.adapter.get_web_collection().await?;
        self.capture_response(375, "GetWebCollection")?;
        Ok(webs)
    }

    pub async fn get_all_sub_web_collection(&mut self) -> Result<Vec<WebDefinition>, TestFailure> {
        let webs = self.adapter.get_all_sub_web_collection().await?;
        self.capture_response(150, "GetAllSubWebCollection")?;
        Ok(webs)
    }

    // ── Helpers ──────────────────────────────────────────────────────────

    /// A fault returned with a `detail` element satisfies the detail
    /// container requirement.
    pub fn capture_fault_detail(&mut self, fault: &SoapFault) -> ScenarioResult {
        if fault.detail.is_some() {
            self.site.capture(
                39,
                "[In Message Processing Events and Sequencing Rules] [SOAP fault] detail: A container for errorString and errorCode elements.",
            )?;
        }
        Ok(())
    }

    /// The fault carries an `errorcode` equal to `expected`.
    pub fn capture_fault_code(
        &mut self,
        fault: &SoapFault,
        expected: &str,
        number: u32,
        description: &str,
    ) -> ScenarioResult {
        self.capture_fault_detail(fault)?;
        self.site.capture_if_equal(
            Some(expected.to_string()),
            fault.error_code(),
            number,
            description,
        )
    }

    fn capture_response(&mut self, number: u32, operation: &str) -> ScenarioResult {
        let suffix = if operation.starts_with(['A', 'E', 'I', 'O', 'U']) {
            "an"
        } else {
            "a"
        };
        self.site.capture(
            number,
            &format!(
                "[In {op}SoapOut] The SOAP body contains {a} {op}Response element.",
                op = operation,
                a = suffix
            ),
        )
    }

    async fn unlock_content_types(&mut self) -> Result<(), TestFailure> {
        if self.locked.is_empty() {
            return Ok(());
        }
        let web = self.site.property("WebSiteName")?;
        let mut failures = Vec::new();
        for title in std::mem::take(&mut self.locked) {
            if let Err(fault) = self
                .adapter
                .set_content_type_read_only_or_sealed(&web, &title, false, false)
                .await
            {
                warn!("could not unlock content type {}: {}", title, fault);
                failures.push(format!("{}: {}", title, fault));
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(TestFailure::Cleanup(failures.join("; ")))
        }
    }
}

/// Deletes tracked content types one request at a time.
struct DeleteContentTypes<'a, A>(&'a A);

#[async_trait]
impl<'a, A: WebsServer> Disposer<String> for DeleteContentTypes<'a, A> {
    async fn dispose(&self, ids: &[String]) -> Vec<Result<(), String>> {
        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            results.push(match self.0.delete_content_type(id).await {
                Ok(response) if response.success => Ok(()),
                Ok(_) => Err("no Success element returned".to_string()),
                Err(fault) => Err(fault.to_string()),
            });
        }
        results
    }
}

/// Deletes tracked site columns by name.
struct DeleteColumns<'a, A>(&'a A);

#[async_trait]
impl<'a, A: WebsServer> Disposer<String> for DeleteColumns<'a, A> {
    async fn dispose(&self, names: &[String]) -> Vec<Result<(), String>> {
        let mut results = Vec::with_capacity(names.len());
        for name in names {
            let request = UpdateColumnsRequest::delete_fields(vec![FieldMethod::new(
                SETUP_METHOD_ID,
                FieldDefinition::named(name.clone()),
            )]);
            results.push(match self.0.update_columns(&request).await {
                Ok(response) => match response.delete_fields.first() {
                    Some(m) if m.is_success() => Ok(()),
                    Some(m) => Err(format!("{} {}", m.error_code, m.error_text.as_deref().unwrap_or(""))),
                    None => Err("missing delete result".to_string()),
                },
                Err(fault) => Err(fault.to_string()),
            });
        }
        results
    }
}

/// Reverts customized CSS files.
struct RevertCssFiles<'a, A>(&'a A);

#[async_trait]
impl<'a, A: WebsServer> Disposer<String> for RevertCssFiles<'a, A> {
    async fn dispose(&self, files: &[String]) -> Vec<Result<(), String>> {
        let mut results = Vec::with_capacity(files.len());
        for file in files {
            results.push(
                self.0
                    .revert_css(Some(file))
                    .await
                    .map_err(|fault| fault.to_string()),
            );
        }
        results
    }
}
