//! Per-scenario state shared by every MS-OXWSCONT scenario: the adapter, the
//! capture oracle and the items created so far.

use std::sync::Arc;

use async_trait::async_trait;
use log::info;
use protocheck_harness::{
    teardown, CaptureRecord, Disposer, ObjectIdSource, ScenarioResult, Site, SuiteConfig,
    TestFailure, TrackedObjects, UserAuthentication,
};

use crate::adapter::{AdapterResult, ContactsAdapter};
use crate::messages::{
    CopyItemRequest, CreateItemRequest, DeleteItemRequest, FindItemRequest, GetItemRequest,
    GetUserPhotoRequest, GetUserPhotoResponse, ItemChange, ItemsResponse, MoveItemRequest,
    SetUserPhotoRequest, SetUserPhotoResponse, UpdateItemRequest,
};
use crate::types::{
    BaseShape, ContactItem, DisposalType, DistinguishedFolderId, Item, ItemId,
};

pub const DOC: &str = "MS-OXWSCONT";

pub struct ContactsSuite<A: ContactsAdapter> {
    pub adapter: A,
    pub site: Site,
    pub tracked: TrackedObjects<ItemId>,
}

impl<A: ContactsAdapter> ContactsSuite<A> {
    pub fn new(adapter: A, config: Arc<SuiteConfig>) -> Self {
        Self {
            adapter,
            site: Site::new(DOC, config),
            tracked: TrackedObjects::new(),
        }
    }

    /// Start a case: fresh tracking, authenticated adapter.
    pub async fn begin(&mut self, case: &str) {
        info!("{} {}: start", DOC, case);
        self.site.begin_case(case);
        self.tracked.initialize();
        self.adapter
            .initialize_service(UserAuthentication::Authenticated)
            .await;
    }

    /// Hard-delete everything the case created and fold the cleanup outcome
    /// into the case result. A scenario failure takes precedence over a
    /// cleanup failure.
    pub async fn finish(&mut self, result: ScenarioResult) -> (ScenarioResult, Vec<CaptureRecord>) {
        // Cleanup must not run as an unauthenticated caller.
        self.adapter
            .initialize_service(UserAuthentication::Authenticated)
            .await;
        let cleanup = teardown(&mut self.tracked, &HardDelete(&self.adapter)).await;
        let result = match (result, cleanup) {
            (Err(e), _) => Err(e),
            (Ok(()), Err(e)) => Err(e),
            (Ok(()), Ok(_)) => Ok(()),
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

    // ── Item operations ──────────────────────────────────────────────────

    /// CreateItem into the contacts folder.
    pub async fn create_item(&mut self, items: Vec<Item>) -> Result<ItemsResponse, TestFailure> {
        self.create_item_in(DistinguishedFolderId::Contacts, items)
            .await
    }

    pub async fn create_item_in(
        &mut self,
        folder: DistinguishedFolderId,
        items: Vec<Item>,
    ) -> Result<ItemsResponse, TestFailure> {
        let request = CreateItemRequest {
            saved_item_folder: folder,
            items,
        };
        let response = self.adapter.create_item(&request).await?;
        self.tracked.observe(response.object_ids());
        self.capture_port_type(298, "CreateItem")?;
        Ok(response)
    }

    /// GetItem with all properties.
    pub async fn get_item(&mut self, item_ids: Vec<ItemId>) -> Result<ItemsResponse, TestFailure> {
        let request = GetItemRequest {
            shape: BaseShape::AllProperties,
            item_ids,
        };
        let response = self.adapter.get_item(&request).await?;
        self.capture_port_type(114, "GetItem")?;
        for contact in response.contacts() {
            self.site.capture_if_true(
                self.adapter.schema_validated(),
                19,
                "[In t:ContactItemType Complex Type] The type [ContactItemType] is defined as follow.",
            )?;
            if contact.file_as_mapping.is_some() {
                self.site.capture(
                    128,
                    "[In t:FileAsMappingType Simple Type] The type [FileAsMappingType] is defined as follow.",
                )?;
            }
        }
        Ok(response)
    }

    /// DeleteItem with hard delete. Deleted ids are no longer tracked.
    pub async fn hard_delete(&mut self, item_ids: Vec<ItemId>) -> Result<ItemsResponse, TestFailure> {
        let request = DeleteItemRequest {
            item_ids: item_ids.clone(),
            disposal: DisposalType::HardDelete,
        };
        let response = self.adapter.delete_item(&request).await?;
        for (id, message) in item_ids.iter().zip(&response.messages) {
            if message.is_success() {
                self.tracked.forget(id);
            }
        }
        self.capture_port_type(274, "DeleteItem")?;
        Ok(response)
    }

    pub async fn update_item(
        &mut self,
        changes: Vec<ItemChange>,
    ) -> Result<ItemsResponse, TestFailure> {
        let request = UpdateItemRequest { changes };
        let response = self.adapter.update_item(&request).await?;
        self.refresh_change_keys(&response);
        self.capture_port_type(280, "UpdateItem")?;
        Ok(response)
    }

    /// MoveItem. Moved items get new ids, so tracking is rebuilt: the old
    /// ids are dropped and the new ones tracked.
    pub async fn move_item(
        &mut self,
        to_folder: DistinguishedFolderId,
        item_ids: Vec<ItemId>,
    ) -> Result<ItemsResponse, TestFailure> {
        let request = MoveItemRequest {
            to_folder,
            item_ids: item_ids.clone(),
        };
        let response = self.adapter.move_item(&request).await?;
        let survivors: Vec<ItemId> = self
            .tracked
            .iter()
            .filter(|id| !item_ids.iter().any(|moved| moved.id == id.id))
            .cloned()
            .collect();
        self.tracked.initialize();
        self.tracked.observe(survivors);
        self.tracked.observe(response.object_ids());
        self.capture_port_type(286, "MoveItem")?;
        Ok(response)
    }

    pub async fn copy_item(
        &mut self,
        to_folder: DistinguishedFolderId,
        item_ids: Vec<ItemId>,
    ) -> Result<ItemsResponse, TestFailure> {
        let request = CopyItemRequest {
            to_folder,
            item_ids,
        };
        let response = self.adapter.copy_item(&request).await?;
        self.tracked.observe(response.object_ids());
        self.capture_port_type(292, "CopyItem")?;
        Ok(response)
    }

    pub async fn find_item(
        &mut self,
        parent_folder: DistinguishedFolderId,
    ) -> Result<ItemsResponse, TestFailure> {
        let request = FindItemRequest {
            parent_folder,
            shape: BaseShape::AllProperties,
        };
        Ok(self.adapter.find_item(&request).await?)
    }

    /// Create one contact, check the create succeeded and read the contact
    /// back with all properties.
    pub async fn create_and_get_contact(
        &mut self,
        contact: ContactItem,
    ) -> Result<ContactItem, TestFailure> {
        let created = self.create_item(vec![contact.into()]).await?;
        self.check_operation_success(&created, 1)?;
        let fetched = self.get_item(created.item_ids()).await?;
        self.check_operation_success(&fetched, 1)?;
        let item = self.single_item(&fetched)?;
        let contact = self
            .site
            .assert_some(item.as_contact(), "The returned contact item")?;
        Ok(contact.clone())
    }

    // ── User photo ───────────────────────────────────────────────────────

    pub async fn set_user_photo(
        &mut self,
        email: &str,
        content: &str,
    ) -> AdapterResult<SetUserPhotoResponse> {
        let request = SetUserPhotoRequest {
            email: email.to_string(),
            content: content.to_string(),
        };
        self.adapter.set_user_photo(&request).await
    }

    pub async fn get_user_photo(
        &mut self,
        request: GetUserPhotoRequest,
    ) -> AdapterResult<GetUserPhotoResponse> {
        self.adapter.get_user_photo(&request).await
    }

    // ── Helpers ──────────────────────────────────────────────────────────

    /// The response has `expected` slots, all successful.
    pub fn check_operation_success(
        &self,
        response: &ItemsResponse,
        expected: usize,
    ) -> ScenarioResult {
        self.site.assert_equal(
            expected,
            response.messages.len(),
            "Expected Item Count",
        )?;
        for (i, message) in response.messages.iter().enumerate() {
            self.site.assert_true(
                message.is_success(),
                format!(
                    "The operation should be successful! Slot {}: class {}, code {}{}",
                    i,
                    message.class,
                    message.code,
                    message
                        .message_text
                        .as_deref()
                        .map(|t| format!(" ({})", t))
                        .unwrap_or_default()
                ),
            )?;
        }
        Ok(())
    }

    /// The single item returned by a one-slot GetItem.
    pub fn single_item<'r>(&self, response: &'r ItemsResponse) -> Result<&'r Item, TestFailure> {
        let items: Vec<&Item> = response.items().collect();
        self.site
            .assert_equal(1, items.len(), "One item should be returned!")?;
        Ok(items[0])
    }

    fn capture_port_type(&mut self, number: u32, operation: &str) -> ScenarioResult {
        let valid = self.adapter.schema_validated();
        self.site.capture_if_true(
            valid,
            number,
            &format!(
                "[In {op}] The following is the WSDL port type specification for the {op} operation.",
                op = operation
            ),
        )
    }

    /// Updates hand back new change keys; keep the tracked ids current.
    fn refresh_change_keys(&mut self, response: &ItemsResponse) {
        for id in response.item_ids() {
            let stale: Vec<ItemId> = self
                .tracked
                .iter()
                .filter(|t| t.id == id.id && **t != id)
                .cloned()
                .collect();
            if stale.is_empty() {
                continue;
            }
            for old in &stale {
                self.tracked.forget(old);
            }
            self.tracked.track(id);
        }
    }
}

/// Disposes of tracked items through the adapter with a hard delete.
struct HardDelete<'a, A>(&'a A);

#[async_trait]
impl<'a, A: ContactsAdapter> Disposer<ItemId> for HardDelete<'a, A> {
    async fn dispose(&self, ids: &[ItemId]) -> Vec<Result<(), String>> {
        let request = DeleteItemRequest {
            item_ids: ids.to_vec(),
            disposal: DisposalType::HardDelete,
        };
        match self.0.delete_item(&request).await {
            Ok(response) => ids
                .iter()
                .enumerate()
                .map(|(i, _)| match response.messages.get(i) {
                    Some(m) if m.is_success() => Ok(()),
                    Some(m) => Err(format!("{} {}", m.class, m.code)),
                    None => Err("missing response message".to_string()),
                })
                .collect(),
            Err(fault) => ids.iter().map(|_| Err(fault.to_string())).collect(),
        }
    }
}
