//! S02: UpdateItem on contact items.

use protocheck_harness::ScenarioResult;

use crate::adapter::ContactsAdapter;
use crate::base::ContactsSuite;
use crate::fixtures;
use crate::messages::ItemChange;
use crate::types::{ContactField, ContactItem, ItemId, ResponseClass};

/// S02_TC01: set and delete fields on an existing contact; a following get
/// reflects both.
pub async fn test_s02_tc01_update_contact_fields<A: ContactsAdapter>(
    suite: &mut ContactsSuite<A>,
) -> ScenarioResult {
    let contact = ContactItem {
        job_title: Some("Engineer".to_string()),
        department: Some("Test".to_string()),
        ..fixtures::contact_with_required_properties(&suite.site)
    };
    let created = suite.create_item(vec![contact.into()]).await?;
    suite.check_operation_success(&created, 1)?;
    let ids = created.item_ids();
    let id = suite.site.assert_some(ids.first(), "The created item id")?.clone();

    let manager = suite.site.resource_name("Manager");
    let change = ItemChange {
        item_id: id.clone(),
        set: ContactItem {
            job_title: Some("Manager".to_string()),
            manager: Some(manager.clone()),
            ..Default::default()
        },
        delete: vec![ContactField::Department],
    };
    let updated = suite.update_item(vec![change]).await?;
    suite.check_operation_success(&updated, 1)?;

    let fetched = suite.get_item(updated.item_ids()).await?;
    suite.check_operation_success(&fetched, 1)?;
    let item = suite.single_item(&fetched)?;
    let returned = suite
        .site
        .assert_some(item.as_contact(), "The returned contact item")?;
    suite
        .site
        .assert_equal(Some("Manager"), returned.job_title.as_deref(), "JobTitle")?;
    suite
        .site
        .assert_equal(Some(manager.as_str()), returned.manager.as_deref(), "Manager")?;
    suite
        .site
        .assert_equal(None, returned.department.as_deref(), "Department")
}

/// S02_TC02: a batch update with one unknown item fails only that slot.
pub async fn test_s02_tc02_update_batch_partial_failure<A: ContactsAdapter>(
    suite: &mut ContactsSuite<A>,
) -> ScenarioResult {
    let contact = fixtures::contact_with_required_properties(&suite.site);
    let created = suite.create_item(vec![contact.into()]).await?;
    suite.check_operation_success(&created, 1)?;
    let ids = created.item_ids();
    let id = suite.site.assert_some(ids.first(), "The created item id")?.clone();

    let set = ContactItem {
        nickname: Some(suite.site.resource_name("Nickname")),
        ..Default::default()
    };
    let changes = vec![
        ItemChange {
            item_id: id,
            set: set.clone(),
            delete: Vec::new(),
        },
        ItemChange {
            item_id: ItemId::new(suite.site.resource_name("MissingItem")),
            set,
            delete: Vec::new(),
        },
    ];
    let updated = suite.update_item(changes).await?;

    suite
        .site
        .assert_equal(2, updated.messages.len(), "Expected Item Count")?;
    suite.site.assert_true(
        updated.messages[0].is_success(),
        "The slot of the existing item should succeed.",
    )?;
    suite.site.assert_equal(
        ResponseClass::Error,
        updated.messages[1].class,
        "Response class of the unknown item's slot",
    )
}
