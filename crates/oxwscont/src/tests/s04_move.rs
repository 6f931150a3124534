//! S04: MoveItem on contact items.

use protocheck_harness::ScenarioResult;

use crate::adapter::ContactsAdapter;
use crate::base::ContactsSuite;
use crate::fixtures;
use crate::types::{DistinguishedFolderId, ResponseCode};

/// S04_TC01: moving a contact to deleted items gives it a new id; only the
/// new id stays tracked and the old one is no longer found.
pub async fn test_s04_tc01_move_contact<A: ContactsAdapter>(
    suite: &mut ContactsSuite<A>,
) -> ScenarioResult {
    let contact = fixtures::contact_with_required_properties(&suite.site);
    let file_as = contact.file_as.clone();
    let created = suite.create_item(vec![contact.into()]).await?;
    suite.check_operation_success(&created, 1)?;
    let ids = created.item_ids();
    let old = suite.site.assert_some(ids.first(), "The created item id")?.clone();

    let moved = suite
        .move_item(DistinguishedFolderId::DeletedItems, vec![old.clone()])
        .await?;
    suite.check_operation_success(&moved, 1)?;
    let moved_ids = moved.item_ids();
    let new = suite.site.assert_some(moved_ids.first(), "The moved item id")?.clone();
    suite
        .site
        .assert_true(new.id != old.id, "The moved item should have a new id.")?;
    suite.site.assert_true(
        suite.tracked.contains(&new) && !suite.tracked.contains(&old),
        "Only the moved item's new id should be tracked.",
    )?;

    let stale = suite.get_item(vec![old]).await?;
    suite
        .site
        .assert_equal(1, stale.messages.len(), "Expected Item Count")?;
    suite.site.assert_equal(
        ResponseCode::ErrorItemNotFound,
        stale.messages[0].code,
        "Response code for the id before the move",
    )?;

    let fetched = suite.get_item(vec![new]).await?;
    suite.check_operation_success(&fetched, 1)?;
    let item = suite.single_item(&fetched)?;
    suite.site.assert_equal(
        file_as.as_ref(),
        item.as_contact().and_then(|c| c.file_as.as_ref()),
        "FileAs",
    )
}
