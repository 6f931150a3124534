//! Every MS-OXWSCONT scenario against the reference mailbox, one fresh
//! mailbox per test, plus the delete modes the scenarios never send.

mod common;

use protocheck_oxwscont::messages::{
    CreateItemRequest, DeleteItemRequest, FindItemRequest, GetItemRequest, ItemsResponse,
};
use protocheck_oxwscont::oxwscont_conformance_tests;
use protocheck_oxwscont::types::{
    BaseShape, ContactItem, DisposalType, DistinguishedFolderId, ItemId, ResponseCode,
};
use protocheck_oxwscont::ContactsAdapter;
use protocheck_sim::{InMemoryMailbox, ServerProfile};

oxwscont_conformance_tests!(
    common::mailbox(ServerProfile::reference()),
    common::contacts_config()
);

// ──────────────────────────────────────────────
// Disposal types the scenarios do not send
// ──────────────────────────────────────────────

async fn create_contact(mailbox: &InMemoryMailbox) -> Vec<ItemId> {
    let contact = ContactItem {
        file_as: Some("Disposal".to_string()),
        ..Default::default()
    };
    mailbox
        .create_item(&CreateItemRequest {
            saved_item_folder: DistinguishedFolderId::Contacts,
            items: vec![contact.into()],
        })
        .await
        .unwrap()
        .item_ids()
}

async fn delete(mailbox: &InMemoryMailbox, ids: &[ItemId], disposal: DisposalType) -> ItemsResponse {
    mailbox
        .delete_item(&DeleteItemRequest {
            item_ids: ids.to_vec(),
            disposal,
        })
        .await
        .unwrap()
}

async fn get(mailbox: &InMemoryMailbox, ids: &[ItemId]) -> ItemsResponse {
    mailbox
        .get_item(&GetItemRequest {
            shape: BaseShape::IdOnly,
            item_ids: ids.to_vec(),
        })
        .await
        .unwrap()
}

async fn folder_ids(mailbox: &InMemoryMailbox, folder: DistinguishedFolderId) -> Vec<String> {
    mailbox
        .find_item(&FindItemRequest {
            parent_folder: folder,
            shape: BaseShape::IdOnly,
        })
        .await
        .unwrap()
        .item_ids()
        .into_iter()
        .map(|id| id.id)
        .collect()
}

#[tokio::test]
async fn move_to_deleted_items_keeps_the_item_reachable() {
    let mailbox = common::mailbox(ServerProfile::reference());
    let ids = create_contact(&mailbox).await;

    assert!(delete(&mailbox, &ids, DisposalType::MoveToDeletedItems).await.messages[0].is_success());

    let fetched = get(&mailbox, &ids).await;
    assert!(fetched.messages[0].is_success());
    assert_eq!(fetched.item_ids()[0].id, ids[0].id);
    assert_ne!(fetched.item_ids()[0].change_key, ids[0].change_key);
    assert!(folder_ids(&mailbox, DistinguishedFolderId::Contacts).await.is_empty());
    assert_eq!(
        folder_ids(&mailbox, DistinguishedFolderId::DeletedItems).await,
        vec![ids[0].id.clone()]
    );
    assert_eq!(mailbox.item_count().await, 1);

    assert!(delete(&mailbox, &ids, DisposalType::HardDelete).await.messages[0].is_success());
    assert_eq!(mailbox.item_count().await, 0);
}

#[tokio::test]
async fn soft_delete_hides_the_item_until_purged() {
    let mailbox = common::mailbox(ServerProfile::reference());
    let ids = create_contact(&mailbox).await;

    assert!(delete(&mailbox, &ids, DisposalType::SoftDelete).await.messages[0].is_success());

    assert_eq!(get(&mailbox, &ids).await.messages[0].code, ResponseCode::ErrorItemNotFound);
    assert!(folder_ids(&mailbox, DistinguishedFolderId::DeletedItems).await.is_empty());
    assert_eq!(mailbox.item_count().await, 0);
    assert_eq!(mailbox.recoverable_count().await, 1);

    // Soft-deleting again finds nothing; a hard delete purges it.
    assert_eq!(
        delete(&mailbox, &ids, DisposalType::SoftDelete).await.messages[0].code,
        ResponseCode::ErrorItemNotFound
    );
    assert!(delete(&mailbox, &ids, DisposalType::HardDelete).await.messages[0].is_success());
    assert_eq!(mailbox.recoverable_count().await, 0);
    assert_eq!(
        delete(&mailbox, &ids, DisposalType::HardDelete).await.messages[0].code,
        ResponseCode::ErrorItemNotFound
    );
}
