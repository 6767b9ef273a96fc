//! Tests for the network node service.

use std::sync::Arc;

use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::network::test_nodes::node;
use crate::domain::ports::MockNetworkNodeRepository;
use crate::domain::staff::test_access;
use crate::domain::test_fixtures::{fixture_clock, fixture_timestamp};
use crate::domain::{
    ContactId, Detachment, ErrorCode, LevelChange, NodeName, NodeUpdate, ProductId, SupplierRef,
};

#[fixture]
fn draft() -> NodeDraft {
    NodeDraft::new(
        NodeName::parse("М.Видео").expect("name"),
        ContactId::new(4),
        vec![ProductId::new(2), ProductId::new(1)],
        Some(NodeId::new(1)),
    )
}

fn service(repo: MockNetworkNodeRepository) -> NetworkService<MockNetworkNodeRepository> {
    NetworkService::new(Arc::new(repo), fixture_clock())
}

fn retailer() -> NetworkNode {
    let mut retailer = node(2, "М.Видео", "Россия", "Москва", 1, "0", "2026-01-15");
    retailer.supplier = Some(SupplierRef {
        id: NodeId::new(1),
        name: "Xiaomi Manufacturing Plant".to_owned(),
    });
    retailer
}

#[rstest]
#[tokio::test]
async fn create_forces_zero_debt_and_stamps_time(draft: NodeDraft) {
    let mut repo = MockNetworkNodeRepository::new();
    repo.expect_create()
        .withf(|new| new.debt == Debt::ZERO && new.created_at == fixture_timestamp())
        .times(1)
        .return_once(|_| Ok(retailer()));

    let node = service(repo)
        .create_node(&test_access(), draft)
        .await
        .expect("created");

    assert_eq!(node.level, NodeLevel::RETAIL);
}

#[rstest]
#[tokio::test]
async fn replace_sends_every_writable_field(draft: NodeDraft) {
    let mut repo = MockNetworkNodeRepository::new();
    repo.expect_update()
        .withf(|id, patch| {
            *id == NodeId::new(2)
                && patch.supplier_id == Some(Some(NodeId::new(1)))
                && patch.product_ids == Some(vec![ProductId::new(1), ProductId::new(2)])
                && patch.contact_id == Some(ContactId::new(4))
        })
        .times(1)
        .return_once(|_, _| {
            Ok(NodeUpdate {
                node: retailer(),
                level_changes: Vec::new(),
            })
        });

    service(repo)
        .replace_node(&test_access(), NodeId::new(2), draft)
        .await
        .expect("replaced");
}

#[rstest]
#[tokio::test]
async fn empty_patch_reads_without_writing() {
    let mut repo = MockNetworkNodeRepository::new();
    repo.expect_update().times(0);
    repo.expect_find()
        .times(1)
        .return_once(|_| Ok(Some(retailer())));

    let node = service(repo)
        .patch_node(&test_access(), NodeId::new(2), NodePatch::default())
        .await
        .expect("unchanged node");

    assert_eq!(node.id, NodeId::new(2));
}

#[rstest]
#[tokio::test]
async fn detaching_returns_cascaded_node() {
    let mut repo = MockNetworkNodeRepository::new();
    repo.expect_update()
        .withf(|_, patch| patch.supplier_id == Some(None))
        .times(1)
        .return_once(|_, _| {
            let mut node = retailer();
            node.supplier = None;
            node.level = NodeLevel::FACTORY;
            Ok(NodeUpdate {
                node,
                level_changes: vec![LevelChange {
                    node: NodeId::new(2),
                    from: NodeLevel::RETAIL,
                    to: NodeLevel::FACTORY,
                }],
            })
        });

    let patch = NodePatch {
        supplier_id: Some(None),
        ..NodePatch::default()
    };
    let node = service(repo)
        .patch_node(&test_access(), NodeId::new(2), patch)
        .await
        .expect("detached");

    assert_eq!(node.level, NodeLevel::FACTORY);
}

#[rstest]
#[case(
    NetworkNodeRepositoryError::hierarchy(HierarchyError::SelfSupply { node: NodeId::new(2) }),
    ErrorCode::InvalidRequest,
    Some(json!({"field": "supplier_id", "code": "self_supply", "value": "2"}))
)]
#[case(
    NetworkNodeRepositoryError::hierarchy(HierarchyError::CyclicSupplierChain {
        node: NodeId::new(1),
        supplier: NodeId::new(3),
    }),
    ErrorCode::InvalidRequest,
    Some(json!({"field": "supplier_id", "code": "cyclic_supplier_chain", "value": "3"}))
)]
#[case(
    NetworkNodeRepositoryError::hierarchy(HierarchyError::UnknownNode { id: NodeId::new(9) }),
    ErrorCode::NotFound,
    Some(json!({"field": "supplier_id", "code": "not_found", "value": 9}))
)]
#[case(
    NetworkNodeRepositoryError::contact_not_found(ContactId::new(5)),
    ErrorCode::NotFound,
    Some(json!({"field": "contact_id", "code": "not_found", "value": 5}))
)]
#[case(
    NetworkNodeRepositoryError::product_not_found(ProductId::new(6)),
    ErrorCode::NotFound,
    Some(json!({"field": "products_ids", "code": "not_found", "value": 6}))
)]
#[case(
    NetworkNodeRepositoryError::node_not_found(NodeId::new(2)),
    ErrorCode::NotFound,
    None
)]
#[case(
    NetworkNodeRepositoryError::connection("refused"),
    ErrorCode::ServiceUnavailable,
    None
)]
#[case(NetworkNodeRepositoryError::query("syntax"), ErrorCode::InternalError, None)]
#[case(
    NetworkNodeRepositoryError::hierarchy(HierarchyError::CorruptChain { node: NodeId::new(1) }),
    ErrorCode::InternalError,
    None
)]
#[tokio::test]
async fn update_errors_map_to_domain_errors(
    #[case] failure: NetworkNodeRepositoryError,
    #[case] code: ErrorCode,
    #[case] details: Option<serde_json::Value>,
) {
    let mut repo = MockNetworkNodeRepository::new();
    repo.expect_update()
        .times(1)
        .return_once(move |_, _| Err(failure));

    let patch = NodePatch {
        supplier_id: Some(Some(NodeId::new(2))),
        ..NodePatch::default()
    };
    let error = service(repo)
        .patch_node(&test_access(), NodeId::new(2), patch)
        .await
        .expect_err("update fails");

    assert_eq!(error.code(), code);
    assert_eq!(error.details(), details.as_ref());
}

#[rstest]
#[tokio::test]
async fn delete_missing_node_is_not_found() {
    let mut repo = MockNetworkNodeRepository::new();
    repo.expect_delete().times(1).return_once(|_| Ok(None));

    let error = service(repo)
        .delete_node(&test_access(), NodeId::new(77))
        .await
        .expect_err("missing");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn delete_reports_success() {
    let mut repo = MockNetworkNodeRepository::new();
    repo.expect_delete().times(1).return_once(|_| {
        Ok(Some(Detachment {
            removed: vec![NodeId::new(1)],
            detached: vec![NodeId::new(2)],
            relevelled: Vec::new(),
        }))
    });

    service(repo)
        .delete_node(&test_access(), NodeId::new(1))
        .await
        .expect("deleted");
}

#[rstest]
#[tokio::test]
async fn clear_debt_deduplicates_ids() {
    let mut repo = MockNetworkNodeRepository::new();
    repo.expect_clear_debt()
        .withf(|ids| ids == &vec![NodeId::new(1), NodeId::new(3)])
        .times(1)
        .return_once(|_| Ok(2));

    let cleared = service(repo)
        .clear_debt(
            &test_access(),
            vec![NodeId::new(3), NodeId::new(1), NodeId::new(3)],
        )
        .await
        .expect("cleared");

    assert_eq!(cleared, 2);
}

#[rstest]
#[tokio::test]
async fn clear_debt_with_no_ids_skips_store() {
    let mut repo = MockNetworkNodeRepository::new();
    repo.expect_clear_debt().times(0);

    let cleared = service(repo)
        .clear_debt(&test_access(), Vec::new())
        .await
        .expect("nothing to clear");

    assert_eq!(cleared, 0);
}

#[rstest]
#[tokio::test]
async fn debt_info_uses_supplier_name() {
    let mut repo = MockNetworkNodeRepository::new();
    repo.expect_find().times(1).return_once(|_| Ok(Some(retailer())));

    let info = service(repo)
        .debt_info(&test_access(), NodeId::new(2))
        .await
        .expect("debt info");

    assert_eq!(info.node_name, "М.Видео");
    assert_eq!(info.supplier.as_deref(), Some("Xiaomi Manufacturing Plant"));
}

#[rstest]
#[tokio::test]
async fn missing_node_is_not_found() {
    let mut repo = MockNetworkNodeRepository::new();
    repo.expect_find().times(1).return_once(|_| Ok(None));

    let error = service(repo)
        .get_node(&test_access(), NodeId::new(5))
        .await
        .expect_err("missing");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "network node 5 not found");
}
