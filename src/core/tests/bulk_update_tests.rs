use super::mock_api::{MockOctaneApi, page, release, test_version};
use crate::core::bulk_update::{BulkUpdateStats, run_bulk_update};
use crate::core::error::ApiError;
use crate::core::types::{CommentFilter, ModuleScope, ScopeFilter};
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

fn target_release() -> crate::core::types::Release {
    release("1001", "R1", 0)
}

#[tokio::test]
async fn only_the_newest_version_per_test_is_updated() {
    let api = MockOctaneApi {
        pages: Mutex::new(vec![page(
            2,
            vec![
                test_version("2002", "42", Some("second pass"), &[]),
                test_version("2001", "42", Some("first pass"), &[]),
            ],
        )]),
        ..Default::default()
    };

    let stats = run_bulk_update(
        &api,
        &target_release(),
        &ModuleScope::AllTests,
        &CommentFilter::Any,
        100,
        &CancellationToken::new(),
    )
    .await;

    assert_eq!(stats.pages, 1);
    assert_eq!(stats.scanned, 2);
    assert_eq!(stats.updated, 1);

    let updates = api.updates.lock().unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].test_version_id, "2002");
    assert!(updates[0].releases.iter().any(|r| r.id == "1001"));
}

#[tokio::test]
async fn versions_already_carrying_the_release_are_left_alone() {
    let api = MockOctaneApi {
        pages: Mutex::new(vec![page(
            1,
            vec![test_version("2002", "42", None, &["1001"])],
        )]),
        ..Default::default()
    };

    let stats = run_bulk_update(
        &api,
        &target_release(),
        &ModuleScope::AllTests,
        &CommentFilter::Any,
        100,
        &CancellationToken::new(),
    )
    .await;

    assert_eq!(stats.already_tagged, 1);
    assert_eq!(stats.updated, 0);
    assert!(api.updates.lock().unwrap().is_empty());
}

#[tokio::test]
async fn existing_releases_are_preserved_in_the_update() {
    let api = MockOctaneApi {
        pages: Mutex::new(vec![page(
            1,
            vec![test_version("2002", "42", None, &["900"])],
        )]),
        ..Default::default()
    };

    run_bulk_update(
        &api,
        &target_release(),
        &ModuleScope::AllTests,
        &CommentFilter::Any,
        100,
        &CancellationToken::new(),
    )
    .await;

    let updates = api.updates.lock().unwrap();
    let ids: Vec<&str> = updates[0].releases.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["900", "1001"]);
}

#[tokio::test]
async fn empty_comment_skip_still_blocks_older_versions() {
    // Newest version has no comment: with the "*" sentinel it is skipped,
    // and the older commented version must not be updated in its place.
    let api = MockOctaneApi {
        pages: Mutex::new(vec![page(
            2,
            vec![
                test_version("2002", "42", None, &[]),
                test_version("2001", "42", Some("v1"), &[]),
            ],
        )]),
        ..Default::default()
    };

    let stats = run_bulk_update(
        &api,
        &target_release(),
        &ModuleScope::AllTests,
        &CommentFilter::NonEmpty,
        100,
        &CancellationToken::new(),
    )
    .await;

    assert_eq!(stats.skipped_empty_comment, 1);
    assert_eq!(stats.updated, 0);
    assert!(api.updates.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unassigned_scope_and_comment_reach_the_filter() {
    let api = MockOctaneApi {
        pages: Mutex::new(vec![page(
            1,
            vec![test_version("2002", "42", Some("tagged"), &[])],
        )]),
        ..Default::default()
    };

    run_bulk_update(
        &api,
        &target_release(),
        &ModuleScope::UnassignedTests,
        &CommentFilter::NonEmpty,
        250,
        &CancellationToken::new(),
    )
    .await;

    let requests = api.page_requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let (filter, offset, limit) = &requests[0];
    assert_eq!(filter.scope, ScopeFilter::Unassigned);
    assert_eq!(filter.comment.as_deref(), Some("*"));
    assert_eq!(*offset, 0);
    assert_eq!(*limit, 250);
}

#[tokio::test]
async fn pagination_walks_the_whole_collection() {
    let api = MockOctaneApi {
        pages: Mutex::new(vec![
            page(
                3,
                vec![
                    test_version("2003", "1", None, &[]),
                    test_version("2002", "2", None, &[]),
                ],
            ),
            page(3, vec![test_version("2001", "3", None, &[])]),
        ]),
        ..Default::default()
    };

    let stats = run_bulk_update(
        &api,
        &target_release(),
        &ModuleScope::AllTests,
        &CommentFilter::Any,
        2,
        &CancellationToken::new(),
    )
    .await;

    assert_eq!(stats.pages, 2);
    assert_eq!(stats.updated, 3);

    let requests = api.page_requests.lock().unwrap();
    let offsets: Vec<u64> = requests.iter().map(|(_, offset, _)| *offset).collect();
    assert_eq!(offsets, vec![0, 2]);
}

#[tokio::test]
async fn a_failed_update_does_not_stop_the_run() {
    let api = MockOctaneApi {
        pages: Mutex::new(vec![page(
            2,
            vec![
                test_version("2002", "1", None, &[]),
                test_version("2001", "2", None, &[]),
            ],
        )]),
        fail_updates_for: vec!["2002".to_string()],
        ..Default::default()
    };

    let stats = run_bulk_update(
        &api,
        &target_release(),
        &ModuleScope::AllTests,
        &CommentFilter::Any,
        100,
        &CancellationToken::new(),
    )
    .await;

    assert_eq!(stats.failed_updates, 1);
    assert_eq!(stats.updated, 1);
    assert_eq!(api.updates.lock().unwrap()[0].test_version_id, "2001");
}

#[tokio::test]
async fn a_failed_page_fetch_ends_the_run_early() {
    let api = MockOctaneApi {
        fail_next_fetch: Mutex::new(Some(ApiError::Forbidden { workspace_id: 1002 })),
        ..Default::default()
    };

    let stats = run_bulk_update(
        &api,
        &target_release(),
        &ModuleScope::AllTests,
        &CommentFilter::Any,
        100,
        &CancellationToken::new(),
    )
    .await;

    assert_eq!(stats, BulkUpdateStats::default());
    assert!(api.updates.lock().unwrap().is_empty());
}

#[tokio::test]
async fn a_cancelled_token_stops_before_the_first_fetch() {
    let api = MockOctaneApi {
        pages: Mutex::new(vec![page(1, vec![test_version("2002", "42", None, &[])])]),
        ..Default::default()
    };
    let cancel = CancellationToken::new();
    cancel.cancel();

    let stats = run_bulk_update(
        &api,
        &target_release(),
        &ModuleScope::AllTests,
        &CommentFilter::Any,
        100,
        &cancel,
    )
    .await;

    assert_eq!(stats, BulkUpdateStats::default());
    assert!(api.page_requests.lock().unwrap().is_empty());
}
