use crate::core::error::ApiError;
use crate::core::types::{CommentFilter, ModuleScope, Release, TestVersion, TestVersionFilter};
use crate::ports::OctaneApi;
use std::collections::HashSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct BulkUpdateStats {
    pub pages: u64,
    pub scanned: u64,
    pub updated: u64,
    pub already_tagged: u64,
    pub skipped_empty_comment: u64,
    pub failed_updates: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UpdateOutcome {
    Updated,
    AlreadyTagged,
    Failed,
}

/// Pages through the test versions matching the scope and comment filter,
/// newest first, and adds the release to the first version seen per test.
///
/// Remote failures inside the loop are logged and counted, never propagated:
/// a failed page fetch ends the run early with the statistics gathered so
/// far, a failed update moves on to the next record.
pub(crate) async fn run_bulk_update(
    api: &dyn OctaneApi,
    release: &Release,
    scope: &ModuleScope,
    comment_filter: &CommentFilter,
    max_page_size: usize,
    cancel: &CancellationToken,
) -> BulkUpdateStats {
    let filter = TestVersionFilter::new(scope, comment_filter);
    let mut stats = BulkUpdateStats::default();
    let mut processed: HashSet<String> = HashSet::new();
    let mut offset: u64 = 0;

    debug!("Using the max page size: {}", max_page_size);

    loop {
        if cancel.is_cancelled() {
            info!(
                "Cancellation requested; stopping after {} scanned test version(s)",
                stats.scanned
            );
            break;
        }

        let page = match api.fetch_test_versions(&filter, offset, max_page_size).await {
            Ok(page) => page,
            Err(e) => {
                log_page_error(&e, max_page_size);
                break;
            }
        };

        if offset == 0 {
            info!(
                "total of {} test versions, starting from offset 0",
                page.total_count
            );
        } else {
            info!("Got to offset {}", offset);
        }

        if page.data.is_empty() {
            break;
        }
        stats.pages += 1;

        for test_version in &page.data {
            if cancel.is_cancelled() {
                break;
            }
            stats.scanned += 1;

            // insert() also answers "seen before"; the newest version of a
            // test is always the first one encountered thanks to the
            // descending name ordering.
            if !processed.insert(test_version.test.id.clone()) {
                continue;
            }

            // The test id stays in the processed set even when the comment
            // check skips the version, so an older version of the same test
            // can never be updated instead.
            if comment_filter.requires_nonempty_comment()
                && test_version.comment.as_deref().unwrap_or("").is_empty()
            {
                stats.skipped_empty_comment += 1;
                continue;
            }

            if comment_filter.logs_full_comment() {
                debug!(
                    "Full comment of the test version is \"{}\"",
                    test_version.comment.as_deref().unwrap_or("")
                );
            }
            debug!(
                "Considering the test version with id {} as the version that needs to be updated for the test with id {}",
                test_version.id, test_version.test.id
            );

            match update_test_version(api, test_version, release).await {
                UpdateOutcome::Updated => stats.updated += 1,
                UpdateOutcome::AlreadyTagged => stats.already_tagged += 1,
                UpdateOutcome::Failed => stats.failed_updates += 1,
            }
        }

        offset += page.data.len() as u64;
        if page.total_count <= offset {
            break;
        }
    }

    stats
}

pub(crate) async fn update_test_version(
    api: &dyn OctaneApi,
    test_version: &TestVersion,
    release: &Release,
) -> UpdateOutcome {
    if test_version
        .releases
        .data
        .iter()
        .any(|reference| reference.id == release.id)
    {
        info!(
            "Test {} already has the release '{}' set for the latest version of the test",
            test_version.test.id, release.name
        );
        return UpdateOutcome::AlreadyTagged;
    }

    let mut releases = test_version.releases.data.clone();
    releases.push(release.to_ref());
    info!(
        "Adding release '{}' to the test version with id {} of the test with id {}",
        release.name, test_version.id, test_version.test.id
    );

    match api
        .update_test_version_releases(&test_version.id, &releases)
        .await
    {
        Ok(()) => {
            info!(
                "Test version with id {} was updated successfully",
                test_version.id
            );
            UpdateOutcome::Updated
        }
        Err(ApiError::Forbidden { workspace_id }) => {
            error!(
                "The user in the configuration file does not have the necessary permissions to update the test version entities in workspace {}",
                workspace_id
            );
            UpdateOutcome::Failed
        }
        Err(e) => {
            error!(
                "Failed to update the test version with id {}: {}",
                test_version.id, e
            );
            UpdateOutcome::Failed
        }
    }
}

fn log_page_error(err: &ApiError, max_page_size: usize) {
    match err {
        ApiError::Forbidden { workspace_id } => error!(
            "The user in the configuration file does not have the necessary permissions to read the test version entities in workspace {}",
            workspace_id
        ),
        ApiError::PageSizeRejected { body } => error!(
            "The maxPageSize parameter is too large ({}). Check the site parameter 'MAX_PAGE_SIZE' and use that value in the configuration file. Full error message: {}",
            max_page_size, body
        ),
        other => error!("Fetching test versions failed: {}", other),
    }
}
