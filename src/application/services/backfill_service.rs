// src/application/services/backfill_service.rs
use std::fmt::Debug;
use std::sync::Arc;

use crate::application::error::ApplicationResult;
use crate::domain::repositories::repository::LinkRepository;
use crate::domain::repositories::snapshot::SnapshotPost;
use crate::domain::tag::extract_pseudo_tags;
use crate::domain::via;
use tracing::{debug, info, instrument};

/// One link the backfill would touch, for the preview report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackfillCandidate {
    pub hash: String,
    pub url: String,
    pub current_via: Option<String>,
    pub would_set_via: String,
}

/// Outcome of an applied backfill run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BackfillReport {
    /// Snapshot records that passed the filter and carried a via code.
    pub candidates: usize,
    /// Rows whose via column was written.
    pub updated: usize,
    /// Candidates with no matching hash in the store.
    pub unmatched: usize,
}

/// Service interface for reconciling via fields from an export snapshot.
///
/// This is a deliberately narrower write path than the sync upsert: it only
/// ever touches the via column, because the snapshot may be stale or
/// differently tag-cleaned than the live records.
pub trait BackfillService: Send + Sync + Debug {
    /// Same selection and expansion as `apply`, but produces a report
    /// instead of writing.
    fn preview(&self, snapshot: &[SnapshotPost]) -> ApplicationResult<Vec<BackfillCandidate>>;

    /// Apply the via updates to all matching rows.
    fn apply(&self, snapshot: &[SnapshotPost]) -> ApplicationResult<BackfillReport>;
}

#[derive(Debug)]
pub struct BackfillServiceImpl<R: LinkRepository> {
    repository: Arc<R>,
}

impl<R: LinkRepository> BackfillServiceImpl<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Filter snapshot records to mlp links that carry a via tag.
    ///
    /// Historical gap correction: only `mlp`-tagged links ever lost their
    /// via attribution, so the filter is that specific and stays so.
    fn is_candidate(post: &SnapshotPost) -> bool {
        post.tags.split_whitespace().any(|tag| tag == "mlp") && post.tags.contains("via:")
    }

    /// Extract and expand the via value of a snapshot record, if usable.
    fn expanded_via(post: &SnapshotPost) -> Option<String> {
        let extracted = extract_pseudo_tags(post.tags.split_whitespace());
        match extracted.via_code.as_deref() {
            None | Some("") => None,
            Some(code) => Some(via::expand(code)),
        }
    }
}

impl<R: LinkRepository> BackfillService for BackfillServiceImpl<R> {
    #[instrument(skip_all, level = "debug", fields(snapshot_len = snapshot.len()))]
    fn preview(&self, snapshot: &[SnapshotPost]) -> ApplicationResult<Vec<BackfillCandidate>> {
        let mut candidates = Vec::new();

        for post in snapshot.iter().filter(|p| Self::is_candidate(p)) {
            let Some(would_set_via) = Self::expanded_via(post) else {
                continue;
            };

            if let Some(stored) = self.repository.get_by_hash(&post.hash)? {
                candidates.push(BackfillCandidate {
                    hash: post.hash.clone(),
                    url: stored.url,
                    current_via: stored.via,
                    would_set_via,
                });
            } else {
                debug!("No matching link for hash: {}", post.hash);
            }
        }

        info!("Preview: {} links would be updated", candidates.len());
        Ok(candidates)
    }

    #[instrument(skip_all, level = "debug", fields(snapshot_len = snapshot.len()))]
    fn apply(&self, snapshot: &[SnapshotPost]) -> ApplicationResult<BackfillReport> {
        let mut report = BackfillReport::default();

        for post in snapshot.iter().filter(|p| Self::is_candidate(p)) {
            let Some(via_value) = Self::expanded_via(post) else {
                continue;
            };
            report.candidates += 1;

            if self.repository.update_via(&post.hash, &via_value)? {
                info!("Updated via for {} -> {}", post.href, via_value);
                report.updated += 1;
            } else {
                debug!("No matching link for hash: {}", post.hash);
                report.unmatched += 1;
            }
        }

        info!(
            "Backfill complete: {} candidates, {} updated, {} unmatched",
            report.candidates, report.updated, report.unmatched
        );
        Ok(report)
    }
}
