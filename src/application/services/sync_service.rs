// src/application/services/sync_service.rs
use std::fmt::Debug;
use std::sync::Arc;

use crate::application::error::ApplicationResult;
use crate::domain::link::Link;
use crate::domain::remote::RemoteSource;
use crate::domain::repositories::repository::LinkRepository;
use chrono::Utc;
use tracing::{debug, info, instrument, warn};

/// Outcome of one sync pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncReport {
    /// Raw records received from the remote service.
    pub fetched: usize,
    /// Records actually written to the store.
    pub stored: usize,
    /// Records rejected for carrying a future timestamp.
    pub skipped_future: usize,
    /// Records that failed normalization and were passed over.
    pub failed: usize,
}

/// Service interface for the incremental fetch pass.
pub trait SyncService: Send + Sync + Debug {
    /// Fetch new remote posts and ingest them. One invocation does one pass
    /// to completion; retry on transport failure is the caller's business.
    fn sync(&self) -> ApplicationResult<SyncReport>;
}

#[derive(Debug)]
pub struct SyncServiceImpl<R: LinkRepository> {
    repository: Arc<R>,
    remote: Arc<dyn RemoteSource>,
    fetch_count: usize,
    fetch_tag: Option<String>,
}

impl<R: LinkRepository> SyncServiceImpl<R> {
    pub fn new(
        repository: Arc<R>,
        remote: Arc<dyn RemoteSource>,
        fetch_count: usize,
        fetch_tag: Option<String>,
    ) -> Self {
        Self {
            repository,
            remote,
            fetch_count,
            fetch_tag,
        }
    }
}

impl<R: LinkRepository> SyncService for SyncServiceImpl<R> {
    #[instrument(skip_all, level = "debug")]
    fn sync(&self) -> ApplicationResult<SyncReport> {
        let remote_ts = self.remote.latest_activity()?;
        let local_ts = self.repository.latest_timestamp()?.unwrap_or(0);

        // A tie means nothing new; an update within the same second as the
        // newest local record is silently missed, which is acceptable at
        // the remote service's activity granularity.
        if remote_ts <= local_ts {
            info!(
                "No new links. Remote: {}, local: {}",
                remote_ts, local_ts
            );
            return Ok(SyncReport::default());
        }

        let posts = self
            .remote
            .fetch_recent(self.fetch_count, self.fetch_tag.as_deref())?;
        let now = Utc::now().timestamp();

        let mut report = SyncReport {
            fetched: posts.len(),
            ..SyncReport::default()
        };

        for raw in posts {
            let link = match Link::normalize(raw) {
                Ok(link) => link,
                Err(e) => {
                    warn!("Skipping record that failed normalization: {}", e);
                    report.failed += 1;
                    continue;
                }
            };

            if link.ts > now {
                info!("Skipping future link: {}", link.url);
                report.skipped_future += 1;
                continue;
            }

            let hash = link.hash.clone();
            self.repository
                .upsert(&link)
                .map_err(|e| e.context(format!("storing link {}", hash)))?;
            debug!("Stored link {} ({})", hash, link.url);
            report.stored += 1;
        }

        info!(
            "Sync complete: {} fetched, {} stored, {} future-skipped, {} failed",
            report.fetched, report.stored, report.skipped_future, report.failed
        );
        Ok(report)
    }
}
