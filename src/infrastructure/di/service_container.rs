// src/infrastructure/di/service_container.rs
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::backfill_service::BackfillService;
use crate::application::services::render_service::RenderService;
use crate::application::services::sync_service::SyncService;
use crate::application::{BackfillServiceImpl, RenderServiceImpl, SyncServiceImpl};
use crate::config::Settings;
use crate::domain::repositories::snapshot::SnapshotRepository;
use crate::infrastructure::export::JsonExportRepository;
use crate::infrastructure::pinboard::PinboardClient;
use crate::infrastructure::repositories::sqlite::repository::SqliteLinkRepository;
use std::sync::Arc;

/// Production service container - single source of truth for service creation
#[derive(Debug)]
pub struct ServiceContainer {
    pub link_repository: Arc<SqliteLinkRepository>,
    pub snapshot_repository: Arc<dyn SnapshotRepository>,
    pub sync_service: Arc<dyn SyncService>,
    pub backfill_service: Arc<dyn BackfillService>,
    pub render_service: Arc<dyn RenderService>,
}

impl ServiceContainer {
    /// Create all services with explicit dependency injection
    pub fn new(settings: &Settings) -> ApplicationResult<Self> {
        let link_repository = Arc::new(
            SqliteLinkRepository::from_url(&settings.db_url).map_err(|e| {
                ApplicationError::Other(format!(
                    "Failed to open database {}: {}",
                    settings.db_url, e
                ))
            })?,
        );

        let remote = Arc::new(PinboardClient::new(
            settings.api_url.clone(),
            settings.api_token.clone(),
        ));

        let sync_service = Arc::new(SyncServiceImpl::new(
            link_repository.clone(),
            remote,
            settings.fetch_count,
            settings.fetch_tag.clone(),
        ));

        let backfill_service = Arc::new(BackfillServiceImpl::new(link_repository.clone()));

        let render_service = Arc::new(RenderServiceImpl::new(
            link_repository.clone(),
            settings.site.clone(),
        ));

        Ok(Self {
            link_repository,
            snapshot_repository: Arc::new(JsonExportRepository::new()),
            sync_service,
            backfill_service,
            render_service,
        })
    }
}
