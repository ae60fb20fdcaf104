pub mod backfill_service;
pub mod render_service;
pub mod sync_service;

pub use backfill_service::{BackfillService, BackfillServiceImpl};
pub use render_service::{RenderService, RenderServiceImpl};
pub use sync_service::{SyncService, SyncServiceImpl};
