pub mod error;
pub mod services;

pub use services::{BackfillServiceImpl, RenderServiceImpl, SyncServiceImpl};
