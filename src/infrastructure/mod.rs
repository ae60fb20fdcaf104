pub mod di;
pub mod export;
pub mod pinboard;
pub mod repositories;
