pub mod repository;
pub mod snapshot;
