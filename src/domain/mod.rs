pub mod error;
pub mod link;
pub mod remote;
pub mod repositories;
pub mod tag;
pub mod via;
