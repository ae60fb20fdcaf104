// src/domain/repositories/snapshot.rs
use crate::domain::error::DomainResult;
use std::fmt::Debug;
use std::path::Path;

/// One record of an externally produced export snapshot.
///
/// Snapshots are already tag-parsed upstream; `tags` stays the raw
/// space-delimited string and is only scanned for `via:` tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotPost {
    pub href: String,
    pub hash: String,
    pub tags: String,
}

/// Port for loading an export snapshot wholesale into memory.
pub trait SnapshotRepository: Debug + Send + Sync {
    fn load(&self, path: &Path) -> DomainResult<Vec<SnapshotPost>>;
}
