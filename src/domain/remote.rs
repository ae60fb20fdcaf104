// src/domain/remote.rs
use crate::domain::error::DomainResult;
use std::fmt::Debug;

/// A bookmark as delivered by the remote service, before normalization.
///
/// `tags` is the raw space-delimited string and may still contain `via:`
/// and `date:` pseudo-tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPost {
    pub ts: i64,
    pub url: String,
    pub title: String,
    pub body: String,
    pub tags: String,
    pub hash: String,
}

/// Port for the upstream bookmarking service.
///
/// Transport failures (service unreachable, malformed response) surface as
/// `DomainError::Transport` and are fatal to the calling sync invocation.
pub trait RemoteSource: Debug + Send + Sync {
    /// Epoch seconds of the most recent activity on the remote account.
    fn latest_activity(&self) -> DomainResult<i64>;

    /// Fetch the most recent posts, optionally restricted to one tag.
    fn fetch_recent(&self, count: usize, tag: Option<&str>) -> DomainResult<Vec<RawPost>>;
}
