// src/domain/repositories/repository.rs
use crate::domain::error::DomainError;
use crate::domain::link::Link;

/// Repository trait for link persistence.
///
/// Insert-or-replace keyed by the remote identity hash; read queries are the
/// minimum the rendering layer needs. Methods speak in domain terms so the
/// storage engine can be swapped without touching domain or service code.
pub trait LinkRepository: std::fmt::Debug + Send + Sync {
    /// Insert a link, or fully replace the existing row with the same hash.
    /// Single-statement, atomic per row. Replaces every field, including
    /// clearing `via` when the new value is `None`.
    fn upsert(&self, link: &Link) -> Result<(), DomainError>;

    /// Look up a link by its identity hash.
    fn get_by_hash(&self, hash: &str) -> Result<Option<Link>, DomainError>;

    /// Maximum stored timestamp, or `None` when the store is empty.
    fn latest_timestamp(&self) -> Result<Option<i64>, DomainError>;

    /// Most recent links, descending by timestamp, at most `n`.
    fn most_recent(&self, n: usize) -> Result<Vec<Link>, DomainError>;

    /// Distinct `YYYY-MM` buckets with at least one link, newest first.
    fn distinct_months(&self) -> Result<Vec<String>, DomainError>;

    /// All links whose timestamp falls in the given `YYYY-MM` month.
    fn links_in_month(&self, year_month: &str) -> Result<Vec<Link>, DomainError>;

    /// Replace only the `via` column of the row with the given hash.
    /// Returns `false` when no row matches; never touches other columns.
    fn update_via(&self, hash: &str, via: &str) -> Result<bool, DomainError>;
}
