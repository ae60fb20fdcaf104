// src/infrastructure/export.rs
//! Loader for Pinboard export JSON files, the Batch Reconciler's input.

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::repositories::snapshot::{SnapshotPost, SnapshotRepository};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, instrument};

/// One entry of a Pinboard export file. Fields beyond the ones the
/// reconciler needs are ignored on purpose; the snapshot is read-only.
#[derive(Deserialize, Debug)]
struct ExportEntry {
    href: String,
    hash: String,
    #[serde(default)]
    tags: String,
}

#[derive(Debug, Default)]
pub struct JsonExportRepository;

impl JsonExportRepository {
    pub fn new() -> Self {
        Self
    }
}

impl SnapshotRepository for JsonExportRepository {
    #[instrument(skip_all, level = "debug", fields(path = %path.display()))]
    fn load(&self, path: &Path) -> DomainResult<Vec<SnapshotPost>> {
        let file = File::open(path).map_err(|e| {
            DomainError::Snapshot(format!("cannot open {}: {}", path.display(), e))
        })?;

        let entries: Vec<ExportEntry> = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| {
                DomainError::Snapshot(format!("cannot parse {}: {}", path.display(), e))
            })?;

        debug!("Loaded {} export entries", entries.len());

        Ok(entries
            .into_iter()
            .map(|entry| SnapshotPost {
                href: entry.href,
                hash: entry.hash,
                tags: entry.tags,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn given_export_file_when_load_then_posts_with_tags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"href":"https://example.com","hash":"h1","tags":"mlp via:tbray","time":"2024-01-15T10:00:00Z","shared":"yes"}},
                {{"href":"https://example.org","hash":"h2"}}]"#
        )
        .unwrap();

        let posts = JsonExportRepository::new().load(file.path()).unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].hash, "h1");
        assert_eq!(posts[0].tags, "mlp via:tbray");
        assert_eq!(posts[1].tags, "");
    }

    #[test]
    fn given_missing_file_when_load_then_snapshot_error() {
        let result = JsonExportRepository::new().load(Path::new("/no/such/export.json"));
        assert!(matches!(result, Err(DomainError::Snapshot(_))));
    }
}
