// src/util/testing.rs

use std::sync::OnceLock;

use tempfile::TempDir;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::domain::link::Link;
use crate::infrastructure::repositories::sqlite::repository::SqliteLinkRepository;

static TRACING: OnceLock<()> = OnceLock::new();

/// Initialize tracing exactly once for the whole test binary.
/// Honors RUST_LOG, defaults to warn.
pub fn init_test_env() {
    TRACING.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_filter(filter))
            .init();
    });
}

/// Fresh repository on a temp-file database with migrations applied.
/// Keep the returned TempDir alive for the test's duration.
pub fn setup_test_repository() -> (SqliteLinkRepository, TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let db_path = dir.path().join("linklog-test.db");
    let repo = SqliteLinkRepository::from_url(db_path.to_str().expect("utf-8 temp path"))
        .expect("open test database");
    (repo, dir)
}

/// A minimal normalized link for repository tests.
pub fn sample_link(hash: &str, ts: i64) -> Link {
    Link {
        id: None,
        hash: hash.to_string(),
        ts,
        url: format!("https://example.com/{}", hash),
        title: format!("Title for {}", hash),
        body: "Some commentary".to_string(),
        via: None,
        tags: vec!["python".to_string(), "coding".to_string()],
    }
}
