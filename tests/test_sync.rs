// tests/test_sync.rs
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use linklog::application::error::ApplicationError;
use linklog::application::services::{SyncService, SyncServiceImpl};
use linklog::domain::error::{DomainError, DomainResult};
use linklog::domain::link::Link;
use linklog::domain::remote::{RawPost, RemoteSource};
use linklog::domain::repositories::repository::LinkRepository;
use linklog::infrastructure::repositories::sqlite::repository::SqliteLinkRepository;
use linklog::util::testing::{init_test_env, sample_link, setup_test_repository};

/// Canned remote that serves a fixed activity timestamp and post list,
/// and records whether a fetch was ever issued.
#[derive(Debug)]
struct StubRemote {
    latest: i64,
    posts: Vec<RawPost>,
    fetch_called: AtomicBool,
}

impl StubRemote {
    fn new(latest: i64, posts: Vec<RawPost>) -> Self {
        Self {
            latest,
            posts,
            fetch_called: AtomicBool::new(false),
        }
    }
}

impl RemoteSource for StubRemote {
    fn latest_activity(&self) -> DomainResult<i64> {
        Ok(self.latest)
    }

    fn fetch_recent(&self, _count: usize, _tag: Option<&str>) -> DomainResult<Vec<RawPost>> {
        self.fetch_called.store(true, Ordering::SeqCst);
        Ok(self.posts.clone())
    }
}

/// Remote whose calls fail at a chosen point, for the fatal-error paths.
/// `latest` of `None` fails the activity check itself; `Some(ts)` answers
/// the check and fails the fetch instead.
#[derive(Debug)]
struct BrokenRemote {
    latest: Option<i64>,
}

impl RemoteSource for BrokenRemote {
    fn latest_activity(&self) -> DomainResult<i64> {
        self.latest
            .ok_or_else(|| DomainError::Transport("posts/update: timed out".to_string()))
    }

    fn fetch_recent(&self, _count: usize, _tag: Option<&str>) -> DomainResult<Vec<RawPost>> {
        Err(DomainError::Transport(
            "posts/recent: malformed response".to_string(),
        ))
    }
}

/// Store wrapper that fails the upsert of one specific hash and delegates
/// everything else to the real repository.
#[derive(Debug)]
struct FailingUpsertRepo {
    inner: SqliteLinkRepository,
    fail_hash: String,
}

impl LinkRepository for FailingUpsertRepo {
    fn upsert(&self, link: &Link) -> Result<(), DomainError> {
        if link.hash == self.fail_hash {
            return Err(DomainError::RepositoryError(
                "Database error: disk I/O error".to_string(),
            ));
        }
        self.inner.upsert(link)
    }

    fn get_by_hash(&self, hash: &str) -> Result<Option<Link>, DomainError> {
        self.inner.get_by_hash(hash)
    }

    fn latest_timestamp(&self) -> Result<Option<i64>, DomainError> {
        self.inner.latest_timestamp()
    }

    fn most_recent(&self, n: usize) -> Result<Vec<Link>, DomainError> {
        self.inner.most_recent(n)
    }

    fn distinct_months(&self) -> Result<Vec<String>, DomainError> {
        self.inner.distinct_months()
    }

    fn links_in_month(&self, year_month: &str) -> Result<Vec<Link>, DomainError> {
        self.inner.links_in_month(year_month)
    }

    fn update_via(&self, hash: &str, via: &str) -> Result<bool, DomainError> {
        self.inner.update_via(hash, via)
    }
}

fn raw_post(hash: &str, ts: i64, tags: &str) -> RawPost {
    RawPost {
        ts,
        url: format!("https://example.com/{}", hash),
        title: format!("Title for {}", hash),
        body: "Some commentary".to_string(),
        tags: tags.to_string(),
        hash: hash.to_string(),
    }
}

#[test]
fn given_remote_not_newer_when_sync_then_no_fetch_issued() {
    init_test_env();
    let (repo, _dir) = setup_test_repository();
    let repo = Arc::new(repo);
    repo.upsert(&sample_link("abc123", 1_700_000_000)).unwrap();

    // Tie on the activity timestamp means nothing to do.
    let remote = Arc::new(StubRemote::new(
        1_700_000_000,
        vec![raw_post("def456", 1_699_999_000, "rust")],
    ));
    let service = SyncServiceImpl::new(repo.clone(), remote.clone(), 20, None);

    let report = service.sync().unwrap();

    assert_eq!(report.fetched, 0);
    assert_eq!(report.stored, 0);
    assert!(!remote.fetch_called.load(Ordering::SeqCst));
    assert!(repo.get_by_hash("def456").unwrap().is_none());
}

#[test]
fn given_new_activity_when_sync_then_links_normalized_and_stored() {
    init_test_env();
    let (repo, _dir) = setup_test_repository();
    let repo = Arc::new(repo);

    let remote = Arc::new(StubRemote::new(
        1_700_000_100,
        vec![
            raw_post("hash1", 1_700_000_000, "mlp via:tbray politics"),
            raw_post("hash2", 1_700_000_050, "rust coding"),
        ],
    ));
    let service = SyncServiceImpl::new(repo.clone(), remote, 20, None);

    let report = service.sync().unwrap();

    assert_eq!(report.fetched, 2);
    assert_eq!(report.stored, 2);
    assert_eq!(report.failed, 0);

    let stored = repo.get_by_hash("hash1").unwrap().unwrap();
    assert_eq!(
        stored.via.as_deref(),
        Some("https://www.tbray.org/ongoing/")
    );
    assert_eq!(stored.tags, vec!["mlp", "politics"]);

    let plain = repo.get_by_hash("hash2").unwrap().unwrap();
    assert_eq!(plain.via, None);
    assert_eq!(plain.tags, vec!["rust", "coding"]);
}

#[test]
fn given_future_timestamp_when_sync_then_record_skipped() {
    init_test_env();
    let (repo, _dir) = setup_test_repository();
    let repo = Arc::new(repo);

    let now = Utc::now().timestamp();
    let remote = Arc::new(StubRemote::new(
        now + 90_000,
        vec![
            raw_post("future1", now + 86_400, "rust"),
            raw_post("past1", now - 3_600, "rust"),
        ],
    ));
    let service = SyncServiceImpl::new(repo.clone(), remote, 20, None);

    let report = service.sync().unwrap();

    assert_eq!(report.fetched, 2);
    assert_eq!(report.stored, 1);
    assert_eq!(report.skipped_future, 1);
    assert!(repo.get_by_hash("future1").unwrap().is_none());
    assert!(repo.get_by_hash("past1").unwrap().is_some());
}

#[test]
fn given_malformed_date_tag_when_sync_then_record_failed_and_rest_stored() {
    init_test_env();
    let (repo, _dir) = setup_test_repository();
    let repo = Arc::new(repo);

    let remote = Arc::new(StubRemote::new(
        1_700_000_100,
        vec![
            raw_post("bad1", 1_700_000_000, "rust date:2024-13-99"),
            raw_post("good1", 1_700_000_050, "rust"),
        ],
    ));
    let service = SyncServiceImpl::new(repo.clone(), remote, 20, None);

    let report = service.sync().unwrap();

    assert_eq!(report.fetched, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.stored, 1);
    assert!(repo.get_by_hash("bad1").unwrap().is_none());
    assert!(repo.get_by_hash("good1").unwrap().is_some());
}

#[test]
fn given_repeated_sync_when_posts_overlap_then_rows_replaced_not_duplicated() {
    init_test_env();
    let (repo, _dir) = setup_test_repository();
    let repo = Arc::new(repo);

    let first = Arc::new(StubRemote::new(
        1_700_000_100,
        vec![raw_post("hash1", 1_700_000_000, "rust")],
    ));
    SyncServiceImpl::new(repo.clone(), first, 20, None)
        .sync()
        .unwrap();

    // The same post comes back on the next pass with edited tags.
    let second = Arc::new(StubRemote::new(
        1_700_000_200,
        vec![raw_post("hash1", 1_700_000_000, "rust via:nelson")],
    ));
    let report = SyncServiceImpl::new(repo.clone(), second, 20, None)
        .sync()
        .unwrap();

    assert_eq!(report.stored, 1);
    assert_eq!(repo.most_recent(10).unwrap().len(), 1);

    let stored = repo.get_by_hash("hash1").unwrap().unwrap();
    assert_eq!(
        stored.via.as_deref(),
        Some("https://www.somebits.com/weblog/")
    );
    assert_eq!(stored.tags, vec!["rust"]);
}

#[test]
fn given_failing_activity_check_when_sync_then_error_and_store_untouched() {
    init_test_env();
    let (repo, _dir) = setup_test_repository();
    let repo = Arc::new(repo);
    repo.upsert(&sample_link("existing", 1_700_000_000)).unwrap();

    let remote = Arc::new(BrokenRemote { latest: None });
    let service = SyncServiceImpl::new(repo.clone(), remote, 20, None);

    let err = service.sync().unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::Transport(_))
    ));

    assert_eq!(repo.latest_timestamp().unwrap(), Some(1_700_000_000));
    assert_eq!(repo.most_recent(10).unwrap().len(), 1);
}

#[test]
fn given_failing_fetch_when_sync_then_error_and_store_untouched() {
    init_test_env();
    let (repo, _dir) = setup_test_repository();
    let repo = Arc::new(repo);

    // The activity check passes; the fetch itself fails.
    let remote = Arc::new(BrokenRemote {
        latest: Some(1_700_000_100),
    });
    let service = SyncServiceImpl::new(repo.clone(), remote, 20, None);

    let err = service.sync().unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::Transport(_))
    ));
    assert!(repo.most_recent(10).unwrap().is_empty());
}

#[test]
fn given_storage_failure_mid_page_when_sync_then_error_names_hash_and_prior_rows_stay() {
    init_test_env();
    let (inner, _dir) = setup_test_repository();
    let repo = Arc::new(FailingUpsertRepo {
        inner,
        fail_hash: "hash2".to_string(),
    });

    let remote = Arc::new(StubRemote::new(
        1_700_000_100,
        vec![
            raw_post("hash1", 1_700_000_000, "rust"),
            raw_post("hash2", 1_700_000_050, "rust"),
            raw_post("hash3", 1_700_000_060, "rust"),
        ],
    ));
    let service = SyncServiceImpl::new(repo.clone(), remote, 20, None);

    let err = service.sync().unwrap_err();
    assert!(
        err.to_string().contains("hash2"),
        "error should name the failing hash, got: {}",
        err
    );

    // Rows stored before the failure survive; later ones were never reached.
    assert!(repo.get_by_hash("hash1").unwrap().is_some());
    assert!(repo.get_by_hash("hash2").unwrap().is_none());
    assert!(repo.get_by_hash("hash3").unwrap().is_none());
}

#[test]
fn given_empty_store_when_sync_then_everything_is_new() {
    init_test_env();
    let (repo, _dir) = setup_test_repository();
    let repo = Arc::new(repo);

    let remote = Arc::new(StubRemote::new(
        1_700_000_100,
        vec![raw_post("hash1", 1_700_000_000, "rust")],
    ));
    let report = SyncServiceImpl::new(repo.clone(), remote, 20, None)
        .sync()
        .unwrap();

    assert_eq!(report.stored, 1);
    assert_eq!(repo.latest_timestamp().unwrap(), Some(1_700_000_000));
}
