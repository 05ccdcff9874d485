//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small stub encyclopedia and run the
//! full worker/writer pipeline against it end-to-end.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;
use wiki_ripple::config::Config;
use wiki_ripple::crawler::Coordinator;
use wiki_ripple::state::{Page, WorkerExit};
use wiki_ripple::storage::{IndexRow, SqliteStorage, Storage, StorageError, StorageResult};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Redirects every request to the next title of the list, round robin
struct RandomArticle {
    titles: Vec<&'static str>,
    next: AtomicUsize,
}

impl RandomArticle {
    fn new(titles: &[&'static str]) -> Self {
        Self {
            titles: titles.to_vec(),
            next: AtomicUsize::new(0),
        }
    }
}

impl Respond for RandomArticle {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        let location = format!("/wiki/{}", self.titles[n % self.titles.len()]);
        ResponseTemplate::new(302).insert_header("Location", location.as_str())
    }
}

/// Storage whose every write fails
struct BrokenStorage;

impl Storage for BrokenStorage {
    fn write_batch(&mut self, _pages: &[Page]) -> StorageResult<usize> {
        Err(StorageError::Database("disk I/O error".to_string()))
    }

    fn count_pages(&self) -> StorageResult<u64> {
        Ok(0)
    }

    fn load_pages(&self, _limit: u64, _offset: u64) -> StorageResult<Vec<IndexRow>> {
        Ok(Vec::new())
    }

    fn get_page(&self, _title: &str) -> StorageResult<Option<Page>> {
        Ok(None)
    }
}

/// Renders an article the way the encyclopedia lays it out
fn article_html(title: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|link| format!(r#"<a href="/wiki/{}">{}</a> "#, link, link))
        .collect();

    format!(
        r#"<html><head><title>{title}</title></head><body>
        <h1 id="firstHeading">{title}</h1>
        <div id="mw-content-text"><div class="mw-parser-output">
            <table class="infobox"><tr><td>{title} infobox</td></tr></table>
            <p>{title} is an animal.<sup class="reference">[1]</sup></p>
            <p>See also: {anchors}</p>
        </div></div>
        <div id="catlinks"><div id="mw-normal-catlinks"><ul>
            <li><a href="/wiki/Category:Animals">Animals</a></li>
            <li><a href="/wiki/Category:Mammals">Mammals</a></li>
        </ul></div></div>
        <ul><li id="footer-info-lastmod"> This page was last edited on 18 January 2018, at 21:30.</li></ul>
        </body></html>"#,
        title = title,
        anchors = anchors
    )
}

async fn mount_article(server: &MockServer, title: &str, links: &[&str]) {
    Mock::given(method("GET"))
        .and(path(format!("/wiki/{}", title)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(article_html(title, links))
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_random(server: &MockServer, titles: &[&'static str]) {
    Mock::given(method("GET"))
        .and(path("/wiki/Special:Random"))
        .respond_with(RandomArticle::new(titles))
        .mount(server)
        .await;
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Creates a test configuration pointing at the stub server
fn create_test_config(
    server: &MockServer,
    db_path: &Path,
    workers: usize,
    pages: u64,
    depth: u32,
) -> Config {
    Config {
        workers,
        pages,
        depth,
        interval_ms: 0,
        entry_url: format!("{}/wiki/Special:Random", server.uri()),
        host_pattern: r"127\.0\.0\.1".to_string(),
        database_path: db_path.to_string_lossy().into_owned(),
        batch_size: 2,
        queue_capacity: 8,
        ..Config::default()
    }
}

fn stored_titles(db_path: &Path) -> Vec<String> {
    let storage = SqliteStorage::open(db_path).expect("Failed to open database");
    let mut titles: Vec<String> = storage
        .load_pages(100, 0)
        .expect("Failed to load pages")
        .into_iter()
        .map(|row| row.title)
        .collect();
    titles.sort();
    titles
}

#[tokio::test]
async fn test_single_page_at_depth_zero() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("pages.db");

    // No robots.txt mock: the 404 leaves everything allowed
    mount_random(&mock_server, &["Dog"]).await;
    mount_article(&mock_server, "Dog", &["Cat", "Wolf"]).await;
    for title in ["Cat", "Wolf"] {
        Mock::given(method("GET"))
            .and(path(format!("/wiki/{}", title)))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;
    }

    let config = create_test_config(&mock_server, &db_path, 1, 1, 0);
    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let summary = coordinator.run().await.expect("Crawl failed");

    assert_eq!(summary.committed, 1);
    assert_eq!(summary.workers.len(), 1);

    let worker = &summary.workers[0];
    assert_eq!(worker.exit, WorkerExit::TargetReached);
    assert_eq!(worker.crawled, 1);
    let writer = worker.writer.expect("Writer report missing");
    assert_eq!(writer.committed, 1);
    assert!(!writer.failed);

    assert_eq!(stored_titles(&db_path), vec!["Dog".to_string()]);
}

#[tokio::test]
async fn test_stored_page_round_trip() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("pages.db");

    mount_random(&mock_server, &["Dog"]).await;
    mount_article(&mock_server, "Dog", &["Cat", "Gray_wolf", "Cat"]).await;

    let config = create_test_config(&mock_server, &db_path, 1, 1, 0);
    Coordinator::new(config)
        .unwrap()
        .run()
        .await
        .expect("Crawl failed");

    let storage = SqliteStorage::open(&db_path).unwrap();
    let page = storage.get_page("Dog").unwrap().expect("Dog not stored");
    assert_eq!(page.content(), "Dog is an animal.\nSee also: Cat Gray_wolf Cat");
    assert_eq!(
        page.categories(),
        &["Animals".to_string(), "Mammals".to_string()]
    );
    assert_eq!(page.out_links(), &["Cat".to_string(), "Gray wolf".to_string()]);
    assert_eq!(page.last_modify_column(), "2018-01-18 21:30");
}

#[tokio::test]
async fn test_breadth_first_follows_links_to_max_depth() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("pages.db");

    mount_robots(&mock_server, "User-agent: *\nAllow: /\n").await;
    mount_random(&mock_server, &["Dog"]).await;
    mount_article(&mock_server, "Dog", &["Cat", "Wolf"]).await;
    mount_article(&mock_server, "Cat", &["Dog", "Lion"]).await;
    mount_article(&mock_server, "Wolf", &["Dog", "Fox"]).await;
    for title in ["Lion", "Fox"] {
        Mock::given(method("GET"))
            .and(path(format!("/wiki/{}", title)))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;
    }

    let config = create_test_config(&mock_server, &db_path, 1, 3, 1);
    let summary = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(summary.committed, 3);
    assert_eq!(
        stored_titles(&db_path),
        vec!["Cat".to_string(), "Dog".to_string(), "Wolf".to_string()]
    );
}

#[tokio::test]
async fn test_seed_disallowed_by_robots() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("pages.db");

    mount_robots(
        &mock_server,
        "User-agent: *\nDisallow: /wiki/Special\nAllow: /wiki/\n",
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/wiki/Special:Random"))
        .respond_with(RandomArticle::new(&["Dog"]))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, &db_path, 2, 4, 1);
    let summary = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(summary.committed, 0);
    assert_eq!(summary.workers.len(), 2);
    for worker in &summary.workers {
        assert_eq!(worker.exit, WorkerExit::SeedDisallowed);
        assert_eq!(worker.crawled, 0);
    }
    assert!(stored_titles(&db_path).is_empty());
}

#[tokio::test]
async fn test_disallowed_link_is_skipped() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("pages.db");

    mount_robots(
        &mock_server,
        "User-agent: otherbot\nDisallow: /\n\nUser-agent: *\nDisallow: /wiki/Wolf\n",
    )
    .await;
    mount_random(&mock_server, &["Dog"]).await;
    mount_article(&mock_server, "Dog", &["Wolf", "Cat"]).await;
    mount_article(&mock_server, "Cat", &["Dog"]).await;
    Mock::given(method("GET"))
        .and(path("/wiki/Wolf"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, &db_path, 1, 2, 1);
    let summary = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(summary.committed, 2);
    assert_eq!(
        stored_titles(&db_path),
        vec!["Cat".to_string(), "Dog".to_string()]
    );
}

#[tokio::test]
async fn test_page_without_categories_is_discarded() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("pages.db");

    mount_random(&mock_server, &["Stub", "Dog"]).await;
    mount_article(&mock_server, "Dog", &[]).await;
    Mock::given(method("GET"))
        .and(path("/wiki/Stub"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
            <h1 id="firstHeading">Stub</h1>
            <div id="mw-content-text"><div class="mw-parser-output"><p>Short.</p></div></div>
            </body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, &db_path, 1, 1, 0);
    let summary = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(summary.committed, 1);
    assert_eq!(stored_titles(&db_path), vec!["Dog".to_string()]);
}

#[tokio::test]
async fn test_seed_never_enters_visited_set() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("pages.db");

    mount_random(&mock_server, &["Dog", "Cat", "Wolf"]).await;
    for title in ["Dog", "Cat", "Wolf"] {
        mount_article(&mock_server, title, &[]).await;
    }

    let config = create_test_config(&mock_server, &db_path, 1, 3, 0);
    let seed = format!("{}/wiki/Special:Random", mock_server.uri());
    let coordinator = Coordinator::new(config).unwrap();
    let summary = coordinator.run().await.unwrap();

    // Three re-seeds happened, one per stored page
    assert_eq!(summary.committed, 3);
    let visited = coordinator.visited();
    assert!(!visited.contains(&seed));
    assert!(visited.contains(&format!("{}/wiki/Dog", mock_server.uri())));
    assert_eq!(visited.len(), 3);
}

#[tokio::test]
async fn test_multiple_workers_split_the_target() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("pages.db");

    let titles = ["Dog", "Cat", "Wolf", "Fox", "Lion", "Tiger", "Horse", "Bear"];
    mount_random(&mock_server, &titles).await;
    for title in titles {
        mount_article(&mock_server, title, &[]).await;
    }

    let config = create_test_config(&mock_server, &db_path, 3, 5, 0);
    let summary = Coordinator::new(config).unwrap().run().await.unwrap();

    let mut shares: Vec<u64> = summary.workers.iter().map(|w| w.share).collect();
    shares.sort();
    assert_eq!(shares, vec![1, 2, 2]);
    assert_eq!(summary.committed, 5);
    assert_eq!(stored_titles(&db_path).len(), 5);
    for worker in &summary.workers {
        assert_eq!(worker.exit, WorkerExit::TargetReached);
        assert_eq!(worker.crawled, worker.share);
    }
}

#[tokio::test]
async fn test_writer_failure_is_isolated() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("pages.db");

    let titles = ["Dog", "Cat", "Wolf", "Fox", "Lion", "Tiger", "Horse", "Bear"];
    mount_random(&mock_server, &titles).await;
    for title in titles {
        mount_article(&mock_server, title, &[]).await;
    }

    let mut config = create_test_config(&mock_server, &db_path, 2, 4, 0);
    config.batch_size = 1;
    let coordinator = Coordinator::new(config).unwrap();

    let path = db_path.clone();
    let summary = coordinator
        .run_with(move |id| -> StorageResult<Box<dyn Storage>> {
            if id == 0 {
                Ok(Box::new(BrokenStorage))
            } else {
                Ok(Box::new(SqliteStorage::open(&path)?))
            }
        })
        .await
        .unwrap();

    assert_eq!(summary.workers.len(), 2);
    assert_eq!(summary.failed_pipelines(), 1);

    let broken = summary.workers.iter().find(|w| w.worker_id == 0).unwrap();
    assert!(broken.writer.unwrap().failed);

    let healthy = summary.workers.iter().find(|w| w.worker_id == 1).unwrap();
    assert_eq!(healthy.exit, WorkerExit::TargetReached);
    assert_eq!(healthy.writer.unwrap().committed, 2);

    // Only the surviving pair contributes to the total
    assert_eq!(summary.committed, 2);
    assert_eq!(stored_titles(&db_path).len(), 2);
}

#[tokio::test]
async fn test_unopenable_storage_skips_pipeline() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("pages.db");

    let titles = ["Dog", "Cat", "Wolf", "Fox"];
    mount_random(&mock_server, &titles).await;
    for title in titles {
        mount_article(&mock_server, title, &[]).await;
    }

    let config = create_test_config(&mock_server, &db_path, 2, 4, 0);
    let coordinator = Coordinator::new(config).unwrap();

    let path = db_path.clone();
    let summary = coordinator
        .run_with(move |id| {
            if id == 0 {
                Err(StorageError::Database("unable to open database file".to_string()))
            } else {
                SqliteStorage::open(&path)
            }
        })
        .await
        .unwrap();

    assert_eq!(summary.workers.len(), 1);
    assert_eq!(summary.workers[0].worker_id, 1);
    assert_eq!(summary.committed, 2);
}
