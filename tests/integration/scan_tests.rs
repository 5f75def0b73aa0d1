//! End-to-end scans against a mock archive

use crate::fixtures::{build_pdf, index_body, test_config};
use backscanner::extract::{
    ExtractError, Extraction, ExtractionStrategy, NativeTextStrategy, TextExtractor,
};
use backscanner::keywords::KeywordSet;
use backscanner::output::{FileReport, SnapshotOutcome, REPORT_TITLE};
use backscanner::scanner::{scan, Scanner};
use std::sync::{Arc, Mutex};
use std::thread::ThreadId;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TARGET: &str = "http://example.com/report.pdf";

async fn mount_index(server: &MockServer, target: &str, timestamps: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/cdx/search/cdx"))
        .and(query_param("url", target))
        .respond_with(ResponseTemplate::new(200).set_body_string(index_body(timestamps)))
        .mount(server)
        .await;
}

async fn mount_snapshot(server: &MockServer, timestamp: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path_regex(format!("^/web/{}/", timestamp)))
        .respond_with(response)
        .mount(server)
        .await;
}

fn pdf_response(text: Option<&str>) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "application/pdf")
        .set_body_bytes(build_pdf(text))
}

fn keywords(terms: &[&str]) -> KeywordSet {
    KeywordSet::from_lines(terms)
}

fn report_blocks(content: &str) -> Vec<&str> {
    content
        .split("-".repeat(50).as_str())
        .filter(|block| block.contains("URL: "))
        .collect()
}

#[tokio::test]
async fn test_skips_html_capture_and_records_pdf_match() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_index(&mock_server, TARGET, &["20200101000000", "20210101000000"]).await;
    mount_snapshot(
        &mock_server,
        "20200101000000",
        ResponseTemplate::new(200)
            .insert_header("content-type", "text/html; charset=utf-8")
            .set_body_string("<html>Confidential, but not a PDF</html>"),
    )
    .await;
    mount_snapshot(
        &mock_server,
        "20210101000000",
        pdf_response(Some("Strictly Confidential Budget")),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let report_path = dir.path().join("VULN.txt");
    let config = test_config(&base_url, report_path.to_str().unwrap());

    let stats = scan(&config, keywords(&["confidential"]), &[TARGET.to_string()])
        .await
        .expect("Scan failed");

    assert_eq!(stats.targets, 1);
    assert_eq!(stats.snapshots_found, 2);
    assert_eq!(stats.count(SnapshotOutcome::NotPdf), 1);
    assert_eq!(stats.count(SnapshotOutcome::Matched), 1);
    assert_eq!(stats.keyword_hits, 1);
    assert_eq!(stats.extractions.get("native"), Some(&1));

    let content = std::fs::read_to_string(&report_path).unwrap();
    assert!(content.starts_with(REPORT_TITLE));

    let blocks = report_blocks(&content);
    assert_eq!(blocks.len(), 1);
    assert!(blocks[0].contains(&format!(
        "URL: {}/web/20210101000000/{}\n",
        base_url, TARGET
    )));
    assert!(blocks[0].contains("Keywords: confidential\n"));
}

#[tokio::test]
async fn test_index_query_parameters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cdx/search/cdx"))
        .and(query_param("url", TARGET))
        .and(query_param("output", "json"))
        .and(query_param("filter", "statuscode:200"))
        .and(query_param("fl", "timestamp"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let report_path = dir.path().join("VULN.txt");
    let config = test_config(&mock_server.uri(), report_path.to_str().unwrap());

    let stats = scan(&config, keywords(&["secret"]), &[TARGET.to_string()])
        .await
        .unwrap();

    assert_eq!(stats.snapshots_found, 0);
}

#[tokio::test]
async fn test_index_failure_skips_only_that_target() {
    let mock_server = MockServer::start().await;
    let broken = "http://broken.example/a.pdf";

    Mock::given(method("GET"))
        .and(path("/cdx/search/cdx"))
        .and(query_param("url", broken))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_index(&mock_server, TARGET, &["20190101000000"]).await;
    mount_snapshot(&mock_server, "20190101000000", pdf_response(Some("secret plan"))).await;

    let dir = tempfile::tempdir().unwrap();
    let report_path = dir.path().join("VULN.txt");
    let config = test_config(&mock_server.uri(), report_path.to_str().unwrap());

    let targets = vec![broken.to_string(), TARGET.to_string()];
    let stats = scan(&config, keywords(&["secret"]), &targets).await.unwrap();

    assert_eq!(stats.targets, 2);
    assert_eq!(stats.snapshots_found, 1);
    assert_eq!(stats.count(SnapshotOutcome::Matched), 1);

    let content = std::fs::read_to_string(&report_path).unwrap();
    assert_eq!(report_blocks(&content).len(), 1);
    assert!(!content.contains("broken.example"));
}

#[tokio::test]
async fn test_malformed_index_yields_no_snapshots() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cdx/search/cdx"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let report_path = dir.path().join("VULN.txt");
    let config = test_config(&mock_server.uri(), report_path.to_str().unwrap());

    let stats = scan(&config, keywords(&["secret"]), &[TARGET.to_string()])
        .await
        .unwrap();

    assert_eq!(stats.snapshots_found, 0);
    assert_eq!(stats.snapshots_skipped(), 0);
}

#[tokio::test]
async fn test_failed_fetch_moves_to_next_snapshot() {
    let mock_server = MockServer::start().await;

    mount_index(&mock_server, TARGET, &["20200101000000", "20210101000000"]).await;
    Mock::given(method("GET"))
        .and(path_regex("^/web/20200101000000/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&mock_server)
        .await;
    mount_snapshot(&mock_server, "20210101000000", pdf_response(Some("password list"))).await;

    let dir = tempfile::tempdir().unwrap();
    let report_path = dir.path().join("VULN.txt");
    let config = test_config(&mock_server.uri(), report_path.to_str().unwrap());

    let stats = scan(&config, keywords(&["password"]), &[TARGET.to_string()])
        .await
        .unwrap();

    assert_eq!(stats.count(SnapshotOutcome::FetchFailed), 1);
    assert_eq!(stats.count(SnapshotOutcome::Matched), 1);

    let content = std::fs::read_to_string(&report_path).unwrap();
    assert!(content.contains("/web/20210101000000/"));
    assert!(!content.contains("/web/20200101000000/"));
}

#[tokio::test]
async fn test_every_occurrence_is_recorded_in_order() {
    let mock_server = MockServer::start().await;

    mount_index(&mock_server, TARGET, &["20220101000000"]).await;
    mount_snapshot(
        &mock_server,
        "20220101000000",
        pdf_response(Some("NIK secret passport NIK password")),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let report_path = dir.path().join("VULN.txt");
    let config = test_config(&mock_server.uri(), report_path.to_str().unwrap());

    let stats = scan(
        &config,
        keywords(&["pass", "nik", "secret"]),
        &[TARGET.to_string()],
    )
    .await
    .unwrap();

    assert_eq!(stats.keyword_hits, 3);

    let content = std::fs::read_to_string(&report_path).unwrap();
    assert!(content.contains("Keywords: nik, secret, nik\n"));
}

#[tokio::test]
async fn test_clean_snapshot_writes_no_record() {
    let mock_server = MockServer::start().await;

    mount_index(&mock_server, TARGET, &["20220101000000"]).await;
    mount_snapshot(&mock_server, "20220101000000", pdf_response(Some("Annual picnic"))).await;

    let dir = tempfile::tempdir().unwrap();
    let report_path = dir.path().join("VULN.txt");
    let config = test_config(&mock_server.uri(), report_path.to_str().unwrap());

    let stats = scan(&config, keywords(&["secret"]), &[TARGET.to_string()])
        .await
        .unwrap();

    assert_eq!(stats.count(SnapshotOutcome::Clean), 1);
    let content = std::fs::read_to_string(&report_path).unwrap();
    assert_eq!(content, format!("{}\n{}\n", REPORT_TITLE, "=".repeat(50)));
}

#[tokio::test]
async fn test_pause_follows_every_skipped_snapshot() {
    let mock_server = MockServer::start().await;

    mount_index(
        &mock_server,
        TARGET,
        &["20200101000000", "20210101000000", "20220101000000"],
    )
    .await;
    for timestamp in ["20200101000000", "20220101000000"] {
        mount_snapshot(
            &mock_server,
            timestamp,
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string("<html>moved</html>"),
        )
        .await;
    }
    mount_snapshot(&mock_server, "20210101000000", ResponseTemplate::new(503)).await;

    let dir = tempfile::tempdir().unwrap();
    let report_path = dir.path().join("VULN.txt");
    let mut config = test_config(&mock_server.uri(), report_path.to_str().unwrap());
    config.scan.request_delay_ms = 150;

    let started = Instant::now();
    let stats = scan(&config, keywords(&["secret"]), &[TARGET.to_string()])
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert_eq!(stats.count(SnapshotOutcome::NotPdf), 2);
    assert_eq!(stats.count(SnapshotOutcome::FetchFailed), 1);
    assert_eq!(stats.snapshots_skipped(), 3);
    assert!(
        elapsed >= Duration::from_millis(3 * 150),
        "three pauses expected, scan took {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_repeated_runs_produce_identical_reports() {
    let mock_server = MockServer::start().await;

    mount_index(&mock_server, TARGET, &["20200101000000", "20210101000000"]).await;
    mount_snapshot(&mock_server, "20200101000000", pdf_response(Some("secret one"))).await;
    mount_snapshot(&mock_server, "20210101000000", pdf_response(Some("secret two"))).await;

    let dir = tempfile::tempdir().unwrap();
    let report_path = dir.path().join("VULN.txt");
    let config = test_config(&mock_server.uri(), report_path.to_str().unwrap());
    let targets = vec![TARGET.to_string()];

    scan(&config, keywords(&["secret"]), &targets).await.unwrap();
    let first = std::fs::read_to_string(&report_path).unwrap();

    scan(&config, keywords(&["secret"]), &targets).await.unwrap();
    let second = std::fs::read_to_string(&report_path).unwrap();

    assert_eq!(first, second);
    assert_eq!(report_blocks(&second).len(), 2);
}

/// Stands in for OCR: always "recognizes" the same text
struct StubOcr(&'static str);

impl ExtractionStrategy for StubOcr {
    fn name(&self) -> &'static str {
        "ocr"
    }

    fn extract(&self, _pdf: &[u8]) -> Extraction {
        Extraction::Text(self.0.to_string())
    }
}

/// A strategy that never produces text
struct Refuses;

impl ExtractionStrategy for Refuses {
    fn name(&self) -> &'static str {
        "refuses"
    }

    fn extract(&self, _pdf: &[u8]) -> Extraction {
        Extraction::NoText(ExtractError::EmptyTextLayer)
    }
}

/// Remembers the thread extraction ran on
struct RecordsThread(Arc<Mutex<Option<ThreadId>>>);

impl ExtractionStrategy for RecordsThread {
    fn name(&self) -> &'static str {
        "native"
    }

    fn extract(&self, _pdf: &[u8]) -> Extraction {
        *self.0.lock().unwrap() = Some(std::thread::current().id());
        Extraction::Text("secret".to_string())
    }
}

#[tokio::test]
async fn test_extraction_runs_off_the_async_thread() {
    let mock_server = MockServer::start().await;

    mount_index(&mock_server, TARGET, &["20230101000000"]).await;
    mount_snapshot(&mock_server, "20230101000000", pdf_response(Some("secret"))).await;

    let dir = tempfile::tempdir().unwrap();
    let report_path = dir.path().join("VULN.txt");
    let config = test_config(&mock_server.uri(), report_path.to_str().unwrap());

    let seen = Arc::new(Mutex::new(None));
    let extractor = TextExtractor::new(vec![
        Box::new(RecordsThread(seen.clone())) as Box<dyn ExtractionStrategy>
    ]);
    let report = FileReport::create(&report_path).unwrap();
    let mut scanner = Scanner::new(&config, Arc::new(keywords(&["secret"])), report)
        .unwrap()
        .with_extractor(extractor);

    scanner.run(&[TARGET.to_string()]).await.unwrap();

    // The current-thread test runtime polls this future on the test thread
    let extraction_thread = seen.lock().unwrap().expect("extraction never ran");
    assert_ne!(extraction_thread, std::thread::current().id());
    assert_eq!(scanner.stats().count(SnapshotOutcome::Matched), 1);
}

#[tokio::test]
async fn test_scanned_pdf_falls_back_to_ocr() {
    let mock_server = MockServer::start().await;

    mount_index(&mock_server, TARGET, &["20230101000000"]).await;
    mount_snapshot(&mock_server, "20230101000000", pdf_response(None)).await;

    let dir = tempfile::tempdir().unwrap();
    let report_path = dir.path().join("VULN.txt");
    let config = test_config(&mock_server.uri(), report_path.to_str().unwrap());

    let extractor = TextExtractor::new(vec![
        Box::new(NativeTextStrategy) as Box<dyn ExtractionStrategy>,
        Box::new(StubOcr("RAHASIA negara")),
    ]);
    let report = FileReport::create(&report_path).unwrap();
    let mut scanner = Scanner::new(&config, Arc::new(keywords(&["rahasia"])), report)
        .unwrap()
        .with_extractor(extractor);

    scanner.run(&[TARGET.to_string()]).await.unwrap();

    let (report, stats) = scanner.finish();
    assert_eq!(report.records_written(), 1);
    assert_eq!(stats.extractions.get("ocr"), Some(&1));
    assert_eq!(stats.extractions.get("native"), None);

    let content = std::fs::read_to_string(&report_path).unwrap();
    assert!(content.contains("Keywords: rahasia\n"));
}

#[tokio::test]
async fn test_unreadable_pdf_is_clean_not_fatal() {
    let mock_server = MockServer::start().await;

    mount_index(&mock_server, TARGET, &["20200101000000", "20210101000000"]).await;
    mount_snapshot(
        &mock_server,
        "20200101000000",
        ResponseTemplate::new(200)
            .insert_header("content-type", "application/pdf")
            .set_body_bytes(b"%PDF-1.4 truncated garbage".to_vec()),
    )
    .await;
    mount_snapshot(&mock_server, "20210101000000", pdf_response(Some("secret"))).await;

    let dir = tempfile::tempdir().unwrap();
    let report_path = dir.path().join("VULN.txt");
    let config = test_config(&mock_server.uri(), report_path.to_str().unwrap());

    let extractor = TextExtractor::new(vec![
        Box::new(NativeTextStrategy) as Box<dyn ExtractionStrategy>,
        Box::new(Refuses),
    ]);
    let report = FileReport::create(&report_path).unwrap();
    let mut scanner = Scanner::new(&config, Arc::new(keywords(&["secret"])), report)
        .unwrap()
        .with_extractor(extractor);

    scanner.run(&[TARGET.to_string()]).await.unwrap();

    let stats = scanner.stats();
    assert_eq!(stats.count(SnapshotOutcome::Clean), 1);
    assert_eq!(stats.count(SnapshotOutcome::Matched), 1);
    assert_eq!(stats.extractions.get("none"), Some(&1));
}
