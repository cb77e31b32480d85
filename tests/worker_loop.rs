//! Integration tests: the spawned tick loop end to end with a scripted
//! transport, under a paused tokio clock for determinism.

use std::sync::Arc;
use std::time::Duration;

use fetchq::config::FetchqConfig;
use fetchq::transport::mock::MockTransport;
use fetchq::transport::Outcome;
use fetchq::worker::DownloadWorker;

fn test_config(dir: &std::path::Path) -> FetchqConfig {
    FetchqConfig {
        download_dir: dir.to_path_buf(),
        max_attempts: 2,
        tick_interval_ms: 10,
    }
}

#[tokio::test(start_paused = true)]
async fn downloads_files_to_the_requested_directory() {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(MockTransport::always(Outcome::Success));
    let worker = DownloadWorker::new(&test_config(dir.path()), transport.clone());

    let handle = worker.start();
    worker.enqueue("www.example.org/cat.jpeg").unwrap();
    worker.enqueue("www.example.org/dog.jpeg").unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;
    worker.stop();
    handle.await.unwrap();

    assert!(worker.failed_urls().is_empty());
    let saved = transport.saved_files();
    assert_eq!(saved.len(), 2, "both files should be saved");
    assert!(saved.iter().all(|(d, _)| d == dir.path()));
    let names: Vec<&str> = saved.iter().map(|(_, n)| n.as_str()).collect();
    assert_eq!(names, vec!["cat.jpeg", "dog.jpeg"]);
}

#[tokio::test(start_paused = true)]
async fn persistent_timeouts_trip_the_breaker_and_end_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(MockTransport::always(Outcome::Timeout));
    let worker = DownloadWorker::new(&test_config(dir.path()), transport.clone());

    let handle = worker.start();
    worker.enqueue("www.example.org/big.iso").unwrap();

    // The loop exits on its own once retries are exhausted.
    handle.await.unwrap();

    assert_eq!(worker.failed_urls(), vec!["www.example.org/big.iso"]);
    assert_eq!(transport.cancelled_urls(), vec!["www.example.org/big.iso"]);
    assert!(
        worker.enqueue("www.example.org/late.txt").is_err(),
        "a stopped worker must reject new URLs"
    );
}

#[tokio::test(start_paused = true)]
async fn stop_drains_in_flight_work_into_the_failure_list() {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(MockTransport::always(Outcome::InProgress));
    let worker = DownloadWorker::new(&test_config(dir.path()), transport.clone());

    let handle = worker.start();
    worker.enqueue("www.example.org/one.tar").unwrap();
    worker.enqueue("www.example.org/two.tar").unwrap();

    tokio::time::sleep(Duration::from_millis(50)).await;
    worker.stop();
    worker.stop();
    handle.await.unwrap();

    assert_eq!(
        worker.failed_urls(),
        vec!["www.example.org/one.tar", "www.example.org/two.tar"]
    );
    assert_eq!(
        transport.cancelled_urls(),
        vec!["www.example.org/one.tar", "www.example.org/two.tar"]
    );
}
