//! Discovery and first-pass publishing.

use crate::{feeder, issued_topics, write_file};
use feeder_types::{TopicType, TopicValue};
use file_feeder::{ReplayConfig, ReplayError, ReplayState};
use publish_pipeline::{MemorySink, PipelineStats};
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_files_are_published_before_subdirectories() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "b.txt", "b");
    write_file(dir.path(), "a.txt", "a");
    write_file(dir.path(), "sub/c.txt", "c");
    write_file(dir.path(), "aa/d.txt", "d");
    write_file(dir.path(), "aa/deeper/e.txt", "e");

    let sink = Arc::new(MemorySink::new());
    let mut config = ReplayConfig::new(dir.path());
    config.topic_root = "file".to_string();
    let metrics = feeder(config, &sink).run().await.unwrap();

    assert_eq!(
        issued_topics(&sink),
        vec!["file/a", "file/b", "file/aa/d", "file/aa/deeper/e", "file/sub/c"]
    );
    assert_eq!(metrics.files_ingested, 5);
    assert_eq!(metrics.records_published, 5);
    assert_eq!(sink.topics(), issued_topics(&sink));
}

#[tokio::test]
async fn test_split_file_publishes_each_line_in_order() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "prices.csv", "10\n20\n30\n");

    let sink = Arc::new(MemorySink::new());
    let mut config = ReplayConfig::new(dir.path());
    config.split_lines = true;
    config.topic_spec.topic_type = TopicType::Int64;
    feeder(config, &sink).run().await.unwrap();

    assert_eq!(
        sink.updates_for("prices"),
        vec![
            TopicValue::Int64(10),
            TopicValue::Int64(20),
            TopicValue::Int64(30)
        ]
    );
}

#[tokio::test]
async fn test_empty_split_file_provisions_but_publishes_nothing() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "empty.txt", "");

    let sink = Arc::new(MemorySink::new());
    let mut config = ReplayConfig::new(dir.path());
    config.split_lines = true;
    let metrics = feeder(config, &sink).run().await.unwrap();

    assert_eq!(sink.topics(), vec!["empty"]);
    assert_eq!(sink.update_count(), 0);
    assert_eq!(metrics.files_ingested, 1);
}

#[tokio::test]
async fn test_single_file_source() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "quotes.json", "{\"bid\": 1.5}");

    let sink = Arc::new(MemorySink::new());
    let mut config = ReplayConfig::new(dir.path().join("quotes.json"));
    config.topic_root = "market".to_string();
    config.topic_spec.topic_type = TopicType::Json;
    feeder(config, &sink).run().await.unwrap();

    assert_eq!(
        sink.updates(),
        vec![(
            "market/quotes".to_string(),
            TopicValue::Json(serde_json::json!({"bid": 1.5}))
        )]
    );
}

#[tokio::test]
async fn test_provisioning_failure_stops_the_run() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "a.txt", "1");
    write_file(dir.path(), "b.txt", "2");
    write_file(dir.path(), "c.txt", "3");

    let sink = Arc::new(MemorySink::new().refusing_topic("b"));
    let mut feeder = feeder(ReplayConfig::new(dir.path()), &sink);
    let err = feeder.run().await.unwrap_err();

    match err {
        ReplayError::Provision { topic, .. } => assert_eq!(topic, "b"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(issued_topics(&sink), vec!["a"]);
    assert_eq!(feeder.state(), ReplayState::Stopped);
    assert_eq!(feeder.pipeline().in_flight(), 0);
}

#[tokio::test]
async fn test_failed_updates_do_not_stop_ingestion() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "bad.txt", "x\ny\n");
    write_file(dir.path(), "good.txt", "z");

    let sink = Arc::new(MemorySink::new().failing_topic("bad"));
    let stats = PipelineStats::new();
    let mut config = ReplayConfig::new(dir.path());
    config.split_lines = true;
    config.max_in_flight = 1;
    let metrics = feeder(config, &sink)
        .with_stats(stats.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(metrics.records_published, 3);
    assert_eq!(stats.submitted(), 3);
    assert_eq!(stats.failed(), 2);
    assert_eq!(stats.completed(), 1);
}

#[tokio::test]
async fn test_delete_after_ingest_removes_source_files() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "a.txt", "1");
    write_file(dir.path(), "nested/b.txt", "2");

    let sink = Arc::new(MemorySink::new());
    let mut config = ReplayConfig::new(dir.path());
    config.delete_after_ingest = true;
    config.replay = true;
    config.replay_passes = Some(1);
    let mut feeder = feeder(config, &sink);
    let metrics = feeder.run().await.unwrap();

    assert!(!dir.path().join("a.txt").exists());
    assert!(!dir.path().join("nested/b.txt").exists());
    // Records stay cached for replay.
    assert_eq!(metrics.records_published, 4);
    assert_eq!(feeder.tree().entries().len(), 2);
}

#[tokio::test]
async fn test_missing_source_is_reported() {
    let dir = TempDir::new().unwrap();
    let sink = Arc::new(MemorySink::new());
    let err = feeder(ReplayConfig::new(dir.path().join("missing")), &sink)
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, ReplayError::Source { .. }));
    assert_eq!(sink.update_count(), 0);
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlinked_ancestors_are_walked_once() {
    use std::os::unix::fs::symlink;
    use std::time::Duration;

    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "a/x.txt", "1");
    symlink(dir.path().join("a"), dir.path().join("a/loop")).unwrap();
    symlink(dir.path().join("a"), dir.path().join("a/loop2")).unwrap();
    // A link to a directory not reached any other way is still followed.
    write_file(dir.path(), "outside/y.txt", "2");
    let outside = TempDir::new().unwrap();
    write_file(outside.path(), "z.txt", "3");
    symlink(outside.path(), dir.path().join("a/linked")).unwrap();

    let sink = Arc::new(MemorySink::new());
    let mut feeder = feeder(ReplayConfig::new(dir.path()), &sink);
    let metrics = tokio::time::timeout(Duration::from_secs(10), feeder.run())
        .await
        .expect("discovery did not terminate on a symlink cycle")
        .unwrap();

    assert_eq!(issued_topics(&sink), vec!["a/x", "a/linked/z", "outside/y"]);
    assert_eq!(metrics.files_ingested, 3);
    assert_eq!(feeder.tree().entries().len(), 3);
}
