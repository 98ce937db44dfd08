//! Replay of cached records after ingestion.

use crate::{feeder, write_file, GatedSink, SEED};
use bytes::Bytes;
use feeder_types::{TopicType, TopicValue};
use file_feeder::{ReplayConfig, ReplayOrchestrator, ReplayState};
use publish_pipeline::MemorySink;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn replay_config(dir: &TempDir, passes: u64) -> ReplayConfig {
    let mut config = ReplayConfig::new(dir.path());
    config.replay = true;
    config.replay_passes = Some(passes);
    config
}

#[tokio::test]
async fn test_single_record_topics_take_a_sibling_record() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "a/x.txt", "1");
    write_file(dir.path(), "a/y.txt", "2");
    write_file(dir.path(), "b/z.txt", "3");

    let sink = Arc::new(MemorySink::new());
    let mut feeder = feeder(ReplayConfig::new(dir.path()), &sink);
    feeder.ingest_all().await.unwrap();

    let x = feeder.tree().lookup("a/x").unwrap();
    let y = feeder.tree().lookup("a/y").unwrap();
    let z = feeder.tree().lookup("b/z").unwrap();
    for _ in 0..20 {
        assert_eq!(feeder.select_record(x), Some(Bytes::from("2")));
        assert_eq!(feeder.select_record(y), Some(Bytes::from("1")));
        // No siblings: falls back to its own record.
        assert_eq!(feeder.select_record(z), Some(Bytes::from("3")));
    }
}

#[tokio::test]
async fn test_split_topic_replays_only_its_own_lines() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "feed/lines.txt", "alpha\nbeta\ngamma\n");
    write_file(dir.path(), "feed/other.txt", "omega");

    let sink = Arc::new(MemorySink::new());
    let mut config = replay_config(&dir, 50);
    config.split_lines = true;
    config.topic_spec.topic_type = TopicType::String;
    let metrics = feeder(config, &sink).run().await.unwrap();

    let lines = sink.updates_for("feed/lines");
    // Three on ingestion, one per pass afterwards.
    assert_eq!(lines.len(), 3 + 50);
    let allowed = ["alpha", "beta", "gamma"];
    for value in &lines {
        match value {
            TopicValue::String(text) => assert!(allowed.contains(&text.as_str()), "{text}"),
            other => panic!("unexpected value {other:?}"),
        }
    }
    // 50 samples out of three lines cover all of them.
    for line in allowed {
        assert!(lines.contains(&TopicValue::String(line.to_string())));
    }
    assert_eq!(metrics.replay_passes, 50);
}

#[tokio::test]
async fn test_replay_stops_after_pass_limit() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "one.txt", "1");
    write_file(dir.path(), "two.txt", "2");
    write_file(dir.path(), "three/four.txt", "4");

    let sink = Arc::new(MemorySink::new());
    let mut feeder = feeder(replay_config(&dir, 4), &sink);
    let metrics = feeder.run().await.unwrap();

    assert_eq!(metrics.replay_passes, 4);
    assert_eq!(metrics.records_published, 3 + 3 * 4);
    assert_eq!(sink.update_count(), 15);
    assert_eq!(feeder.state(), ReplayState::Stopped);
}

#[tokio::test]
async fn test_every_cached_topic_is_visited_each_pass() {
    let dir = TempDir::new().unwrap();
    for name in ["a", "b", "c", "d"] {
        write_file(dir.path(), &format!("{name}.txt"), name);
    }

    let sink = Arc::new(MemorySink::new());
    feeder(replay_config(&dir, 3), &sink).run().await.unwrap();

    let updates = sink.updates();
    for pass in updates[4..].chunks(4) {
        let mut topics: Vec<&str> = pass.iter().map(|(topic, _)| topic.as_str()).collect();
        topics.sort_unstable();
        assert_eq!(topics, vec!["a", "b", "c", "d"]);
    }
}

#[tokio::test]
async fn test_same_seed_replays_identically() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "x/lines.txt", "1\n2\n3\n4\n5\n");
    write_file(dir.path(), "x/single.txt", "6");
    write_file(dir.path(), "y/single.txt", "7");

    let mut runs = Vec::new();
    for _ in 0..2 {
        let sink = Arc::new(MemorySink::new());
        let mut config = replay_config(&dir, 20);
        config.split_lines = true;
        feeder(config, &sink).run().await.unwrap();
        runs.push(sink.updates());
    }

    assert_eq!(runs[0], runs[1]);
}

#[tokio::test]
async fn test_empty_source_has_nothing_to_replay() {
    let dir = TempDir::new().unwrap();

    let sink = Arc::new(MemorySink::new());
    let mut config = replay_config(&dir, 0);
    config.replay_passes = None;
    let metrics = feeder(config, &sink).run().await.unwrap();

    assert_eq!(metrics.replay_passes, 0);
    assert_eq!(sink.update_count(), 0);
}

#[tokio::test]
async fn test_topics_without_records_are_not_replayed() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "empty.txt", "");

    let sink = Arc::new(MemorySink::new());
    let mut config = ReplayConfig::new(dir.path());
    config.split_lines = true;
    config.replay = true;
    let mut feeder = feeder(config, &sink);

    // Unbounded replay over a cache holding only an empty topic ends at once.
    let metrics = tokio::time::timeout(Duration::from_secs(10), feeder.run())
        .await
        .expect("replay kept spinning over empty topics")
        .unwrap();

    assert_eq!(metrics.replay_passes, 0);
    assert_eq!(sink.update_count(), 0);
    assert_eq!(feeder.state(), ReplayState::Stopped);
}

#[tokio::test]
async fn test_empty_topic_is_skipped_next_to_populated_ones() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "empty.txt", "");
    write_file(dir.path(), "full.txt", "1\n2\n");

    let sink = Arc::new(MemorySink::new());
    let mut config = replay_config(&dir, 3);
    config.split_lines = true;
    let metrics = feeder(config, &sink).run().await.unwrap();

    assert_eq!(metrics.replay_passes, 3);
    assert!(sink.updates_for("empty").is_empty());
    assert_eq!(sink.updates_for("full").len(), 2 + 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancellation_stops_unbounded_replay() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "a.txt", "1");
    write_file(dir.path(), "b.txt", "2");

    let sink = Arc::new(MemorySink::new());
    let cancel = CancellationToken::new();
    let mut config = ReplayConfig::new(dir.path());
    config.replay = true;
    config.record_interval = Duration::from_millis(1);

    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let mut feeder = feeder(config, &sink).with_cancellation(cancel);
    let metrics = tokio::time::timeout(Duration::from_secs(10), feeder.run())
        .await
        .expect("replay did not stop after cancellation")
        .unwrap();

    assert_eq!(feeder.state(), ReplayState::Stopped);
    assert_eq!(feeder.pipeline().in_flight(), 0);
    assert_eq!(metrics.files_ingested, 2);
    assert_eq!(sink.update_count() as u64, metrics.records_published);
}

#[tokio::test]
async fn test_cancelled_before_start_publishes_nothing() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "a.txt", "1");

    let sink = Arc::new(MemorySink::new());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let mut config = ReplayConfig::new(dir.path());
    config.replay = true;
    let mut feeder = feeder(config, &sink).with_cancellation(cancel);
    let metrics = feeder.run().await.unwrap();

    assert_eq!(sink.update_count(), 0);
    assert_eq!(metrics.replay_passes, 0);
    assert_eq!(feeder.state(), ReplayState::Stopped);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cancellation_while_waiting_for_a_full_window() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "a.txt", "1");

    let gate = Arc::new(GatedSink::new());
    let cancel = CancellationToken::new();
    let mut config = ReplayConfig::new(dir.path());
    config.replay = true;
    config.max_in_flight = 1;
    let feeder = ReplayOrchestrator::new(
        config,
        gate.clone(),
        Arc::new(MemorySink::new()),
        StdRng::seed_from_u64(SEED),
    )
    .with_cancellation(cancel.clone());
    let mut states = feeder.watch_state();

    let run = tokio::spawn(async move {
        let mut feeder = feeder;
        let result = feeder.run().await;
        (feeder, result)
    });

    // Ingestion fills the window; the first replayed update has to wait.
    tokio::time::timeout(
        Duration::from_secs(10),
        states.wait_for(|state| *state == ReplayState::Replaying),
    )
    .await
    .expect("replay never started")
    .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(gate.submitted(), 1);

    cancel.cancel();
    tokio::time::timeout(
        Duration::from_secs(10),
        states.wait_for(|state| *state == ReplayState::Draining),
    )
    .await
    .expect("replay did not leave a full window after cancellation")
    .unwrap();

    // The outstanding update is still awaited.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!run.is_finished());

    gate.release();
    let (feeder, result) = tokio::time::timeout(Duration::from_secs(10), run)
        .await
        .expect("drain did not finish after release")
        .unwrap();
    let metrics = result.unwrap();

    assert_eq!(feeder.state(), ReplayState::Stopped);
    assert_eq!(feeder.pipeline().in_flight(), 0);
    assert_eq!(gate.submitted(), 1);
    assert_eq!(metrics.records_published, 1);
    assert_eq!(metrics.replay_passes, 0);
}
