//! Buffer and replay behaviour on a real filesystem

mod common;

use common::*;
use fieldlog_core::buffer::{BufferStore, ReplayEngine, ReplayReport, ReplayStats};
use fieldlog_core::records::BufferRecord;
use fieldlog_core::sink::{LogSink, RetryPolicy};
use fieldlog_core::storage::Storage;
use fieldlog_core::{ReplayError, SinkError};
use proptest::prelude::*;

fn engine() -> ReplayEngine {
    ReplayEngine::new(ENDPOINT)
}

#[test]
fn replay_without_buffer_is_a_no_op() {
    let (dir, mut storage) = card();
    let mut transport = AcceptAll::default();

    let report = engine().retry_buffered_sends(&mut storage, &mut transport).unwrap();

    assert_eq!(report, ReplayReport::NothingToRetry);
    assert!(transport.received.is_empty());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn stored_records_are_delivered_in_order() {
    let (dir, storage) = card();
    let mut sink = LogSink::new(storage, RecordingDelay::default());
    let store = BufferStore::default();

    for n in 0..5 {
        let record = BufferRecord::new(payload(n)).unwrap();
        store.store(&mut sink, &record).unwrap();
    }
    assert_eq!(store.pending(sink.storage_mut()).unwrap(), 5);

    let mut transport = AcceptAll::default();
    let report = engine()
        .retry_buffered_sends(sink.storage_mut(), &mut transport)
        .unwrap();

    assert_eq!(
        report,
        ReplayReport::Completed(ReplayStats { delivered: 5, ..Default::default() })
    );
    assert_eq!(transport.received, (0..5).map(payload).collect::<Vec<_>>());
    assert_eq!(read_lines(dir.path(), "buffer.jsonl"), None);
    assert_eq!(read_lines(dir.path(), "temp.jsonl"), None);
}

#[test]
fn failed_records_survive_in_order() {
    let (dir, mut storage) = card_with_buffer(&["A", "B", "C"]);
    let mut transport = Rejecting::new(["A", "C"]);

    let report = engine().retry_buffered_sends(&mut storage, &mut transport).unwrap();

    assert_eq!(report.remaining(), 2);
    assert_eq!(transport.attempted, vec!["A", "B", "C"]);
    assert_eq!(read_lines(dir.path(), "buffer.jsonl").unwrap(), vec!["A", "C"]);
    assert!(!storage.exists("/temp.jsonl"));
}

#[test]
fn second_pass_converges_once_collector_recovers() {
    let (dir, mut storage) = card_with_buffer(&["A", "B"]);

    let mut offline = Unreachable::default();
    let first = engine().retry_buffered_sends(&mut storage, &mut offline).unwrap();
    assert_eq!(first.remaining(), 2);
    assert_eq!(offline.attempts, 2);
    assert_eq!(read_lines(dir.path(), "buffer.jsonl").unwrap(), vec!["A", "B"]);

    let mut online = AcceptAll::default();
    let second = engine().retry_buffered_sends(&mut storage, &mut online).unwrap();
    assert_eq!(second.remaining(), 0);
    assert_eq!(online.received, vec!["A", "B"]);
    assert_eq!(read_lines(dir.path(), "buffer.jsonl"), None);

    let third = engine().retry_buffered_sends(&mut storage, &mut online).unwrap();
    assert_eq!(third, ReplayReport::NothingToRetry);
}

#[test]
fn blank_lines_are_dropped_even_when_offline() {
    let (dir, mut storage) = card_with_buffer(&["A", "", "   ", "  B  "]);
    let mut transport = Unreachable::default();

    let report = engine().retry_buffered_sends(&mut storage, &mut transport).unwrap();

    assert_eq!(
        report,
        ReplayReport::Completed(ReplayStats { delivered: 0, retained: 2, dropped_blank: 2, undecodable: 0 })
    );
    assert_eq!(transport.attempts, 2);
    assert_eq!(read_lines(dir.path(), "buffer.jsonl").unwrap(), vec!["A", "B"]);
}

#[test]
fn corrupted_line_does_not_block_the_rest() {
    // A torn sector left bytes that are not UTF-8 between two records
    let (dir, mut storage) = card();
    std::fs::write(dir.path().join("buffer.jsonl"), b"A\nB\n\xff\xfe\nC\n").unwrap();
    let mut transport = AcceptAll::default();

    let first = engine().retry_buffered_sends(&mut storage, &mut transport).unwrap();
    let second = engine().retry_buffered_sends(&mut storage, &mut transport).unwrap();

    assert_eq!(transport.received, vec!["A", "B", "C"]);
    assert_eq!(first.remaining(), 1);
    assert_eq!(second.remaining(), 1);
    assert_eq!(std::fs::read(dir.path().join("buffer.jsonl")).unwrap(), b"\xff\xfe\n");
    assert_eq!(BufferStore::default().pending(&mut storage).unwrap(), 1);
}

#[test]
fn temp_file_failure_leaves_buffer_untouched() {
    let (dir, mut storage) = card_with_buffer(&["A", "B"]);
    let engine = ReplayEngine::new(ENDPOINT).with_paths("/buffer.jsonl", "/no-such-dir/temp.jsonl");
    let mut transport = AcceptAll::default();

    let err = engine.retry_buffered_sends(&mut storage, &mut transport).unwrap_err();

    assert!(matches!(err, ReplayError::TempFile { .. }));
    assert!(transport.received.is_empty());
    assert_eq!(read_lines(dir.path(), "buffer.jsonl").unwrap(), vec!["A", "B"]);
}

#[test]
fn orphaned_temp_file_is_promoted() {
    // Power lost after the old buffer was removed, before the rename
    let (dir, mut storage) = card();
    std::fs::write(dir.path().join("temp.jsonl"), "A\nB\n").unwrap();
    let mut transport = Rejecting::new(["B"]);

    let report = engine().retry_buffered_sends(&mut storage, &mut transport).unwrap();

    assert_eq!(report.remaining(), 1);
    assert_eq!(transport.attempted, vec!["A", "B"]);
    assert_eq!(read_lines(dir.path(), "buffer.jsonl").unwrap(), vec!["B"]);
    assert_eq!(read_lines(dir.path(), "temp.jsonl"), None);
}

#[test]
fn stale_temp_next_to_buffer_is_discarded() {
    // Power lost mid-drain: the buffer is still authoritative
    let (dir, mut storage) = card_with_buffer(&["A", "B"]);
    std::fs::write(dir.path().join("temp.jsonl"), "B\n").unwrap();
    let mut transport = Unreachable::default();

    engine().retry_buffered_sends(&mut storage, &mut transport).unwrap();

    assert_eq!(read_lines(dir.path(), "buffer.jsonl").unwrap(), vec!["A", "B"]);
    assert_eq!(read_lines(dir.path(), "temp.jsonl"), None);
}

#[test]
fn sink_gives_up_after_three_attempts() {
    let (dir, storage) = card();
    let mut sink = LogSink::new(storage, RecordingDelay::default());

    let err = sink.append("/unmounted/log.txt", "SD | hello").unwrap_err();

    match err {
        SinkError::OpenFailed { attempts, .. } => assert_eq!(attempts, 3),
        other => panic!("unexpected {other:?}"),
    }
    let (_, delay) = sink.into_parts();
    assert_eq!(delay.delays_ms, vec![1000, 1000]);
    assert!(!dir.path().join("unmounted").exists());
}

#[test]
fn sink_appends_and_never_rewrites() {
    let (dir, storage) = card();
    let mut sink = LogSink::new(storage, RecordingDelay::default()).with_policy(RetryPolicy::new(1, 0));

    sink.append("/log.txt", "SD | one").unwrap();
    sink.append("/log.txt", "SD | two").unwrap();
    assert!(matches!(sink.append("/log.txt", "x\ny"), Err(SinkError::EmbeddedNewline)));

    assert_eq!(read_lines(dir.path(), "log.txt").unwrap(), vec!["SD | one", "SD | two"]);
}

proptest! {
    /// Whatever the collector rejects stays buffered, in original order
    #[test]
    fn survivors_keep_relative_order(accepted in prop::collection::vec(any::<bool>(), 1..40)) {
        let records: Vec<String> = (0..accepted.len()).map(payload).collect();
        let refs: Vec<&str> = records.iter().map(String::as_str).collect();
        let (dir, mut storage) = card_with_buffer(&refs);

        let rejected: Vec<&str> = refs
            .iter()
            .zip(&accepted)
            .filter(|(_, ok)| !**ok)
            .map(|(r, _)| *r)
            .collect();
        let mut transport = Rejecting::new(rejected.iter().copied());

        let report = engine().retry_buffered_sends(&mut storage, &mut transport).unwrap();

        prop_assert_eq!(report.remaining(), rejected.len());
        prop_assert_eq!(transport.attempted.len(), records.len());
        let left = read_lines(dir.path(), "buffer.jsonl").unwrap_or_default();
        prop_assert_eq!(left, rejected.iter().map(|s| s.to_string()).collect::<Vec<_>>());
    }
}
