//! Tests for logging initialization and the capture layer.

use super::*;
use serial_test::serial;
use std::fs;
use std::sync::mpsc;
use tracing_subscriber::layer::SubscriberExt;

#[test]
fn capture_layer_sends_info_event() {
    // GIVEN a capture layer with a channel receiver
    let (tx, rx) = mpsc::channel();
    let subscriber = tracing_subscriber::registry().with(CaptureLayer::new(tx));

    // WHEN an INFO event is emitted
    tracing::subscriber::with_default(subscriber, || {
        tracing::info!("test info message");
    });

    // THEN a record with level and message is received
    let record = rx.try_recv().expect("should receive record from channel");
    assert_eq!(record.level, Level::INFO);
    assert_eq!(record.message, "test info message");
}

#[test]
fn capture_layer_keeps_structured_fields() {
    let (tx, rx) = mpsc::channel();
    let subscriber = tracing_subscriber::registry().with(CaptureLayer::new(tx));

    tracing::subscriber::with_default(subscriber, || {
        tracing::debug!(index = 42, container = "feed", "row measured");
    });

    let record = rx.try_recv().expect("should receive record");
    assert_eq!(record.message, "row measured");
    assert_eq!(record.field("index"), Some("42"));
    assert_eq!(record.field("container"), Some("feed"));
    assert_eq!(record.field("missing"), None);
}

#[test]
fn capture_layer_formats_message_arguments() {
    let (tx, rx) = mpsc::channel();
    let subscriber = tracing_subscriber::registry().with(CaptureLayer::new(tx));

    tracing::subscriber::with_default(subscriber, || {
        tracing::warn!("value: {}, count: {}", 42, 7);
    });

    let record = rx.try_recv().expect("should receive record");
    assert_eq!(record.level, Level::WARN);
    assert_eq!(record.message, "value: 42, count: 7");
}

#[test]
fn capture_layer_survives_dropped_receiver() {
    let (tx, rx) = mpsc::channel();
    drop(rx);
    let subscriber = tracing_subscriber::registry().with(CaptureLayer::new(tx));

    tracing::subscriber::with_default(subscriber, || {
        tracing::info!("this should not panic");
    });
}

#[test]
#[serial(tracing_init)]
fn init_creates_log_directory_if_missing() {
    let test_dir = std::env::temp_dir().join("vlist_test_logs_create");
    let log_file = test_dir.join("test.log");
    let _ = fs::remove_dir_all(&test_dir);

    // May fail if a subscriber is already set, the directory is created first either way
    let _ = init(&log_file);

    assert!(
        test_dir.exists(),
        "Log directory should be created: {:?}",
        test_dir
    );

    let _ = fs::remove_dir_all(&test_dir);
}

#[test]
#[serial(tracing_init)]
fn init_rejects_path_without_file_name() {
    let result = init(Path::new("/"));
    assert!(
        matches!(
            result,
            Err(LoggingError::InvalidPath(_)) | Err(LoggingError::NoParentDirectory(_))
        ),
        "Root path has no file name, got {:?}",
        result
    );
}
