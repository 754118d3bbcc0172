use hestia::error::HestiaError;
use hestia::source::{FileSource, InputSnapshot, InputSource};
use std::io::Write;

#[tokio::test]
async fn file_source_reads_yaml() {
    let mut tmp = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(tmp, "prices: [0.1, 0.25, 0.4]\nsoc: 66.5").unwrap();

    let source = FileSource::new(tmp.path());
    assert_eq!(source.name(), "file");
    let snap = source.snapshot().await.unwrap();
    assert_eq!(snap, InputSnapshot::new(vec![0.1, 0.25, 0.4], 66.5));
}

#[tokio::test]
async fn file_source_reads_json() {
    let mut tmp = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(tmp, r#"{{"prices": [], "battery_soc": 42}}"#).unwrap();

    let snap = FileSource::new(tmp.path()).snapshot().await.unwrap();
    assert!(snap.prices.is_empty());
    assert_eq!(snap.soc, 42.0);
}

#[tokio::test]
async fn file_source_sees_rewrites() {
    let tmp = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    std::fs::write(tmp.path(), "prices: [0.1]\nsoc: 10\n").unwrap();
    let source = FileSource::new(tmp.path());
    assert_eq!(source.snapshot().await.unwrap().soc, 10.0);

    std::fs::write(tmp.path(), "prices: [0.1]\nsoc: 20\n").unwrap();
    assert_eq!(source.snapshot().await.unwrap().soc, 20.0);
}

#[tokio::test]
async fn missing_file_is_a_source_error() {
    let dir = tempfile::tempdir().unwrap();
    let source = FileSource::new(dir.path().join("absent.yaml"));
    let err = source.snapshot().await.unwrap_err();
    assert!(matches!(err, HestiaError::Source { .. }));
}

#[tokio::test]
async fn malformed_file_is_a_serialization_error() {
    let tmp = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    std::fs::write(tmp.path(), "prices: [0.1, oops\n").unwrap();
    let err = FileSource::new(tmp.path()).snapshot().await.unwrap_err();
    assert!(err.to_string().contains("Serialization error"));
}

#[test]
fn snapshot_from_file_blocking() {
    let tmp = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
    std::fs::write(tmp.path(), "battery_soc: 77\nprices: [0.3]\n").unwrap();
    let snap = InputSnapshot::from_file(tmp.path()).unwrap();
    assert_eq!(snap.battery_state().soc, 77.0);
}
