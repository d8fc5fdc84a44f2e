// Integration tests for the per-call recording sink
//
// These tests verify the sink lifecycle: lazy directory creation, append
// ordering and byte accounting, exactly-once finalization, and failure on
// an unusable base directory.

use anyhow::Result;
use live_call_server::{AudioFile, AudioProfile, RecordingSink};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_sink_creates_file_under_base_dir() -> Result<()> {
    let temp_dir = TempDir::new()?;
    // Nested path that does not exist yet
    let base_dir = temp_dir.path().join("calls").join("inbound");

    let sink = RecordingSink::create(&base_dir, "c1", AudioProfile::CALL_AUDIO)?;

    assert!(sink.path().exists(), "recording file should exist");
    assert!(sink.path().starts_with(&base_dir));

    let name = sink.path().file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("received_c1_"), "unexpected name: {}", name);
    assert!(name.ends_with(".wav"), "unexpected name: {}", name);

    Ok(())
}

#[test]
fn test_sink_byte_accounting() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut sink = RecordingSink::create(temp_dir.path(), "c1", AudioProfile::CALL_AUDIO)?;

    let chunk: Vec<u8> = [0x00u8, 0x01].repeat(500); // 1000 bytes
    assert_eq!(sink.append(&chunk)?, 1000);
    assert_eq!(sink.append(&chunk)?, 1000);
    assert_eq!(sink.bytes_written(), 2000);

    let path = sink.path().to_path_buf();
    sink.finish()?;

    let audio = AudioFile::open(&path)?;
    assert_eq!(audio.data_bytes(), 2000);
    assert!(audio.matches_profile(&AudioProfile::CALL_AUDIO));
    assert_eq!(audio.sample_rate, 16000);
    assert_eq!(audio.channels, 1);

    Ok(())
}

#[test]
fn test_sink_skips_dangling_partial_frame() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut sink = RecordingSink::create(temp_dir.path(), "c1", AudioProfile::CALL_AUDIO)?;

    // 5 bytes is 2 whole 16-bit frames plus one dangling byte
    let written = sink.append(&[1, 2, 3, 4, 5])?;
    assert_eq!(written, 4);
    assert_eq!(sink.bytes_written(), 4);

    Ok(())
}

#[test]
fn test_sink_finish_is_redundant_safe() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut sink = RecordingSink::create(temp_dir.path(), "c1", AudioProfile::CALL_AUDIO)?;

    sink.append(&[0, 1, 0, 1])?;
    assert!(sink.is_open());

    sink.finish()?;
    assert!(!sink.is_open());
    // Second finish is a no-op, not an error
    sink.finish()?;

    Ok(())
}

#[test]
fn test_sink_rejects_append_after_finish() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut sink = RecordingSink::create(temp_dir.path(), "c1", AudioProfile::CALL_AUDIO)?;

    sink.finish()?;
    assert!(sink.append(&[0, 1]).is_err(), "append after finish should fail");

    Ok(())
}

#[test]
fn test_sink_finalizes_on_drop() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let path = {
        let mut sink = RecordingSink::create(temp_dir.path(), "c1", AudioProfile::CALL_AUDIO)?;
        sink.append(&[0x00, 0x01].repeat(100))?;
        sink.path().to_path_buf()
        // Sink dropped without an explicit finish
    };

    // The container must still be readable with correct length fields
    let audio = AudioFile::open(&path)?;
    assert_eq!(audio.data_bytes(), 200);

    Ok(())
}

#[test]
fn test_sink_fails_on_unusable_base_dir() -> Result<()> {
    let temp_dir = TempDir::new()?;

    // A regular file where the directory should be
    let blocker = temp_dir.path().join("not-a-dir");
    fs::write(&blocker, b"occupied")?;

    let result = RecordingSink::create(&blocker, "c1", AudioProfile::CALL_AUDIO);
    assert!(result.is_err(), "creating a sink under a file should fail");

    Ok(())
}
