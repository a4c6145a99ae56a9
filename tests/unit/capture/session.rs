use super::*;

#[test]
fn artifact_names() {
    assert_eq!(
        artifact_name(1_700_000_000_123, Container::WebM),
        "telescroll-video-1700000000123.webm"
    );
    assert_eq!(artifact_name(7, Container::Mp4), "telescroll-video-7.mp4");
}

#[test]
fn chunks_concatenate_in_order() {
    let mut s = CaptureSession::new(Container::Mp4);
    s.extend(vec![b"ab".to_vec(), Vec::new()]);
    s.extend(vec![b"cd".to_vec()]);
    assert_eq!(s.chunk_count(), 2);
    assert_eq!(s.byte_len(), 4);
    assert_eq!(s.assemble().unwrap(), b"abcd".to_vec());
}

#[test]
fn empty_session_cannot_finalize() {
    let dir = tempfile::tempdir().unwrap();
    let s = CaptureSession::new(Container::Mp4);
    let err = s.finalize(dir.path()).unwrap_err();
    assert!(err.to_string().contains("stream empty"));
}

#[test]
fn finalize_writes_named_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut s = CaptureSession::new(Container::WebM);
    s.extend(vec![vec![1, 2, 3]]);
    let path = s.finalize_at(&dir.path().join("out"), 42).unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "telescroll-video-42.webm"
    );
    assert_eq!(std::fs::read(path).unwrap(), vec![1, 2, 3]);
}
