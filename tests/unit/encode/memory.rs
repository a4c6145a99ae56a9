use super::*;
use crate::foundation::core::Fps;

fn cfg() -> EncoderConfig {
    EncoderConfig {
        width: 2,
        height: 2,
        fps: Fps::new(30, 1).unwrap(),
        container: Container::WebM,
        audio: None,
    }
}

#[test]
fn chunks_arrive_in_order() {
    let mut enc = InMemoryEncoder::new(Container::WebM);
    enc.begin(cfg()).unwrap();
    let frame = FrameRGBA::blank(2, 2);
    enc.push_frame(FrameIndex(0), &frame).unwrap();
    let first = enc.drain();
    assert_eq!(first.len(), 2);
    assert_eq!(&first[0][..4], STREAM_MAGIC);

    enc.push_frame(FrameIndex(1), &frame).unwrap();
    let rest = enc.finish().unwrap();
    assert_eq!(rest.len(), 2);
    assert_eq!(rest[0][..8], 1u64.to_le_bytes());
    assert_eq!(rest[1], 2u64.to_le_bytes().to_vec());
    assert_eq!(enc.frames(), &[FrameIndex(0), FrameIndex(1)]);
}

#[test]
fn simulated_failure_and_abort() {
    let mut enc = InMemoryEncoder::new(Container::WebM).failing_at(FrameIndex(1));
    enc.begin(cfg()).unwrap();
    let frame = FrameRGBA::blank(2, 2);
    enc.push_frame(FrameIndex(0), &frame).unwrap();
    assert!(enc.push_frame(FrameIndex(1), &frame).is_err());
    enc.abort();
    assert!(enc.was_aborted());
    assert!(enc.drain().is_empty());
    assert!(enc.finish().is_err());
}
