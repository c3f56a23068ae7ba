//! Tests for GOAWAY and ALTSVC variable-length payloads

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use h2_frame_codec::{
    error_code, flags, frame_type, pack_altsvc, pack_goaway, unpack_altsvc_payload,
    unpack_goaway_payload, unpack_goaway_payload2, AltsvcFrame, Error, FrameBufs, FrameHd,
    GoawayFrame, ALTSVC_FIXED_LENGTH, GOAWAY_FIXED_LENGTH, MAX_PAYLOADLEN,
};

use super::split_frames;

/// Buffer owner that counts how many times it is released.
struct Tracked {
    data: Vec<u8>,
    drops: Arc<AtomicUsize>,
}

impl AsRef<[u8]> for Tracked {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

fn tracked(data: Vec<u8>) -> (Bytes, Arc<AtomicUsize>) {
    let drops = Arc::new(AtomicUsize::new(0));
    let bytes = Bytes::from_owner(Tracked {
        data,
        drops: drops.clone(),
    });
    (bytes, drops)
}

#[test]
fn test_goaway_gift_released_once() {
    let (gift, drops) = tracked(vec![7u8; 10]);
    let frame = GoawayFrame::new(5, error_code::NO_ERROR, gift);
    assert_eq!(frame.opaque_data_len(), 10);
    assert_eq!(frame.hd.length, GOAWAY_FIXED_LENGTH + 10);
    assert_eq!(drops.load(Ordering::SeqCst), 0);

    drop(frame);
    assert_eq!(drops.load(Ordering::SeqCst), 1);
}

#[test]
fn test_goaway_roundtrip() {
    let mut frame = GoawayFrame::new(
        9,
        error_code::ENHANCE_YOUR_CALM,
        Bytes::from_static(b"too many streams"),
    );
    let mut bufs = FrameBufs::new();
    pack_goaway(&mut bufs, &mut frame).unwrap();

    let (hd, payload) = &split_frames(&bufs.to_bytes())[0];
    assert_eq!(&payload[..8], &[0, 0, 0, 9, 0, 0, 0, 0xb]);
    let fixed: &[u8; 8] = payload[..8].try_into().unwrap();
    let unpacked =
        unpack_goaway_payload(hd, fixed, Bytes::copy_from_slice(&payload[8..])).unwrap();
    assert_eq!(unpacked, frame);
    assert_eq!(unpack_goaway_payload2(hd, payload).unwrap(), frame);
}

#[test]
fn test_goaway_unpack_attaches_gift_without_copy() {
    let (gift, drops) = tracked(b"debug".to_vec());
    let hd = FrameHd::new(GOAWAY_FIXED_LENGTH + 5, frame_type::GOAWAY, flags::NONE, 0);
    let ptr = gift.as_ptr();
    let frame = unpack_goaway_payload(&hd, &[0, 0, 0, 1, 0, 0, 0, 2], gift).unwrap();
    assert_eq!(frame.opaque_data.as_ptr(), ptr);
    assert_eq!(frame.last_stream_id, 1);
    assert_eq!(frame.error_code, error_code::INTERNAL_ERROR);

    drop(frame);
    assert_eq!(drops.load(Ordering::SeqCst), 1);
}

#[test]
fn test_goaway_short_gift_is_proto_error() {
    let hd = FrameHd::new(GOAWAY_FIXED_LENGTH + 10, frame_type::GOAWAY, flags::NONE, 0);
    let err = unpack_goaway_payload(&hd, &[0; 8], Bytes::from_static(b"short")).unwrap_err();
    assert!(matches!(err, Error::Proto(_)));
}

#[test]
fn test_goaway_too_large() {
    let debug = Bytes::from(vec![0u8; MAX_PAYLOADLEN - GOAWAY_FIXED_LENGTH + 1]);
    let mut frame = GoawayFrame::new(1, error_code::NO_ERROR, debug);
    let mut bufs = FrameBufs::new();
    assert!(matches!(pack_goaway(&mut bufs, &mut frame), Err(Error::FrameSize(_))));
}

fn altsvc_sample() -> AltsvcFrame {
    let anchor = Bytes::from_static(b"h2alt.example.comhttps://example.com");
    AltsvcFrame::from_anchor(0, 3600, 8443, Some(anchor), 2, 15, 19).unwrap()
}

#[test]
fn test_altsvc_wire_layout() {
    let mut frame = altsvc_sample();
    let mut bufs = FrameBufs::new();
    pack_altsvc(&mut bufs, &mut frame).unwrap();

    let payload = bufs.head().payload();
    assert_eq!(&payload[..4], &3600u32.to_be_bytes());
    assert_eq!(&payload[4..6], &8443u16.to_be_bytes());
    assert_eq!(payload[6], 2);
    assert_eq!(&payload[7..9], b"h2");
    assert_eq!(&payload[9..11], &15u16.to_be_bytes());
    assert_eq!(&payload[11..26], b"alt.example.com");
    assert_eq!(&payload[26..], b"https://example.com");
    assert_eq!(frame.hd.length, payload.len());
}

#[test]
fn test_altsvc_roundtrip_shares_gift() {
    let mut frame = altsvc_sample();
    let mut bufs = FrameBufs::new();
    pack_altsvc(&mut bufs, &mut frame).unwrap();

    let (hd, payload) = &split_frames(&bufs.to_bytes())[0];
    let fixed: &[u8; ALTSVC_FIXED_LENGTH] = payload[..ALTSVC_FIXED_LENGTH].try_into().unwrap();
    let gift = Bytes::copy_from_slice(&payload[ALTSVC_FIXED_LENGTH..]);
    let base = gift.as_ptr();

    let unpacked = unpack_altsvc_payload(hd, fixed, gift).unwrap();
    assert_eq!(unpacked, frame);
    assert_eq!(unpacked.protocol_id.as_ptr(), base);
}

#[test]
fn test_altsvc_all_empty() {
    let mut frame = AltsvcFrame::from_anchor(1, 0, 0, None, 0, 0, 0).unwrap();
    let mut bufs = FrameBufs::new();
    pack_altsvc(&mut bufs, &mut frame).unwrap();

    let (hd, payload) = &split_frames(&bufs.to_bytes())[0];
    assert_eq!(payload.len(), ALTSVC_FIXED_LENGTH + 2);
    let fixed: &[u8; ALTSVC_FIXED_LENGTH] = payload[..ALTSVC_FIXED_LENGTH].try_into().unwrap();
    let unpacked =
        unpack_altsvc_payload(hd, fixed, Bytes::copy_from_slice(&payload[ALTSVC_FIXED_LENGTH..]))
            .unwrap();
    assert!(unpacked.protocol_id.is_empty());
    assert!(unpacked.host.is_empty());
    assert!(unpacked.origin.is_empty());
    assert_eq!(unpacked, frame);
}

#[test]
fn test_altsvc_gift_shorter_than_declared() {
    let hd = FrameHd::new(20, frame_type::ALTSVC, flags::NONE, 0);
    // protocol id length 5, gift holds 3 bytes
    let err = unpack_altsvc_payload(&hd, &[0, 0, 0, 0, 0, 80, 5], Bytes::from_static(b"h2c"))
        .unwrap_err();
    assert!(matches!(err, Error::FrameSize(_)));

    // host length 10, gift holds 4 bytes after it
    let err = unpack_altsvc_payload(
        &hd,
        &[0, 0, 0, 0, 0, 80, 2],
        Bytes::from_static(b"h2\x00\x0ahost"),
    )
    .unwrap_err();
    assert!(matches!(err, Error::FrameSize(_)));
}

#[test]
fn test_altsvc_protocol_id_too_long() {
    let mut frame = AltsvcFrame::new(
        0,
        0,
        443,
        Bytes::from(vec![b'p'; 256]),
        Bytes::new(),
        Bytes::new(),
    );
    let mut bufs = FrameBufs::new();
    assert!(matches!(pack_altsvc(&mut bufs, &mut frame), Err(Error::FrameSize(_))));
}
