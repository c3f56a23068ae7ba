//! Tests for HPACK encoding through the HeaderDeflater boundary

use h2_frame_codec::{HeaderDeflater, HpackDecoder, HpackEncoder, Nv};

#[test]
fn test_deflate_inflate_roundtrip() {
    let mut encoder = HpackEncoder::new();
    let mut decoder = HpackDecoder::new();
    let nva = vec![
        Nv::new(":status", "200"),
        Nv::new("content-type", "application/json"),
    ];
    let block = encoder.deflate(&nva).unwrap();
    assert_eq!(decoder.decode(&block).unwrap(), nva);
}

#[test]
fn test_deflate_static_table_hit_is_one_byte() {
    let mut encoder = HpackEncoder::new();
    let block = encoder.deflate(&[Nv::new(":method", "GET")]).unwrap();
    assert_eq!(block, vec![0x82]);
}

#[test]
fn test_deflate_preserves_order_and_duplicates() {
    let mut encoder = HpackEncoder::new();
    let mut decoder = HpackDecoder::new();

    let nva = vec![
        Nv::new(":status", "200"),
        Nv::new("content-type", "application/json"),
        Nv::new("x-request-id", "abc-123-def"),
        Nv::new("set-cookie", "session=xyz"),
        Nv::new("set-cookie", "theme=dark"),
    ];

    let block = encoder.deflate(&nva).unwrap();
    assert_eq!(decoder.decode(&block).unwrap(), nva);
}

#[test]
fn test_deflate_binary_value() {
    let mut encoder = HpackEncoder::new();
    let mut decoder = HpackDecoder::new();
    let nva = vec![Nv::new("x-bin", vec![0u8, 1, 0xfe, 0xff])];
    let block = encoder.deflate(&nva).unwrap();
    assert_eq!(decoder.decode(&block).unwrap(), nva);
}

#[test]
fn test_dynamic_table_shared_across_blocks() {
    let mut encoder = HpackEncoder::new();
    let mut decoder = HpackDecoder::new();
    let nva = vec![Nv::new("x-custom", "a fairly long header value")];

    let first = encoder.deflate(&nva).unwrap();
    let second = encoder.deflate(&nva).unwrap();
    assert!(second.len() < first.len());

    assert_eq!(decoder.decode(&first).unwrap(), nva);
    assert_eq!(decoder.decode(&second).unwrap(), nva);
}

#[test]
fn test_deflater_as_trait_object() {
    let mut encoder = HpackEncoder::new();
    let deflater: &mut dyn HeaderDeflater = &mut encoder;
    let block = deflater.deflate(&[Nv::new(":path", "/")]).unwrap();
    assert_eq!(block, vec![0x84]);
}
