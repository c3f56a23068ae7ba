//! Tests for RST_STREAM, PING, WINDOW_UPDATE, BLOCKED and DATA scaffolding

use h2_frame_codec::{
    error_code, flags, frame_type, pack_blocked, pack_ping, pack_rst_stream,
    pack_window_update, unpack_ping_payload, unpack_rst_stream_payload,
    unpack_window_update_payload, BlockedFrame, DataFrame, DataSource, FrameBufs, PingFrame,
    PrivateData, Result, RstStreamFrame, WindowUpdateFrame, FRAME_HDLEN,
};

use super::split_frames;

#[test]
fn test_rst_stream_wire_layout() {
    let frame = RstStreamFrame::new(1, error_code::CANCEL);
    let mut bufs = FrameBufs::new();
    pack_rst_stream(&mut bufs, &frame);
    assert_eq!(&bufs.to_bytes()[..], &[0, 4, 3, 0, 0, 0, 0, 1, 0, 0, 0, 8]);
}

#[test]
fn test_rst_stream_roundtrip() {
    let frame = RstStreamFrame::new(11, error_code::REFUSED_STREAM);
    let mut bufs = FrameBufs::new();
    pack_rst_stream(&mut bufs, &frame);
    let (hd, payload) = &split_frames(&bufs.to_bytes())[0];
    let payload: &[u8; 4] = payload.as_slice().try_into().unwrap();
    assert_eq!(unpack_rst_stream_payload(hd, payload), frame);
}

#[test]
fn test_ping_roundtrip() {
    let data = [0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE, 0xBA, 0xBE];
    let frame = PingFrame::new(flags::ACK, Some(&data));
    let mut bufs = FrameBufs::new();
    pack_ping(&mut bufs, &frame);
    assert_eq!(bufs.len(), FRAME_HDLEN + 8);

    let (hd, payload) = &split_frames(&bufs.to_bytes())[0];
    assert!(hd.has_flag(flags::ACK));
    let payload: &[u8; 8] = payload.as_slice().try_into().unwrap();
    assert_eq!(unpack_ping_payload(hd, payload), frame);
}

#[test]
fn test_ping_copies_opaque_data() {
    let mut data = [1u8; 8];
    let frame = PingFrame::new(flags::NONE, Some(&data));
    data[0] = 9;
    assert_eq!(frame.opaque_data, [1u8; 8]);
}

#[test]
fn test_window_update_roundtrip() {
    let frame = WindowUpdateFrame::new(flags::NONE, 5, 65536);
    let mut bufs = FrameBufs::new();
    pack_window_update(&mut bufs, &frame);
    assert_eq!(&bufs.head().payload()[..], &0x0001_0000u32.to_be_bytes());

    let (hd, payload) = &split_frames(&bufs.to_bytes())[0];
    let payload: &[u8; 4] = payload.as_slice().try_into().unwrap();
    assert_eq!(unpack_window_update_payload(hd, payload), frame);
}

#[test]
fn test_window_update_reserved_bit_masked() {
    let frame = WindowUpdateFrame::new(flags::NONE, 0, 0xFFFF_FFFF);
    assert_eq!(frame.window_size_increment, 0x7FFF_FFFF);

    let hd = frame.hd;
    let unpacked = unpack_window_update_payload(&hd, &[0xFF, 0xFF, 0xFF, 0xFF]);
    assert_eq!(unpacked.window_size_increment, 0x7FFF_FFFF);
}

#[test]
fn test_blocked_has_no_payload() {
    let frame = BlockedFrame::new(3);
    let mut bufs = FrameBufs::new();
    pack_blocked(&mut bufs, &frame);
    assert_eq!(&bufs.to_bytes()[..], &[0, 0, frame_type::BLOCKED, 0, 0, 0, 0, 3]);
}

struct SliceSource {
    data: Vec<u8>,
    pos: usize,
}

impl DataSource for SliceSource {
    fn read(&mut self, buf: &mut [u8]) -> Result<(usize, bool)> {
        let n = buf.len().min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok((n, self.pos == self.data.len()))
    }
}

#[test]
fn test_private_data_reads_until_eof() {
    let source = SliceSource {
        data: b"hello world".to_vec(),
        pos: 0,
    };
    let mut pdata = PrivateData::new(flags::END_STREAM, 1, Box::new(source));
    pdata.padlen = 4;

    let mut buf = [0u8; 8];
    assert_eq!(pdata.read_chunk(&mut buf).unwrap(), 8);
    assert!(!pdata.eof);
    assert_eq!(pdata.read_chunk(&mut buf).unwrap(), 3);
    assert!(pdata.eof);

    let data = DataFrame::from_private(&pdata);
    assert_eq!(data.hd.frame_type, frame_type::DATA);
    assert_eq!(data.hd.stream_id, 1);
    assert!(data.hd.has_flag(flags::END_STREAM));
    assert_eq!(data.padlen, 4);
}

struct LyingSource;

impl DataSource for LyingSource {
    fn read(&mut self, buf: &mut [u8]) -> Result<(usize, bool)> {
        Ok((buf.len() + 1, false))
    }
}

#[test]
fn test_private_data_rejects_overlong_read() {
    let mut pdata = PrivateData::new(flags::NONE, 1, Box::new(LyingSource));
    let mut buf = [0u8; 4];
    assert!(pdata.read_chunk(&mut buf).is_err());
}
