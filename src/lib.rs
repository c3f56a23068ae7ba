//! h2-frame-codec: the wire-format core of an HTTP/2-family protocol stack
//!
//! This crate translates between in-memory frame values and their exact
//! byte-level encoding, in both directions. It does no I/O and keeps no
//! connection state: every routine is a function of its inputs plus the
//! header compression engine you pass in.
//!
//! # Features
//!
//! - **Bit-exact framing**: 8-byte frame header, 14-bit length, PAD_HIGH /
//!   PAD_LOW padding, group- or dependency-based priority
//! - **Frame kinds**: HEADERS, PRIORITY, RST_STREAM, SETTINGS,
//!   PUSH_PROMISE, PING, GOAWAY, WINDOW_UPDATE, ALTSVC, BLOCKED
//! - **CONTINUATION splitting**: oversized header blocks are spread over
//!   a HEADERS/PUSH_PROMISE frame and as many CONTINUATION frames as needed
//! - **Gifted buffers**: GOAWAY debug data and ALTSVC fields are `Bytes`
//!   moved into the frame, never copied
//! - **HPACK**: header compression via fluke-hpack, behind the
//!   [`HeaderDeflater`] trait
//!
//! # Quick Start
//!
//! ```rust
//! use h2_frame_codec::{
//!     flags, pack_headers, unpack_headers_payload, FrameBufs, FrameHd, HeadersFrame,
//!     HpackDecoder, HpackEncoder, Nv, PrioritySpec,
//! };
//!
//! let mut encoder = HpackEncoder::new();
//! let mut bufs = FrameBufs::new();
//!
//! let nva = vec![Nv::new(":method", "GET"), Nv::new(":path", "/")];
//! let mut frame = HeadersFrame::new(flags::END_STREAM, 1, PrioritySpec::None, nva);
//! pack_headers(&mut bufs, &mut frame, &mut encoder).unwrap();
//!
//! // One physical frame: header + payload
//! let wire = bufs.to_bytes();
//! let hd = FrameHd::unpack(wire[..8].try_into().unwrap());
//! assert!(hd.has_flag(flags::END_HEADERS));
//!
//! let payload = &wire[8..];
//! let (_, offset) = unpack_headers_payload(&hd, payload).unwrap();
//! let headers = HpackDecoder::new().decode(&payload[offset..]).unwrap();
//! assert_eq!(headers[0], Nv::new(":method", "GET"));
//! ```
//!
//! # Architecture
//!
//! - [`frame`]: constants, frame header, priority spec, frame values
//! - [`codec`]: padding, SETTINGS validation, per-frame pack/unpack
//! - [`bufs`]: the buffer chain packers write into
//! - [`nv`]: name/value list helpers
//! - [`hpack`]: header compression boundary
//!
//! It does NOT provide:
//! - Stream or connection state machines
//! - Flow-control accounting
//! - DATA payload streaming (see [`PrivateData`])

pub mod bufs;
pub mod codec;
pub mod error;
pub mod frame;
pub mod hpack;
pub mod nv;

pub use bufs::{FrameBuf, FrameBufs, FRAMEBUF_CHUNKLEN, FRAMEBUF_HEADROOM};
pub use codec::{
    add_pad, headers_payload_nv_offset, iv_check, iv_copy, pack_altsvc, pack_blocked,
    pack_frame, pack_goaway, pack_headers, pack_ping, pack_priority, pack_priority_spec,
    pack_push_promise, pack_rst_stream, pack_settings, pack_settings_payload,
    pack_window_update, pad_indicator_len, pad_indicator_len_from_flags,
    push_promise_payload_nv_offset, trail_padlen, unpack_altsvc_payload, unpack_frame,
    unpack_goaway_payload, unpack_goaway_payload2, unpack_headers_payload,
    unpack_ping_payload, unpack_priority_payload, unpack_priority_spec,
    unpack_push_promise_payload, unpack_rst_stream_payload, unpack_settings,
    unpack_settings_entry, unpack_settings_payload, unpack_settings_payload2,
    unpack_window_update_payload,
};
pub use error::{Error, Result};
pub use frame::{
    error_code, flags, frame_type, is_data_frame, priority_len, settings_id, AltsvcFrame,
    BlockedFrame, DataFrame, DataSource, Frame, FrameHd, GoawayFrame, HeadersFrame, PingFrame,
    PriorityFrame, PrioritySpec, PrivateData, PushPromiseFrame, RstStreamFrame, SettingsEntry,
    SettingsFrame, WindowUpdateFrame, ALTSVC_FIXED_LENGTH, ALTSVC_HOST_LEN_LENGTH,
    DEFAULT_WEIGHT, FRAME_HDLEN, FRAME_LENGTH_MASK, GOAWAY_FIXED_LENGTH, MAX_PAYLOADLEN,
    MAX_WEIGHT, MAX_WINDOW_SIZE, MIN_WEIGHT, PING_OPAQUE_LENGTH, PRIORITY_SPEC_LENGTH,
    PROMISED_STREAM_ID_LENGTH, RST_STREAM_LENGTH, SETTINGS_ENTRY_LENGTH, STREAM_ID_MASK,
    WINDOW_UPDATE_LENGTH,
};
pub use hpack::{HeaderDeflater, HpackDecoder, HpackEncoder};
pub use nv::{nv_array_copy, nv_array_del, nv_array_sort, nv_compare, nv_equal, Nv};
