//! Frame values and their fixed-layout pieces.
//!
//! Wire layout follows the draft HTTP/2 framing this library speaks:
//! an 8-byte frame header with a 14-bit length, PAD_HIGH/PAD_LOW padding
//! indicators, group- or dependency-based priority and 5-byte SETTINGS
//! entries. All multi-byte integers are big-endian.

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::nv::Nv;

/// Frame types
pub mod frame_type {
    pub const DATA: u8 = 0x0;
    pub const HEADERS: u8 = 0x1;
    pub const PRIORITY: u8 = 0x2;
    pub const RST_STREAM: u8 = 0x3;
    pub const SETTINGS: u8 = 0x4;
    pub const PUSH_PROMISE: u8 = 0x5;
    pub const PING: u8 = 0x6;
    pub const GOAWAY: u8 = 0x7;
    pub const WINDOW_UPDATE: u8 = 0x8;
    pub const CONTINUATION: u8 = 0x9;
    pub const ALTSVC: u8 = 0xa;
    pub const BLOCKED: u8 = 0xb;
}

/// Frame flags. Meaning depends on the frame type.
pub mod flags {
    pub const NONE: u8 = 0x0;
    pub const END_STREAM: u8 = 0x1;
    pub const ACK: u8 = 0x1; // SETTINGS / PING
    pub const END_SEGMENT: u8 = 0x2;
    pub const END_HEADERS: u8 = 0x4;
    pub const PAD_LOW: u8 = 0x8;
    pub const PAD_HIGH: u8 = 0x10;
    pub const PRIORITY_GROUP: u8 = 0x20;
    pub const PRIORITY_DEPENDENCY: u8 = 0x40;
}

/// SETTINGS identifiers
pub mod settings_id {
    pub const HEADER_TABLE_SIZE: u8 = 0x1;
    pub const ENABLE_PUSH: u8 = 0x2;
    pub const MAX_CONCURRENT_STREAMS: u8 = 0x3;
    pub const INITIAL_WINDOW_SIZE: u8 = 0x4;
    pub const COMPRESS_DATA: u8 = 0x5;
}

/// Error codes carried by RST_STREAM and GOAWAY
pub mod error_code {
    pub const NO_ERROR: u32 = 0x0;
    pub const PROTOCOL_ERROR: u32 = 0x1;
    pub const INTERNAL_ERROR: u32 = 0x2;
    pub const FLOW_CONTROL_ERROR: u32 = 0x3;
    pub const SETTINGS_TIMEOUT: u32 = 0x4;
    pub const STREAM_CLOSED: u32 = 0x5;
    pub const FRAME_SIZE_ERROR: u32 = 0x6;
    pub const REFUSED_STREAM: u32 = 0x7;
    pub const CANCEL: u32 = 0x8;
    pub const COMPRESSION_ERROR: u32 = 0x9;
    pub const CONNECT_ERROR: u32 = 0xa;
    pub const ENHANCE_YOUR_CALM: u32 = 0xb;
    pub const INADEQUATE_SECURITY: u32 = 0xc;
}

/// Bytes in a frame header.
pub const FRAME_HDLEN: usize = 8;
/// Usable bits of the length field.
pub const FRAME_LENGTH_MASK: u16 = (1 << 14) - 1;
pub const STREAM_ID_MASK: u32 = (1 << 31) - 1;
pub const PRI_GROUP_ID_MASK: u32 = (1 << 31) - 1;
pub const WINDOW_SIZE_INCREMENT_MASK: u32 = (1 << 31) - 1;
/// Largest payload a single physical frame may carry.
pub const MAX_PAYLOADLEN: usize = FRAME_LENGTH_MASK as usize;
/// Largest legal flow-control window.
pub const MAX_WINDOW_SIZE: u32 = (1 << 31) - 1;

pub const SETTINGS_ENTRY_LENGTH: usize = 5;
pub const PRIORITY_SPEC_LENGTH: usize = 5;
pub const PING_OPAQUE_LENGTH: usize = 8;
pub const RST_STREAM_LENGTH: usize = 4;
pub const WINDOW_UPDATE_LENGTH: usize = 4;
pub const PROMISED_STREAM_ID_LENGTH: usize = 4;
/// Last-stream-id + error code.
pub const GOAWAY_FIXED_LENGTH: usize = 8;
/// Max-age + port + protocol-id length.
pub const ALTSVC_FIXED_LENGTH: usize = 7;
/// Width of the host length field inside the ALTSVC variable part.
pub const ALTSVC_HOST_LEN_LENGTH: usize = 2;

pub const MIN_WEIGHT: u16 = 1;
pub const MAX_WEIGHT: u16 = 256;
pub const DEFAULT_WEIGHT: u16 = 16;

/// Common 8-byte frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameHd {
    /// Physical payload length, padding included.
    pub length: usize,
    pub frame_type: u8,
    pub flags: u8,
    /// 31 bits; the reserved bit is never stored.
    pub stream_id: u32,
}

impl FrameHd {
    pub fn new(length: usize, frame_type: u8, flags: u8, stream_id: u32) -> Self {
        Self {
            length,
            frame_type,
            flags,
            stream_id: stream_id & STREAM_ID_MASK,
        }
    }

    /// Serialize into the 8-byte wire header.
    pub fn pack(&self) -> [u8; FRAME_HDLEN] {
        let mut buf = [0u8; FRAME_HDLEN];
        let length = (self.length as u16) & FRAME_LENGTH_MASK;
        buf[0..2].copy_from_slice(&length.to_be_bytes());
        buf[2] = self.frame_type;
        buf[3] = self.flags;
        buf[4..8].copy_from_slice(&(self.stream_id & STREAM_ID_MASK).to_be_bytes());
        buf
    }

    /// Parse an 8-byte wire header. The reserved bits are dropped.
    pub fn unpack(buf: &[u8; FRAME_HDLEN]) -> Self {
        let length = u16::from_be_bytes([buf[0], buf[1]]) & FRAME_LENGTH_MASK;
        let stream_id = u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]) & STREAM_ID_MASK;
        Self {
            length: length as usize,
            frame_type: buf[2],
            flags: buf[3],
            stream_id,
        }
    }

    pub fn has_flag(&self, flag: u8) -> bool {
        self.flags & flag != 0
    }

    /// Total frame size including header
    pub fn total_size(&self) -> usize {
        FRAME_HDLEN + self.length
    }
}

/// True if the 8-byte header in `head` announces a DATA frame.
pub fn is_data_frame(head: &[u8; FRAME_HDLEN]) -> bool {
    head[2] == frame_type::DATA
}

/// Optional priority sub-field of HEADERS and PRIORITY frames.
///
/// Weights are kept in `MIN_WEIGHT..=MAX_WEIGHT` and go on the wire as
/// `weight - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrioritySpec {
    /// No priority field on the wire.
    #[default]
    None,
    Group { pri_group_id: u32, weight: u16 },
    Dependency {
        stream_id: u32,
        weight: u16,
        exclusive: bool,
    },
}

impl PrioritySpec {
    pub fn group(pri_group_id: u32, weight: u16) -> Self {
        PrioritySpec::Group {
            pri_group_id: pri_group_id & PRI_GROUP_ID_MASK,
            weight: clamp_weight(weight),
        }
    }

    pub fn dependency(stream_id: u32, weight: u16, exclusive: bool) -> Self {
        PrioritySpec::Dependency {
            stream_id: stream_id & STREAM_ID_MASK,
            weight: clamp_weight(weight),
            exclusive,
        }
    }

    /// The frame flag selecting this variant.
    pub fn flags(&self) -> u8 {
        match self {
            PrioritySpec::None => flags::NONE,
            PrioritySpec::Group { .. } => flags::PRIORITY_GROUP,
            PrioritySpec::Dependency { .. } => flags::PRIORITY_DEPENDENCY,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, PrioritySpec::None)
    }
}

fn clamp_weight(weight: u16) -> u16 {
    weight.clamp(MIN_WEIGHT, MAX_WEIGHT)
}

/// Replace any priority flags in `flags` with the ones `pri_spec` selects.
fn with_priority_flags(flags: u8, pri_spec: &PrioritySpec) -> u8 {
    (flags & !(flags::PRIORITY_GROUP | flags::PRIORITY_DEPENDENCY)) | pri_spec.flags()
}

/// HEADERS frame. Owns its header list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadersFrame {
    pub hd: FrameHd,
    pub pri_spec: PrioritySpec,
    pub nva: Vec<Nv>,
    /// Total padding requested: indicator bytes plus trailing zeros.
    pub padlen: usize,
}

impl HeadersFrame {
    /// Takes ownership of `nva`.
    pub fn new(flags: u8, stream_id: u32, pri_spec: PrioritySpec, nva: Vec<Nv>) -> Self {
        let flags = with_priority_flags(flags, &pri_spec);
        Self {
            hd: FrameHd::new(0, frame_type::HEADERS, flags, stream_id),
            pri_spec,
            nva,
            padlen: 0,
        }
    }

    pub fn with_padlen(mut self, padlen: usize) -> Self {
        self.padlen = padlen;
        self
    }
}

/// PRIORITY frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityFrame {
    pub hd: FrameHd,
    pub pri_spec: PrioritySpec,
}

impl PriorityFrame {
    pub fn new(stream_id: u32, pri_spec: PrioritySpec) -> Self {
        let length = priority_len(pri_spec.flags());
        Self {
            hd: FrameHd::new(length, frame_type::PRIORITY, pri_spec.flags(), stream_id),
            pri_spec,
        }
    }
}

/// RST_STREAM frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RstStreamFrame {
    pub hd: FrameHd,
    pub error_code: u32,
}

impl RstStreamFrame {
    pub fn new(stream_id: u32, error_code: u32) -> Self {
        Self {
            hd: FrameHd::new(RST_STREAM_LENGTH, frame_type::RST_STREAM, flags::NONE, stream_id),
            error_code,
        }
    }
}

/// One SETTINGS parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SettingsEntry {
    pub settings_id: u8,
    pub value: u32,
}

impl SettingsEntry {
    pub fn new(settings_id: u8, value: u32) -> Self {
        Self { settings_id, value }
    }
}

/// SETTINGS frame. Owns its entry array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsFrame {
    pub hd: FrameHd,
    pub iv: Vec<SettingsEntry>,
}

impl SettingsFrame {
    /// Takes ownership of `iv`.
    pub fn new(flags: u8, iv: Vec<SettingsEntry>) -> Self {
        Self {
            hd: FrameHd::new(iv.len() * SETTINGS_ENTRY_LENGTH, frame_type::SETTINGS, flags, 0),
            iv,
        }
    }

    pub fn ack() -> Self {
        Self::new(flags::ACK, Vec::new())
    }

    pub fn niv(&self) -> usize {
        self.iv.len()
    }
}

/// PUSH_PROMISE frame. Owns its header list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushPromiseFrame {
    pub hd: FrameHd,
    pub promised_stream_id: u32,
    pub nva: Vec<Nv>,
    /// Total padding requested: indicator bytes plus trailing zeros.
    pub padlen: usize,
}

impl PushPromiseFrame {
    /// Takes ownership of `nva`.
    pub fn new(flags: u8, stream_id: u32, promised_stream_id: u32, nva: Vec<Nv>) -> Self {
        Self {
            hd: FrameHd::new(
                0,
                frame_type::PUSH_PROMISE,
                flags & !(flags::PRIORITY_GROUP | flags::PRIORITY_DEPENDENCY),
                stream_id,
            ),
            promised_stream_id: promised_stream_id & STREAM_ID_MASK,
            nva,
            padlen: 0,
        }
    }

    pub fn with_padlen(mut self, padlen: usize) -> Self {
        self.padlen = padlen;
        self
    }
}

/// PING frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingFrame {
    pub hd: FrameHd,
    pub opaque_data: [u8; PING_OPAQUE_LENGTH],
}

impl PingFrame {
    /// `opaque_data` is copied; `None` means eight zero bytes.
    pub fn new(flags: u8, opaque_data: Option<&[u8; PING_OPAQUE_LENGTH]>) -> Self {
        Self {
            hd: FrameHd::new(PING_OPAQUE_LENGTH, frame_type::PING, flags, 0),
            opaque_data: opaque_data.copied().unwrap_or_default(),
        }
    }
}

/// GOAWAY frame. Owns the debug data it was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoawayFrame {
    pub hd: FrameHd,
    pub last_stream_id: u32,
    pub error_code: u32,
    pub opaque_data: Bytes,
}

impl GoawayFrame {
    /// `opaque_data` is gifted to the frame and released with it.
    pub fn new(last_stream_id: u32, error_code: u32, opaque_data: Bytes) -> Self {
        Self {
            hd: FrameHd::new(
                GOAWAY_FIXED_LENGTH + opaque_data.len(),
                frame_type::GOAWAY,
                flags::NONE,
                0,
            ),
            last_stream_id: last_stream_id & STREAM_ID_MASK,
            error_code,
            opaque_data,
        }
    }

    pub fn opaque_data_len(&self) -> usize {
        self.opaque_data.len()
    }
}

/// WINDOW_UPDATE frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowUpdateFrame {
    pub hd: FrameHd,
    pub window_size_increment: u32,
}

impl WindowUpdateFrame {
    pub fn new(flags: u8, stream_id: u32, window_size_increment: u32) -> Self {
        Self {
            hd: FrameHd::new(WINDOW_UPDATE_LENGTH, frame_type::WINDOW_UPDATE, flags, stream_id),
            window_size_increment: window_size_increment & WINDOW_SIZE_INCREMENT_MASK,
        }
    }
}

/// ALTSVC frame.
///
/// `protocol_id`, `host` and `origin` are views. When built through
/// [`AltsvcFrame::from_anchor`] or unpacked from the wire they share a
/// single allocation, which is released once the frame is dropped. An
/// all-empty frame holds no allocation at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AltsvcFrame {
    pub hd: FrameHd,
    pub max_age: u32,
    pub port: u16,
    pub protocol_id: Bytes,
    pub host: Bytes,
    pub origin: Bytes,
}

impl AltsvcFrame {
    pub fn new(
        stream_id: u32,
        max_age: u32,
        port: u16,
        protocol_id: Bytes,
        host: Bytes,
        origin: Bytes,
    ) -> Self {
        let length = ALTSVC_FIXED_LENGTH
            + protocol_id.len()
            + ALTSVC_HOST_LEN_LENGTH
            + host.len()
            + origin.len();
        Self {
            hd: FrameHd::new(length, frame_type::ALTSVC, flags::NONE, stream_id),
            max_age,
            port,
            protocol_id,
            host,
            origin,
        }
    }

    /// Split one contiguous `protocol_id ++ host ++ origin` allocation
    /// into the three views. `anchor` may be `None` only when all three
    /// lengths are zero.
    pub fn from_anchor(
        stream_id: u32,
        max_age: u32,
        port: u16,
        anchor: Option<Bytes>,
        protocol_id_len: usize,
        host_len: usize,
        origin_len: usize,
    ) -> Result<Self> {
        let need = protocol_id_len + host_len + origin_len;
        let mut anchor = match anchor {
            Some(anchor) => anchor,
            None if need == 0 => Bytes::new(),
            None => {
                return Err(Error::Proto(format!(
                    "ALTSVC needs {} bytes but has no backing buffer",
                    need
                )))
            }
        };
        if anchor.len() < need {
            return Err(Error::FrameSize(format!(
                "ALTSVC backing buffer holds {} bytes, fields need {}",
                anchor.len(),
                need
            )));
        }
        let protocol_id = anchor.split_to(protocol_id_len);
        let host = anchor.split_to(host_len);
        let origin = anchor.split_to(origin_len);
        Ok(Self::new(stream_id, max_age, port, protocol_id, host, origin))
    }
}

/// BLOCKED frame. Header only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockedFrame {
    pub hd: FrameHd,
}

impl BlockedFrame {
    pub fn new(stream_id: u32) -> Self {
        Self {
            hd: FrameHd::new(0, frame_type::BLOCKED, flags::NONE, stream_id),
        }
    }
}

/// Source of DATA payload bytes.
pub trait DataSource {
    /// Fill `buf` with up to `buf.len()` bytes. Returns the number of
    /// bytes written and whether the source is exhausted.
    fn read(&mut self, buf: &mut [u8]) -> Result<(usize, bool)>;
}

/// Internal pairing of a DATA header with the source that feeds it.
/// Never packed directly; the DATA streaming path consumes it chunk by
/// chunk.
pub struct PrivateData {
    pub hd: FrameHd,
    pub data_prd: Box<dyn DataSource>,
    /// Padding for the next emitted chunk, indicators included.
    pub padlen: usize,
    /// Set once `data_prd` reported end of data.
    pub eof: bool,
}

impl std::fmt::Debug for PrivateData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateData")
            .field("hd", &self.hd)
            .field("padlen", &self.padlen)
            .field("eof", &self.eof)
            .finish()
    }
}

impl PrivateData {
    pub fn new(flags: u8, stream_id: u32, data_prd: Box<dyn DataSource>) -> Self {
        Self {
            hd: FrameHd::new(0, frame_type::DATA, flags, stream_id),
            data_prd,
            padlen: 0,
            eof: false,
        }
    }

    /// Pull the next chunk from the source, latching `eof`.
    pub fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
        let (n, eof) = self.data_prd.read(buf)?;
        if n > buf.len() {
            return Err(Error::Proto(format!(
                "data source returned {} bytes for a {} byte buffer",
                n,
                buf.len()
            )));
        }
        self.eof |= eof;
        Ok(n)
    }
}

/// Wire-visible view of a DATA frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataFrame {
    pub hd: FrameHd,
    pub padlen: usize,
}

impl DataFrame {
    pub fn from_private(pdata: &PrivateData) -> Self {
        Self {
            hd: pdata.hd,
            padlen: pdata.padlen,
        }
    }
}

/// Length of the priority field selected by `flags`, or 0.
pub fn priority_len(flags: u8) -> usize {
    if flags & (flags::PRIORITY_GROUP | flags::PRIORITY_DEPENDENCY) != 0 {
        PRIORITY_SPEC_LENGTH
    } else {
        0
    }
}

/// Every frame kind the codec knows about.
#[derive(Debug)]
pub enum Frame {
    Headers(HeadersFrame),
    Priority(PriorityFrame),
    RstStream(RstStreamFrame),
    Settings(SettingsFrame),
    PushPromise(PushPromiseFrame),
    Ping(PingFrame),
    Goaway(GoawayFrame),
    WindowUpdate(WindowUpdateFrame),
    AltSvc(AltsvcFrame),
    Blocked(BlockedFrame),
    PrivateData(PrivateData),
}

impl Frame {
    pub fn hd(&self) -> &FrameHd {
        match self {
            Frame::Headers(f) => &f.hd,
            Frame::Priority(f) => &f.hd,
            Frame::RstStream(f) => &f.hd,
            Frame::Settings(f) => &f.hd,
            Frame::PushPromise(f) => &f.hd,
            Frame::Ping(f) => &f.hd,
            Frame::Goaway(f) => &f.hd,
            Frame::WindowUpdate(f) => &f.hd,
            Frame::AltSvc(f) => &f.hd,
            Frame::Blocked(f) => &f.hd,
            Frame::PrivateData(f) => &f.hd,
        }
    }
}
