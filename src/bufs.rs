//! Buffer chain the packers serialize into.
//!
//! Each [`FrameBuf`] holds exactly one physical frame. Every chunk starts
//! with [`FRAMEBUF_HEADROOM`] spare bytes in front of the frame header so
//! the padding indicators can be slotted in by moving the 8-byte header
//! back instead of moving the payload forward.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Error, Result};
use crate::frame::{FrameHd, FRAME_HDLEN, MAX_PAYLOADLEN};

/// Spare bytes in front of each frame header (room for PAD_HIGH/PAD_LOW).
pub const FRAMEBUF_HEADROOM: usize = 2;
/// Capacity of a single chunk.
pub const FRAMEBUF_CHUNKLEN: usize = FRAMEBUF_HEADROOM + FRAME_HDLEN + MAX_PAYLOADLEN;

/// One physical frame: header at `pos`, payload after it.
#[derive(Debug, Clone)]
pub struct FrameBuf {
    data: BytesMut,
    pos: usize,
}

impl Default for FrameBuf {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuf {
    pub fn new() -> Self {
        let mut data = BytesMut::with_capacity(FRAMEBUF_CHUNKLEN);
        data.resize(FRAMEBUF_HEADROOM + FRAME_HDLEN, 0);
        Self {
            data,
            pos: FRAMEBUF_HEADROOM,
        }
    }

    /// The serialized frame, header included.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[self.pos..]
    }

    /// Bytes of the serialized frame, header included.
    pub fn len(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_payload_empty(&self) -> bool {
        self.payload_len() == 0
    }

    pub fn payload(&self) -> &[u8] {
        &self.data[self.pos + FRAME_HDLEN..]
    }

    pub fn payload_len(&self) -> usize {
        self.len() - FRAME_HDLEN
    }

    /// Unused bytes in front of the frame header.
    pub fn headroom(&self) -> usize {
        self.pos
    }

    /// Writer positioned at the end of the payload.
    pub(crate) fn writer(&mut self) -> &mut BytesMut {
        &mut self.data
    }

    pub fn put_slice(&mut self, src: &[u8]) {
        self.data.put_slice(src);
    }

    pub fn put_u8(&mut self, n: u8) {
        self.data.put_u8(n);
    }

    pub fn put_u16(&mut self, n: u16) {
        self.data.put_u16(n);
    }

    pub fn put_u32(&mut self, n: u32) {
        self.data.put_u32(n);
    }

    pub fn put_zeros(&mut self, n: usize) {
        self.data.put_bytes(0, n);
    }

    /// Write `hd` into the header slot.
    pub fn pack_hd(&mut self, hd: &FrameHd) {
        self.data[self.pos..self.pos + FRAME_HDLEN].copy_from_slice(&hd.pack());
    }

    /// Move the frame header `n` bytes towards the front of the chunk and
    /// return the `n` bytes that opened up between header and payload.
    pub(crate) fn open_gap(&mut self, n: usize) -> Result<&mut [u8]> {
        if n > self.pos {
            return Err(Error::Proto(format!(
                "{} bytes of head-room left, {} needed",
                self.pos, n
            )));
        }
        let old = self.pos;
        self.pos -= n;
        self.data.copy_within(old..old + FRAME_HDLEN, self.pos);
        let gap = self.pos + FRAME_HDLEN;
        Ok(&mut self.data[gap..gap + n])
    }
}

/// Chain of physical frames produced by one pack call.
#[derive(Debug, Clone)]
pub struct FrameBufs {
    chunks: Vec<FrameBuf>,
}

impl Default for FrameBufs {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBufs {
    pub fn new() -> Self {
        Self {
            chunks: vec![FrameBuf::new()],
        }
    }

    /// Drop everything but a fresh head chunk.
    pub fn reset(&mut self) {
        self.chunks.clear();
        self.chunks.push(FrameBuf::new());
    }

    pub fn head(&self) -> &FrameBuf {
        &self.chunks[0]
    }

    pub fn head_mut(&mut self) -> &mut FrameBuf {
        &mut self.chunks[0]
    }

    /// The chunk currently being written.
    pub fn cur_mut(&mut self) -> &mut FrameBuf {
        let last = self.chunks.len() - 1;
        &mut self.chunks[last]
    }

    /// Start a new physical frame and make it current.
    pub fn add_chunk(&mut self) -> &mut FrameBuf {
        self.chunks.push(FrameBuf::new());
        self.cur_mut()
    }

    /// Total serialized bytes across all frames.
    pub fn len(&self) -> usize {
        self.chunks.iter().map(FrameBuf::len).sum()
    }

    pub fn num_frames(&self) -> usize {
        self.chunks.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrameBuf> {
        self.chunks.iter()
    }

    /// Concatenated wire image of every frame in the chain.
    pub fn to_bytes(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(self.len());
        for chunk in &self.chunks {
            out.put_slice(chunk.as_slice());
        }
        out.freeze()
    }
}
