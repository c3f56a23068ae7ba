//! Per-frame-type pack/unpack routines.
//!
//! Packing writes into a [`FrameBufs`] chain, one chunk per physical
//! frame. Every pack routine resets the chain first, so a failed call
//! leaves nothing worth keeping behind.
//!
//! Unpacking works on payloads the caller already split off the wire
//! using the 8-byte header. Fixed-size payloads are taken as arrays so a
//! short read cannot happen; variable tails (GOAWAY debug data, ALTSVC
//! fields) are gifted as [`Bytes`] and attached to the frame without a
//! copy.

use bytes::{Buf, BufMut, Bytes};

use crate::bufs::{FrameBuf, FrameBufs};
use crate::error::{Error, Result};
use crate::frame::*;
use crate::hpack::HeaderDeflater;
use crate::nv::Nv;

// ============================================================================
// Priority spec
// ============================================================================

/// Write the priority field for `pri_spec`. Writes nothing for
/// [`PrioritySpec::None`].
pub fn pack_priority_spec(buf: &mut FrameBuf, pri_spec: &PrioritySpec) {
    match *pri_spec {
        PrioritySpec::None => {}
        PrioritySpec::Group {
            pri_group_id,
            weight,
        } => {
            buf.put_u32(pri_group_id & PRI_GROUP_ID_MASK);
            buf.put_u8(wire_weight(weight));
        }
        PrioritySpec::Dependency {
            stream_id,
            weight,
            exclusive,
        } => {
            let mut dep = stream_id & STREAM_ID_MASK;
            if exclusive {
                dep |= 1 << 31;
            }
            buf.put_u32(dep);
            buf.put_u8(wire_weight(weight));
        }
    }
}

/// Read the priority field selected by `flags` from the front of
/// `payload`. Fields missing from a short payload keep their defaults.
/// A payload carrying both priority flags is read as group-based.
pub fn unpack_priority_spec(flags: u8, payload: &[u8]) -> PrioritySpec {
    let word = read_u32(payload, 0).unwrap_or(0);
    let weight = payload
        .get(4)
        .map(|&w| u16::from(w) + 1)
        .unwrap_or(DEFAULT_WEIGHT);

    if flags & flags::PRIORITY_GROUP != 0 {
        PrioritySpec::Group {
            pri_group_id: word & PRI_GROUP_ID_MASK,
            weight,
        }
    } else if flags & flags::PRIORITY_DEPENDENCY != 0 {
        PrioritySpec::Dependency {
            stream_id: word & STREAM_ID_MASK,
            weight,
            exclusive: word & (1 << 31) != 0,
        }
    } else {
        PrioritySpec::None
    }
}

fn wire_weight(weight: u16) -> u8 {
    (weight.clamp(MIN_WEIGHT, MAX_WEIGHT) - 1) as u8
}

fn read_u32(payload: &[u8], off: usize) -> Option<u32> {
    let bytes = payload.get(off..off + 4)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

// ============================================================================
// Padding
// ============================================================================

/// Padding-length indicator bytes needed for a total padding of `padlen`.
pub fn pad_indicator_len(padlen: usize) -> usize {
    match padlen {
        0 => 0,
        1..=256 => 1,
        _ => 2,
    }
}

/// Padding-length indicator bytes announced by `flags`.
pub fn pad_indicator_len_from_flags(flags: u8) -> usize {
    if flags & flags::PAD_HIGH != 0 {
        2
    } else if flags & flags::PAD_LOW != 0 {
        1
    } else {
        0
    }
}

/// Zero bytes that follow the payload for a total padding of `padlen`.
/// The indicator bytes are not trailing padding.
pub fn trail_padlen(padlen: usize) -> usize {
    padlen - pad_indicator_len(padlen)
}

/// Pad the frame in the head chunk of `bufs` with `padlen` bytes in total.
///
/// The indicator goes right after the frame header (the header moves into
/// the chunk's head-room, the payload stays put), the zeros go after the
/// payload, and `hd` gets the new length and PAD_LOW/PAD_HIGH flags.
pub fn add_pad(bufs: &mut FrameBufs, hd: &mut FrameHd, padlen: usize) -> Result<()> {
    if padlen == 0 {
        return Ok(());
    }
    if hd.length + padlen > MAX_PAYLOADLEN {
        tracing::debug!(
            stream_id = hd.stream_id,
            length = hd.length,
            padlen,
            "padding rejected"
        );
        return Err(Error::FrameSize(format!(
            "padding {} on a {} byte payload exceeds {}",
            padlen, hd.length, MAX_PAYLOADLEN
        )));
    }

    if hd.flags & (flags::PAD_LOW | flags::PAD_HIGH) != 0 {
        return Err(Error::Proto(format!(
            "frame on stream {} is already padded",
            hd.stream_id
        )));
    }

    let nind = pad_indicator_len(padlen);
    let trail = padlen - nind;
    let head = bufs.head_mut();

    let gap = head.open_gap(nind)?;
    if nind == 2 {
        gap.copy_from_slice(&(trail as u16).to_be_bytes());
    } else {
        gap[0] = trail as u8;
    }
    head.put_zeros(trail);

    hd.flags |= flags::PAD_LOW;
    if nind == 2 {
        hd.flags |= flags::PAD_HIGH;
    }
    hd.length += padlen;
    head.pack_hd(hd);

    tracing::trace!(stream_id = hd.stream_id, padlen, trail, "padding added");
    Ok(())
}

/// Read the padding indicator at the front of `payload`. Returns the
/// indicator size and the total padding it announces.
fn unpack_padding(hd: &FrameHd, payload: &[u8], fixed: usize) -> Result<(usize, usize)> {
    if hd.has_flag(flags::PAD_HIGH) && !hd.has_flag(flags::PAD_LOW) {
        return Err(Error::Proto(format!(
            "frame type {:#x} sets PAD_HIGH without PAD_LOW",
            hd.frame_type
        )));
    }
    let nind = pad_indicator_len_from_flags(hd.flags);
    if payload.len() < nind + fixed {
        return Err(Error::Proto(format!(
            "frame type {:#x} payload of {} bytes is shorter than its {} fixed bytes",
            hd.frame_type,
            payload.len(),
            nind + fixed
        )));
    }
    let trail = match nind {
        0 => return Ok((0, 0)),
        1 => payload[0] as usize,
        _ => u16::from_be_bytes([payload[0], payload[1]]) as usize,
    };
    if nind + fixed + trail > payload.len() {
        return Err(Error::Proto(format!(
            "padding of {} bytes does not fit a {} byte payload",
            trail,
            payload.len()
        )));
    }
    Ok((nind, nind + trail))
}

// ============================================================================
// HEADERS / PUSH_PROMISE
// ============================================================================

/// Offset of the compressed header block inside a HEADERS payload.
pub fn headers_payload_nv_offset(frame: &HeadersFrame) -> usize {
    pad_indicator_len_from_flags(frame.hd.flags) + priority_len(frame.hd.flags)
}

/// Offset of the compressed header block inside a PUSH_PROMISE payload.
pub fn push_promise_payload_nv_offset(frame: &PushPromiseFrame) -> usize {
    pad_indicator_len_from_flags(frame.hd.flags) + PROMISED_STREAM_ID_LENGTH
}

/// Serialize a HEADERS frame plus as many CONTINUATION frames as the
/// compressed header block needs.
///
/// `frame.hd` ends up describing the first physical frame: its length,
/// END_HEADERS only when no CONTINUATION follows, and padding flags.
pub fn pack_headers<D>(bufs: &mut FrameBufs, frame: &mut HeadersFrame, deflater: &mut D) -> Result<()>
where
    D: HeaderDeflater + ?Sized,
{
    frame.hd.flags = (frame.hd.flags & !(flags::PRIORITY_GROUP | flags::PRIORITY_DEPENDENCY))
        | frame.pri_spec.flags();
    let prelen = priority_len(frame.hd.flags);
    let pri_spec = frame.pri_spec;
    pack_header_block(
        bufs,
        &mut frame.hd,
        prelen,
        frame.padlen,
        &frame.nva,
        deflater,
        |buf| pack_priority_spec(buf, &pri_spec),
    )
}

/// Serialize a PUSH_PROMISE frame plus any CONTINUATION frames.
pub fn pack_push_promise<D>(
    bufs: &mut FrameBufs,
    frame: &mut PushPromiseFrame,
    deflater: &mut D,
) -> Result<()>
where
    D: HeaderDeflater + ?Sized,
{
    frame.hd.flags &= !(flags::PRIORITY_GROUP | flags::PRIORITY_DEPENDENCY);
    let promised_stream_id = frame.promised_stream_id & STREAM_ID_MASK;
    pack_header_block(
        bufs,
        &mut frame.hd,
        PROMISED_STREAM_ID_LENGTH,
        frame.padlen,
        &frame.nva,
        deflater,
        |buf| buf.put_u32(promised_stream_id),
    )
}

fn pack_header_block<D, F>(
    bufs: &mut FrameBufs,
    hd: &mut FrameHd,
    prelen: usize,
    padlen: usize,
    nva: &[Nv],
    deflater: &mut D,
    write_pre: F,
) -> Result<()>
where
    D: HeaderDeflater + ?Sized,
    F: FnOnce(&mut FrameBuf),
{
    // Must fail before deflate() touches the engine's dynamic table.
    if prelen + padlen > MAX_PAYLOADLEN {
        return Err(Error::FrameSize(format!(
            "{} fixed bytes and {} padding exceed {}",
            prelen, padlen, MAX_PAYLOADLEN
        )));
    }

    let block = deflater.deflate(nva)?;

    bufs.reset();
    let first_len = block.len().min(MAX_PAYLOADLEN - prelen - padlen);
    let (first, mut rest) = block.split_at(first_len);

    hd.flags &= !(flags::END_HEADERS | flags::PAD_LOW | flags::PAD_HIGH);
    if rest.is_empty() {
        hd.flags |= flags::END_HEADERS;
    }
    hd.length = prelen + first.len();

    let head = bufs.head_mut();
    write_pre(head);
    head.put_slice(first);
    head.pack_hd(hd);

    while !rest.is_empty() {
        let (chunk, tail) = rest.split_at(rest.len().min(MAX_PAYLOADLEN));
        let cont_flags = if tail.is_empty() {
            flags::END_HEADERS
        } else {
            flags::NONE
        };
        let cont_hd = FrameHd::new(chunk.len(), frame_type::CONTINUATION, cont_flags, hd.stream_id);
        let buf = bufs.add_chunk();
        buf.put_slice(chunk);
        buf.pack_hd(&cont_hd);
        rest = tail;
    }

    add_pad(bufs, hd, padlen)?;

    tracing::trace!(
        frame_type = hd.frame_type,
        stream_id = hd.stream_id,
        block_len = block.len(),
        frames = bufs.num_frames(),
        "header block packed"
    );
    Ok(())
}

/// Parse the part of a HEADERS payload in front of the compressed header
/// block. Returns the frame (with an empty header list) and the offset
/// at which the block starts.
pub fn unpack_headers_payload(hd: &FrameHd, payload: &[u8]) -> Result<(HeadersFrame, usize)> {
    let prilen = priority_len(hd.flags);
    let (nind, padlen) = unpack_padding(hd, payload, prilen)?;
    let pri_spec = unpack_priority_spec(hd.flags, &payload[nind..]);
    let frame = HeadersFrame {
        hd: *hd,
        pri_spec,
        nva: Vec::new(),
        padlen,
    };
    Ok((frame, nind + prilen))
}

/// Parse the part of a PUSH_PROMISE payload in front of the compressed
/// header block. Returns the frame and the block offset.
pub fn unpack_push_promise_payload(
    hd: &FrameHd,
    payload: &[u8],
) -> Result<(PushPromiseFrame, usize)> {
    let (nind, padlen) = unpack_padding(hd, payload, PROMISED_STREAM_ID_LENGTH)?;
    let promised_stream_id = read_u32(payload, nind).unwrap_or(0) & STREAM_ID_MASK;
    let frame = PushPromiseFrame {
        hd: *hd,
        promised_stream_id,
        nva: Vec::new(),
        padlen,
    };
    Ok((frame, nind + PROMISED_STREAM_ID_LENGTH))
}

// ============================================================================
// SETTINGS
// ============================================================================

/// Write `iv` as contiguous 5-byte entries. Returns the bytes written.
pub fn pack_settings_payload<B: BufMut>(buf: &mut B, iv: &[SettingsEntry]) -> usize {
    for entry in iv {
        buf.put_u8(entry.settings_id);
        buf.put_u32(entry.value);
    }
    iv.len() * SETTINGS_ENTRY_LENGTH
}

pub fn unpack_settings_entry(payload: &[u8; SETTINGS_ENTRY_LENGTH]) -> SettingsEntry {
    SettingsEntry {
        settings_id: payload[0],
        value: u32::from_be_bytes([payload[1], payload[2], payload[3], payload[4]]),
    }
}

fn settings_entries(payload: &[u8]) -> impl Iterator<Item = SettingsEntry> + '_ {
    payload.chunks_exact(SETTINGS_ENTRY_LENGTH).map(|rec| {
        let mut entry = [0u8; SETTINGS_ENTRY_LENGTH];
        entry.copy_from_slice(rec);
        unpack_settings_entry(&entry)
    })
}

/// Decode entries into the caller's `iv`, stopping when it is full.
/// Returns the number of entries written.
pub fn unpack_settings_payload(payload: &[u8], iv: &mut [SettingsEntry]) -> usize {
    let mut n = 0;
    for (slot, entry) in iv.iter_mut().zip(settings_entries(payload)) {
        *slot = entry;
        n += 1;
    }
    n
}

/// Decode every complete entry in `payload` into a new array. Trailing
/// bytes that do not make up a whole entry are ignored.
pub fn unpack_settings_payload2(payload: &[u8]) -> Result<Vec<SettingsEntry>> {
    let niv = payload.len() / SETTINGS_ENTRY_LENGTH;
    let mut iv = Vec::new();
    iv.try_reserve_exact(niv)?;
    iv.extend(settings_entries(payload));
    Ok(iv)
}

/// Deep copy of a settings array.
pub fn iv_copy(iv: &[SettingsEntry]) -> Result<Vec<SettingsEntry>> {
    let mut out = Vec::new();
    out.try_reserve_exact(iv.len())?;
    out.extend_from_slice(iv);
    Ok(out)
}

/// False if any entry holds a value outside its identifier's domain.
pub fn iv_check(iv: &[SettingsEntry]) -> bool {
    iv.iter().all(|entry| match entry.settings_id {
        settings_id::ENABLE_PUSH | settings_id::COMPRESS_DATA => entry.value <= 1,
        settings_id::INITIAL_WINDOW_SIZE => entry.value <= MAX_WINDOW_SIZE,
        _ => true,
    })
}

pub fn pack_settings(bufs: &mut FrameBufs, frame: &mut SettingsFrame) -> Result<()> {
    let length = frame.iv.len() * SETTINGS_ENTRY_LENGTH;
    if length > MAX_PAYLOADLEN {
        tracing::debug!(niv = frame.iv.len(), "SETTINGS too large");
        return Err(Error::FrameSize(format!(
            "{} SETTINGS entries need {} bytes, max {}",
            frame.iv.len(),
            length,
            MAX_PAYLOADLEN
        )));
    }
    bufs.reset();
    frame.hd.length = length;
    let head = bufs.head_mut();
    pack_settings_payload(head.writer(), &frame.iv);
    head.pack_hd(&frame.hd);
    Ok(())
}

pub fn unpack_settings(hd: &FrameHd, payload: &[u8]) -> Result<SettingsFrame> {
    Ok(SettingsFrame {
        hd: *hd,
        iv: unpack_settings_payload2(payload)?,
    })
}

// ============================================================================
// Fixed-size frames
// ============================================================================

fn pack_fixed(bufs: &mut FrameBufs, hd: &FrameHd, length: usize, write: impl FnOnce(&mut FrameBuf)) {
    bufs.reset();
    let hd = FrameHd { length, ..*hd };
    let head = bufs.head_mut();
    write(head);
    head.pack_hd(&hd);
}

pub fn pack_priority(bufs: &mut FrameBufs, frame: &PriorityFrame) {
    let hd = FrameHd {
        flags: (frame.hd.flags & !(flags::PRIORITY_GROUP | flags::PRIORITY_DEPENDENCY))
            | frame.pri_spec.flags(),
        ..frame.hd
    };
    pack_fixed(bufs, &hd, priority_len(hd.flags), |buf| {
        pack_priority_spec(buf, &frame.pri_spec)
    });
}

pub fn unpack_priority_payload(hd: &FrameHd, payload: &[u8]) -> PriorityFrame {
    PriorityFrame {
        hd: *hd,
        pri_spec: unpack_priority_spec(hd.flags, payload),
    }
}

pub fn pack_rst_stream(bufs: &mut FrameBufs, frame: &RstStreamFrame) {
    pack_fixed(bufs, &frame.hd, RST_STREAM_LENGTH, |buf| buf.put_u32(frame.error_code));
}

pub fn unpack_rst_stream_payload(hd: &FrameHd, payload: &[u8; RST_STREAM_LENGTH]) -> RstStreamFrame {
    RstStreamFrame {
        hd: *hd,
        error_code: u32::from_be_bytes(*payload),
    }
}

pub fn pack_ping(bufs: &mut FrameBufs, frame: &PingFrame) {
    pack_fixed(bufs, &frame.hd, PING_OPAQUE_LENGTH, |buf| buf.put_slice(&frame.opaque_data));
}

pub fn unpack_ping_payload(hd: &FrameHd, payload: &[u8; PING_OPAQUE_LENGTH]) -> PingFrame {
    PingFrame {
        hd: *hd,
        opaque_data: *payload,
    }
}

pub fn pack_window_update(bufs: &mut FrameBufs, frame: &WindowUpdateFrame) {
    pack_fixed(bufs, &frame.hd, WINDOW_UPDATE_LENGTH, |buf| {
        buf.put_u32(frame.window_size_increment & WINDOW_SIZE_INCREMENT_MASK)
    });
}

pub fn unpack_window_update_payload(
    hd: &FrameHd,
    payload: &[u8; WINDOW_UPDATE_LENGTH],
) -> WindowUpdateFrame {
    WindowUpdateFrame {
        hd: *hd,
        window_size_increment: u32::from_be_bytes(*payload) & WINDOW_SIZE_INCREMENT_MASK,
    }
}

pub fn pack_blocked(bufs: &mut FrameBufs, frame: &BlockedFrame) {
    pack_fixed(bufs, &frame.hd, 0, |_| {});
}

// ============================================================================
// GOAWAY / ALTSVC
// ============================================================================

pub fn pack_goaway(bufs: &mut FrameBufs, frame: &mut GoawayFrame) -> Result<()> {
    let length = GOAWAY_FIXED_LENGTH + frame.opaque_data.len();
    if length > MAX_PAYLOADLEN {
        return Err(Error::FrameSize(format!(
            "GOAWAY debug data of {} bytes exceeds {}",
            frame.opaque_data.len(),
            MAX_PAYLOADLEN - GOAWAY_FIXED_LENGTH
        )));
    }
    frame.hd.length = length;
    let frame = &*frame;
    pack_fixed(bufs, &frame.hd, length, |buf| {
        buf.put_u32(frame.last_stream_id & STREAM_ID_MASK);
        buf.put_u32(frame.error_code);
        buf.put_slice(&frame.opaque_data);
    });
    Ok(())
}

/// Build a GOAWAY from its fixed 8 bytes and the gifted debug data.
///
/// The debug data length comes from `hd.length`; a gift shorter than
/// that is a protocol error. Extra gift bytes are cut off.
pub fn unpack_goaway_payload(
    hd: &FrameHd,
    payload: &[u8; GOAWAY_FIXED_LENGTH],
    mut var_gift: Bytes,
) -> Result<GoawayFrame> {
    let declared = hd.length.saturating_sub(GOAWAY_FIXED_LENGTH);
    if declared > var_gift.len() {
        return Err(Error::Proto(format!(
            "GOAWAY declares {} bytes of debug data, got {}",
            declared,
            var_gift.len()
        )));
    }
    var_gift.truncate(declared);
    Ok(GoawayFrame {
        hd: *hd,
        last_stream_id: u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]])
            & STREAM_ID_MASK,
        error_code: u32::from_be_bytes([payload[4], payload[5], payload[6], payload[7]]),
        opaque_data: var_gift,
    })
}

/// Like [`unpack_goaway_payload`] but copies the debug data out of a
/// borrowed payload.
pub fn unpack_goaway_payload2(hd: &FrameHd, payload: &[u8]) -> Result<GoawayFrame> {
    if payload.len() < GOAWAY_FIXED_LENGTH {
        return Err(Error::FrameSize(format!(
            "GOAWAY payload of {} bytes is too short",
            payload.len()
        )));
    }
    let (fixed, var) = payload.split_at(GOAWAY_FIXED_LENGTH);
    let mut copy = Vec::new();
    copy.try_reserve_exact(var.len())?;
    copy.extend_from_slice(var);

    let mut head = [0u8; GOAWAY_FIXED_LENGTH];
    head.copy_from_slice(fixed);
    unpack_goaway_payload(hd, &head, Bytes::from(copy))
}

pub fn pack_altsvc(bufs: &mut FrameBufs, frame: &mut AltsvcFrame) -> Result<()> {
    if frame.protocol_id.len() > u8::MAX as usize {
        return Err(Error::FrameSize(format!(
            "ALTSVC protocol id of {} bytes exceeds {}",
            frame.protocol_id.len(),
            u8::MAX
        )));
    }
    if frame.host.len() > u16::MAX as usize {
        return Err(Error::FrameSize(format!(
            "ALTSVC host of {} bytes exceeds {}",
            frame.host.len(),
            u16::MAX
        )));
    }
    let length = ALTSVC_FIXED_LENGTH
        + frame.protocol_id.len()
        + ALTSVC_HOST_LEN_LENGTH
        + frame.host.len()
        + frame.origin.len();
    if length > MAX_PAYLOADLEN {
        return Err(Error::FrameSize(format!(
            "ALTSVC payload of {} bytes exceeds {}",
            length, MAX_PAYLOADLEN
        )));
    }
    frame.hd.length = length;
    let frame = &*frame;
    pack_fixed(bufs, &frame.hd, length, |buf| {
        buf.put_u32(frame.max_age);
        buf.put_u16(frame.port);
        buf.put_u8(frame.protocol_id.len() as u8);
        buf.put_slice(&frame.protocol_id);
        buf.put_u16(frame.host.len() as u16);
        buf.put_slice(&frame.host);
        buf.put_slice(&frame.origin);
    });
    Ok(())
}

/// Build an ALTSVC from its fixed 7 bytes and the gifted remainder
/// (`protocol-id ++ host-len ++ host ++ origin`). The three fields become
/// views into the gift.
pub fn unpack_altsvc_payload(
    hd: &FrameHd,
    payload: &[u8; ALTSVC_FIXED_LENGTH],
    mut var_gift: Bytes,
) -> Result<AltsvcFrame> {
    let max_age = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]);
    let port = u16::from_be_bytes([payload[4], payload[5]]);
    let protocol_id_len = payload[6] as usize;

    if var_gift.len() < protocol_id_len + ALTSVC_HOST_LEN_LENGTH {
        return Err(Error::FrameSize(format!(
            "ALTSVC protocol id of {} bytes does not fit {} remaining bytes",
            protocol_id_len,
            var_gift.len()
        )));
    }
    let protocol_id = var_gift.split_to(protocol_id_len);
    let host_len = var_gift.get_u16() as usize;
    if var_gift.len() < host_len {
        return Err(Error::FrameSize(format!(
            "ALTSVC host of {} bytes does not fit {} remaining bytes",
            host_len,
            var_gift.len()
        )));
    }
    let host = var_gift.split_to(host_len);

    Ok(AltsvcFrame {
        hd: *hd,
        max_age,
        port,
        protocol_id,
        host,
        origin: var_gift,
    })
}

// ============================================================================
// Dispatch
// ============================================================================

/// Serialize any packable frame into `bufs`.
pub fn pack_frame<D>(bufs: &mut FrameBufs, frame: &mut Frame, deflater: &mut D) -> Result<()>
where
    D: HeaderDeflater + ?Sized,
{
    match frame {
        Frame::Headers(f) => pack_headers(bufs, f, deflater),
        Frame::PushPromise(f) => pack_push_promise(bufs, f, deflater),
        Frame::Priority(f) => {
            pack_priority(bufs, f);
            Ok(())
        }
        Frame::RstStream(f) => {
            pack_rst_stream(bufs, f);
            Ok(())
        }
        Frame::Settings(f) => pack_settings(bufs, f),
        Frame::Ping(f) => {
            pack_ping(bufs, f);
            Ok(())
        }
        Frame::Goaway(f) => pack_goaway(bufs, f),
        Frame::WindowUpdate(f) => {
            pack_window_update(bufs, f);
            Ok(())
        }
        Frame::AltSvc(f) => pack_altsvc(bufs, f),
        Frame::Blocked(f) => {
            pack_blocked(bufs, f);
            Ok(())
        }
        Frame::PrivateData(f) => Err(Error::Proto(format!(
            "DATA on stream {} is streamed from its source, not packed",
            f.hd.stream_id
        ))),
    }
}

/// Decode one frame payload announced by `hd`.
///
/// HEADERS and PUSH_PROMISE come back with an empty header list; the
/// compressed block starts at `headers_payload_nv_offset` /
/// `push_promise_payload_nv_offset` and is the caller's to reassemble and
/// inflate. DATA and CONTINUATION are rejected.
pub fn unpack_frame(hd: &FrameHd, mut payload: Bytes) -> Result<Frame> {
    let frame = match hd.frame_type {
        frame_type::HEADERS => Frame::Headers(unpack_headers_payload(hd, &payload)?.0),
        frame_type::PUSH_PROMISE => Frame::PushPromise(unpack_push_promise_payload(hd, &payload)?.0),
        frame_type::PRIORITY => {
            let expected = priority_len(hd.flags);
            if payload.len() != expected {
                return Err(size_mismatch("PRIORITY", expected, payload.len()));
            }
            Frame::Priority(unpack_priority_payload(hd, &payload))
        }
        frame_type::RST_STREAM => {
            Frame::RstStream(unpack_rst_stream_payload(hd, fixed(&payload, "RST_STREAM")?))
        }
        frame_type::SETTINGS => Frame::Settings(unpack_settings(hd, &payload)?),
        frame_type::PING => Frame::Ping(unpack_ping_payload(hd, fixed(&payload, "PING")?)),
        frame_type::GOAWAY => {
            let head = split_fixed::<GOAWAY_FIXED_LENGTH>(&mut payload, "GOAWAY")?;
            Frame::Goaway(unpack_goaway_payload(hd, &head, payload)?)
        }
        frame_type::WINDOW_UPDATE => Frame::WindowUpdate(unpack_window_update_payload(
            hd,
            fixed(&payload, "WINDOW_UPDATE")?,
        )),
        frame_type::ALTSVC => {
            let head = split_fixed::<ALTSVC_FIXED_LENGTH>(&mut payload, "ALTSVC")?;
            Frame::AltSvc(unpack_altsvc_payload(hd, &head, payload)?)
        }
        frame_type::BLOCKED => Frame::Blocked(BlockedFrame { hd: *hd }),
        frame_type::DATA | frame_type::CONTINUATION => {
            return Err(Error::Proto(format!(
                "frame type {:#x} is not decoded by the frame codec",
                hd.frame_type
            )))
        }
        other => return Err(Error::Proto(format!("unknown frame type {:#x}", other))),
    };
    Ok(frame)
}

fn size_mismatch(name: &str, expected: usize, got: usize) -> Error {
    Error::FrameSize(format!(
        "{} payload must be {} bytes, got {}",
        name, expected, got
    ))
}

fn fixed<'a, const N: usize>(payload: &'a [u8], name: &str) -> Result<&'a [u8; N]> {
    payload
        .try_into()
        .map_err(|_| size_mismatch(name, N, payload.len()))
}

fn split_fixed<const N: usize>(payload: &mut Bytes, name: &str) -> Result<[u8; N]> {
    if payload.len() < N {
        return Err(Error::FrameSize(format!(
            "{} payload needs at least {} bytes, got {}",
            name,
            N,
            payload.len()
        )));
    }
    let mut head = [0u8; N];
    payload.copy_to_slice(&mut head);
    Ok(head)
}
