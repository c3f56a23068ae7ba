//! HPACK: header compression boundary.
//!
//! The frame codec never compresses headers itself. It hands the header
//! list to a [`HeaderDeflater`] and splits whatever bytes come back.
//! `HpackEncoder` / `HpackDecoder` are thin wrappers around `fluke-hpack`;
//! each carries its own dynamic table, so one instance must not be driven
//! from two threads at once.

use crate::error::{Error, Result};
use crate::nv::Nv;

/// Compresses a header list into a single header block.
pub trait HeaderDeflater {
    fn deflate(&mut self, nva: &[Nv]) -> Result<Vec<u8>>;
}

/// HPACK decoder for header blocks reassembled from HEADERS /
/// PUSH_PROMISE + CONTINUATION payloads.
pub struct HpackDecoder {
    inner: fluke_hpack::Decoder<'static>,
}

impl std::fmt::Debug for HpackDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HpackDecoder").finish()
    }
}

impl Default for HpackDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl HpackDecoder {
    pub fn new() -> Self {
        Self {
            inner: fluke_hpack::Decoder::new(),
        }
    }

    /// Decode an HPACK-encoded header block.
    pub fn decode(&mut self, data: &[u8]) -> Result<Vec<Nv>> {
        let pairs = self.inner.decode(data).map_err(|e| {
            tracing::debug!(error = ?e, "header block inflate failed");
            Error::HeaderComp(format!("HPACK decode error: {:?}", e))
        })?;
        Ok(pairs
            .into_iter()
            .map(|(name, value)| Nv { name, value })
            .collect())
    }
}

/// HPACK encoder producing header blocks for the frame packers.
pub struct HpackEncoder {
    inner: fluke_hpack::Encoder<'static>,
}

impl std::fmt::Debug for HpackEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HpackEncoder").finish()
    }
}

impl Default for HpackEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl HpackEncoder {
    pub fn new() -> Self {
        Self {
            inner: fluke_hpack::Encoder::new(),
        }
    }
}

impl HeaderDeflater for HpackEncoder {
    fn deflate(&mut self, nva: &[Nv]) -> Result<Vec<u8>> {
        let pairs = nva.iter().map(|nv| (nv.name.as_slice(), nv.value.as_slice()));
        let mut block = Vec::new();
        self.inner.encode_into(pairs, &mut block).map_err(|e| {
            tracing::debug!(error = %e, "header block deflate failed");
            Error::HeaderComp(format!("HPACK encode error: {}", e))
        })?;
        Ok(block)
    }
}
