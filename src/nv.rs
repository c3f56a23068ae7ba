//! Name/value header lists.
//!
//! HEADERS and PUSH_PROMISE frames own their header list as a `Vec<Nv>`.
//! Names are expected to be lower-cased before they get here; nothing in
//! this module normalizes case.

use std::cmp::Ordering;

use crate::error::Result;

/// A single header field as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Nv {
    pub name: Vec<u8>,
    pub value: Vec<u8>,
}

impl Nv {
    pub fn new(name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Bytes this field contributes before compression.
    pub fn len(&self) -> usize {
        self.name.len() + self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.value.is_empty()
    }
}

/// Byte-wise ordering by name, then by value.
pub fn nv_compare(a: &Nv, b: &Nv) -> Ordering {
    a.name
        .as_slice()
        .cmp(b.name.as_slice())
        .then_with(|| a.value.as_slice().cmp(b.value.as_slice()))
}

/// Sorts `nva` ascending by name, ties broken by value.
pub fn nv_array_sort(nva: &mut [Nv]) {
    nva.sort_unstable_by(nv_compare);
}

/// Deep copy of `nva`.
///
/// Either every entry is copied or [`Error::NoMem`](crate::Error::NoMem)
/// is returned; a partial copy is never handed back.
pub fn nv_array_copy(nva: &[Nv]) -> Result<Vec<Nv>> {
    let mut out = Vec::new();
    out.try_reserve_exact(nva.len())?;
    for nv in nva {
        out.push(Nv {
            name: copy_bytes(&nv.name)?,
            value: copy_bytes(&nv.value)?,
        });
    }
    Ok(out)
}

/// Case-sensitive comparison of name and value.
pub fn nv_equal(a: &Nv, b: &Nv) -> bool {
    a.name == b.name && a.value == b.value
}

/// Releases an owned header list.
pub fn nv_array_del(nva: Vec<Nv>) {
    tracing::trace!(entries = nva.len(), "releasing name/value array");
    drop(nva);
}

fn copy_bytes(src: &[u8]) -> Result<Vec<u8>> {
    let mut dst = Vec::new();
    dst.try_reserve_exact(src.len())?;
    dst.extend_from_slice(src);
    Ok(dst)
}
