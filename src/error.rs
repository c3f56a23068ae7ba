//! Errors surfaced by the frame codec.

/// Result alias used by every fallible codec routine.
pub type Result<T> = std::result::Result<T, Error>;

/// Codec failure kinds.
///
/// Partially written [`FrameBufs`](crate::FrameBufs) content is invalid
/// after any of these and must be discarded by the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A heap allocation could not be satisfied.
    #[error("out of memory")]
    NoMem,
    /// The header compression engine rejected its input.
    #[error("header compression failed: {0}")]
    HeaderComp(String),
    /// The payload would exceed the maximum frame payload length.
    #[error("frame size error: {0}")]
    FrameSize(String),
    /// Malformed input or a frame that cannot be put on the wire.
    #[error("protocol error: {0}")]
    Proto(String),
}

impl Error {
    /// Frame-size errors can be retried with a smaller frame.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::FrameSize(_))
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(_: std::collections::TryReserveError) -> Self {
        Error::NoMem
    }
}
