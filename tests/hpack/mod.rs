//! Integration tests for the HPACK boundary

mod encoding;
