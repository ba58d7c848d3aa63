use crate::error::DecodeError;
use crate::link::LinkKind;
use bytes::{Buf, BufMut, BytesMut};

/// Sequential little-endian writer over a growable buffer.
pub struct ByteWriter {
    buffer: BytesMut,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::with_capacity(16)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
        }
    }

    pub fn put_u8(&mut self, value: u8) {
        self.buffer.put_u8(value);
    }

    /// Writes the low 24 bits of `value`.
    pub fn put_u24_le(&mut self, value: u32) {
        debug_assert!(value <= 0x00FF_FFFF);
        self.buffer.put_uint_le(u64::from(value), 3);
    }

    pub fn put_u32_le(&mut self, value: u32) {
        self.buffer.put_u32_le(value);
    }

    pub fn put_i32_le(&mut self, value: i32) {
        self.buffer.put_i32_le(value);
    }

    pub fn put_slice(&mut self, bytes: &[u8]) {
        self.buffer.put_slice(bytes);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buffer.to_vec()
    }
}

impl Default for ByteWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Sequential little-endian reader over a borrowed payload.
///
/// Plain reads return `None` when the buffer runs out. The `*_padded`
/// reads never fail: whatever is left is zero-extended on the right to the
/// requested width.
pub struct ByteReader<'a> {
    buffer: &'a [u8],
    total: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            total: buffer.len(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.buffer.remaining()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn position(&self) -> usize {
        self.total - self.buffer.len()
    }

    pub fn read_u8(&mut self) -> Option<u8> {
        self.read_uint_le(1).map(|v| v as u8)
    }

    pub fn read_u24_le(&mut self) -> Option<u32> {
        self.read_uint_le(3).map(|v| v as u32)
    }

    pub fn read_u32_le(&mut self) -> Option<u32> {
        self.read_uint_le(4).map(|v| v as u32)
    }

    pub fn read_u8_padded(&mut self) -> u8 {
        self.read_uint_le_padded(1) as u8
    }

    pub fn read_u24_le_padded(&mut self) -> u32 {
        self.read_uint_le_padded(3) as u32
    }

    pub fn read_u32_le_padded(&mut self) -> u32 {
        self.read_uint_le_padded(4) as u32
    }

    /// Consumes and returns everything not yet read.
    pub fn take_rest(&mut self) -> &'a [u8] {
        let rest = self.buffer;
        self.buffer = &[];
        rest
    }

    /// Builds the error for a read of `wanted` bytes that the buffer cannot satisfy.
    pub fn truncated(&self, kind: LinkKind, wanted: usize) -> DecodeError {
        DecodeError::Truncated {
            kind,
            needed: self.position() + wanted,
            available: self.total,
        }
    }

    fn read_uint_le(&mut self, width: usize) -> Option<u64> {
        if self.buffer.remaining() < width {
            return None;
        }

        Some(self.buffer.get_uint_le(width))
    }

    fn read_uint_le_padded(&mut self, width: usize) -> u64 {
        let available = width.min(self.buffer.remaining());
        let mut raw = [0u8; 8];
        self.buffer.copy_to_slice(&mut raw[..available]);
        u64::from_le_bytes(raw)
    }
}
