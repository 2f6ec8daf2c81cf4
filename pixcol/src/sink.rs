/*
 * Copyright (c) 2025-present Dawid Pawlik
 *
 * For educational use only by employees and students of MIMUW.
 * See LICENSE file for details.
 */

use crate::options::ByteOrder;
use byteorder::BigEndian;
use byteorder::ByteOrder as _;
use byteorder::LittleEndian;

/// Append-only in-memory byte stream a column writer encodes into
#[derive(Debug, Default, Clone)]
pub struct OutputStream {
    bytes: Vec<u8>,
}

impl OutputStream {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    pub fn write_i32(&mut self, value: i32, order: ByteOrder) {
        let mut buf = [0u8; 4];
        match order {
            ByteOrder::Little => LittleEndian::write_i32(&mut buf, value),
            ByteOrder::Big => BigEndian::write_i32(&mut buf, value),
        }
        self.bytes.extend_from_slice(&buf);
    }

    pub fn write_i64(&mut self, value: i64, order: ByteOrder) {
        let mut buf = [0u8; 8];
        match order {
            ByteOrder::Little => LittleEndian::write_i64(&mut buf, value),
            ByteOrder::Big => BigEndian::write_i64(&mut buf, value),
        }
        self.bytes.extend_from_slice(&buf);
    }

    pub fn write_f64(&mut self, value: f64, order: ByteOrder) {
        let mut buf = [0u8; 8];
        match order {
            ByteOrder::Little => LittleEndian::write_f64(&mut buf, value),
            ByteOrder::Big => BigEndian::write_f64(&mut buf, value),
        }
        self.bytes.extend_from_slice(&buf);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Bytes written so far
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_order() {
        let mut stream = OutputStream::default();
        stream.write_i32(1, ByteOrder::Little);
        stream.write_i32(1, ByteOrder::Big);
        stream.write_i64(-2, ByteOrder::Big);

        assert_eq!(stream.size(), 16);
        assert_eq!(&stream.as_slice()[..8], &[1, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(
            &stream.as_slice()[8..],
            &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE]
        );
    }

    #[test]
    fn test_f64_and_raw_bytes() {
        let mut stream = OutputStream::with_capacity(16);
        stream.write_f64(1.0, ByteOrder::Little);
        stream.write_bytes(&[9, 9]);

        let bytes = stream.into_inner();
        assert_eq!(&bytes[..8], &1.0f64.to_le_bytes());
        assert_eq!(&bytes[8..], &[9, 9]);
    }
}
