//! Length-checked binary encoding used by the planet file format.
//!
//! All scalars are written native-endian with no padding. Strings are a
//! `u32` byte length followed by UTF-8 bytes.

use thiserror::Error;

/// Errors that can occur while decoding a binary blob.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Truncated data: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },
    #[error("Invalid UTF-8 in string field")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    #[error("Grid dimensions {found:?} do not match header {expected:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        found: (u32, u32),
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Append-only byte sink.
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_ne_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.buf.extend_from_slice(&value.to_ne_bytes());
    }

    pub fn write_string(&mut self, value: &str) {
        self.write_u32(value.len() as u32);
        self.buf.extend_from_slice(value.as_bytes());
    }

    /// Writes a float slice as raw bytes, without a length prefix.
    pub fn write_f32_slice(&mut self, values: &[f32]) {
        self.buf.extend_from_slice(bytemuck::cast_slice(values));
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over a borrowed byte buffer. Every read is bounds-checked.
#[derive(Debug)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, needed: usize) -> Result<&'a [u8], DecodeError> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(DecodeError::Truncated { needed, remaining });
        }
        let bytes = &self.data[self.pos..self.pos + needed];
        self.pos += needed;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_ne_bytes(self.take_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32, DecodeError> {
        Ok(f32::from_ne_bytes(self.take_array()?))
    }

    pub fn read_string(&mut self) -> Result<String, DecodeError> {
        let len = self.read_u32()? as usize;
        let bytes = self.take(len)?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }

    /// Reads `count` floats written by [`ByteWriter::write_f32_slice`].
    pub fn read_f32_vec(&mut self, count: usize) -> Result<Vec<f32>, DecodeError> {
        let needed = count.checked_mul(4).ok_or(DecodeError::Truncated {
            needed: usize::MAX,
            remaining: self.remaining(),
        })?;
        let bytes = self.take(needed)?;
        Ok(bytes
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars_and_strings() {
        let mut w = ByteWriter::new();
        w.write_u32(7);
        w.write_f32(-1.25);
        w.write_string("Terra");
        w.write_f32_slice(&[0.5, 1.5]);
        assert_eq!(w.len(), 4 + 4 + 4 + 5 + 8);

        let bytes = w.into_bytes();
        let mut r = ByteReader::new(&bytes);
        assert_eq!(r.read_u32().unwrap(), 7);
        assert_eq!(r.read_f32().unwrap(), -1.25);
        assert_eq!(r.read_string().unwrap(), "Terra");
        assert_eq!(r.read_f32_vec(2).unwrap(), vec![0.5, 1.5]);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_truncated_scalar() {
        let bytes = [1u8, 2, 3];
        let mut r = ByteReader::new(&bytes);
        match r.read_u32() {
            Err(DecodeError::Truncated { needed, remaining }) => {
                assert_eq!(needed, 4);
                assert_eq!(remaining, 3);
            }
            other => panic!("expected truncation, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_string_body() {
        let mut w = ByteWriter::new();
        w.write_u32(100);
        w.buf.extend_from_slice(b"short");
        let bytes = w.into_bytes();
        let mut r = ByteReader::new(&bytes);
        assert!(matches!(
            r.read_string(),
            Err(DecodeError::Truncated { needed: 100, remaining: 5 })
        ));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut w = ByteWriter::new();
        w.write_u32(2);
        w.buf.extend_from_slice(&[0xff, 0xfe]);
        let bytes = w.into_bytes();
        let mut r = ByteReader::new(&bytes);
        assert!(matches!(r.read_string(), Err(DecodeError::InvalidUtf8(_))));
    }

    #[test]
    fn test_huge_float_count_is_truncation() {
        let bytes = [0u8; 8];
        let mut r = ByteReader::new(&bytes);
        assert!(matches!(
            r.read_f32_vec(usize::MAX),
            Err(DecodeError::Truncated { .. })
        ));
    }
}
