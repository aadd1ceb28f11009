//! Fixed-layout little-endian encoding for structs packed into telemetry frames.
//!
//! Every downlinked struct has a layout whose size is known at compile time
//! (`FrameEncode::ENCODED_LEN`), so capacity checks against the frame payload
//! can be done with `const_assert!` as well as at pack time.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("buffer too short: need {needed} bytes, have {available}")]
    BufferTooShort { needed: usize, available: usize },
}

/// A struct with a fixed binary layout that can be copied into a frame payload.
pub trait FrameEncode {
    /// Exact number of bytes written by `encode_into`.
    const ENCODED_LEN: usize;

    fn encode_into(&self, writer: &mut WireWriter<'_>);
}

/// The decoding side of `FrameEncode`, used by ground-side inspection.
pub trait FrameDecode: Sized {
    fn decode_from(reader: &mut WireReader<'_>) -> Result<Self, CodecError>;
}

/// Sequential writer over a caller-provided buffer.
///
/// Writes past the end of the buffer panic: callers size the buffer from
/// `FrameEncode::ENCODED_LEN` before encoding.
#[derive(Debug)]
pub struct WireWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> WireWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) {
        let end = self.pos + bytes.len();
        self.buf[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
    }

    pub fn put_u8(&mut self, value: u8) {
        self.put_bytes(&[value]);
    }

    pub fn put_u16(&mut self, value: u16) {
        self.put_bytes(&value.to_le_bytes());
    }

    pub fn put_u32(&mut self, value: u32) {
        self.put_bytes(&value.to_le_bytes());
    }

    pub fn put_i32(&mut self, value: i32) {
        self.put_bytes(&value.to_le_bytes());
    }

    pub fn put_f32(&mut self, value: f32) {
        self.put_bytes(&value.to_le_bytes());
    }

    pub fn put_f32_array<const N: usize>(&mut self, values: &[f32; N]) {
        for value in values {
            self.put_f32(*value);
        }
    }
}

/// Sequential reader; every getter checks the remaining length.
#[derive(Debug)]
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn get_bytes<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        if self.remaining() < N {
            return Err(CodecError::BufferTooShort {
                needed: self.pos + N,
                available: self.buf.len(),
            });
        }

        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    pub fn get_slice(&mut self, len: usize) -> Result<&'a [u8], CodecError> {
        if self.remaining() < len {
            return Err(CodecError::BufferTooShort {
                needed: self.pos + len,
                available: self.buf.len(),
            });
        }

        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn get_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.get_bytes::<1>()?[0])
    }

    pub fn get_u16(&mut self) -> Result<u16, CodecError> {
        Ok(u16::from_le_bytes(self.get_bytes()?))
    }

    pub fn get_u32(&mut self) -> Result<u32, CodecError> {
        Ok(u32::from_le_bytes(self.get_bytes()?))
    }

    pub fn get_i32(&mut self) -> Result<i32, CodecError> {
        Ok(i32::from_le_bytes(self.get_bytes()?))
    }

    pub fn get_f32(&mut self) -> Result<f32, CodecError> {
        Ok(f32::from_le_bytes(self.get_bytes()?))
    }

    pub fn get_f32_array<const N: usize>(&mut self) -> Result<[f32; N], CodecError> {
        let mut out = [0.0f32; N];
        for value in &mut out {
            *value = self.get_f32()?;
        }
        Ok(out)
    }
}

/// Decode a `FrameDecode` value from the front of `bytes`, ignoring any trailing data.
pub fn decode_prefix<T: FrameDecode + FrameEncode>(bytes: &[u8]) -> Result<T, CodecError> {
    if bytes.len() < T::ENCODED_LEN {
        return Err(CodecError::BufferTooShort {
            needed: T::ENCODED_LEN,
            available: bytes.len(),
        });
    }

    let mut reader = WireReader::new(&bytes[..T::ENCODED_LEN]);
    T::decode_from(&mut reader)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_little_endian_layout() {
        let mut buf = [0u8; 11];
        let mut writer = WireWriter::new(&mut buf);

        writer.put_u8(0xAB);
        writer.put_u16(0x0102);
        writer.put_u32(0x0A0B_0C0D);
        writer.put_i32(-1);

        assert_eq!(writer.position(), 11);
        assert_eq!(buf, [0xAB, 0x02, 0x01, 0x0D, 0x0C, 0x0B, 0x0A, 0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_reader_reports_short_buffer() {
        let buf = [0x01, 0x02, 0x03];
        let mut reader = WireReader::new(&buf);

        assert_eq!(reader.get_u16().unwrap(), 0x0201);
        let err = reader.get_u32().unwrap_err();
        assert_eq!(err, CodecError::BufferTooShort { needed: 6, available: 3 });

        // A failed read does not consume anything
        assert_eq!(reader.remaining(), 1);
        assert_eq!(reader.get_u8().unwrap(), 0x03);
    }

    #[test]
    fn test_f32_array_reads_back_written_values() {
        let mut buf = [0u8; 12];
        let mut writer = WireWriter::new(&mut buf);
        writer.put_f32_array(&[1.5, -2.25, 0.0]);

        let mut reader = WireReader::new(&buf);
        assert_eq!(reader.get_f32_array::<3>().unwrap(), [1.5, -2.25, 0.0]);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    #[should_panic]
    fn test_writer_panics_on_overflow() {
        let mut buf = [0u8; 2];
        let mut writer = WireWriter::new(&mut buf);
        writer.put_u32(7);
    }
}
