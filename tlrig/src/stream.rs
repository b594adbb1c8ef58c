//! Positionable binary buffer with the TL primitive encodings.
//!
//! Encoding follows the [MTProto Binary Serialization] spec.
//!
//! [MTProto Binary Serialization]: https://core.telegram.org/mtproto/serialize

use crate::errors::{Error, Result};
use tlrig_bigint::{Int128, Int256};

/// Ordering applied to every multi-byte value on one stream.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ByteOrder {
    /// Least-significant byte first (the TL default).
    #[default]
    LittleEndian,
    /// Most-significant byte first.
    BigEndian,
}

/// Maximum payload of a TL byte string; the long form carries a 3-byte length.
pub const MAX_BYTES_LEN: usize = 0xff_ffff;

/// A seekable in-memory byte buffer with TL primitive read/write operations.
///
/// Reads past the end fail with [`Error::UnexpectedEof`] rather than
/// zero-filling; writes grow the buffer. Avoids `std::io::Cursor` and its
/// wide error surface — only the engine's own errors can occur here.
pub struct Streamer {
    buf: Vec<u8>,
    pos: usize,
    order: ByteOrder,
}

impl Streamer {
    /// An empty little-endian stream, ready for writing.
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            pos: 0,
            order: ByteOrder::LittleEndian,
        }
    }

    /// A stream positioned at the start of `bytes`, ready for reading.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            buf: bytes.into(),
            pos: 0,
            order: ByteOrder::LittleEndian,
        }
    }

    /// Switches the stream to `order`. Applies to every subsequent operation.
    pub fn with_order(mut self, order: ByteOrder) -> Self {
        self.order = order;
        self
    }

    /// The configured byte order.
    pub fn order(&self) -> ByteOrder {
        self.order
    }

    /// Current byte offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Moves the cursor to `pos`; seeking past the end is an error.
    pub fn set_position(&mut self, pos: usize) -> Result<()> {
        if pos > self.buf.len() {
            return Err(Error::UnexpectedEof);
        }
        self.pos = pos;
        Ok(())
    }

    /// Total bytes in the buffer.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer holds no bytes at all.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Bytes between the cursor and the end.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Consumes the stream, returning the underlying buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // ─── raw ─────────────────────────────────────────────────────────────────

    /// Reads exactly `out.len()` bytes.
    pub fn read_raw(&mut self, out: &mut [u8]) -> Result<()> {
        let end = self.pos + out.len();
        if end > self.buf.len() {
            return Err(Error::UnexpectedEof);
        }
        out.copy_from_slice(&self.buf[self.pos..end]);
        self.pos = end;
        Ok(())
    }

    /// Writes `bytes` at the cursor, overwriting then extending as needed.
    pub fn write_raw(&mut self, bytes: &[u8]) {
        let overlap = (self.buf.len() - self.pos).min(bytes.len());
        self.buf[self.pos..self.pos + overlap].copy_from_slice(&bytes[..overlap]);
        self.buf.extend_from_slice(&bytes[overlap..]);
        self.pos += bytes.len();
    }

    /// Reads a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        match self.buf.get(self.pos).copied() {
            Some(b) => {
                self.pos += 1;
                Ok(b)
            }
            None => Err(Error::UnexpectedEof),
        }
    }

    /// Writes a single byte.
    pub fn write_u8(&mut self, value: u8) {
        self.write_raw(&[value]);
    }

    // ─── fixed width ─────────────────────────────────────────────────────────

    /// Reads a 32-bit signed integer.
    pub fn read_i32(&mut self) -> Result<i32> {
        let mut b = [0u8; 4];
        self.read_raw(&mut b)?;
        Ok(match self.order {
            ByteOrder::LittleEndian => i32::from_le_bytes(b),
            ByteOrder::BigEndian => i32::from_be_bytes(b),
        })
    }

    /// Writes a 32-bit signed integer.
    pub fn write_i32(&mut self, value: i32) {
        match self.order {
            ByteOrder::LittleEndian => self.write_raw(&value.to_le_bytes()),
            ByteOrder::BigEndian => self.write_raw(&value.to_be_bytes()),
        }
    }

    /// Reads a 32-bit unsigned integer.
    pub fn read_u32(&mut self) -> Result<u32> {
        let mut b = [0u8; 4];
        self.read_raw(&mut b)?;
        Ok(match self.order {
            ByteOrder::LittleEndian => u32::from_le_bytes(b),
            ByteOrder::BigEndian => u32::from_be_bytes(b),
        })
    }

    /// Writes a 32-bit unsigned integer.
    pub fn write_u32(&mut self, value: u32) {
        match self.order {
            ByteOrder::LittleEndian => self.write_raw(&value.to_le_bytes()),
            ByteOrder::BigEndian => self.write_raw(&value.to_be_bytes()),
        }
    }

    /// Reads a 64-bit signed integer.
    pub fn read_i64(&mut self) -> Result<i64> {
        let mut b = [0u8; 8];
        self.read_raw(&mut b)?;
        Ok(match self.order {
            ByteOrder::LittleEndian => i64::from_le_bytes(b),
            ByteOrder::BigEndian => i64::from_be_bytes(b),
        })
    }

    /// Writes a 64-bit signed integer.
    pub fn write_i64(&mut self, value: i64) {
        match self.order {
            ByteOrder::LittleEndian => self.write_raw(&value.to_le_bytes()),
            ByteOrder::BigEndian => self.write_raw(&value.to_be_bytes()),
        }
    }

    /// Reads a 64-bit unsigned integer.
    pub fn read_u64(&mut self) -> Result<u64> {
        let mut b = [0u8; 8];
        self.read_raw(&mut b)?;
        Ok(match self.order {
            ByteOrder::LittleEndian => u64::from_le_bytes(b),
            ByteOrder::BigEndian => u64::from_be_bytes(b),
        })
    }

    /// Writes a 64-bit unsigned integer.
    pub fn write_u64(&mut self, value: u64) {
        match self.order {
            ByteOrder::LittleEndian => self.write_raw(&value.to_le_bytes()),
            ByteOrder::BigEndian => self.write_raw(&value.to_be_bytes()),
        }
    }

    /// Reads a double as its raw IEEE-754 bit pattern.
    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    /// Writes a double as its raw IEEE-754 bit pattern.
    pub fn write_f64(&mut self, value: f64) {
        self.write_u64(value.to_bits());
    }

    /// Reads a 128-bit integer in the stream's byte order.
    pub fn read_int128(&mut self) -> Result<Int128> {
        let mut b = [0u8; 16];
        self.read_raw(&mut b)?;
        Ok(match self.order {
            ByteOrder::LittleEndian => Int128::from_le_bytes(b),
            ByteOrder::BigEndian => Int128::from_be_bytes(b),
        })
    }

    /// Writes a 128-bit integer in the stream's byte order.
    ///
    /// Little-endian order means the low 64-bit word goes first, i.e. the
    /// whole value is least-significant byte first.
    pub fn write_int128(&mut self, value: Int128) {
        match self.order {
            ByteOrder::LittleEndian => self.write_raw(&value.to_le_bytes()),
            ByteOrder::BigEndian => self.write_raw(&value.to_be_bytes()),
        }
    }

    /// Reads a 256-bit integer in the stream's byte order.
    pub fn read_int256(&mut self) -> Result<Int256> {
        let mut b = [0u8; 32];
        self.read_raw(&mut b)?;
        Ok(match self.order {
            ByteOrder::LittleEndian => Int256::from_le_bytes(b),
            ByteOrder::BigEndian => Int256::from_be_bytes(b),
        })
    }

    /// Writes a 256-bit integer in the stream's byte order.
    pub fn write_int256(&mut self, value: Int256) {
        match self.order {
            ByteOrder::LittleEndian => self.write_raw(&value.to_le_bytes()),
            ByteOrder::BigEndian => self.write_raw(&value.to_be_bytes()),
        }
    }

    // ─── TL byte strings ─────────────────────────────────────────────────────

    /// Writes a length-prefixed, 4-byte-aligned TL byte string.
    ///
    /// * `len ≤ 253`: `[len as u8][data][0-padding]`
    /// * `254 ≤ len ≤ 0xff_ffff`: `[0xfe][len as 3 LE bytes][data][0-padding]`
    ///
    /// Longer payloads fail with [`Error::BytesTooLong`].
    pub fn write_tl_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let len = bytes.len();
        let header = if len <= 253 {
            self.write_u8(len as u8);
            1
        } else if len <= MAX_BYTES_LEN {
            self.write_u8(0xfe);
            self.write_u8(len as u8);
            self.write_u8((len >> 8) as u8);
            self.write_u8((len >> 16) as u8);
            4
        } else {
            return Err(Error::BytesTooLong { len });
        };

        self.write_raw(bytes);

        let padding = (4 - (header + len) % 4) % 4;
        self.write_raw(&[0u8; 3][..padding]);
        Ok(())
    }

    /// Reads a TL byte string, consuming its alignment padding.
    pub fn read_tl_bytes(&mut self) -> Result<Vec<u8>> {
        let first = self.read_u8()?;
        let (len, header) = if first != 0xfe {
            (first as usize, 1)
        } else {
            let a = self.read_u8()? as usize;
            let b = self.read_u8()? as usize;
            let c = self.read_u8()? as usize;
            (a | b << 8 | c << 16, 4)
        };

        let mut data = vec![0u8; len];
        self.read_raw(&mut data)?;

        let padding = (4 - (header + len) % 4) % 4;
        let mut pad = [0u8; 3];
        self.read_raw(&mut pad[..padding])?;

        Ok(data)
    }
}

impl Default for Streamer {
    fn default() -> Self {
        Self::new()
    }
}
