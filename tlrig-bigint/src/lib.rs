//! Fixed-width 128- and 256-bit integer value types for the TL wire format.
//!
//! TL schemas use `int128` and `int256` for nonces, key fingerprints and
//! similar opaque quantities. On the wire they are plain fixed-size payloads;
//! these types carry the value plus the byte-order conversions the codec
//! needs, and deliberately implement no arithmetic.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use std::fmt;

/// A 128-bit value, as carried by the TL `int128` type.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Int128(pub u128);

impl Int128 {
    /// Width of the value on the wire, in bytes.
    pub const BYTES: usize = 16;

    /// Builds the value from its little-endian byte representation.
    pub fn from_le_bytes(bytes: [u8; 16]) -> Self {
        Self(u128::from_le_bytes(bytes))
    }

    /// Builds the value from its big-endian byte representation.
    pub fn from_be_bytes(bytes: [u8; 16]) -> Self {
        Self(u128::from_be_bytes(bytes))
    }

    /// The value as little-endian bytes (least-significant byte first).
    pub fn to_le_bytes(self) -> [u8; 16] {
        self.0.to_le_bytes()
    }

    /// The value as big-endian bytes.
    pub fn to_be_bytes(self) -> [u8; 16] {
        self.0.to_be_bytes()
    }
}

impl From<u128> for Int128 {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl From<Int128> for u128 {
    fn from(value: Int128) -> Self {
        value.0
    }
}

impl fmt::LowerHex for Int128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl fmt::Display for Int128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{self:x}")
    }
}

/// A 256-bit value, as carried by the TL `int256` type.
///
/// Stored as two 128-bit halves; `high` holds the most significant bits.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Int256 {
    /// The most significant 128 bits.
    pub high: u128,
    /// The least significant 128 bits.
    pub low: u128,
}

impl Int256 {
    /// Width of the value on the wire, in bytes.
    pub const BYTES: usize = 32;

    /// Builds the value from its two 128-bit halves.
    pub fn new(high: u128, low: u128) -> Self {
        Self { high, low }
    }

    /// Builds the value from its little-endian byte representation.
    pub fn from_le_bytes(bytes: [u8; 32]) -> Self {
        let mut low = [0u8; 16];
        let mut high = [0u8; 16];
        low.copy_from_slice(&bytes[..16]);
        high.copy_from_slice(&bytes[16..]);
        Self {
            high: u128::from_le_bytes(high),
            low: u128::from_le_bytes(low),
        }
    }

    /// Builds the value from its big-endian byte representation.
    pub fn from_be_bytes(bytes: [u8; 32]) -> Self {
        let mut high = [0u8; 16];
        let mut low = [0u8; 16];
        high.copy_from_slice(&bytes[..16]);
        low.copy_from_slice(&bytes[16..]);
        Self {
            high: u128::from_be_bytes(high),
            low: u128::from_be_bytes(low),
        }
    }

    /// The value as little-endian bytes (least-significant byte first).
    pub fn to_le_bytes(self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes[..16].copy_from_slice(&self.low.to_le_bytes());
        bytes[16..].copy_from_slice(&self.high.to_le_bytes());
        bytes
    }

    /// The value as big-endian bytes.
    pub fn to_be_bytes(self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes[..16].copy_from_slice(&self.high.to_be_bytes());
        bytes[16..].copy_from_slice(&self.low.to_be_bytes());
        bytes
    }
}

impl From<u128> for Int256 {
    fn from(value: u128) -> Self {
        Self { high: 0, low: value }
    }
}

impl fmt::LowerHex for Int256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}{:032x}", self.high, self.low)
    }
}

impl fmt::Display for Int256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{self:x}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int128_byte_orders_are_reversals() {
        let v = Int128(0x0102030405060708090a0b0c0d0e0f10);
        let mut le = v.to_le_bytes();
        le.reverse();
        assert_eq!(le, v.to_be_bytes());
    }

    #[test]
    fn int128_le_puts_least_significant_byte_first() {
        let v = Int128(0x0102030405060708090a0b0c0d0e0f10);
        assert_eq!(v.to_le_bytes()[0], 0x10);
        assert_eq!(v.to_le_bytes()[15], 0x01);
        assert_eq!(Int128::from_le_bytes(v.to_le_bytes()), v);
        assert_eq!(Int128::from_be_bytes(v.to_be_bytes()), v);
    }

    #[test]
    fn int256_halves_round_trip() {
        let v = Int256::new(
            0x0102030405060708090a0b0c0d0e0f10,
            0x1112131415161718191a1b1c1d1e1f20,
        );
        assert_eq!(Int256::from_le_bytes(v.to_le_bytes()), v);
        assert_eq!(Int256::from_be_bytes(v.to_be_bytes()), v);

        // Low half first in little-endian order.
        assert_eq!(v.to_le_bytes()[0], 0x20);
        assert_eq!(v.to_le_bytes()[31], 0x01);
        assert_eq!(v.to_be_bytes()[0], 0x01);
        assert_eq!(v.to_be_bytes()[31], 0x20);
    }

    #[test]
    fn hex_formatting() {
        assert_eq!(
            Int128(0xdeadbeef).to_string(),
            "0x000000000000000000000000deadbeef"
        );
        assert_eq!(Int256::from(1u128).to_string(), format!("0x{:064x}", 1));
    }
}
