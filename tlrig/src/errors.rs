//! Errors shared by every part of the engine.

use std::fmt;

/// Errors that can occur while (de)serializing TL values.
///
/// Every error is terminal for the current call; partially written output is
/// the caller's to discard.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// No serializer is registered for the requested runtime type.
    SerializerNotFound {
        /// Name of the type that has no serializer.
        type_name: String,
    },
    /// Decoded a constructor ID that doesn't match any known serializer, or
    /// mismatches the serializer selected for the read.
    UnexpectedConstructor {
        /// The offending constructor ID.
        id: u32,
    },
    /// Ran out of bytes before the value was fully read.
    UnexpectedEof,
    /// A TL byte string exceeds the maximum encodable length (`0xff_ffff`).
    BytesTooLong {
        /// Length of the rejected payload.
        len: usize,
    },
    /// The engine was asked to do something unrepresentable on the wire,
    /// e.g. a bare read of a type that is only decodable boxed.
    InvalidOperation {
        /// What went wrong.
        reason: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SerializerNotFound { type_name } => {
                write!(f, "no serializer registered for type: {type_name}")
            }
            Self::UnexpectedConstructor { id } => {
                write!(f, "unexpected constructor id: {id:#010x}")
            }
            Self::UnexpectedEof => write!(f, "unexpected end of stream"),
            Self::BytesTooLong { len } => {
                write!(f, "byte string of {len} bytes exceeds the TL limit")
            }
            Self::InvalidOperation { reason } => write!(f, "{reason}"),
        }
    }
}

impl std::error::Error for Error {}

/// Specialized `Result` for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
