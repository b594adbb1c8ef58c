//! Runtime serialization engine for the [Type Language] (TL) binary format.
//!
//! TL is the compact, self-describing wire format of the MTProto protocol
//! family: every value is (optionally) prefixed by a 32-bit constructor ID
//! identifying its concrete shape, followed by its fields in declared order.
//! This crate implements the runtime half of that story — a registry mapping
//! constructor IDs and runtime types to serializers, the binary stream codec,
//! and the dispatcher that walks objects field by field.
//!
//! # Overview
//!
//! | Module          | Contents                                               |
//! |-----------------|--------------------------------------------------------|
//! | [`stream`]      | Seekable byte buffer with the TL primitive encodings   |
//! | [`serializer`]  | The [`Serializer`] contract, [`Mode`] and [`Context`]  |
//! | [`serializers`] | Built-in, object, vector, enum and dynamic serializers |
//! | [`registry`]    | Type ↔ constructor ID resolution                       |
//! | [`rig`]         | The [`Rig`] dispatcher facade                          |
//!
//! # Usage
//!
//! Build a [`Registry`], describe your types to it, freeze it into a
//! [`Rig`], then serialize:
//!
//! ```
//! use tlrig::{FieldDescriptor, Registry, Rig};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! let mut registry = Registry::new();
//! registry.register_object(
//!     0x736f_6d65,
//!     "Point",
//!     vec![
//!         FieldDescriptor::new(1, |p: &Point| &p.x, |p, v| p.x = v),
//!         FieldDescriptor::new(2, |p: &Point| &p.y, |p, v| p.y = v),
//!     ],
//! )?;
//!
//! let rig = Rig::new(registry);
//! let bytes = rig.serialize(&Point { x: 1, y: -1 })?;
//! assert_eq!(rig.deserialize::<Point>(&bytes)?, Point { x: 1, y: -1 });
//! # Ok::<(), tlrig::Error>(())
//! ```
//!
//! The registry is append-only while it is exclusively owned and read-only
//! once frozen, so concurrent calls share it without locks. Descriptor lists
//! are plain data — typically emitted by a schema compiler, or written by
//! hand as above.
//!
//! [Type Language]: https://core.telegram.org/mtproto/TL

#![deny(unsafe_code)]

pub mod errors;
pub mod registry;
pub mod rig;
pub mod serializer;
pub mod serializers;
pub mod stream;

pub use errors::{Error, Result};
pub use registry::Registry;
pub use rig::Rig;
pub use serializer::{BoxedAny, Context, Mode, Serializer};
pub use serializers::{EnumSerializer, FieldDescriptor, ObjectSerializer, VectorSerializer};
pub use stream::{ByteOrder, MAX_BYTES_LEN, Streamer};
pub use tlrig_bigint::{Int128, Int256};
