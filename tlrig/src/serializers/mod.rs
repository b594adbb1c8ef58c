//! The serializer implementations the engine ships with.
//!
//! | Module         | Contents                                              |
//! |----------------|-------------------------------------------------------|
//! | [`primitives`] | Integers, doubles, booleans, 128/256-bit values       |
//! | [`text`]       | Strings and raw byte strings                          |
//! | [`vector`]     | The generic `Vec<I>` serializer                       |
//! | [`object`]     | Descriptor-driven structured objects                  |
//! | [`enums`]      | Multi-constructor (sum) types                         |
//! | [`dynamic`]    | Values of any registered boxed type                   |

pub mod dynamic;
pub mod enums;
pub mod object;
pub mod primitives;
pub mod text;
pub mod vector;

pub use dynamic::DynamicSerializer;
pub use enums::EnumSerializer;
pub use object::{FieldDescriptor, ObjectSerializer};
pub use primitives::{
    BoolSerializer, DoubleSerializer, Int32Serializer, Int64Serializer, Int128Serializer,
    Int256Serializer, UInt32Serializer, UInt64Serializer,
};
pub use text::{BytesSerializer, StringSerializer};
pub use vector::{VECTOR_ID, VectorSerializer};
