//! String and byte-string serializers.
//!
//! Both share one constructor and the streamer's TL byte-string framing; a
//! TL `string` is just `bytes` that happens to hold UTF-8.

use std::any::{Any, TypeId};

use crate::errors::{Error, Result};
use crate::serializer::{BoxedAny, Context, Mode, Serializer, downcast_value};

/// `string ? = String` / `bytes = Bytes`.
pub const BYTES_ID: u32 = 0xb528_6e24;

/// UTF-8 string under the TL byte-string framing.
pub struct StringSerializer;

impl Serializer for StringSerializer {
    fn constructor_id(&self) -> u32 {
        BYTES_ID
    }

    fn supported_type(&self) -> TypeId {
        TypeId::of::<String>()
    }

    fn type_name(&self) -> &str {
        "String"
    }

    fn default_mode(&self) -> Mode {
        Mode::Bare
    }

    fn write_body(&self, value: &dyn Any, ctx: &mut Context<'_>) -> Result<()> {
        let value = downcast_value::<String>(value, self.type_name())?;
        ctx.streamer.write_tl_bytes(value.as_bytes())
    }

    fn read_body(&self, _id: u32, ctx: &mut Context<'_>) -> Result<BoxedAny> {
        let bytes = ctx.streamer.read_tl_bytes()?;
        match String::from_utf8(bytes) {
            Ok(s) => Ok(Box::new(s)),
            Err(_) => Err(Error::InvalidOperation {
                reason: "string payload is not valid UTF-8".to_owned(),
            }),
        }
    }
}

/// Raw byte string. `Vec<u8>` is TL `bytes`, never a TL vector.
pub struct BytesSerializer;

impl Serializer for BytesSerializer {
    fn constructor_id(&self) -> u32 {
        BYTES_ID
    }

    fn supported_type(&self) -> TypeId {
        TypeId::of::<Vec<u8>>()
    }

    fn type_name(&self) -> &str {
        "bytes"
    }

    fn default_mode(&self) -> Mode {
        Mode::Bare
    }

    fn write_body(&self, value: &dyn Any, ctx: &mut Context<'_>) -> Result<()> {
        let value = downcast_value::<Vec<u8>>(value, self.type_name())?;
        ctx.streamer.write_tl_bytes(value)
    }

    fn read_body(&self, _id: u32, ctx: &mut Context<'_>) -> Result<BoxedAny> {
        Ok(Box::new(ctx.streamer.read_tl_bytes()?))
    }
}
