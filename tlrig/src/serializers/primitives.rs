//! Built-in serializers for the TL primitive types.
//!
//! All primitives are bare by default: a top-level `int` is just its four
//! bytes. The boxed form prefixes the constructor IDs below.

use std::any::{Any, TypeId};

use tlrig_bigint::{Int128, Int256};

use crate::errors::{Error, Result};
use crate::serializer::{BoxedAny, Context, Mode, Serializer, downcast_value};

/// `int ? = Int` — shared by the unsigned reading.
pub const INT_ID: u32 = 0xa850_9bda;
/// `long ? = Long` — shared by the unsigned reading.
pub const LONG_ID: u32 = 0x2207_6cba;
/// `double ? = Double`.
pub const DOUBLE_ID: u32 = 0x2210_c154;
/// `int128 4*[ int ] = Int128`.
pub const INT128_ID: u32 = 0x84cc_f7b7;
/// `int256 8*[ int ] = Int256`.
pub const INT256_ID: u32 = 0x7bed_eb5b;
/// `boolTrue = Bool`.
pub const BOOL_TRUE_ID: u32 = 0x9972_75b5;
/// `boolFalse = Bool`.
pub const BOOL_FALSE_ID: u32 = 0xbc79_9737;

/// Bare 32-bit signed integer.
pub struct Int32Serializer;

impl Serializer for Int32Serializer {
    fn constructor_id(&self) -> u32 {
        INT_ID
    }

    fn supported_type(&self) -> TypeId {
        TypeId::of::<i32>()
    }

    fn type_name(&self) -> &str {
        "i32"
    }

    fn default_mode(&self) -> Mode {
        Mode::Bare
    }

    fn write_body(&self, value: &dyn Any, ctx: &mut Context<'_>) -> Result<()> {
        ctx.streamer.write_i32(*downcast_value::<i32>(value, self.type_name())?);
        Ok(())
    }

    fn read_body(&self, _id: u32, ctx: &mut Context<'_>) -> Result<BoxedAny> {
        Ok(Box::new(ctx.streamer.read_i32()?))
    }
}

/// Bare 32-bit unsigned integer; same wire shape and constructor as `i32`.
pub struct UInt32Serializer;

impl Serializer for UInt32Serializer {
    fn constructor_id(&self) -> u32 {
        INT_ID
    }

    fn supported_type(&self) -> TypeId {
        TypeId::of::<u32>()
    }

    fn type_name(&self) -> &str {
        "u32"
    }

    fn default_mode(&self) -> Mode {
        Mode::Bare
    }

    fn write_body(&self, value: &dyn Any, ctx: &mut Context<'_>) -> Result<()> {
        ctx.streamer.write_u32(*downcast_value::<u32>(value, self.type_name())?);
        Ok(())
    }

    fn read_body(&self, _id: u32, ctx: &mut Context<'_>) -> Result<BoxedAny> {
        Ok(Box::new(ctx.streamer.read_u32()?))
    }
}

/// Bare 64-bit signed integer.
pub struct Int64Serializer;

impl Serializer for Int64Serializer {
    fn constructor_id(&self) -> u32 {
        LONG_ID
    }

    fn supported_type(&self) -> TypeId {
        TypeId::of::<i64>()
    }

    fn type_name(&self) -> &str {
        "i64"
    }

    fn default_mode(&self) -> Mode {
        Mode::Bare
    }

    fn write_body(&self, value: &dyn Any, ctx: &mut Context<'_>) -> Result<()> {
        ctx.streamer.write_i64(*downcast_value::<i64>(value, self.type_name())?);
        Ok(())
    }

    fn read_body(&self, _id: u32, ctx: &mut Context<'_>) -> Result<BoxedAny> {
        Ok(Box::new(ctx.streamer.read_i64()?))
    }
}

/// Bare 64-bit unsigned integer; same wire shape and constructor as `i64`.
pub struct UInt64Serializer;

impl Serializer for UInt64Serializer {
    fn constructor_id(&self) -> u32 {
        LONG_ID
    }

    fn supported_type(&self) -> TypeId {
        TypeId::of::<u64>()
    }

    fn type_name(&self) -> &str {
        "u64"
    }

    fn default_mode(&self) -> Mode {
        Mode::Bare
    }

    fn write_body(&self, value: &dyn Any, ctx: &mut Context<'_>) -> Result<()> {
        ctx.streamer.write_u64(*downcast_value::<u64>(value, self.type_name())?);
        Ok(())
    }

    fn read_body(&self, _id: u32, ctx: &mut Context<'_>) -> Result<BoxedAny> {
        Ok(Box::new(ctx.streamer.read_u64()?))
    }
}

/// IEEE-754 double, bit-reinterpreted through the 64-bit path.
pub struct DoubleSerializer;

impl Serializer for DoubleSerializer {
    fn constructor_id(&self) -> u32 {
        DOUBLE_ID
    }

    fn supported_type(&self) -> TypeId {
        TypeId::of::<f64>()
    }

    fn type_name(&self) -> &str {
        "f64"
    }

    fn default_mode(&self) -> Mode {
        Mode::Bare
    }

    fn write_body(&self, value: &dyn Any, ctx: &mut Context<'_>) -> Result<()> {
        ctx.streamer.write_f64(*downcast_value::<f64>(value, self.type_name())?);
        Ok(())
    }

    fn read_body(&self, _id: u32, ctx: &mut Context<'_>) -> Result<BoxedAny> {
        Ok(Box::new(ctx.streamer.read_f64()?))
    }
}

/// Bare 128-bit integer.
pub struct Int128Serializer;

impl Serializer for Int128Serializer {
    fn constructor_id(&self) -> u32 {
        INT128_ID
    }

    fn supported_type(&self) -> TypeId {
        TypeId::of::<Int128>()
    }

    fn type_name(&self) -> &str {
        "Int128"
    }

    fn default_mode(&self) -> Mode {
        Mode::Bare
    }

    fn write_body(&self, value: &dyn Any, ctx: &mut Context<'_>) -> Result<()> {
        ctx.streamer
            .write_int128(*downcast_value::<Int128>(value, self.type_name())?);
        Ok(())
    }

    fn read_body(&self, _id: u32, ctx: &mut Context<'_>) -> Result<BoxedAny> {
        Ok(Box::new(ctx.streamer.read_int128()?))
    }
}

/// Bare 256-bit integer.
pub struct Int256Serializer;

impl Serializer for Int256Serializer {
    fn constructor_id(&self) -> u32 {
        INT256_ID
    }

    fn supported_type(&self) -> TypeId {
        TypeId::of::<Int256>()
    }

    fn type_name(&self) -> &str {
        "Int256"
    }

    fn default_mode(&self) -> Mode {
        Mode::Bare
    }

    fn write_body(&self, value: &dyn Any, ctx: &mut Context<'_>) -> Result<()> {
        ctx.streamer
            .write_int256(*downcast_value::<Int256>(value, self.type_name())?);
        Ok(())
    }

    fn read_body(&self, _id: u32, ctx: &mut Context<'_>) -> Result<BoxedAny> {
        Ok(Box::new(ctx.streamer.read_int256()?))
    }
}

/// TL booleans are two nullary constructors, not a flag byte.
///
/// A bool *is* its constructor ID, so the mode never changes the encoding;
/// both `write` and `read` are ID-driven regardless of the requested framing.
pub struct BoolSerializer;

impl Serializer for BoolSerializer {
    fn constructor_id(&self) -> u32 {
        BOOL_TRUE_ID
    }

    fn constructor_ids(&self) -> Vec<u32> {
        vec![BOOL_TRUE_ID, BOOL_FALSE_ID]
    }

    fn supported_type(&self) -> TypeId {
        TypeId::of::<bool>()
    }

    fn type_name(&self) -> &str {
        "bool"
    }

    fn polymorphic(&self) -> bool {
        true
    }

    fn write(&self, value: &dyn Any, ctx: &mut Context<'_>, _mode: Option<Mode>) -> Result<()> {
        self.write_body(value, ctx)
    }

    fn read(&self, ctx: &mut Context<'_>, _mode: Option<Mode>) -> Result<BoxedAny> {
        let id = ctx.streamer.read_u32()?;
        self.read_body(id, ctx)
    }

    fn write_body(&self, value: &dyn Any, ctx: &mut Context<'_>) -> Result<()> {
        let value = downcast_value::<bool>(value, self.type_name())?;
        ctx.streamer
            .write_u32(if *value { BOOL_TRUE_ID } else { BOOL_FALSE_ID });
        Ok(())
    }

    fn read_body(&self, id: u32, _ctx: &mut Context<'_>) -> Result<BoxedAny> {
        match id {
            BOOL_TRUE_ID => Ok(Box::new(true)),
            BOOL_FALSE_ID => Ok(Box::new(false)),
            id => Err(Error::UnexpectedConstructor { id }),
        }
    }
}
