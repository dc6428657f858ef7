//! The casting matrix: how a raw string becomes a typed value.
//!
//! The set of target types is closed. [`Kind`] names each of them at runtime,
//! [`Value`] holds a cast result, and [`Cast`] is implemented for exactly the
//! matching Rust types, so asking for any other type is a compile error.

use std::fmt;
use std::str::FromStr;

use super::GetError;

/// A supported cast target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    String,
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Bytes,
}

impl Kind {
    pub const ALL: [Kind; 15] = [
        Kind::String,
        Kind::Bool,
        Kind::I8,
        Kind::I16,
        Kind::I32,
        Kind::I64,
        Kind::Isize,
        Kind::U8,
        Kind::U16,
        Kind::U32,
        Kind::U64,
        Kind::Usize,
        Kind::F32,
        Kind::F64,
        Kind::Bytes,
    ];

    /// Canonical name, as accepted in `#typename` annotations.
    pub fn name(self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Bool => "bool",
            Kind::I8 => "i8",
            Kind::I16 => "i16",
            Kind::I32 => "i32",
            Kind::I64 => "i64",
            Kind::Isize => "isize",
            Kind::U8 => "u8",
            Kind::U16 => "u16",
            Kind::U32 => "u32",
            Kind::U64 => "u64",
            Kind::Usize => "usize",
            Kind::F32 => "f32",
            Kind::F64 => "f64",
            Kind::Bytes => "bytes",
        }
    }

    /// Casts `raw` to this kind, or `None` if it does not parse.
    pub fn cast(self, raw: &str) -> Option<Value> {
        match self {
            Kind::String => String::cast(raw).map(Value::String),
            Kind::Bool => bool::cast(raw).map(Value::Bool),
            Kind::I8 => i8::cast(raw).map(Value::I8),
            Kind::I16 => i16::cast(raw).map(Value::I16),
            Kind::I32 => i32::cast(raw).map(Value::I32),
            Kind::I64 => i64::cast(raw).map(Value::I64),
            Kind::Isize => isize::cast(raw).map(Value::Isize),
            Kind::U8 => u8::cast(raw).map(Value::U8),
            Kind::U16 => u16::cast(raw).map(Value::U16),
            Kind::U32 => u32::cast(raw).map(Value::U32),
            Kind::U64 => u64::cast(raw).map(Value::U64),
            Kind::Usize => usize::cast(raw).map(Value::Usize),
            Kind::F32 => f32::cast(raw).map(Value::F32),
            Kind::F64 => f64::cast(raw).map(Value::F64),
            Kind::Bytes => Vec::<u8>::cast(raw).map(Value::Bytes),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Kind {
    type Err = GetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s {
            "string" | "str" => Kind::String,
            "bool" => Kind::Bool,
            "i8" | "int8" => Kind::I8,
            "i16" | "int16" => Kind::I16,
            "i32" | "int32" | "rune" => Kind::I32,
            "i64" | "int64" => Kind::I64,
            "isize" | "int" => Kind::Isize,
            "u8" | "uint8" | "byte" => Kind::U8,
            "u16" | "uint16" => Kind::U16,
            "u32" | "uint32" => Kind::U32,
            "u64" | "uint64" => Kind::U64,
            "usize" | "uint" => Kind::Usize,
            "f32" | "float32" => Kind::F32,
            "f64" | "float64" => Kind::F64,
            "bytes" | "[]byte" => Kind::Bytes,
            other => return Err(GetError::UnsupportedType(other.to_string())),
        };
        Ok(kind)
    }
}

/// A cast result.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Usize(usize),
    F32(f32),
    F64(f64),
    Bytes(Vec<u8>),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::String(_) => Kind::String,
            Value::Bool(_) => Kind::Bool,
            Value::I8(_) => Kind::I8,
            Value::I16(_) => Kind::I16,
            Value::I32(_) => Kind::I32,
            Value::I64(_) => Kind::I64,
            Value::Isize(_) => Kind::Isize,
            Value::U8(_) => Kind::U8,
            Value::U16(_) => Kind::U16,
            Value::U32(_) => Kind::U32,
            Value::U64(_) => Kind::U64,
            Value::Usize(_) => Kind::Usize,
            Value::F32(_) => Kind::F32,
            Value::F64(_) => Kind::F64,
            Value::Bytes(_) => Kind::Bytes,
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A type a raw value can be cast to.
///
/// Sealed: implemented for `String`, `bool`, the fixed-width and
/// pointer-sized integers, `f32`, `f64` and `Vec<u8>`.
pub trait Cast: Sized + sealed::Sealed {
    const KIND: Kind;

    fn cast(raw: &str) -> Option<Self>;
}

impl sealed::Sealed for String {}
impl Cast for String {
    const KIND: Kind = Kind::String;

    fn cast(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

impl sealed::Sealed for Vec<u8> {}
impl Cast for Vec<u8> {
    const KIND: Kind = Kind::Bytes;

    fn cast(raw: &str) -> Option<Self> {
        Some(raw.as_bytes().to_vec())
    }
}

// `FromStr` for these types is exactly the matrix: `true`/`false` only for
// bool, decimal with range checks for integers, decimal/exponent for floats.
macro_rules! cast_from_str {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}
            impl Cast for $ty {
                const KIND: Kind = Kind::$kind;

                fn cast(raw: &str) -> Option<Self> {
                    raw.parse().ok()
                }
            }
        )*
    };
}

cast_from_str! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
}
