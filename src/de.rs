//! Deserializing `#[derive(Deserialize)]` structs from a [`Store`].
//!
//! Field names (after `#[serde(rename)]`) are the keys. Scalars are cast with
//! the same rules as [`get`](crate::access::get); `Option` fields may be unset
//! and unit enum variants are read from their name.
//!
//! ```
//! use envbind::{from_store, MemoryStore};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Server {
//!     #[serde(rename = "HOST")]
//!     host: String,
//!     #[serde(rename = "PORT")]
//!     port: u16,
//!     #[serde(rename = "TIMEOUT", default)]
//!     timeout: Option<u32>,
//! }
//!
//! let store = MemoryStore::from_iter([("HOST", "localhost"), ("PORT", "5432")]);
//! let server: Server = from_store(&store)?;
//! assert_eq!(server.port, 5432);
//! assert_eq!(server.timeout, None);
//! # Ok::<(), envbind::GetError>(())
//! ```

use serde::de::{self, DeserializeOwned, DeserializeSeed, IntoDeserializer, MapAccess, Visitor};
use serde::forward_to_deserialize_any;

use crate::access::{Cast, GetError, Kind};
use crate::store::Store;

/// Deserializes a struct whose fields are read from `store`.
pub fn from_store<T, S>(store: &S) -> Result<T, GetError>
where
    T: DeserializeOwned,
    S: Store + ?Sized,
{
    T::deserialize(StoreDeserializer { store })
}

struct StoreDeserializer<'a, S: ?Sized> {
    store: &'a S,
}

impl<'de, S: Store + ?Sized> de::Deserializer<'de> for StoreDeserializer<'_, S> {
    type Error = GetError;

    fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value, Self::Error> {
        Err(de::Error::custom(
            "only structs with named fields can be read from a store",
        ))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_map(Fields {
            store: self.store,
            fields: fields.iter(),
            pending: None,
        })
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_newtype_struct(self)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct seq tuple
        tuple_struct map enum identifier ignored_any
    }
}

/// Walks the declared fields, yielding only those present in the store.
struct Fields<'a, S: ?Sized> {
    store: &'a S,
    fields: std::slice::Iter<'static, &'static str>,
    pending: Option<(&'static str, String)>,
}

impl<'de, S: Store + ?Sized> MapAccess<'de> for Fields<'_, S> {
    type Error = GetError;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, Self::Error> {
        for &field in self.fields.by_ref() {
            if let Some(raw) = self.store.lookup(field) {
                self.pending = Some((field, raw));
                return seed.deserialize(field.into_deserializer()).map(Some);
            }
        }
        Ok(None)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, Self::Error> {
        let (key, raw) = self
            .pending
            .take()
            .ok_or_else(|| <GetError as de::Error>::custom("value requested before key"))?;
        seed.deserialize(RawValue { key, raw })
    }
}

/// A single raw value, cast on demand to whatever the field asks for.
struct RawValue {
    key: &'static str,
    raw: String,
}

impl RawValue {
    fn cast<T: Cast>(&self) -> Result<T, GetError> {
        T::cast(&self.raw).ok_or_else(|| self.cannot_cast(T::KIND))
    }

    fn cannot_cast(&self, kind: Kind) -> GetError {
        GetError::CannotCast {
            key: self.key.to_string(),
            kind,
        }
    }
}

macro_rules! deserialize_cast {
    ($($method:ident => $ty:ty, $visit:ident;)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
                visitor.$visit(self.cast::<$ty>()?)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for RawValue {
    type Error = GetError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_string(self.raw)
    }

    deserialize_cast! {
        deserialize_bool => bool, visit_bool;
        deserialize_i8 => i8, visit_i8;
        deserialize_i16 => i16, visit_i16;
        deserialize_i32 => i32, visit_i32;
        deserialize_i64 => i64, visit_i64;
        deserialize_u8 => u8, visit_u8;
        deserialize_u16 => u16, visit_u16;
        deserialize_u32 => u32, visit_u32;
        deserialize_u64 => u64, visit_u64;
        deserialize_f32 => f32, visit_f32;
        deserialize_f64 => f64, visit_f64;
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_byte_buf(self.raw.into_bytes())
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_byte_buf(self.raw.into_bytes())
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_enum(self.raw.into_deserializer())
    }

    forward_to_deserialize_any! {
        i128 u128 char str string unit unit_struct seq tuple tuple_struct
        map struct identifier ignored_any
    }
}
