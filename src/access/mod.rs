//! Typed lookups against a [`Store`].
//!
//! Every call reads the store again; nothing is cached, so changes made to the
//! store between calls are always seen.

mod cast;
mod error;

pub use cast::{Cast, Kind, Value};
pub use error::GetError;

use crate::store::Store;

/// Looks up `key` and casts it to `T`.
pub fn get<T: Cast, S: Store + ?Sized>(store: &S, key: &str) -> Result<T, GetError> {
    let raw = store
        .lookup(key)
        .ok_or_else(|| GetError::NotSet(key.to_string()))?;
    T::cast(&raw).ok_or_else(|| GetError::CannotCast {
        key: key.to_string(),
        kind: T::KIND,
    })
}

/// Like [`get`], returning `fallback` if the key is unset or does not cast.
pub fn get_or_default<T: Cast, S: Store + ?Sized>(store: &S, key: &str, fallback: T) -> T {
    get(store, key).unwrap_or(fallback)
}

/// Like [`get`], panicking if the key is unset or does not cast.
///
/// # Panics
///
/// Panics with the [`GetError`] message.
#[track_caller]
pub fn get_or_panic<T: Cast, S: Store + ?Sized>(store: &S, key: &str) -> T {
    get(store, key).unwrap_or_else(|e| panic!("{e}"))
}

/// Looks up `key` and casts it to a kind chosen at runtime.
pub fn get_kind<S: Store + ?Sized>(store: &S, key: &str, kind: Kind) -> Result<Value, GetError> {
    let raw = store
        .lookup(key)
        .ok_or_else(|| GetError::NotSet(key.to_string()))?;
    kind.cast(&raw).ok_or_else(|| GetError::CannotCast {
        key: key.to_string(),
        kind,
    })
}
