//! A handle over the store that typed lookups read from.

use serde::de::DeserializeOwned;

use crate::access::{self, Cast, GetError, Kind, Value};
use crate::bind::{self, Bind};
use crate::load::{LoadError, LoadReport, Loader};
use crate::store::{ProcessEnv, Store};

/// Owns a [`Store`] and exposes typed access to it.
///
/// `Env::process()` reads the environment of the running process. Any other
/// store can be wrapped with [`Env::new`], which keeps tests and embedded uses
/// away from process-wide state.
///
/// ## Example
///
/// ```
/// use envbind::{Env, MemoryStore};
///
/// let env = Env::new(MemoryStore::from_iter([("PORT", "8080")]));
///
/// let port: u16 = env.get("PORT")?;
/// let workers = env.get_or_default("WORKERS", 4usize);
/// assert_eq!((port, workers), (8080, 4));
/// # Ok::<(), envbind::GetError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Env<S = ProcessEnv> {
    store: S,
}

impl Env<ProcessEnv> {
    /// A handle over the environment of the current process.
    pub fn process() -> Self {
        Self { store: ProcessEnv }
    }
}

impl<S: Store> Env<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Runs `loader` and installs the result into this handle's store.
    pub fn load(&mut self, loader: Loader) -> Result<LoadReport, LoadError> {
        loader.install(&mut self.store)
    }

    /// Looks up `key` and casts it to `T`.
    pub fn get<T: Cast>(&self, key: &str) -> Result<T, GetError> {
        access::get(&self.store, key)
    }

    /// Like [`get`](Self::get), returning `fallback` on any error.
    pub fn get_or_default<T: Cast>(&self, key: &str, fallback: T) -> T {
        access::get_or_default(&self.store, key, fallback)
    }

    /// Like [`get`](Self::get), panicking on any error.
    #[track_caller]
    pub fn get_or_panic<T: Cast>(&self, key: &str) -> T {
        access::get_or_panic(&self.store, key)
    }

    /// Looks up `key` and casts it to a kind chosen at runtime.
    pub fn get_kind(&self, key: &str, kind: Kind) -> Result<Value, GetError> {
        access::get_kind(&self.store, key, kind)
    }

    /// Populates the tagged fields of `target`.
    pub fn get_struct<T: Bind>(&self, target: &mut T) -> Result<(), GetError> {
        bind::get_struct(&self.store, target)
    }

    /// Deserializes a struct whose field names are keys.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, GetError> {
        crate::de::from_store(&self.store)
    }
}
