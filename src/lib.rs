//! Load env files into the process environment and read them back as typed
//! values.
//!
//! ```no_run
//! use envbind::bindable;
//!
//! #[derive(Default)]
//! struct ServerConfig {
//!     host: String,
//!     port: u16,
//! }
//!
//! bindable!(ServerConfig {
//!     host => "SERVER_HOST",
//!     port => "SERVER_PORT",
//! });
//!
//! fn main() -> Result<(), envbind::Error> {
//!     envbind::load([".env", ".env.local"])?;
//!
//!     let secret: String = envbind::get("SUPER_SECRET_KEY")?;
//!     let timeout = envbind::get_or_default("TIMEOUT_SECONDS", 5u64);
//!
//!     let mut server = ServerConfig::default();
//!     envbind::get_struct(&mut server)?;
//!     # let _ = (secret, timeout);
//!     Ok(())
//! }
//! ```

pub mod access;
pub mod bind;
mod de;
mod env;
mod error;
pub mod load;
pub mod store;

use std::path::Path;

pub use access::{Cast, GetError, Kind, Value};
pub use bind::{Bind, Field};
pub use de::from_store;
pub use env::Env;
pub use error::Error;
pub use load::{Entry, LineError, LoadError, LoadReport, LoadedSet, Loader};
pub use store::{MemoryStore, ProcessEnv, Store};

/// Loads env files into the environment of the current process.
///
/// Files are read in order and later definitions override earlier ones. With no
/// paths, `.env` in the current directory is loaded. Nothing is installed if
/// any file fails to load.
pub fn load<I, P>(paths: I) -> Result<LoadReport, LoadError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    paths
        .into_iter()
        .fold(Loader::builder(), |loader, path| loader.with_file(path, true))
        .install_process()
}

/// Like [`load`], panicking on error.
///
/// # Panics
///
/// Panics with the [`LoadError`] message.
#[track_caller]
pub fn load_or_panic<I, P>(paths: I) -> LoadReport
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    load(paths).unwrap_or_else(|e| panic!("{e}"))
}

/// Reads `key` from the process environment and casts it to `T`.
pub fn get<T: Cast>(key: &str) -> Result<T, GetError> {
    Env::process().get(key)
}

/// Like [`get`], returning `fallback` if the key is unset or does not cast.
pub fn get_or_default<T: Cast>(key: &str, fallback: T) -> T {
    Env::process().get_or_default(key, fallback)
}

/// Like [`get`], panicking if the key is unset or does not cast.
#[track_caller]
pub fn get_or_panic<T: Cast>(key: &str) -> T {
    Env::process().get_or_panic(key)
}

/// Populates the tagged fields of `target` from the process environment.
pub fn get_struct<T: Bind>(target: &mut T) -> Result<(), GetError> {
    Env::process().get_struct(target)
}
