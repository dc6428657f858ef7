//! Env file loading and installation.

mod builder;
mod entry;
mod error;
mod expand;
mod file;
pub mod line;

pub use builder::{LoadReport, Loader, DEFAULT_FILE};
pub use entry::{Entry, LoadedSet};
pub use error::{LineError, LoadError};
pub use expand::expand;
