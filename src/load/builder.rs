use std::path::Path;

use super::expand::expand;
use super::file::FileSource;
use super::{LoadError, LoadedSet};
use crate::store::{ProcessEnv, Store};

/// File loaded when no file has been registered.
pub const DEFAULT_FILE: &str = ".env";

/// Builder for loading env files into a [`Store`].
///
/// Files are read in registration order. A key defined in several files (or
/// several times in one file) takes the value of its last definition.
///
/// ## Variable References
///
/// Values can reference other keys using `${NAME}` syntax:
///
/// ```text
/// HOST=localhost
/// PORT=8080
/// URL=http://${HOST}:${PORT}/api
/// ```
///
/// References are resolved once every file has been read, so a value may refer
/// to a key defined in a later file.
///
/// ## Example
///
/// ```no_run
/// use envbind::Loader;
///
/// let report = Loader::builder()
///     .with_file(".env", true)
///     .with_file(".env.local", false)
///     .install_process()?;
/// println!("loaded {} variables", report.loaded);
/// # Ok::<(), envbind::LoadError>(())
/// ```
#[derive(Debug)]
#[must_use = "builders do nothing until .load() or .install() is called"]
pub struct Loader {
    sources: Vec<FileSource>,
    overwrite: bool,
}

impl Default for Loader {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            overwrite: true,
        }
    }
}

/// Summary of an installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    /// Files that were found and read.
    pub files_read: usize,
    /// Entries written to the store.
    pub loaded: usize,
    /// Entries left out because the store already had the key.
    pub skipped_existing: usize,
}

impl Loader {
    /// Creates a new loader.
    pub fn builder() -> Self {
        Self::default()
    }

    /// Adds an env file to be loaded.
    ///
    /// If `required` is `true`, loading fails if the file doesn't exist.
    /// Optional files that are missing are silently skipped.
    pub fn with_file(mut self, path: impl AsRef<Path>, required: bool) -> Self {
        self.sources.push(FileSource::new(path, required));
        self
    }

    /// Sets whether installation replaces keys that already exist in the store.
    ///
    /// Defaults to `true`.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Reads every file and expands references, without touching any store.
    pub fn load(self) -> Result<LoadedSet, LoadError> {
        self.read().map(|(set, _)| set)
    }

    /// Loads every file and writes the expanded entries into `store`.
    ///
    /// Nothing is written unless every file was read and every reference was
    /// resolved.
    pub fn install<S: Store + ?Sized>(self, store: &mut S) -> Result<LoadReport, LoadError> {
        let overwrite = self.overwrite;
        let (set, files_read) = self.read()?;

        let mut report = LoadReport {
            files_read,
            ..LoadReport::default()
        };
        for entry in set {
            if !overwrite && store.lookup(&entry.key).is_some() {
                report.skipped_existing += 1;
                continue;
            }
            store.set(&entry.key, &entry.value);
            report.loaded += 1;
        }

        tracing::debug!(
            files = report.files_read,
            loaded = report.loaded,
            skipped = report.skipped_existing,
            "installed env entries"
        );
        Ok(report)
    }

    /// Loads every file into the environment of the current process.
    pub fn install_process(self) -> Result<LoadReport, LoadError> {
        self.install(&mut ProcessEnv)
    }

    fn read(mut self) -> Result<(LoadedSet, usize), LoadError> {
        if self.sources.is_empty() {
            self.sources.push(FileSource::new(DEFAULT_FILE, true));
        }

        let mut set = LoadedSet::default();
        let mut files_read = 0;
        for source in &self.sources {
            if source.read_into(&mut set)? {
                files_read += 1;
            }
        }

        // Resolve ${...} references after all files are merged
        expand(&mut set)?;
        Ok((set, files_read))
    }
}
