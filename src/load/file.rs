//! File-based entry source.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use super::line::tokenize;
use super::{Entry, LoadError, LoadedSet};

/// An env file registered with the loader.
///
/// Files can be marked as required or optional. Required files that don't exist
/// cause an error; optional files that don't exist are silently skipped.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    required: bool,
}

impl FileSource {
    /// Creates a new file source.
    pub fn new(path: impl AsRef<Path>, required: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            required,
        }
    }

    /// Parses the file into `set`, overwriting entries with the same key.
    ///
    /// Returns `Ok(false)` if the file doesn't exist and is optional.
    pub fn read_into(&self, set: &mut LoadedSet) -> Result<bool, LoadError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !self.required => {
                tracing::debug!(path = %self.path.display(), "optional env file not found, skipping");
                return Ok(false);
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let mut parsed = 0usize;
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| self.io_error(e))?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let line_number = index + 1;
            let tokens = tokenize(trimmed).map_err(|reason| LoadError::MalformedLine {
                path: self.path.clone(),
                line_number,
                line: line.clone(),
                reason,
            })?;

            set.insert(Entry {
                key: tokens.key,
                value: tokens.value,
                annotation: tokens.annotation,
                source: Some(self.path.clone()),
                line: line_number,
            });
            parsed += 1;
        }

        tracing::debug!(path = %self.path.display(), entries = parsed, "read env file");
        Ok(true)
    }

    fn io_error(&self, source: std::io::Error) -> LoadError {
        LoadError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
