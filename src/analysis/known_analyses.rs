// std imports
use std::collections::BTreeSet;
use std::fs::{read, write};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

// 3rd party imports
use postcard::{from_bytes, to_allocvec};
use tracing::debug;

// internal imports
use crate::{constants::KNOWN_ANALYSES_FILE_NAME, errors::persistence_error::PersistenceError};

/// Sorted set of analysis names created below a root directory,
/// used to offer existing analyses for loading.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownAnalyses {
    names: BTreeSet<String>,
}

impl KnownAnalyses {
    /// Path of the index file
    ///
    /// # Arguments
    /// * `root_dir` - Directory containing the analysis directories
    ///
    pub fn file_path(root_dir: &Path) -> PathBuf {
        root_dir.join(KNOWN_ANALYSES_FILE_NAME)
    }

    /// Loads the index, a missing file is an empty index
    ///
    /// # Arguments
    /// * `root_dir` - Directory containing the analysis directories
    ///
    pub fn load(root_dir: &Path) -> Result<Self, PersistenceError> {
        let path = Self::file_path(root_dir);
        let bytes = match read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("No known analyses at {}", path.display());
                return Ok(Self::default());
            }
            Err(err) => return Err(PersistenceError::ReadError(path, err)),
        };
        Ok(Self {
            names: from_bytes(&bytes)?,
        })
    }

    /// Writes the index
    ///
    /// # Arguments
    /// * `root_dir` - Directory containing the analysis directories
    ///
    pub fn save(&self, root_dir: &Path) -> Result<(), PersistenceError> {
        let path = Self::file_path(root_dir);
        let bytes = to_allocvec(&self.names)?;
        write(&path, bytes).map_err(|err| PersistenceError::WriteError(path, err))
    }

    /// Adds a name, returns false if it was already known
    pub fn insert(&mut self, name: &str) -> bool {
        self.names.insert(name.to_string())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
