use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("[Persistence] Analysis has no name, nothing to save or load")]
    MissingNameError,
    #[error("[Persistence] `{0}` is not a valid analysis name")]
    InvalidNameError(String),
    #[error("[Persistence] Analysis directory `{0}` does not exist")]
    MissingDirectoryError(PathBuf),
    #[error("[Persistence] Unable to read `{0}`:\n\t{1}")]
    ReadError(PathBuf, std::io::Error),
    #[error("[Persistence] Unable to write `{0}`:\n\t{1}")]
    WriteError(PathBuf, std::io::Error),
    #[error("[Persistence] Gzip (de-)compression error:\n\t{0}")]
    CompressionError(std::io::Error),
    #[error("[Persistence] Failed to (de-)serialize:\n\t{0}")]
    DeSerializationError(#[from] postcard::Error),
    #[error("[Persistence] Model file format version {0} is not supported (supported up to {1})")]
    UnsupportedVersionError(u32, u32),
    #[error("[Persistence] Model file `{0}` belongs to analysis `{1}`")]
    NameMismatchError(PathBuf, String),
}
