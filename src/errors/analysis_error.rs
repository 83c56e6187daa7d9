use std::path::PathBuf;

use thiserror::Error;

use crate::{
    analysis::stage::PipelineStage,
    errors::{persistence_error::PersistenceError, vocabulary_error::VocabularyError},
};

/// Errors raised by the analysis model.
/// The first group are the validation messages shown to the user before a run.
///
#[derive(Error, Debug)]
pub enum AnalysisError {
    // Validation
    #[error("The analysis needs a name")]
    MissingNameError,
    #[error("Create index is selected but no protein source is given")]
    MissingProteinSourceError,
    #[error("Search for matches is selected but no spectra source is given")]
    MissingSpectraSourceError,
    #[error("{0} needs an index: select create index or create the index `{1}` first")]
    MissingIndexError(PipelineStage, PathBuf),
    #[error("No stage is selected to run")]
    NoStageSelectedError,
    // Command construction
    #[error("Create index is part of this run but has not completed, {0} cannot use its index")]
    IndexNotReadyError(PipelineStage),
    #[error("No path to the crux executable is configured")]
    MissingToolPathError,
    // Naming & directories
    #[error("`{0}` is not usable as analysis name, use letters, digits, `-` and `_` only")]
    InvalidNameError(String),
    #[error("An analysis named `{0}` already exists, load it instead")]
    AnalysisExistsError(String),
    #[error("Unable to create analysis directory `{0}`:\n\t{1}")]
    DirectoryCreationError(PathBuf, std::io::Error),
    // Parameters
    #[error("Unknown parameter `{0}`")]
    UnknownParameterError(String),
    #[error("Invalid value `{1}` for parameter `{0}`")]
    InvalidParameterValueError(String, String),
    #[error("{0}")]
    VocabularyError(#[from] VocabularyError),
    #[error("Unable to write parameter file `{0}`:\n\t{1}")]
    ParameterFileWriteError(PathBuf, std::io::Error),
    #[error("{0}")]
    PersistenceError(#[from] PersistenceError),
}
