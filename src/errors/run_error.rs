use thiserror::Error;

use super::analysis_error::AnalysisError;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("[Runner] Analysis has unsaved changes, save it before running")]
    UnsavedChangesError,
    #[error("[Runner] Analysis is not valid: {0}")]
    InvalidAnalysisError(AnalysisError),
    #[error("[Runner] No path to the crux executable is configured")]
    MissingToolPathError,
    #[error("[Runner] Unable to prepare the parameter file: {0}")]
    ParameterFileError(AnalysisError),
}
