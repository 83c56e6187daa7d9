use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VocabularyError {
    /// Vocabulary name and the offending value
    #[error("[Vocabulary] `{1}` is not a valid {0}")]
    UnknownValueError(&'static str, String),
}
