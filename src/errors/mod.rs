/// Errors of the analysis model (validation, command construction, parameters)
pub mod analysis_error;
/// Errors when saving or loading analyses
pub mod persistence_error;
/// Errors which prevent a pipeline run from starting
pub mod run_error;
/// Errors when parsing vocabulary values
pub mod vocabulary_error;
