// Include readme in doc
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/Readme.md"))]

/// Closed vocabularies of crux parameter values
pub mod vocabulary;

/// Analysis model, validation, parameter file, commands and persistence
pub mod analysis;

/// Command line driver configuration
pub mod configuration;

/// Constants used throughout the crate
pub mod constants;

/// Errors
pub mod errors;

/// Running the pipeline
pub mod pipeline;
