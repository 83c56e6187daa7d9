/// Analysis model: parameters, stage flags, run statuses and the dirty flag
pub mod analysis_config;
/// Crux command lines per stage
pub mod command;
/// Index of the analyses below a root directory
pub mod known_analyses;
/// Rendering of the crux parameter file
pub mod parameter_file;
/// Scientific parameters and their defaults
pub mod parameters;
/// Saving and loading of analyses
pub mod persistence;
/// Pipeline stages and run status
pub mod stage;
pub mod utils;
/// Checks before a run
pub mod validation;
