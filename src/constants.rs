/// Directory below the analysis directory which holds the crux index
///
pub const INDEX_DIR_NAME: &str = "index";

/// Rendered crux parameter file below the analysis directory
///
pub const PARAMETER_FILE_NAME: &str = "analysis.params";

/// Extension of the saved model, the file is `<name>/<name>.model`
///
pub const MODEL_FILE_EXTENSION: &str = "model";

/// Known analyses index in the root directory
///
pub const KNOWN_ANALYSES_FILE_NAME: &str = "known-analyses.bin";

/// Current format version of the model file
///
pub const MODEL_FORMAT_VERSION: u32 = 1;
