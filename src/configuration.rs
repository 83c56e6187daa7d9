use std::path::PathBuf;

use crate::analysis::validation::ValidationPolicy;

/// Configuration of the command line driver.
/// Missing values in a configuration file fall back to the defaults.
///
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Configuration {
    /// Directory containing the analysis directories
    pub analyses_dir: PathBuf,

    /// Crux executable used for analyses which have none configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crux_path: Option<PathBuf>,

    /// If true a run needs at least one selected stage
    pub require_selected_stage: bool,
}

impl Configuration {
    /// Create a new default configuration
    ///
    pub fn new() -> Self {
        Self::default()
    }

    /// Validation policy for runs
    pub fn validation_policy(&self) -> ValidationPolicy {
        ValidationPolicy {
            require_selected_stage: self.require_selected_stage,
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            analyses_dir: PathBuf::from("."),
            crux_path: None,
            require_selected_stage: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_toml_is_readable() {
        let rendered = toml::to_string_pretty(&Configuration::default()).unwrap();
        let parsed: Configuration = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, Configuration::default());
        assert!(!parsed.validation_policy().require_selected_stage);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let parsed: Configuration = toml::from_str(
            r#"
            crux_path = "/opt/crux/bin/crux"
            require_selected_stage = true
            "#,
        )
        .unwrap();
        assert_eq!(parsed.analyses_dir, PathBuf::from("."));
        assert_eq!(parsed.crux_path, Some(PathBuf::from("/opt/crux/bin/crux")));
        assert!(parsed.validation_policy().require_selected_stage);
    }
}
