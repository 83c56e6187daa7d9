// 3rd party imports
use serde::{Deserialize, Serialize};
use tracing::warn;

// internal imports
use crate::{
    analysis::{analysis_config::AnalysisConfig, stage::PipelineStage},
    errors::analysis_error::AnalysisError,
};

/// Rules which are optional when validating an analysis before a run
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationPolicy {
    /// Fail if no stage is selected to run
    pub require_selected_stage: bool,
}

impl AnalysisConfig {
    /// Checks if the analysis can be run and returns the first violated rule:
    /// 1. the analysis has a name
    /// 2. create index has a protein source
    /// 3. every downstream stage finds an index, either built in this run or on disk
    /// 4. search for matches has a spectra source
    /// 5. depending on the policy, at least one stage is selected
    ///
    /// # Arguments
    /// * `policy` - Optional rules
    ///
    pub fn validate_with(&self, policy: &ValidationPolicy) -> Result<(), AnalysisError> {
        if self.name.is_none() {
            return Err(AnalysisError::MissingNameError);
        }

        if self.run_stage(PipelineStage::CreateIndex) && self.parameters.protein_source.is_empty()
        {
            return Err(AnalysisError::MissingProteinSourceError);
        }

        if !self.run_stage(PipelineStage::CreateIndex) && !self.index_exists() {
            let downstream = PipelineStage::ALL
                .iter()
                .copied()
                .find(|stage| stage.needs_index() && self.run_stage(*stage));
            if let Some(stage) = downstream {
                return Err(AnalysisError::MissingIndexError(
                    stage,
                    self.index_dir().unwrap_or_default(),
                ));
            }
        }

        if self.run_stage(PipelineStage::SearchForMatches)
            && self.parameters.spectra_source.is_empty()
        {
            return Err(AnalysisError::MissingSpectraSourceError);
        }

        if policy.require_selected_stage && self.selected_stages().is_empty() {
            return Err(AnalysisError::NoStageSelectedError);
        }

        Ok(())
    }

    /// Validates with the default policy
    pub fn validate(&self) -> Result<(), AnalysisError> {
        self.validate_with(&ValidationPolicy::default())
    }

    /// True if the analysis can be run, logs the violated rule otherwise
    pub fn is_valid_analysis(&self) -> bool {
        match self.validate() {
            Ok(()) => true,
            Err(err) => {
                warn!(analysis = self.display_name(), "{}", err);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs::create_dir_all;

    use super::*;

    fn runnable(root: &std::path::Path) -> AnalysisConfig {
        let mut config = AnalysisConfig::new();
        config.set_root_dir(root);
        config.set_name("yeast").unwrap();
        for stage in PipelineStage::ALL {
            config.set_run_stage(stage, true);
        }
        config.set_protein_source("yeast.fasta");
        config.set_spectra_source("run1.ms2");
        config
    }

    #[test]
    fn test_all_stages_with_sources_are_valid() {
        let root = tempfile::tempdir().unwrap();
        let config = runnable(root.path());
        assert!(config.validate().is_ok());
        assert!(config.is_valid_analysis());
    }

    #[test]
    fn test_missing_name_is_reported_first() {
        let config = AnalysisConfig::new();
        assert!(matches!(
            config.validate(),
            Err(AnalysisError::MissingNameError)
        ));
        assert!(!config.is_valid_analysis());
    }

    #[test]
    fn test_missing_sources() {
        let root = tempfile::tempdir().unwrap();
        let mut config = runnable(root.path());
        config.set_protein_source("");
        assert!(matches!(
            config.validate(),
            Err(AnalysisError::MissingProteinSourceError)
        ));

        config.set_protein_source("yeast.fasta");
        config.set_spectra_source("");
        assert!(matches!(
            config.validate(),
            Err(AnalysisError::MissingSpectraSourceError)
        ));

        // no search, no spectra needed
        config.set_run_stage(PipelineStage::SearchForMatches, false);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_index_on_disk_satisfies_downstream_stages() {
        let root = tempfile::tempdir().unwrap();
        let mut config = runnable(root.path());
        config.set_run_stage(PipelineStage::CreateIndex, false);

        match config.validate() {
            Err(AnalysisError::MissingIndexError(stage, path)) => {
                assert_eq!(stage, PipelineStage::SearchForMatches);
                assert_eq!(path, root.path().join("yeast").join("index"));
            }
            other => panic!("expected missing index, got {:?}", other),
        }
        assert!(!config.is_valid_analysis());

        create_dir_all(root.path().join("yeast").join("index")).unwrap();
        assert!(config.validate().is_ok());
        assert!(config.is_valid_analysis());
    }

    #[test]
    fn test_no_stage_selected_depends_on_policy() {
        let root = tempfile::tempdir().unwrap();
        let mut config = runnable(root.path());
        for stage in PipelineStage::ALL {
            config.set_run_stage(stage, false);
        }
        assert!(config.validate().is_ok());

        let strict = ValidationPolicy {
            require_selected_stage: true,
        };
        assert!(matches!(
            config.validate_with(&strict),
            Err(AnalysisError::NoStageSelectedError)
        ));
    }
}
