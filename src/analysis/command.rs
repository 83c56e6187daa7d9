// std imports
use std::path::Path;

// internal imports
use crate::{
    analysis::{
        analysis_config::AnalysisConfig,
        stage::{PipelineStage, RunStatus},
    },
    constants::{INDEX_DIR_NAME, PARAMETER_FILE_NAME},
    errors::analysis_error::AnalysisError,
};

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

impl AnalysisConfig {
    /// Builds the crux command line for the given stage:
    ///
    /// `<tool> <subcommand> --overwrite T --verbosity <level> [--output-dir <dir>] --parameter-file <file> <positional>...`
    ///
    /// Returns `None` if the stage is not selected or already completed.
    /// Downstream stages read the index if create index is part of this run
    /// or an index exists on disk, otherwise the protein source.
    /// If create index is selected but not completed, downstream stages cannot
    /// be built.
    ///
    /// # Arguments
    /// * `stage` - Stage to build the command for
    ///
    pub fn build_command(&self, stage: PipelineStage) -> Result<Option<Vec<String>>, AnalysisError> {
        if !self.run_stage(stage) || self.run_status(stage) == RunStatus::Completed {
            return Ok(None);
        }
        let tool = self
            .path_to_tool
            .as_deref()
            .ok_or(AnalysisError::MissingToolPathError)?;
        let analysis_dir = self.analysis_dir().ok_or(AnalysisError::MissingNameError)?;
        let index_dir = analysis_dir.join(INDEX_DIR_NAME);
        let output_dir = analysis_dir.join(&self.parameters.output_dir);
        let parameter_file = analysis_dir.join(PARAMETER_FILE_NAME);

        let protein_or_index = if !stage.needs_index() {
            self.parameters.protein_source.clone()
        } else if self.run_stage(PipelineStage::CreateIndex) {
            if self.run_status(PipelineStage::CreateIndex) != RunStatus::Completed {
                return Err(AnalysisError::IndexNotReadyError(stage));
            }
            path_arg(&index_dir)
        } else if index_dir.is_dir() {
            path_arg(&index_dir)
        } else {
            self.parameters.protein_source.clone()
        };

        let mut argv = vec![
            path_arg(tool),
            stage.subcommand().to_string(),
            "--overwrite".to_string(),
            "T".to_string(),
            "--verbosity".to_string(),
            self.parameters.verbosity.level_str(),
        ];
        if stage != PipelineStage::CreateIndex {
            argv.push("--output-dir".to_string());
            argv.push(path_arg(&output_dir));
        }
        argv.push("--parameter-file".to_string());
        argv.push(path_arg(&parameter_file));

        match stage {
            PipelineStage::CreateIndex => {
                argv.push(protein_or_index);
                argv.push(path_arg(&index_dir));
            }
            PipelineStage::SearchForMatches => {
                argv.push(self.parameters.spectra_source.clone());
                argv.push(protein_or_index);
            }
            PipelineStage::ComputeQValues | PipelineStage::Percolator | PipelineStage::QRanker => {
                argv.push(protein_or_index);
                argv.push(path_arg(&output_dir));
            }
        }
        Ok(Some(argv))
    }
}
