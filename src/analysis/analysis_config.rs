// std imports
use std::collections::BTreeSet;
use std::fmt::Debug;
use std::fs::create_dir_all;
use std::path::{Path, PathBuf};
use std::str::FromStr;

// 3rd party imports
use paste::paste;
use tracing::{debug, info};

// internal imports
use crate::{
    analysis::{
        known_analyses::KnownAnalyses,
        parameters::{AnalysisParameters, CustomEnzyme, DEFAULT_PARAMETERS},
        stage::{PipelineStage, RunStatus, StageMap},
        utils::is_valid_analysis_name,
    },
    constants::{INDEX_DIR_NAME, MODEL_FILE_EXTENSION, PARAMETER_FILE_NAME},
    errors::analysis_error::AnalysisError,
    vocabulary::{
        AllowedSpectrumCharge, AminoAcid, DecoyLocation, DigestType, Enzyme, IsotopicMassType,
        Verbosity,
    },
};

/// Stages are not selected to run until the user selects them
///
const DEFAULT_RUN_STAGE: bool = false;

/// Advanced parameters are hidden by default
///
const DEFAULT_SHOW_ADVANCED: bool = false;

/// A named analysis: all parameters of all stages, which stages to run and how
/// far the last run got.
///
/// The analysis lives in the directory `<root>/<name>`, which holds the saved
/// model, the rendered parameter file, the index and the crux output.
/// Every setter logs the change and marks the analysis as needing a save,
/// except the run status which is bookkeeping of the runner.
///
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Directory containing the analysis directories, not persisted
    pub(crate) root_dir: PathBuf,
    pub(crate) name: Option<String>,
    pub(crate) path_to_tool: Option<PathBuf>,
    pub(crate) run_stage: StageMap<bool>,
    pub(crate) show_advanced: StageMap<bool>,
    pub(crate) run_status: StageMap<RunStatus>,
    pub(crate) parameters: AnalysisParameters,
    pub(crate) needs_saving: bool,
}

/// Generates getter, setter and default getter for each parameter.
/// `copy` parameters are returned by value, `clone` parameters by reference.
///
macro_rules! parameter_accessors {
    (
        copy { $( $field:ident : $ty:ty ),+ $(,)? }
        clone { $( $cfield:ident : $cty:ty ),+ $(,)? }
    ) => {
        paste! {
            impl AnalysisConfig {
                $(
                    pub fn $field(&self) -> $ty {
                        self.parameters.$field
                    }

                    pub fn [<set_ $field>](&mut self, value: $ty) {
                        self.parameter_changed(stringify!($field), &value);
                        self.parameters.$field = value;
                    }

                    pub fn [<default_ $field>]() -> $ty {
                        DEFAULT_PARAMETERS.$field
                    }
                )+

                $(
                    pub fn $cfield(&self) -> &$cty {
                        &self.parameters.$cfield
                    }

                    pub fn [<set_ $cfield>]<V: Into<$cty>>(&mut self, value: V) {
                        let value: $cty = value.into();
                        self.parameter_changed(stringify!($cfield), &value);
                        self.parameters.$cfield = value;
                    }

                    pub fn [<default_ $cfield>]() -> $cty {
                        DEFAULT_PARAMETERS.$cfield.clone()
                    }
                )+
            }
        }
    };
}

parameter_accessors! {
    copy {
        enzyme: Enzyme,
        digest_type: DigestType,
        allow_missed_cleavages: bool,
        isotopic_mass: IsotopicMassType,
        min_length: u32,
        max_length: u32,
        min_mass: f64,
        max_mass: f64,
        max_mods: u32,
        num_decoys_per_target: u32,
        decoy_location: DecoyLocation,
        compute_p_values: bool,
        spectrum_charge: AllowedSpectrumCharge,
        spectrum_min_mass: f64,
        spectrum_max_mass: f64,
        print_search_progress: u32,
        pi0: f64,
        top_match: u32,
        feature_file: bool,
        verbosity: Verbosity,
    }
    clone {
        custom_enzyme: CustomEnzyme,
        seed: String,
        output_dir: String,
        protein_source: String,
        spectra_source: String,
    }
}

impl AnalysisConfig {
    /// Creates an unnamed analysis with default values in the current directory
    ///
    pub fn new() -> Self {
        Self {
            root_dir: PathBuf::new(),
            name: None,
            path_to_tool: None,
            run_stage: StageMap::filled(DEFAULT_RUN_STAGE),
            show_advanced: StageMap::filled(DEFAULT_SHOW_ADVANCED),
            run_status: StageMap::filled(RunStatus::NotRun),
            parameters: DEFAULT_PARAMETERS.clone(),
            needs_saving: false,
        }
    }

    /// Creates a new named analysis with default values below `root_dir`:
    /// creates the analysis directory, saves the model and registers the
    /// name in the known analyses.
    /// Fails without touching the disk if an analysis of that name already exists.
    ///
    /// # Arguments
    /// * `root_dir` - Directory containing the analysis directories
    /// * `name` - Analysis name, also the directory name
    ///
    pub fn create(root_dir: &Path, name: &str) -> Result<Self, AnalysisError> {
        let mut config = Self::new();
        config.set_root_dir(root_dir);
        config.set_name(name)?;

        let mut known_analyses = KnownAnalyses::load(root_dir)?;
        let model_exists = config.model_file_path().is_some_and(|path| path.exists());
        if model_exists || known_analyses.contains(name) {
            return Err(AnalysisError::AnalysisExistsError(name.to_string()));
        }

        let analysis_dir = root_dir.join(name);
        create_dir_all(&analysis_dir)
            .map_err(|err| AnalysisError::DirectoryCreationError(analysis_dir.clone(), err))?;
        config.save()?;

        known_analyses.insert(name);
        known_analyses.save(root_dir)?;

        info!("Created analysis `{}` in {}", name, analysis_dir.display());
        Ok(config)
    }

    // Identity & paths

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Sets the name, which is also the name of the analysis directory
    ///
    /// # Arguments
    /// * `name` - Letters, digits, `-` and `_` only
    ///
    pub fn set_name(&mut self, name: &str) -> Result<(), AnalysisError> {
        if !is_valid_analysis_name(name) {
            return Err(AnalysisError::InvalidNameError(name.to_string()));
        }
        self.parameter_changed("name", &name);
        self.name = Some(name.to_string());
        Ok(())
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Sets the directory containing the analysis directory.
    /// Runtime only, does not mark the analysis as changed.
    ///
    pub fn set_root_dir(&mut self, root_dir: &Path) {
        self.root_dir = root_dir.to_path_buf();
    }

    pub fn path_to_tool(&self) -> Option<&Path> {
        self.path_to_tool.as_deref()
    }

    pub fn set_path_to_tool(&mut self, path_to_tool: Option<PathBuf>) {
        self.parameter_changed("path_to_tool", &path_to_tool);
        self.path_to_tool = path_to_tool;
    }

    /// `<root>/<name>`, `None` if the analysis has no name yet
    pub fn analysis_dir(&self) -> Option<PathBuf> {
        self.name.as_ref().map(|name| self.root_dir.join(name))
    }

    /// `<root>/<name>/index`
    pub fn index_dir(&self) -> Option<PathBuf> {
        self.analysis_dir().map(|dir| dir.join(INDEX_DIR_NAME))
    }

    /// `<root>/<name>/<output-dir>`
    pub fn output_dir_path(&self) -> Option<PathBuf> {
        self.analysis_dir()
            .map(|dir| dir.join(&self.parameters.output_dir))
    }

    /// `<root>/<name>/analysis.params`
    pub fn parameter_file_path(&self) -> Option<PathBuf> {
        self.analysis_dir().map(|dir| dir.join(PARAMETER_FILE_NAME))
    }

    /// `<root>/<name>/<name>.model`
    pub fn model_file_path(&self) -> Option<PathBuf> {
        self.name.as_ref().map(|name| {
            self.root_dir
                .join(name)
                .join(format!("{}.{}", name, MODEL_FILE_EXTENSION))
        })
    }

    /// True if the index directory exists on disk
    pub fn index_exists(&self) -> bool {
        self.index_dir().is_some_and(|dir| dir.is_dir())
    }

    // Per stage flags

    pub fn run_stage(&self, stage: PipelineStage) -> bool {
        self.run_stage.get(stage)
    }

    pub fn set_run_stage(&mut self, stage: PipelineStage, run: bool) {
        debug!(
            analysis = self.display_name(),
            stage = stage.subcommand(),
            run,
            "run flag changed"
        );
        self.run_stage.set(stage, run);
        self.needs_saving = true;
    }

    pub fn default_run_stage(_stage: PipelineStage) -> bool {
        DEFAULT_RUN_STAGE
    }

    pub fn show_advanced(&self, stage: PipelineStage) -> bool {
        self.show_advanced.get(stage)
    }

    pub fn set_show_advanced(&mut self, stage: PipelineStage, show: bool) {
        debug!(
            analysis = self.display_name(),
            stage = stage.subcommand(),
            show,
            "advanced display flag changed"
        );
        self.show_advanced.set(stage, show);
        self.needs_saving = true;
    }

    pub fn default_show_advanced(_stage: PipelineStage) -> bool {
        DEFAULT_SHOW_ADVANCED
    }

    pub fn run_status(&self, stage: PipelineStage) -> RunStatus {
        self.run_status.get(stage)
    }

    /// Sets the run status. Does not mark the analysis as changed.
    pub fn set_run_status(&mut self, stage: PipelineStage, status: RunStatus) {
        debug!(
            analysis = self.display_name(),
            stage = stage.subcommand(),
            status = status.as_str(),
            "run status changed"
        );
        self.run_status.set(stage, status);
    }

    /// Stages selected to run, in execution order
    pub fn selected_stages(&self) -> Vec<PipelineStage> {
        PipelineStage::ALL
            .iter()
            .copied()
            .filter(|stage| self.run_stage(*stage))
            .collect()
    }

    // Custom enzyme parts

    pub fn set_custom_enzyme_enabled(&mut self, enabled: bool) {
        self.parameter_changed("custom_enzyme.enabled", &enabled);
        self.parameters.custom_enzyme.enabled = enabled;
    }

    pub fn set_cleavage_before(&mut self, residues: BTreeSet<AminoAcid>) {
        self.parameter_changed("custom_enzyme.before", &residues);
        self.parameters.custom_enzyme.before = residues;
    }

    pub fn set_cleavage_after(&mut self, residues: BTreeSet<AminoAcid>) {
        self.parameter_changed("custom_enzyme.after", &residues);
        self.parameters.custom_enzyme.after = residues;
    }

    pub fn set_prevent_before(&mut self, prevent: bool) {
        self.parameter_changed("custom_enzyme.prevent_before", &prevent);
        self.parameters.custom_enzyme.prevent_before = prevent;
    }

    pub fn set_prevent_after(&mut self, prevent: bool) {
        self.parameter_changed("custom_enzyme.prevent_after", &prevent);
        self.parameters.custom_enzyme.prevent_after = prevent;
    }

    // Dirty flag

    pub fn needs_saving(&self) -> bool {
        self.needs_saving
    }

    pub(crate) fn mark_saved(&mut self) {
        self.needs_saving = false;
    }

    #[cfg(test)]
    pub(crate) fn parameters(&self) -> &AnalysisParameters {
        &self.parameters
    }

    // Defaults

    /// Resets every parameter, every stage flag and every run status.
    /// Name, tool path and root directory are kept.
    ///
    pub fn restore_defaults(&mut self) {
        info!("Restoring all defaults of `{}`", self.display_name());
        self.parameters = DEFAULT_PARAMETERS.clone();
        self.run_stage = StageMap::filled(DEFAULT_RUN_STAGE);
        self.show_advanced = StageMap::filled(DEFAULT_SHOW_ADVANCED);
        self.run_status = StageMap::filled(RunStatus::NotRun);
        self.needs_saving = true;
    }

    /// Resets the flags, the run status and the parameters owned by one stage.
    ///
    /// # Arguments
    /// * `stage` - Stage to reset
    ///
    pub fn restore_stage_defaults(&mut self, stage: PipelineStage) {
        info!(
            "Restoring defaults of {} in `{}`",
            stage,
            self.display_name()
        );
        self.run_stage.set(stage, DEFAULT_RUN_STAGE);
        self.show_advanced.set(stage, DEFAULT_SHOW_ADVANCED);
        self.run_status.set(stage, RunStatus::NotRun);
        self.parameters.restore_stage_defaults(stage);
        self.needs_saving = true;
    }

    // Key based access

    /// Sets a parameter by its parameter file key, e.g. `enzyme` or `min-length`.
    /// Besides the parameter file keys, `verbosity`, `output-dir`,
    /// `protein-source` and `spectra-source` are accepted.
    /// `custom-enzyme` takes a rule like `[KR]|{P}` or `off`.
    ///
    /// # Arguments
    /// * `key` - Parameter key
    /// * `value` - Value as written in the parameter file
    ///
    pub fn set_parameter(&mut self, key: &str, value: &str) -> Result<(), AnalysisError> {
        match key.trim() {
            "enzyme" => self.set_enzyme(Enzyme::from_str(value)?),
            "digestion" => self.set_digest_type(DigestType::from_str(value)?),
            "missed-cleavages" => self.set_allow_missed_cleavages(parse_flag(key, value)?),
            "isotopic-mass" => self.set_isotopic_mass(IsotopicMassType::from_str(value)?),
            "min-length" => self.set_min_length(parse_number(key, value)?),
            "max-length" => self.set_max_length(parse_number(key, value)?),
            "min-mass" => self.set_min_mass(parse_number(key, value)?),
            "max-mass" => self.set_max_mass(parse_number(key, value)?),
            "custom-enzyme" => {
                if value.trim().eq_ignore_ascii_case("off") {
                    self.set_custom_enzyme_enabled(false)
                } else {
                    self.set_custom_enzyme(CustomEnzyme::parse_rule(value)?)
                }
            }
            "max-mods" => self.set_max_mods(parse_number(key, value)?),
            "num-decoys-per-target" => self.set_num_decoys_per_target(parse_number(key, value)?),
            "decoy-location" => self.set_decoy_location(DecoyLocation::from_str(value)?),
            "compute-p-values" => self.set_compute_p_values(parse_flag(key, value)?),
            "spectrum-charge" => self.set_spectrum_charge(AllowedSpectrumCharge::from_str(value)?),
            "spectrum-min-mass" => self.set_spectrum_min_mass(parse_number(key, value)?),
            "spectrum-max-mass" => self.set_spectrum_max_mass(parse_number(key, value)?),
            "print-search-progress" => self.set_print_search_progress(parse_number(key, value)?),
            "seed" => self.set_seed(value.trim()),
            "pi0" => self.set_pi0(parse_number(key, value)?),
            "top-match" => self.set_top_match(parse_number(key, value)?),
            "feature-file" => self.set_feature_file(parse_flag(key, value)?),
            "verbosity" => self.set_verbosity(Verbosity::from_label_or_level(value)),
            "output-dir" => self.set_output_dir(value.trim()),
            "protein-source" => self.set_protein_source(value.trim()),
            "spectra-source" => self.set_spectra_source(value.trim()),
            unknown => return Err(AnalysisError::UnknownParameterError(unknown.to_string())),
        }
        Ok(())
    }

    /// Logs a parameter change and marks the analysis as changed
    fn parameter_changed(&mut self, parameter: &'static str, value: &dyn Debug) {
        debug!(
            analysis = self.display_name(),
            parameter,
            value = ?value,
            "parameter changed"
        );
        self.needs_saving = true;
    }

    /// Name for log messages
    pub(crate) fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses crux booleans `T`/`F` (also `true`/`false`)
fn parse_flag(key: &str, value: &str) -> Result<bool, AnalysisError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "t" | "true" => Ok(true),
        "f" | "false" => Ok(false),
        _ => Err(AnalysisError::InvalidParameterValueError(
            key.to_string(),
            value.to_string(),
        )),
    }
}

fn parse_number<N: FromStr>(key: &str, value: &str) -> Result<N, AnalysisError> {
    value
        .trim()
        .parse::<N>()
        .map_err(|_| AnalysisError::InvalidParameterValueError(key.to_string(), value.to_string()))
}
