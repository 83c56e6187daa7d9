// std imports
use std::fs::{read, rename, write};
use std::io::prelude::*;
use std::path::{Path, PathBuf};

// 3rd party imports
use flate2::Compression;
use flate2::{read::GzDecoder, write::GzEncoder};
use postcard::{from_bytes, take_from_bytes, to_allocvec};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

// internal imports
use crate::{
    analysis::{
        analysis_config::AnalysisConfig,
        parameters::AnalysisParameters,
        stage::{RunStatus, StageMap},
        utils::is_valid_analysis_name,
    },
    constants::{MODEL_FILE_EXTENSION, MODEL_FORMAT_VERSION},
    errors::persistence_error::PersistenceError,
};

/// Everything persisted of an analysis in model format version 1.
/// The root directory is runtime only and the dirty flag is implied by saving.
///
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AnalysisRecordV1 {
    name: String,
    path_to_tool: Option<PathBuf>,
    run_stage: StageMap<bool>,
    show_advanced: StageMap<bool>,
    run_status: StageMap<RunStatus>,
    parameters: AnalysisParameters,
}

/// Serializes the record with its format version in front, postcard encoded and gzip compressed
///
/// # Arguments
/// * `record` - Record to encode
///
fn encode_model(record: &AnalysisRecordV1) -> Result<Vec<u8>, PersistenceError> {
    let bytes = to_allocvec(&(MODEL_FORMAT_VERSION, record))?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(&bytes)
        .map_err(PersistenceError::CompressionError)?;
    encoder.finish().map_err(PersistenceError::CompressionError)
}

/// Decompresses the model, reads the format version and decodes the matching record
///
/// # Arguments
/// * `compressed` - Content of a model file
///
fn decode_model(compressed: &[u8]) -> Result<AnalysisRecordV1, PersistenceError> {
    let mut bytes = Vec::with_capacity(compressed.len());
    let mut decoder = GzDecoder::new(compressed);
    let _ = decoder
        .read_to_end(&mut bytes)
        .map_err(PersistenceError::CompressionError)?;

    let (format_version, record_bytes) = take_from_bytes::<u32>(&bytes)?;
    match format_version {
        1 => Ok(from_bytes::<AnalysisRecordV1>(record_bytes)?),
        unsupported => Err(PersistenceError::UnsupportedVersionError(
            unsupported,
            MODEL_FORMAT_VERSION,
        )),
    }
}

impl AnalysisConfig {
    /// Saves the analysis to `<root>/<name>/<name>.model`.
    /// The model is written to a temporary file first and moved over the old one.
    /// Clears the dirty flag only if the file was written.
    ///
    pub fn save(&mut self) -> Result<(), PersistenceError> {
        let name = self.name.clone().ok_or(PersistenceError::MissingNameError)?;
        let analysis_dir = self.root_dir.join(&name);
        if !analysis_dir.is_dir() {
            return Err(PersistenceError::MissingDirectoryError(analysis_dir));
        }
        let model_path = analysis_dir.join(format!("{}.{}", name, MODEL_FILE_EXTENSION));
        let tmp_path = model_path.with_extension(format!("{}.tmp", MODEL_FILE_EXTENSION));

        let record = AnalysisRecordV1 {
            name,
            path_to_tool: self.path_to_tool.clone(),
            run_stage: self.run_stage.clone(),
            show_advanced: self.show_advanced.clone(),
            run_status: self.run_status.clone(),
            parameters: self.parameters.clone(),
        };
        let bytes = encode_model(&record)?;

        write(&tmp_path, bytes).map_err(|err| PersistenceError::WriteError(tmp_path.clone(), err))?;
        rename(&tmp_path, &model_path)
            .map_err(|err| PersistenceError::WriteError(model_path.clone(), err))?;

        self.mark_saved();
        info!("Saved analysis `{}` to {}", record.name, model_path.display());
        Ok(())
    }

    /// Loads the analysis `name` from `<root>/<name>/<name>.model` into a new instance
    ///
    /// # Arguments
    /// * `root_dir` - Directory containing the analysis directories
    /// * `name` - Analysis name
    ///
    pub fn load(root_dir: &Path, name: &str) -> Result<Self, PersistenceError> {
        if !is_valid_analysis_name(name) {
            return Err(PersistenceError::InvalidNameError(name.to_string()));
        }
        let analysis_dir = root_dir.join(name);
        if !analysis_dir.is_dir() {
            return Err(PersistenceError::MissingDirectoryError(analysis_dir));
        }
        let model_path = analysis_dir.join(format!("{}.{}", name, MODEL_FILE_EXTENSION));
        let compressed =
            read(&model_path).map_err(|err| PersistenceError::ReadError(model_path.clone(), err))?;
        let record = decode_model(&compressed)?;
        if record.name != name {
            return Err(PersistenceError::NameMismatchError(model_path, record.name));
        }
        debug!("Loaded analysis `{}` from {}", name, model_path.display());

        let mut config = Self::new();
        config.root_dir = root_dir.to_path_buf();
        config.name = Some(record.name);
        config.path_to_tool = record.path_to_tool;
        config.run_stage = record.run_stage;
        config.show_advanced = record.show_advanced;
        config.run_status = record.run_status;
        config.parameters = record.parameters;
        config.mark_saved();
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs::{create_dir_all, remove_dir_all};

    use super::*;
    use crate::{
        analysis::{parameters::CustomEnzyme, stage::PipelineStage},
        vocabulary::{
            AllowedSpectrumCharge, AminoAcid, DecoyLocation, DigestType, Enzyme,
            IsotopicMassType, Verbosity,
        },
    };

    fn changed_config(root: &Path) -> AnalysisConfig {
        let mut config = AnalysisConfig::new();
        config.set_root_dir(root);
        config.set_name("roundtrip").unwrap();
        create_dir_all(root.join("roundtrip")).unwrap();

        config.set_path_to_tool(Some(PathBuf::from("/opt/crux/bin/crux")));
        config.set_enzyme(Enzyme::StaphProtease);
        config.set_digest_type(DigestType::Partial);
        config.set_allow_missed_cleavages(true);
        config.set_isotopic_mass(IsotopicMassType::Monoisotopic);
        config.set_min_length(7);
        config.set_max_length(42);
        config.set_min_mass(321.25);
        config.set_max_mass(6543.5);
        config.set_custom_enzyme(CustomEnzyme {
            enabled: true,
            before: BTreeSet::from([AminoAcid::Lysine, AminoAcid::Arginine]),
            after: BTreeSet::from([AminoAcid::Proline]),
            prevent_before: false,
            prevent_after: true,
        });
        config.set_max_mods(4);
        config.set_num_decoys_per_target(3);
        config.set_decoy_location(DecoyLocation::OneDecoyFile);
        config.set_compute_p_values(true);
        config.set_spectrum_charge(AllowedSpectrumCharge::Two);
        config.set_spectrum_min_mass(100.0);
        config.set_spectrum_max_mass(5000.0);
        config.set_print_search_progress(100);
        config.set_seed("42");
        config.set_pi0(0.75);
        config.set_top_match(2);
        config.set_feature_file(true);
        config.set_verbosity(Verbosity::DetailedDebug);
        config.set_output_dir("results");
        config.set_protein_source("yeast.fasta");
        config.set_spectra_source("run1.ms2");
        config.set_run_stage(PipelineStage::QRanker, true);
        config.set_show_advanced(PipelineStage::SearchForMatches, true);
        config.set_run_status(PipelineStage::CreateIndex, RunStatus::Completed);
        config.set_run_status(PipelineStage::SearchForMatches, RunStatus::Failed);
        config
    }

    #[test]
    fn test_save_load_keeps_every_value() {
        let root = tempfile::tempdir().unwrap();
        let mut config = changed_config(root.path());
        assert!(config.needs_saving());
        config.save().unwrap();
        assert!(!config.needs_saving());

        let loaded = AnalysisConfig::load(root.path(), "roundtrip").unwrap();
        assert_eq!(loaded.name(), config.name());
        assert_eq!(loaded.path_to_tool(), config.path_to_tool());
        assert_eq!(loaded.parameters(), config.parameters());
        assert_eq!(loaded.custom_enzyme().rule(), "[KR]|{P}");
        for stage in PipelineStage::ALL {
            assert_eq!(loaded.run_stage(stage), config.run_stage(stage));
            assert_eq!(loaded.show_advanced(stage), config.show_advanced(stage));
            assert_eq!(loaded.run_status(stage), config.run_status(stage));
        }
        assert!(!loaded.needs_saving());
        assert_eq!(loaded.root_dir(), root.path());
    }

    #[test]
    fn test_save_without_name_fails() {
        let mut config = AnalysisConfig::new();
        config.set_top_match(1);
        assert!(matches!(
            config.save(),
            Err(PersistenceError::MissingNameError)
        ));
        assert!(config.needs_saving());
    }

    #[test]
    fn test_failed_save_keeps_dirty_flag() {
        let root = tempfile::tempdir().unwrap();
        let mut config = changed_config(root.path());
        remove_dir_all(root.path().join("roundtrip")).unwrap();

        assert!(matches!(
            config.save(),
            Err(PersistenceError::MissingDirectoryError(_))
        ));
        assert!(config.needs_saving());
    }

    #[test]
    fn test_load_missing_analysis() {
        let root = tempfile::tempdir().unwrap();
        assert!(matches!(
            AnalysisConfig::load(root.path(), "nothing"),
            Err(PersistenceError::MissingDirectoryError(_))
        ));
        create_dir_all(root.path().join("nothing")).unwrap();
        assert!(matches!(
            AnalysisConfig::load(root.path(), "nothing"),
            Err(PersistenceError::ReadError(_, _))
        ));
    }

    #[test]
    fn test_load_rejects_paths_as_names() {
        let root = tempfile::tempdir().unwrap();
        let mut outside = changed_config(root.path());
        outside.save().unwrap();
        let nested = root.path().join("nested");
        create_dir_all(&nested).unwrap();

        for name in ["../roundtrip", "roundtrip/../roundtrip", ""] {
            assert!(matches!(
                AnalysisConfig::load(&nested, name),
                Err(PersistenceError::InvalidNameError(_))
            ));
        }
    }

    #[test]
    fn test_unsupported_format_version() {
        let bytes = to_allocvec(&(MODEL_FORMAT_VERSION + 1, "anything")).unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&bytes).unwrap();
        let compressed = encoder.finish().unwrap();

        assert!(matches!(
            decode_model(&compressed),
            Err(PersistenceError::UnsupportedVersionError(2, 1))
        ));
    }

    #[test]
    fn test_garbage_is_not_a_model() {
        assert!(matches!(
            decode_model(b"definitely not gzip"),
            Err(PersistenceError::CompressionError(_))
        ));
    }

    #[test]
    fn test_model_of_other_analysis_is_rejected() {
        let root = tempfile::tempdir().unwrap();
        let mut config = changed_config(root.path());
        config.save().unwrap();
        create_dir_all(root.path().join("copy")).unwrap();
        std::fs::copy(
            root.path().join("roundtrip").join("roundtrip.model"),
            root.path().join("copy").join("copy.model"),
        )
        .unwrap();

        assert!(matches!(
            AnalysisConfig::load(root.path(), "copy"),
            Err(PersistenceError::NameMismatchError(_, _))
        ));
    }
}
