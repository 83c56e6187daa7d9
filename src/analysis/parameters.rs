// std imports
use std::collections::BTreeSet;

// 3rd party imports
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

// internal imports
use crate::{
    analysis::stage::PipelineStage,
    errors::analysis_error::AnalysisError,
    vocabulary::{
        AllowedSpectrumCharge, AminoAcid, DecoyLocation, DigestType, Enzyme, IsotopicMassType,
        Verbosity,
    },
};

/// Default output directory below the analysis directory
///
pub const DEFAULT_OUTPUT_DIR: &str = "crux-output";

/// Longest peptide crux handles, also the "no limit" value for `max-mods`
///
pub const MAX_PEPTIDE_LENGTH: u32 = 255;

/// Value crux uses as "no maximum" for masses
///
pub const BILLION: f64 = 1_000_000_000.0;

lazy_static! {
    /// Defaults of all parameters, never mutated
    ///
    pub static ref DEFAULT_PARAMETERS: AnalysisParameters = AnalysisParameters::default();
}

/// User defined cleavage rule which overrides the named enzyme.
///
/// Rendered for crux as `<before>|<after>` where each side is enclosed in
/// `[...]` if the residues are required at that position or `{...}` if they
/// prevent cleavage, e.g. trypsin is `[KR]|{P}`.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CustomEnzyme {
    /// If false the named enzyme is used and the rest of this struct is ignored
    pub enabled: bool,
    /// Residues before the cleavage site
    pub before: BTreeSet<AminoAcid>,
    /// Residues after the cleavage site
    pub after: BTreeSet<AminoAcid>,
    /// `before` residues prevent instead of require cleavage
    pub prevent_before: bool,
    /// `after` residues prevent instead of require cleavage
    pub prevent_after: bool,
}

impl CustomEnzyme {
    /// Renders the crux cleavage rule, e.g. `[KR]|{P}`.
    /// A side containing every amino acid is written as `X`.
    ///
    pub fn rule(&self) -> String {
        format!(
            "{}|{}",
            Self::render_side(&self.before, self.prevent_before),
            Self::render_side(&self.after, self.prevent_after)
        )
    }

    fn render_side(residues: &BTreeSet<AminoAcid>, prevent: bool) -> String {
        let (open, close) = if prevent { ('{', '}') } else { ('[', ']') };
        let content: String = if residues.len() == AminoAcid::ALL.len() {
            "X".to_string()
        } else {
            residues.iter().map(|amino_acid| amino_acid.code()).collect()
        };
        format!("{open}{content}{close}")
    }

    /// Parses a crux cleavage rule into an enabled custom enzyme
    ///
    /// # Arguments
    /// * `rule` - Rule like `[KR]|{P}` or `[X]|[D]`
    ///
    pub fn parse_rule(rule: &str) -> Result<Self, AnalysisError> {
        let invalid =
            || AnalysisError::InvalidParameterValueError("custom-enzyme".to_string(), rule.to_string());
        let (before, after) = rule.trim().split_once('|').ok_or_else(invalid)?;
        let (before, prevent_before) = Self::parse_side(before).ok_or_else(invalid)?;
        let (after, prevent_after) = Self::parse_side(after).ok_or_else(invalid)?;
        Ok(Self {
            enabled: true,
            before,
            after,
            prevent_before,
            prevent_after,
        })
    }

    fn parse_side(side: &str) -> Option<(BTreeSet<AminoAcid>, bool)> {
        let side = side.trim();
        let prevent = if side.starts_with('[') && side.ends_with(']') {
            false
        } else if side.starts_with('{') && side.ends_with('}') {
            true
        } else {
            return None;
        };
        let content = &side[1..side.len() - 1];
        let mut residues = BTreeSet::new();
        for code in content.chars().filter(|c| !c.is_whitespace()) {
            if code.eq_ignore_ascii_case(&'x') {
                residues.extend(AminoAcid::ALL.iter().copied());
            } else {
                residues.insert(AminoAcid::from_code(code).ok()?);
            }
        }
        Some((residues, prevent))
    }
}

/// All scientific parameters of an analysis.
///
/// Flat like the crux parameter file: a parameter used by several stages is
/// stored once. Which stage "owns" a parameter only matters when resetting a
/// single stage, see [AnalysisParameters::restore_stage_defaults].
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisParameters {
    // create-index
    pub enzyme: Enzyme,
    pub digest_type: DigestType,
    pub allow_missed_cleavages: bool,
    pub isotopic_mass: IsotopicMassType,
    pub min_length: u32,
    pub max_length: u32,
    pub min_mass: f64,
    pub max_mass: f64,
    pub custom_enzyme: CustomEnzyme,

    // search-for-matches
    pub max_mods: u32,
    pub num_decoys_per_target: u32,
    pub decoy_location: DecoyLocation,
    pub compute_p_values: bool,
    pub spectrum_charge: AllowedSpectrumCharge,
    pub spectrum_min_mass: f64,
    pub spectrum_max_mass: f64,
    pub print_search_progress: u32,
    /// `time` or a number, passed through to crux
    pub seed: String,

    // compute-q-values
    pub pi0: f64,

    // percolator & q-ranker
    pub top_match: u32,
    pub feature_file: bool,

    // whole analysis
    pub verbosity: Verbosity,
    pub output_dir: String,
    pub protein_source: String,
    pub spectra_source: String,
}

impl Default for AnalysisParameters {
    fn default() -> Self {
        Self {
            enzyme: Enzyme::Trypsin,
            digest_type: DigestType::Full,
            allow_missed_cleavages: false,
            isotopic_mass: IsotopicMassType::Average,
            min_length: 6,
            max_length: 50,
            min_mass: 200.0,
            max_mass: 7200.0,
            custom_enzyme: CustomEnzyme::default(),
            max_mods: MAX_PEPTIDE_LENGTH,
            num_decoys_per_target: 2,
            decoy_location: DecoyLocation::SeparateDecoyFiles,
            compute_p_values: false,
            spectrum_charge: AllowedSpectrumCharge::All,
            spectrum_min_mass: 0.0,
            spectrum_max_mass: BILLION,
            print_search_progress: 10,
            seed: "time".to_string(),
            pi0: 0.9,
            top_match: 5,
            feature_file: false,
            verbosity: Verbosity::Progress,
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            protein_source: String::new(),
            spectra_source: String::new(),
        }
    }
}

impl AnalysisParameters {
    /// Resets the parameters owned by the given stage, leaves all others untouched.
    ///
    /// # Arguments
    /// * `stage` - Stage whose parameters are reset
    ///
    pub fn restore_stage_defaults(&mut self, stage: PipelineStage) {
        let defaults = &*DEFAULT_PARAMETERS;
        match stage {
            PipelineStage::CreateIndex => {
                self.enzyme = defaults.enzyme;
                self.digest_type = defaults.digest_type;
                self.allow_missed_cleavages = defaults.allow_missed_cleavages;
                self.isotopic_mass = defaults.isotopic_mass;
                self.min_length = defaults.min_length;
                self.max_length = defaults.max_length;
                self.min_mass = defaults.min_mass;
                self.max_mass = defaults.max_mass;
                self.custom_enzyme = defaults.custom_enzyme.clone();
            }
            PipelineStage::SearchForMatches => {
                self.max_mods = defaults.max_mods;
                self.num_decoys_per_target = defaults.num_decoys_per_target;
                self.decoy_location = defaults.decoy_location;
                self.compute_p_values = defaults.compute_p_values;
                self.spectrum_charge = defaults.spectrum_charge;
                self.spectrum_min_mass = defaults.spectrum_min_mass;
                self.spectrum_max_mass = defaults.spectrum_max_mass;
                self.print_search_progress = defaults.print_search_progress;
                self.seed = defaults.seed.clone();
            }
            PipelineStage::ComputeQValues => {
                self.pi0 = defaults.pi0;
            }
            PipelineStage::Percolator | PipelineStage::QRanker => {
                self.top_match = defaults.top_match;
                self.feature_file = defaults.feature_file;
            }
        }
    }
}
