// std imports
use std::fmt::Write as _;
use std::fs::write;
use std::path::PathBuf;

// 3rd party imports
use tracing::info;

// internal imports
use crate::{analysis::analysis_config::AnalysisConfig, errors::analysis_error::AnalysisError};

/// Crux boolean
fn flag(value: bool) -> &'static str {
    if value {
        "T"
    } else {
        "F"
    }
}

impl AnalysisConfig {
    /// Renders the crux parameter file: a comment line naming the analysis
    /// followed by one `key=value` line per parameter in a fixed order.
    /// `custom-enzyme` is only written if the custom enzyme is enabled.
    ///
    pub fn render_parameter_file(&self) -> String {
        let p = &self.parameters;
        let mut lines: Vec<(&str, String)> = vec![
            ("enzyme", p.enzyme.to_string()),
            ("digestion", p.digest_type.to_string()),
            ("missed-cleavages", flag(p.allow_missed_cleavages).to_string()),
            ("isotopic-mass", p.isotopic_mass.to_string()),
            ("min-length", p.min_length.to_string()),
            ("max-length", p.max_length.to_string()),
            ("min-mass", p.min_mass.to_string()),
            ("max-mass", p.max_mass.to_string()),
        ];
        if p.custom_enzyme.enabled {
            lines.push(("custom-enzyme", p.custom_enzyme.rule()));
        }
        lines.extend([
            ("max-mods", p.max_mods.to_string()),
            ("num-decoys-per-target", p.num_decoys_per_target.to_string()),
            ("decoy-location", p.decoy_location.to_string()),
            ("compute-p-values", flag(p.compute_p_values).to_string()),
            ("spectrum-charge", p.spectrum_charge.to_string()),
            ("spectrum-min-mass", p.spectrum_min_mass.to_string()),
            ("spectrum-max-mass", p.spectrum_max_mass.to_string()),
            ("print-search-progress", p.print_search_progress.to_string()),
            ("seed", p.seed.clone()),
            ("pi0", p.pi0.to_string()),
            ("top-match", p.top_match.to_string()),
            ("feature-file", flag(p.feature_file).to_string()),
        ]);

        let mut content = format!("# Parameter file for analysis {}\n", self.display_name());
        for (key, value) in lines {
            // writing into a String cannot fail
            let _ = writeln!(content, "{}={}", key, value);
        }
        content
    }

    /// Renders the parameter file and writes it to `<root>/<name>/analysis.params`
    ///
    pub fn write_parameter_file(&self) -> Result<PathBuf, AnalysisError> {
        let path = self
            .parameter_file_path()
            .ok_or(AnalysisError::MissingNameError)?;
        write(&path, self.render_parameter_file())
            .map_err(|err| AnalysisError::ParameterFileWriteError(path.clone(), err))?;
        info!("Wrote parameter file {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs::{create_dir_all, read_to_string};

    use super::*;
    use crate::{
        analysis::parameters::CustomEnzyme,
        vocabulary::{AminoAcid, DigestType, Enzyme, IsotopicMassType},
    };

    #[test]
    fn test_default_rendering() {
        let mut config = AnalysisConfig::new();
        config.set_name("yeast").unwrap();
        let rendered = config.render_parameter_file();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "# Parameter file for analysis yeast");
        assert_eq!(
            &lines[1..],
            &[
                "enzyme=trypsin",
                "digestion=full-digest",
                "missed-cleavages=F",
                "isotopic-mass=average",
                "min-length=6",
                "max-length=50",
                "min-mass=200",
                "max-mass=7200",
                "max-mods=255",
                "num-decoys-per-target=2",
                "decoy-location=separate-decoy-files",
                "compute-p-values=F",
                "spectrum-charge=all",
                "spectrum-min-mass=0",
                "spectrum-max-mass=1000000000",
                "print-search-progress=10",
                "seed=time",
                "pi0=0.9",
                "top-match=5",
                "feature-file=F",
            ]
        );
    }

    #[test]
    fn test_canonical_tokens() {
        let mut config = AnalysisConfig::new();
        config.set_isotopic_mass(IsotopicMassType::Monoisotopic);
        config.set_digest_type(DigestType::Partial);
        config.set_enzyme(Enzyme::Trypsin);
        config.set_allow_missed_cleavages(true);

        let rendered = config.render_parameter_file();
        let lines: Vec<&str> = rendered.lines().collect();
        for expected in [
            "isotopic-mass=mono",
            "digestion=partial-digest",
            "enzyme=trypsin",
            "missed-cleavages=T",
        ] {
            assert!(lines.contains(&expected), "missing `{}`", expected);
        }
    }

    #[test]
    fn test_custom_enzyme_token() {
        let mut config = AnalysisConfig::new();
        config.set_custom_enzyme(CustomEnzyme {
            enabled: true,
            before: BTreeSet::from([AminoAcid::Lysine, AminoAcid::Arginine]),
            after: BTreeSet::new(),
            prevent_before: false,
            prevent_after: true,
        });
        let rendered = config.render_parameter_file();
        let token = rendered
            .lines()
            .find_map(|line| line.strip_prefix("custom-enzyme="))
            .unwrap();
        assert_eq!(token, "[KR]|{}");

        config.set_custom_enzyme_enabled(false);
        assert!(!config.render_parameter_file().contains("custom-enzyme"));
    }

    #[test]
    fn test_write_parameter_file() {
        let root = tempfile::tempdir().unwrap();
        let mut config = AnalysisConfig::new();
        config.set_root_dir(root.path());
        assert!(matches!(
            config.write_parameter_file(),
            Err(AnalysisError::MissingNameError)
        ));

        config.set_name("yeast").unwrap();
        assert!(matches!(
            config.write_parameter_file(),
            Err(AnalysisError::ParameterFileWriteError(_, _))
        ));

        create_dir_all(root.path().join("yeast")).unwrap();
        let path = config.write_parameter_file().unwrap();
        assert_eq!(path, root.path().join("yeast").join("analysis.params"));
        assert_eq!(read_to_string(path).unwrap(), config.render_parameter_file());
    }
}
