use crate::errors::vocabulary_error::VocabularyError;

vocabulary! {
    /// Standard amino acids, canonical form is the one-letter code
    ///
    AminoAcid {
        Alanine => "A",
        Cysteine => "C",
        AsparticAcid => "D",
        GlutamicAcid => "E",
        Phenylalanine => "F",
        Glycine => "G",
        Histidine => "H",
        Isoleucine => "I",
        Lysine => "K",
        Leucine => "L",
        Methionine => "M",
        Asparagine => "N",
        Proline => "P",
        Glutamine => "Q",
        Arginine => "R",
        Serine => "S",
        Threonine => "T",
        Valine => "V",
        Tryptophan => "W",
        Tyrosine => "Y",
    }
}

impl AminoAcid {
    /// One-letter code
    pub fn code(&self) -> char {
        // canonical strings are single ASCII letters
        self.as_str().chars().next().unwrap_or('X')
    }

    /// Parses a one-letter code (case-insensitive)
    ///
    /// # Arguments
    /// * `code` - One-letter code
    ///
    pub fn from_code(code: char) -> Result<Self, VocabularyError> {
        Self::ALL
            .iter()
            .copied()
            .find(|amino_acid| amino_acid.code() == code.to_ascii_uppercase())
            .ok_or_else(|| VocabularyError::UnknownValueError("AminoAcid", code.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        assert_eq!(AminoAcid::ALL.len(), 20);
        let codes: std::collections::BTreeSet<char> =
            AminoAcid::ALL.iter().map(|aa| aa.code()).collect();
        assert_eq!(codes.len(), 20);
    }

    #[test]
    fn test_from_code() {
        assert_eq!(AminoAcid::from_code('k').unwrap(), AminoAcid::Lysine);
        assert_eq!(AminoAcid::from_code('R').unwrap(), AminoAcid::Arginine);
        assert!(AminoAcid::from_code('X').is_err());
        assert!(AminoAcid::from_code('B').is_err());
    }
}
