/// Generates a closed vocabulary enum with its canonical crux spelling.
/// Each enum gets `ALL`, `as_str`, `Display` and a case-insensitive `FromStr`.
///
macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$variant_meta:meta])* $variant:ident => $canonical:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
        )]
        pub enum $name {
            $( $(#[$variant_meta])* $variant ),+
        }

        impl $name {
            /// All values in declaration order
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            /// Canonical string as understood by crux
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $canonical ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::errors::vocabulary_error::VocabularyError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let trimmed = value.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str().eq_ignore_ascii_case(trimmed))
                    .ok_or_else(|| {
                        $crate::errors::vocabulary_error::VocabularyError::UnknownValueError(
                            stringify!($name),
                            value.to_string(),
                        )
                    })
            }
        }
    };
}

/// The 20 standard amino acids
pub mod amino_acid;
/// Decoy placement strategies
pub mod decoy_location;
/// Full or partial digestion
pub mod digest_type;
/// Named enzymes
pub mod enzyme;
/// Average or monoisotopic masses
pub mod isotopic_mass_type;
/// Spectrum charge filter
pub mod spectrum_charge;
/// Crux verbosity levels
pub mod verbosity;

pub use amino_acid::AminoAcid;
pub use decoy_location::DecoyLocation;
pub use digest_type::DigestType;
pub use enzyme::Enzyme;
pub use isotopic_mass_type::IsotopicMassType;
pub use spectrum_charge::AllowedSpectrumCharge;
pub use verbosity::Verbosity;
