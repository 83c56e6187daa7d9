vocabulary! {
    /// Enzymes crux knows by name. `NoEnzyme` means non-specific digestion.
    ///
    Enzyme {
        Trypsin => "trypsin",
        Chymotrypsin => "chymotrypsin",
        Elastase => "elastase",
        Clostripain => "clostripain",
        CyanogenBromide => "cyanogen-bromide",
        Iodosobenzoate => "iodosobenzoate",
        ProlineEndopeptidase => "proline-endopeptidase",
        StaphProtease => "staph-protease",
        ElastaseTrypsinChymotrypsin => "elastase-trypsin-chymotrypsin",
        ModifiedChymotrypsin => "modified-chymotrypsin",
        NoEnzyme => "no-enzyme",
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_enzyme_strings() {
        assert_eq!(Enzyme::ALL.len(), 11);
        assert_eq!(Enzyme::Trypsin.to_string(), "trypsin");
        assert_eq!(Enzyme::from_str("Cyanogen-Bromide").unwrap(), Enzyme::CyanogenBromide);
        assert_eq!(Enzyme::from_str(" no-enzyme ").unwrap(), Enzyme::NoEnzyme);
        assert_eq!(
            Enzyme::from_str("elastase-trypsin-chymotrypsin").unwrap(),
            Enzyme::ElastaseTrypsinChymotrypsin
        );
        assert!(Enzyme::from_str("aspn").is_err());
        assert!(Enzyme::from_str("pepsin").is_err());
    }
}
