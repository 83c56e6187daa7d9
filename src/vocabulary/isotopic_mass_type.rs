vocabulary! {
    /// Isotopes used for peptide masses
    ///
    IsotopicMassType {
        Average => "average",
        Monoisotopic => "mono",
    }
}
