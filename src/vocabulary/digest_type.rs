vocabulary! {
    /// Whether both or only one peptide end has to follow the enzyme rule
    ///
    DigestType {
        Full => "full-digest",
        Partial => "partial-digest",
    }
}
