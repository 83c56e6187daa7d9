vocabulary! {
    /// Where decoy search results end up
    ///
    DecoyLocation {
        /// Targets and decoys mixed in one file
        TargetFile => "target-file",
        /// All decoys in one extra file
        OneDecoyFile => "one-decoy-file",
        /// One file per decoy set
        SeparateDecoyFiles => "separate-decoy-files",
    }
}
