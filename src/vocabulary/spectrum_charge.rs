vocabulary! {
    /// Charge states searched. With `All` spectra with several charges are searched once per charge.
    ///
    AllowedSpectrumCharge {
        One => "1",
        Two => "2",
        Three => "3",
        All => "all",
    }
}
