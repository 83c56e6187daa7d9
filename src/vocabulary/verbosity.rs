use std::str::FromStr;

vocabulary! {
    /// Amount of crux output on stderr. Each level includes the lower ones.
    ///
    Verbosity {
        Fatal => "fatal",
        NonFatal => "non-fatal",
        Warnings => "warnings",
        Progress => "progress",
        MoreProgress => "more-progress",
        Debug => "debug",
        DetailedDebug => "detailed-debug",
    }
}

impl Verbosity {
    /// Numeric level passed to `--verbosity`
    pub fn level(&self) -> u8 {
        match self {
            Verbosity::Fatal => 0,
            Verbosity::NonFatal => 10,
            Verbosity::Warnings => 20,
            Verbosity::Progress => 30,
            Verbosity::MoreProgress => 40,
            Verbosity::Debug => 50,
            Verbosity::DetailedDebug => 60,
        }
    }

    /// Numeric level as string for the command line
    pub fn level_str(&self) -> String {
        self.level().to_string()
    }

    /// Resolves a label or a numeric level.
    /// Anything unrecognized falls back to [Verbosity::Progress] (30).
    ///
    /// # Arguments
    /// * `value` - Label (e.g. `debug`) or numeric level (e.g. `50`)
    ///
    pub fn from_label_or_level(value: &str) -> Self {
        if let Ok(verbosity) = Verbosity::from_str(value) {
            return verbosity;
        }
        value
            .trim()
            .parse::<u8>()
            .ok()
            .and_then(|level| {
                Verbosity::ALL
                    .iter()
                    .copied()
                    .find(|verbosity| verbosity.level() == level)
            })
            .unwrap_or(Verbosity::Progress)
    }
}

impl Default for Verbosity {
    fn default() -> Self {
        Verbosity::Progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels() {
        let levels: Vec<u8> = Verbosity::ALL.iter().map(|v| v.level()).collect();
        assert_eq!(levels, vec![0, 10, 20, 30, 40, 50, 60]);
        assert_eq!(Verbosity::DetailedDebug.level_str(), "60");
    }

    #[test]
    fn test_from_label_or_level() {
        assert_eq!(Verbosity::from_label_or_level("debug"), Verbosity::Debug);
        assert_eq!(Verbosity::from_label_or_level("10"), Verbosity::NonFatal);
        assert_eq!(Verbosity::from_label_or_level("loud"), Verbosity::Progress);
        assert_eq!(Verbosity::from_label_or_level("35"), Verbosity::Progress);
    }
}
