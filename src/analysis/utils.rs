use fancy_regex::Regex;
use lazy_static::lazy_static;

lazy_static! {
    /// Regex for characters not allowed in analysis names:
    /// anything but ASCII letters, digits, `-` and `_`, so the name is a single,
    /// portable directory name.
    ///
    static ref ILLEGAL_NAME_CHARACTER_REGEX: Regex = Regex::new(r"[^A-Za-z0-9_\-]+").unwrap();
}

/// Sanitizes the given string by replacing all illegal name characters with `_`.
///
/// # Arguments
/// * `some_str` - string
///
pub fn sanatize_analysis_name(some_str: &str) -> String {
    ILLEGAL_NAME_CHARACTER_REGEX
        .replace_all(some_str.trim(), "_")
        .to_string()
}

/// True if the name can be used as analysis and directory name as is
///
/// # Arguments
/// * `name` - Analysis name
///
pub fn is_valid_analysis_name(name: &str) -> bool {
    !name.is_empty() && sanatize_analysis_name(name) == name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    pub fn test_sanatize_analysis_name() {
        let input = " this../..is.a\u{0000}name to\tsanatize\n";
        let expected = "this_is_a_name_to_sanatize";

        let result = sanatize_analysis_name(input);
        assert_eq!(result, expected);
    }

    #[test]
    pub fn test_is_valid_analysis_name() {
        assert!(is_valid_analysis_name("yeast-run_01"));
        assert!(!is_valid_analysis_name(""));
        assert!(!is_valid_analysis_name("../escape"));
        assert!(!is_valid_analysis_name("with space"));
    }
}
