use std::sync::OnceLock;

use regex::Regex;

/// Collapses any run of two or more consecutive blank lines to exactly one
/// blank line. Idempotent.
pub fn normalize_blank_lines(text: &str) -> String {
    static BLANK_RUNS: OnceLock<Regex> = OnceLock::new();
    let re = BLANK_RUNS.get_or_init(|| Regex::new(r"\n{3,}").unwrap());
    re.replace_all(text, "\n\n").into_owned()
}

#[cfg(test)]
mod tests {
    use super::normalize_blank_lines;

    #[test]
    fn collapses_runs_of_blank_lines() {
        assert_eq!(normalize_blank_lines("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(normalize_blank_lines("a\n\n\nb\n\n\n\n\nc"), "a\n\nb\n\nc");
    }

    #[test]
    fn single_blank_lines_are_untouched() {
        assert_eq!(normalize_blank_lines("a\n\nb\nc"), "a\n\nb\nc");
    }

    #[test]
    fn normalization_is_idempotent() {
        let input = "x\n\n\n\ny\n\n\nz\n";
        let once = normalize_blank_lines(input);
        assert_eq!(normalize_blank_lines(&once), once);
    }
}
