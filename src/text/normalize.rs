//! Punctuation and whitespace normalization of extracted text blocks.

use std::sync::LazyLock;

use regex::Regex;

use super::abbreviations::expand_abbreviations;

static LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\r\n|[\r\n]").expect("valid line break pattern"));
static APOSTROPHES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[\u{2018}\u{2019}]").expect("valid apostrophe pattern"));
static QUOTES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("[\u{201C}\u{201D}\u{00AB}\u{00BB}]").expect("valid quote pattern")
});
// Soft hyphen and en dash, with any whitespace after them.
static DASHES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[\u{00AD}\u{2013}]\\s*").expect("valid dash pattern"));
static EMOTICON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\\s:-\\)").expect("valid emoticon pattern"));
static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\\s{2,}").expect("valid whitespace pattern"));

/// Normalize one block of extracted text and expand abbreviations.
///
/// The result is not trimmed; [`join_blocks`] trims the joined text.
pub fn clean_block(block: &str) -> String {
    let text = LINE_BREAKS.replace_all(block, " ");
    let text = APOSTROPHES.replace_all(&text, "'");
    let text = QUOTES.replace_all(&text, "\"");
    let text = DASHES.replace_all(&text, "");
    let text = EMOTICON.replace_all(&text, "");
    let text = WHITESPACE_RUNS.replace_all(&text, " ");
    expand_abbreviations(&text).into_owned()
}

/// Join cleaned blocks with single spaces.
pub fn join_blocks<I, S>(blocks: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();
    for block in blocks {
        if !joined.is_empty() {
            joined.push(' ');
        }
        joined.push_str(block.as_ref());
    }
    joined.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_breaks_become_spaces() {
        assert_eq!(clean_block("one\r\ntwo\nthree\rfour"), "one two three four");
    }

    #[test]
    fn test_quotes_and_apostrophes() {
        assert_eq!(
            clean_block("\u{201C}It\u{2019}s\u{201D} \u{00BB}her\u{00AB} \u{2018}x\u{2019}"),
            "\"It's\" \"her\" 'x'"
        );
    }

    #[test]
    fn test_strips_soft_hyphen_and_en_dash() {
        assert_eq!(clean_block("sprog\u{00AD}lig"), "sproglig");
        assert_eq!(clean_block("1990 \u{2013} 2000"), "1990 2000");
        assert_eq!(clean_block("side \u{2013}\n  slut"), "side slut");
    }

    #[test]
    fn test_strips_emoticon_after_whitespace() {
        assert_eq!(clean_block("Godt gået :-) Igen"), "Godt gået Igen");
        assert_eq!(clean_block("smil:-)"), "smil:-)");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(clean_block("a  b \t\u{a0}c"), "a b c");
        // A single tab is left alone.
        assert_eq!(clean_block("a\tb"), "a\tb");
    }

    #[test]
    fn test_expands_abbreviations() {
        assert_eq!(
            clean_block("Han kom (f.eks. i går)"),
            "Han kom (for eksempel i går)"
        );
    }

    #[test]
    fn test_join_blocks() {
        assert_eq!(join_blocks([" first", "second", "third "]), "first second third");
        assert_eq!(join_blocks(Vec::<String>::new()), "");
    }
}
