//! Expansion of Danish and English abbreviations.
//!
//! Abbreviations end in periods that would otherwise confuse sentence
//! splitting and word counting, so they are spelled out before tokenizing.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Abbreviation -> expansion. Matching is case-sensitive.
pub const ABBREVIATIONS: &[(&str, &str)] = &[
    ("f.eks.", "for eksempel"),
    ("fx", "for eksempel"),
    ("bl.a.", "blandt andet"),
    ("dvs.", "det vil sige"),
    ("osv.", "og så videre"),
    ("mht.", "med hensyn til"),
    ("pga.", "på grund af"),
    ("ca.", "cirka"),
    ("evt.", "eventuelt"),
    ("m.m.", "med mere"),
    ("mv.", "med videre"),
    ("o.l.", "og lignende"),
    ("jf.", "jævnfør"),
    ("iflg.", "ifølge"),
    ("inkl.", "inklusive"),
    ("ekskl.", "eksklusive"),
    ("vha.", "ved hjælp af"),
    ("ifm.", "i forbindelse med"),
    ("hhv.", "henholdsvis"),
    ("kl.", "klokken"),
    ("e.g.", "for example"),
    ("i.e.", "that is"),
    ("etc.", "et cetera"),
    ("approx.", "approximately"),
    ("incl.", "including"),
    ("vs.", "versus"),
];

// A space or opening parenthesis, then any key. Longer keys come first so
// the alternation prefers them.
static ABBREVIATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    let mut keys: Vec<&str> = ABBREVIATIONS.iter().map(|(key, _)| *key).collect();
    keys.sort_by_key(|key| std::cmp::Reverse(key.len()));
    let alternation = keys
        .iter()
        .map(|key| regex::escape(key))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("[ (]({alternation})")).expect("valid abbreviation pattern")
});

fn expansion(key: &str) -> Option<&'static str> {
    ABBREVIATIONS
        .iter()
        .find(|(abbreviation, _)| *abbreviation == key)
        .map(|(_, expansion)| *expansion)
}

/// Whether the character at `end` may follow an abbreviation.
fn ends_abbreviation(text: &str, end: usize) -> bool {
    match text[end..].chars().next() {
        None => true,
        Some(c) => c.is_whitespace() || matches!(c, '$' | ',' | '.' | '!' | '?' | ')'),
    }
}

/// Replace every abbreviation preceded by a space or `(` and followed by
/// whitespace, end of text, or one of `$,.!?)`.
pub fn expand_abbreviations(text: &str) -> Cow<'_, str> {
    let mut out = String::new();
    let mut copied = 0;
    let mut pos = 0;

    while let Some(caps) = ABBREVIATION_RE.captures_at(text, pos) {
        let Some(key) = caps.get(1) else { break };
        if ends_abbreviation(text, key.end())
            && let Some(expanded) = expansion(key.as_str())
        {
            out.push_str(&text[copied..key.start()]);
            out.push_str(expanded);
            copied = key.end();
            pos = key.end();
        } else {
            // The key starts one byte after the ASCII prefix character.
            pos = key.start();
        }
    }

    if copied == 0 {
        Cow::Borrowed(text)
    } else {
        out.push_str(&text[copied..]);
        Cow::Owned(out)
    }
}
