//! Word, long-word and sentence segmentation of cleaned prose.

use std::sync::LazyLock;

use regex::Regex;

/// Words longer than this many characters count as long words.
pub const LONG_WORD_LENGTH: usize = 6;

/// Short tokens that end a sentence even though they look like abbreviations.
const SENTENCE_WORDS: &[&str] = &["hm", "pst"];

// Letters and digits, then any number of `.`/`'` + letters groups, so that
// "O'Reilly" and "U.S" are single words.
static WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("[A-Za-z0-9À-ÖØ-öø-ÿ]+(?:[.'][A-Za-zÀ-ÖØ-öø-ÿ]+)*").expect("valid word pattern")
});

/// Segmented text. `long_words` is the filter of `words` longer than
/// [`LONG_WORD_LENGTH`], with duplicates kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizedContent {
    pub words: Vec<String>,
    pub long_words: Vec<String>,
    pub sentences: Vec<String>,
}

impl TokenizedContent {
    pub fn stats(&self) -> crate::lix::ContentStats {
        crate::lix::ContentStats {
            word_count: self.words.len(),
            long_word_count: self.long_words.len(),
            sentence_count: self.sentences.len(),
        }
    }
}

/// Segment `text` into words, long words and sentences.
pub fn tokenize(text: &str) -> TokenizedContent {
    let words = words(text);
    let long_words = words
        .iter()
        .filter(|w| is_long_word(w))
        .cloned()
        .collect();
    let sentences = split_sentences(text)
        .into_iter()
        .map(str::to_string)
        .collect();
    TokenizedContent {
        words,
        long_words,
        sentences,
    }
}

pub fn is_long_word(word: &str) -> bool {
    word.chars().count() > LONG_WORD_LENGTH
}

pub fn words(text: &str) -> Vec<String> {
    WORD_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Split `text` into sentences.
///
/// A whitespace run is a boundary when the character before it is one of
/// `.!?"`, the token before it is not a short consonant abbreviation such as
/// "Mr.", and the character after it is not lowercase, `.` or `(`.
/// Whitespace-only fragments are dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !c.is_whitespace() {
            continue;
        }
        let mut end = i + c.len_utf8();
        while let Some(&(j, next)) = chars.peek() {
            if !next.is_whitespace() {
                break;
            }
            end = j + next.len_utf8();
            chars.next();
        }

        let before = &text[start..i];
        let after = &text[end..];
        if is_boundary(before, after) {
            push_sentence(&mut sentences, before);
            start = end;
        }
    }
    push_sentence(&mut sentences, &text[start..]);
    sentences
}

fn push_sentence<'a>(sentences: &mut Vec<&'a str>, fragment: &'a str) {
    let fragment = fragment.trim();
    if !fragment.is_empty() {
        sentences.push(fragment);
    }
}

fn is_boundary(before: &str, after: &str) -> bool {
    let ends_sentence = before
        .chars()
        .next_back()
        .is_some_and(|c| matches!(c, '.' | '!' | '?' | '"'));
    if !ends_sentence || is_abbreviation(last_token(before)) {
        return false;
    }
    match after.chars().next() {
        None => true,
        Some(c) => !(c.is_lowercase() || c == '.' || c == '('),
    }
}

fn last_token(text: &str) -> &str {
    match text.rfind(char::is_whitespace) {
        Some(i) => {
            let ws = text[i..].chars().next().map_or(1, char::len_utf8);
            &text[i + ws..]
        }
        None => text,
    }
}

/// One to three ASCII consonants and a period, except the words in
/// [`SENTENCE_WORDS`].
fn is_abbreviation(token: &str) -> bool {
    let Some(stem) = token.strip_suffix('.') else {
        return false;
    };
    let consonants = (1..=3).contains(&stem.len())
        && stem
            .chars()
            .all(|c| c.is_ascii_alphabetic() && !"aeiouyAEIOUY".contains(c));
    consonants
        && !SENTENCE_WORDS
            .iter()
            .any(|word| word.eq_ignore_ascii_case(stem))
}
