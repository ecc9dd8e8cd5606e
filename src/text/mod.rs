//! Prose normalization and segmentation.

mod abbreviations;
mod normalize;
mod tokenize;

pub use abbreviations::{ABBREVIATIONS, expand_abbreviations};
pub use normalize::{clean_block, join_blocks};
pub use tokenize::{
    LONG_WORD_LENGTH, TokenizedContent, is_long_word, split_sentences, tokenize, words,
};
