//! Text analysis pipeline for the sift index.
//!
//! Text fields are analyzed in three stages: split on whitespace and
//! punctuation, lowercase, then stem with a configurable language. The same
//! pipeline is applied to `contains` and `fuzzy-like` operands at query
//! time so query terms meet indexed terms in the same form.

use tantivy::tokenizer::{Language, LowerCaser, SimpleTokenizer, Stemmer, TextAnalyzer};

use crate::IndexError;

/// Name of the custom tokenizer registered with Tantivy.
pub(crate) const SIFT_TOKENIZER: &str = "sift_text";

/// Parses a stemmer language name into a Tantivy `Language`.
pub(crate) fn parse_language(name: &str) -> Result<Language, IndexError> {
    match name.to_lowercase().as_str() {
        "danish" => Ok(Language::Danish),
        "dutch" => Ok(Language::Dutch),
        "english" => Ok(Language::English),
        "french" => Ok(Language::French),
        "german" => Ok(Language::German),
        "italian" => Ok(Language::Italian),
        "portuguese" => Ok(Language::Portuguese),
        "spanish" => Ok(Language::Spanish),
        "swedish" => Ok(Language::Swedish),
        other => Err(IndexError::InvalidLanguage(other.to_string())),
    }
}

/// Builds the sift text analyzer for the given language.
pub(crate) fn build_analyzer(language: Language) -> TextAnalyzer {
    TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(LowerCaser)
        .filter(Stemmer::new(language))
        .build()
}

/// Builds the sift text analyzer from a language name.
pub(crate) fn build_analyzer_from_name(name: &str) -> Result<TextAnalyzer, IndexError> {
    Ok(build_analyzer(parse_language(name)?))
}
