use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Snowball stemmer languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Danish,
    Dutch,
    English,
    French,
    #[default]
    German,
    Italian,
    Norwegian,
    Portuguese,
    Russian,
    Spanish,
    Swedish,
}

impl Language {
    fn algorithm(self) -> Algorithm {
        match self {
            Language::Danish => Algorithm::Danish,
            Language::Dutch => Algorithm::Dutch,
            Language::English => Algorithm::English,
            Language::French => Algorithm::French,
            Language::German => Algorithm::German,
            Language::Italian => Algorithm::Italian,
            Language::Norwegian => Algorithm::Norwegian,
            Language::Portuguese => Algorithm::Portuguese,
            Language::Russian => Algorithm::Russian,
            Language::Spanish => Algorithm::Spanish,
            Language::Swedish => Algorithm::Swedish,
        }
    }
}

pub struct TextStemmer {
    language: Language,
    stemmer: Stemmer,
}

impl std::fmt::Debug for TextStemmer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextStemmer").field("language", &self.language).finish()
    }
}

impl TextStemmer {
    pub fn new(language: Language) -> Self {
        Self { language, stemmer: Stemmer::create(language.algorithm()) }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn stem_word(&self, word: &str) -> String {
        self.stemmer.stem(&word.to_lowercase()).into_owned()
    }

    /// Lowercase and stem every whitespace-separated word, re-joined by single spaces.
    pub fn preprocess(&self, text: &str) -> String {
        text.split_whitespace()
            .map(|word| self.stem_word(word))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// ROUGE tokens: lowercased maximal runs of alphanumeric characters.
pub fn rouge_tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Word tokens split on Unicode word boundaries, punctuation kept as tokens.
pub fn word_tokens(text: &str) -> Vec<String> {
    text.split_word_bounds()
        .filter(|t| !t.trim().is_empty())
        .map(str::to_lowercase)
        .collect()
}
