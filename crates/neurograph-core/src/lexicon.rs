//! Label extraction: raw text to normalized content words.

use std::collections::HashSet;

/// Turns raw text into the labels that will be reinforced and activated.
pub trait LabelExtractor: Send + Sync {
    /// Normalized, deduplicated content words in order of first appearance.
    fn extract(&self, text: &str) -> Vec<String>;
}

/// English and Spanish function words ignored by the default extractor.
pub const STOP_WORDS: &[&str] = &[
    // English
    "the", "an", "is", "are", "was", "were", "in", "on", "at", "to", "for", "of", "and",
    "or", "but", "not", "with", "you", "she", "it", "we", "they", "my", "your", "this",
    "that", "these", "those", "be", "been", "has", "have", "had", "do", "does", "did",
    "what", "who", "how", "why", "can", "will", "just", "too", "very", "also", "its",
    "our", "their", "his", "her", "him", "them", "from", "about", "into", "than", "then",
    // Spanish
    "el", "la", "los", "las", "un", "una", "unos", "unas", "de", "del", "al", "en", "por",
    "para", "con", "sin", "que", "qué", "es", "son", "soy", "eres", "fue", "ser", "pero",
    "si", "sí", "no", "me", "te", "se", "le", "mi", "tu", "tú", "su", "yo", "él", "ella",
    "eso", "esto", "como", "cómo", "más", "muy", "ya", "hay", "ha", "he", "lo", "nos",
    "les", "este", "esta", "estos", "estas", "hola", "ok",
];

const TRIM_CHARS: &[char] = &[
    '.', ',', '!', '?', '¿', '¡', ';', ':', '"', '\'', '(', ')', '[', ']', '{', '}',
];

/// Default extractor: lowercase, strip surrounding punctuation, drop short
/// words and stop words, dedupe preserving order.
#[derive(Debug, Clone)]
pub struct StopWordExtractor {
    stop_words: HashSet<String>,
    min_len: usize,
}

impl Default for StopWordExtractor {
    fn default() -> Self {
        Self {
            stop_words: STOP_WORDS.iter().map(|w| w.to_string()).collect(),
            min_len: 3,
        }
    }
}

impl StopWordExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Words with fewer characters than this are dropped.
    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }

    /// Add extra stop words (normalized to lowercase).
    pub fn with_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stop_words
            .extend(words.into_iter().map(|w| w.as_ref().trim().to_lowercase()));
        self
    }
}

impl LabelExtractor for StopWordExtractor {
    fn extract(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        text.split_whitespace()
            .map(|w| w.to_lowercase().trim_matches(TRIM_CHARS).to_string())
            .filter(|w| w.chars().count() >= self.min_len)
            .filter(|w| !self.stop_words.contains(w))
            .filter(|w| seen.insert(w.clone()))
            .collect()
    }
}

/// Extract labels with the default extractor.
pub fn extract_labels(text: &str) -> Vec<String> {
    StopWordExtractor::default().extract(text)
}
