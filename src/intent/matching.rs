//! Message normalisation and whole-word phrase matching.

/// A chat message prepared for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    /// Lowercased and trimmed message
    pub text: String,
    /// Alphanumeric words of the message
    words: Vec<String>,
}

impl Utterance {
    pub fn new(message: &str) -> Self {
        let text = message.trim().to_lowercase();
        let words = normalize(&text)
            .split_whitespace()
            .map(str::to_string)
            .collect();
        Self { text, words }
    }

    /// True when the phrase's words occur as a contiguous run of words.
    pub fn contains_phrase(&self, phrase: &str) -> bool {
        let pattern: Vec<String> = normalize(phrase)
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if pattern.is_empty() || pattern.len() > self.words.len() {
            return false;
        }
        self.words
            .windows(pattern.len())
            .any(|window| window == pattern.as_slice())
    }

    /// True when any of the phrases matches.
    pub fn contains_any(&self, phrases: &[&str]) -> bool {
        phrases.iter().any(|phrase| self.contains_phrase(phrase))
    }
}

/// Lowercases and replaces punctuation with spaces.
fn normalize(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
