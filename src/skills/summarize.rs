//! Extractive document summary.

const MAX_SENTENCES: usize = 5;
const MIN_SENTENCE_CHARS: usize = 20;
const HIGHLIGHT_SCAN: usize = 10;
const MAX_HIGHLIGHTS: usize = 3;
const HIGHLIGHT_WORDS: [&str; 7] = [
    "important",
    "main",
    "key",
    "significant",
    "crucial",
    "essential",
    "primary",
];

/// Summarizes the text by picking sentences from its start, middle and
/// evenly spaced positions, followed by up to three highlighted points.
pub fn summarize(text: &str) -> String {
    let sentences = sentences(text);

    let summary = if sentences.len() <= MAX_SENTENCES {
        format!("{}.", sentences.join(". "))
    } else {
        let picked: Vec<&str> = selected_indices(sentences.len())
            .into_iter()
            .map(|i| sentences[i])
            .collect();
        format!("{}.", picked.join(". "))
    };

    let highlights: Vec<&str> = sentences
        .iter()
        .take(HIGHLIGHT_SCAN)
        .filter(|s| {
            let lower = s.to_lowercase();
            HIGHLIGHT_WORDS.iter().any(|w| lower.contains(w))
        })
        .take(MAX_HIGHLIGHTS)
        .copied()
        .collect();

    let mut result = format!("📄 **Summary:**\n\n{summary}");
    if !highlights.is_empty() {
        result.push_str("\n\n**Main Points:**\n");
        for (i, point) in highlights.iter().enumerate() {
            result.push_str(&format!("\n{}. {}", i + 1, point));
        }
    }
    result
}

/// Sentences longer than the minimum, trimmed.
fn sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| s.chars().count() > MIN_SENTENCE_CHARS)
        .collect()
}

/// Positions picked when there are more sentences than fit in a summary.
fn selected_indices(count: usize) -> Vec<usize> {
    let mut indices = vec![0, 1, count / 2];
    let remaining = MAX_SENTENCES - indices.len();
    let step = count / (remaining + 1);
    for i in 0..remaining {
        let index = step * (i + 1);
        if index < count && !indices.contains(&index) {
            indices.push(index);
        }
    }
    indices.sort_unstable();
    indices
}
