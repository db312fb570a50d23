//! Word frequencies over toxic comments

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use toxiguard_core::CommentRecord;

const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "again", "all", "am", "an", "and", "any", "are", "as", "at", "be",
    "because", "been", "before", "being", "but", "by", "can", "could", "did", "do", "does",
    "doing", "don't", "for", "from", "had", "has", "have", "having", "he", "her", "here", "hers",
    "him", "his", "how", "i", "i'm", "if", "in", "into", "is", "it", "it's", "its", "just", "me",
    "more", "most", "my", "no", "not", "now", "of", "on", "once", "only", "or", "other", "our",
    "out", "over", "own", "same", "she", "so", "some", "such", "than", "that", "the", "their",
    "them", "then", "there", "these", "they", "this", "those", "to", "too", "under", "until",
    "up", "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "why",
    "will", "with", "would", "you", "you're", "your", "yours",
];

/// A word and how often it appears
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermFrequency {
    pub term: String,
    pub count: usize,
}

/// Most frequent words across toxic comments.
///
/// Words are lowercased and stop words dropped. Ties are broken
/// alphabetically so the output is stable.
pub fn term_frequencies(records: &[CommentRecord], top: usize) -> Vec<TermFrequency> {
    let stop: HashSet<&str> = STOP_WORDS.iter().copied().collect();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for record in records.iter().filter(|r| r.is_toxic()) {
        let text = record.text.to_lowercase();
        let words = text.split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '\''));
        for word in words {
            let word = word.trim_matches('\'');
            if word.chars().count() < 2 || stop.contains(word) {
                continue;
            }
            *counts.entry(word.to_string()).or_default() += 1;
        }
    }

    let mut terms: Vec<TermFrequency> = counts
        .into_iter()
        .map(|(term, count)| TermFrequency { term, count })
        .collect();
    terms.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.term.cmp(&b.term)));
    terms.truncate(top);
    terms
}
