//! Offline extractive summaries
//!
//! Scores sentences by how many frequent content words they carry and keeps
//! the best ones, in reading order, until the length bound is used up.

use super::traits::{LengthBounds, Summarizer};
use crate::text::split_sentences;
use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::HashMap;

const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "as", "is", "was", "are", "were", "been", "be", "have", "has", "had", "do", "does",
    "did", "will", "would", "could", "should", "may", "might", "must", "can", "it", "its",
    "this", "that", "these", "those", "we", "our", "they", "their", "which", "who", "what",
    "when", "where", "how", "all", "each", "more", "most", "other", "some", "such", "no", "not",
    "only", "so", "than", "too", "very", "also", "here", "there", "then", "if", "while", "into",
    "through", "between", "under", "about", "over", "both", "any", "using", "use", "used",
];

/// Sentence-extraction summarizer
#[derive(Debug, Default, Clone)]
pub struct Extractive;

impl Extractive {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Summarizer for Extractive {
    fn name(&self) -> &str {
        "extractive"
    }

    async fn summarize(&self, text: &str, bounds: LengthBounds) -> Result<String> {
        let sentences = split_sentences(text);
        if sentences.is_empty() {
            bail!("nothing to summarize");
        }
        Ok(select_sentences(&sentences, bounds.max_length.max(1)).join(" "))
    }
}

fn content_words(sentence: &str) -> impl Iterator<Item = String> + '_ {
    sentence.split_whitespace().filter_map(|word| {
        let word: String = word
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        (word.len() >= 3 && !STOP_WORDS.contains(&word.as_str())).then_some(word)
    })
}

/// Best-scoring sentences within `max_words`, in their original order.
///
/// The first sentence is always kept when nothing else fits.
fn select_sentences(sentences: &[String], max_words: usize) -> Vec<&str> {
    let mut frequency: HashMap<String, usize> = HashMap::new();
    for sentence in sentences {
        for word in content_words(sentence) {
            *frequency.entry(word).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(usize, f64)> = sentences
        .iter()
        .enumerate()
        .map(|(i, sentence)| {
            let words = sentence.split_whitespace().count().max(1);
            let score: usize = content_words(sentence)
                .map(|w| frequency.get(&w).copied().unwrap_or(0))
                .sum();
            (i, score as f64 / words as f64)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut picked = Vec::new();
    let mut used = 0;
    for (i, _) in ranked {
        let words = sentences[i].split_whitespace().count();
        if used + words <= max_words {
            picked.push(i);
            used += words;
        }
    }

    if picked.is_empty() {
        picked.push(0);
    }
    picked.sort_unstable();
    picked.into_iter().map(|i| sentences[i].as_str()).collect()
}
