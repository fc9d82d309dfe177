//! Greedy sentence packing into summarizer-sized chunks

use super::tokens::TokenCounter;
use serde::{Deserialize, Serialize};

/// Budgets applied while chunking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkLimits {
    /// Tokens allowed in one chunk
    pub max_tokens: usize,
    /// Words allowed in one chunk
    pub max_words: usize,
    /// Chunking stops once this many words have been taken overall
    pub word_cap: usize,
}

impl Default for ChunkLimits {
    fn default() -> Self {
        Self {
            max_tokens: 500,
            max_words: 4000,
            word_cap: 4000,
        }
    }
}

/// Pack sentences into chunks.
///
/// Sentences are appended to the current chunk while both its token and word
/// budgets hold; the first sentence that does not fit closes the chunk and
/// opens the next one. Processing stops once `word_cap` words have been taken.
/// A sentence that alone exceeds a budget is split on word boundaries first,
/// so no chunk ever exceeds either budget. Empty chunks are never produced.
pub fn chunk_sentences<S: AsRef<str>>(
    sentences: &[S],
    limits: &ChunkLimits,
    counter: &dyn TokenCounter,
) -> Vec<String> {
    let max_tokens = limits.max_tokens.max(1);
    let max_words = limits.max_words.max(1);

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut taken_words = 0;

    'sentences: for sentence in sentences {
        for piece in fit_to_budget(sentence.as_ref(), max_tokens, max_words, counter) {
            let words = word_count(&piece);
            let candidate = join(&current, &piece);

            if counter.count(&candidate) <= max_tokens && word_count(&candidate) <= max_words {
                current = candidate;
            } else {
                if !current.is_empty() {
                    chunks.push(std::mem::take(&mut current));
                }
                current = piece;
            }

            taken_words += words;
            if taken_words >= limits.word_cap {
                break 'sentences;
            }
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn join(current: &str, piece: &str) -> String {
    if current.is_empty() {
        piece.to_string()
    } else {
        format!("{} {}", current, piece)
    }
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Return the sentence itself, or word-bounded pieces of it that each fit
fn fit_to_budget(
    sentence: &str,
    max_tokens: usize,
    max_words: usize,
    counter: &dyn TokenCounter,
) -> Vec<String> {
    let sentence = sentence.trim();
    if sentence.is_empty() {
        return Vec::new();
    }
    if counter.count(sentence) <= max_tokens && word_count(sentence) <= max_words {
        return vec![sentence.to_string()];
    }

    let mut pieces = Vec::new();
    let mut current = String::new();

    for word in sentence.split_whitespace() {
        for part in split_word(word, max_tokens, counter) {
            let candidate = join(&current, &part);
            if counter.count(&candidate) <= max_tokens && word_count(&candidate) <= max_words {
                current = candidate;
            } else {
                if !current.is_empty() {
                    pieces.push(std::mem::take(&mut current));
                }
                current = part;
            }
        }
    }

    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Break a single word that alone exceeds the token budget
fn split_word(word: &str, max_tokens: usize, counter: &dyn TokenCounter) -> Vec<String> {
    if counter.count(word) <= max_tokens {
        return vec![word.to_string()];
    }

    let mut parts = Vec::new();
    let mut current = String::new();
    for c in word.chars() {
        let mut candidate = current.clone();
        candidate.push(c);
        if current.is_empty() || counter.count(&candidate) <= max_tokens {
            current = candidate;
        } else {
            parts.push(std::mem::replace(&mut current, c.to_string()));
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}
