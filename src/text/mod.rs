//! Text preparation for summarization
//!
//! Splits extracted article text into sentences and packs them into chunks
//! small enough for a length-limited summarization model.

mod chunker;
mod sentences;
mod tokens;

pub use chunker::{chunk_sentences, ChunkLimits};
pub use sentences::split_sentences;
pub use tokens::{SubwordEstimator, TokenCounter, WordCounter};

/// Split `text` into sentences and chunk them under `limits`
pub fn chunk_text(text: &str, limits: &ChunkLimits, counter: &dyn TokenCounter) -> Vec<String> {
    chunk_sentences(&split_sentences(text), limits, counter)
}
