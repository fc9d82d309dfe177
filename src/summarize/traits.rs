//! Summarizer trait and length bounds

use async_trait::async_trait;
use serde::Serialize;

/// Output length bounds passed to a summarization model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LengthBounds {
    pub min_length: usize,
    pub max_length: usize,
}

impl LengthBounds {
    /// Longest summary allowed
    pub const MAX_LENGTH: usize = 200;
    /// Preferred shortest summary
    pub const MIN_LENGTH: usize = 50;

    /// Bounds scaled to the input: at most half its length and never more than
    /// [`Self::MAX_LENGTH`]; at least half of that or [`Self::MIN_LENGTH`],
    /// but never above the maximum.
    pub fn for_text(text: &str) -> Self {
        let max_length = (text.chars().count() / 2).min(Self::MAX_LENGTH);
        let min_length = (max_length / 2).max(Self::MIN_LENGTH).min(max_length);
        Self {
            min_length,
            max_length,
        }
    }
}

/// A summarization backend
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Backend name, for logs
    fn name(&self) -> &str;

    /// Summarize one chunk of text within `bounds`
    async fn summarize(&self, text: &str, bounds: LengthBounds) -> anyhow::Result<String>;
}
