//! Token counting for chunk budgets

/// Counts model tokens in a span of text.
///
/// Counts must be additive across whitespace for the chunker's budgets to be
/// exact, which holds for both counters here.
pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;
}

/// Approximates a SentencePiece vocabulary: every run of letters and digits
/// costs one token per `chars_per_token` characters, every other symbol one
/// token.
#[derive(Debug, Clone, Copy)]
pub struct SubwordEstimator {
    chars_per_token: usize,
}

impl SubwordEstimator {
    pub fn new(chars_per_token: usize) -> Self {
        Self {
            chars_per_token: chars_per_token.max(1),
        }
    }
}

impl Default for SubwordEstimator {
    fn default() -> Self {
        Self::new(4)
    }
}

impl TokenCounter for SubwordEstimator {
    fn count(&self, text: &str) -> usize {
        let mut tokens = 0;
        let mut run: usize = 0;

        for c in text.chars() {
            if c.is_alphanumeric() {
                run += 1;
                continue;
            }
            tokens += run.div_ceil(self.chars_per_token);
            run = 0;
            if !c.is_whitespace() {
                tokens += 1;
            }
        }

        tokens + run.div_ceil(self.chars_per_token)
    }
}

/// One token per whitespace-separated word
#[derive(Debug, Clone, Copy, Default)]
pub struct WordCounter;

impl TokenCounter for WordCounter {
    fn count(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }
}
